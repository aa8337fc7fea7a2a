//! Leaf value kinds.

use chrono::{DateTime, Utc};

/// A typed leaf value carried by a [`Field`](crate::Field).
///
/// The variant set is the closed vocabulary container parsers emit; each
/// variant has a stable type-hint name used as the final segment of leaf
/// paths (see [`ValueKind::hint`]).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Unsigned integer.
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// IEEE 754 double.
    Float(f64),
    /// Raw 8-bit string (Latin-1 or codepage text as decoded by the parser).
    Str(String),
    /// Unicode string.
    Unicode(String),
    /// Single-bit flag.
    Bool(bool),
    /// UTC timestamp.
    Date(DateTime<Utc>),
    /// Enumerated value with a human-readable display label.
    Enum { value: u64, label: String },
    /// Opaque binary payload.
    Binary(Vec<u8>),
}

/// The kind of a [`Value`], used for type-hint matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Unsigned,
    Signed,
    Float,
    Str,
    Unicode,
    Bool,
    Date,
    Enum,
    Binary,
}

impl ValueKind {
    /// The path segment naming this kind.
    pub fn hint(self) -> &'static str {
        match self {
            ValueKind::Unsigned => "unsigned",
            ValueKind::Signed => "signed",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Unicode => "unicode",
            ValueKind::Bool => "bool",
            ValueKind::Date => "date",
            ValueKind::Enum => "enum",
            ValueKind::Binary => "binary",
        }
    }

    /// Parse a path segment into a kind, if it names one.
    pub fn from_hint(hint: &str) -> Option<ValueKind> {
        match hint {
            "unsigned" => Some(ValueKind::Unsigned),
            "signed" => Some(ValueKind::Signed),
            "float" => Some(ValueKind::Float),
            "string" => Some(ValueKind::Str),
            "unicode" => Some(ValueKind::Unicode),
            "bool" => Some(ValueKind::Bool),
            "date" => Some(ValueKind::Date),
            "enum" => Some(ValueKind::Enum),
            "binary" => Some(ValueKind::Binary),
            _ => None,
        }
    }
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Unsigned(_) => ValueKind::Unsigned,
            Value::Signed(_) => ValueKind::Signed,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Unicode(_) => ValueKind::Unicode,
            Value::Bool(_) => ValueKind::Bool,
            Value::Date(_) => ValueKind::Date,
            Value::Enum { .. } => ValueKind::Enum,
            Value::Binary(_) => ValueKind::Binary,
        }
    }

    /// Unsigned integer content, including the raw value of enums.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Unsigned(v) => Some(*v),
            Value::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Float content, widening unsigned integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Unsigned(v) => Some(*v as f64),
            Value::Signed(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text content of either string flavor.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Unicode(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Display label of an enumerated value.
    pub fn label(&self) -> Option<&str> {
        match self {
            Value::Enum { label, .. } => Some(label),
            _ => None,
        }
    }
}
