//! Field nodes and the tree root.

use crate::error::FieldError;
use crate::path::{self, Segment};
use crate::value::{Value, ValueKind};

/// One named node of a field tree.
///
/// A field either carries a leaf [`Value`] or an ordered list of children.
/// Sibling fields may share a name; repeated names form the arrays that
/// [`Field::array`] iterates and that indexed path segments address.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    name: String,
    value: Option<Value>,
    children: Vec<Field>,
}

impl Field {
    /// A container field with ordered children.
    pub fn group(name: impl Into<String>, children: Vec<Field>) -> Field {
        Field {
            name: name.into(),
            value: None,
            children,
        }
    }

    /// A leaf field holding `value`.
    pub fn leaf(name: impl Into<String>, value: Value) -> Field {
        Field {
            name: name.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn unsigned(name: impl Into<String>, value: u64) -> Field {
        Field::leaf(name, Value::Unsigned(value))
    }

    pub fn signed(name: impl Into<String>, value: i64) -> Field {
        Field::leaf(name, Value::Signed(value))
    }

    pub fn float(name: impl Into<String>, value: f64) -> Field {
        Field::leaf(name, Value::Float(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Field {
        Field::leaf(name, Value::Str(value.into()))
    }

    pub fn unicode(name: impl Into<String>, value: impl Into<String>) -> Field {
        Field::leaf(name, Value::Unicode(value.into()))
    }

    pub fn boolean(name: impl Into<String>, value: bool) -> Field {
        Field::leaf(name, Value::Bool(value))
    }

    pub fn date(name: impl Into<String>, value: chrono::DateTime<chrono::Utc>) -> Field {
        Field::leaf(name, Value::Date(value))
    }

    /// An enumerated leaf with its raw value and display label.
    pub fn enumerated(name: impl Into<String>, value: u64, label: impl Into<String>) -> Field {
        Field::leaf(
            name,
            Value::Enum {
                value,
                label: label.into(),
            },
        )
    }

    pub fn binary(name: impl Into<String>, data: Vec<u8>) -> Field {
        Field::leaf(name, Value::Binary(data))
    }

    /// Field name, without any positional index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The leaf value, if this field is a leaf.
    pub fn leaf_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Ordered child enumeration.
    pub fn children(&self) -> impl Iterator<Item = &Field> {
        self.children.iter()
    }

    fn child(&self, segment: Segment<'_>) -> Option<&Field> {
        let mut siblings = self.children.iter().filter(|c| c.name == segment.name);
        match segment.index {
            Some(index) => siblings.nth(index),
            None => siblings.next(),
        }
    }

    /// Resolve a subtree path. An empty path resolves to `self`.
    pub fn get(&self, path: &str) -> Result<&Field, FieldError> {
        let mut node = self;
        for segment in path::segments(path) {
            node = node
                .child(segment)
                .ok_or_else(|| FieldError::Missing(path.to_string()))?;
        }
        Ok(node)
    }

    /// True when `path` resolves to a subtree, or to a leaf whose kind
    /// matches the path's trailing type hint.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok() || self.value(path).is_ok()
    }

    /// Read the leaf at a hinted path (`"Info/Duration/float"`).
    ///
    /// The final path segment names the expected [`ValueKind`]; a leaf of
    /// any other kind fails with [`FieldError::Mismatch`].
    pub fn value(&self, path: &str) -> Result<&Value, FieldError> {
        let missing = || FieldError::Missing(path.to_string());
        let (prefix, hint) = path::split_hint(path).ok_or_else(missing)?;
        let expected = ValueKind::from_hint(hint).ok_or_else(missing)?;
        let value = self.get(prefix)?.leaf_value().ok_or_else(missing)?;
        if value.kind() != expected {
            return Err(FieldError::Mismatch {
                path: path.to_string(),
                expected: expected.hint(),
                found: value.kind().hint(),
            });
        }
        Ok(value)
    }

    pub fn read_u64(&self, path: &str) -> Result<u64, FieldError> {
        let value = self.value(path)?;
        value.as_u64().ok_or_else(|| mismatch(path, "unsigned", value))
    }

    pub fn read_f64(&self, path: &str) -> Result<f64, FieldError> {
        let value = self.value(path)?;
        value.as_f64().ok_or_else(|| mismatch(path, "float", value))
    }

    pub fn read_str(&self, path: &str) -> Result<&str, FieldError> {
        let value = self.value(path)?;
        value.as_str().ok_or_else(|| mismatch(path, "string", value))
    }

    pub fn read_bool(&self, path: &str) -> Result<bool, FieldError> {
        let value = self.value(path)?;
        value.as_bool().ok_or_else(|| mismatch(path, "bool", value))
    }

    pub fn read_date(&self, path: &str) -> Result<chrono::DateTime<chrono::Utc>, FieldError> {
        let value = self.value(path)?;
        value.as_date().ok_or_else(|| mismatch(path, "date", value))
    }

    /// Read the display label of an enumerated leaf.
    pub fn read_label(&self, path: &str) -> Result<&str, FieldError> {
        let value = self.value(path)?;
        value.label().ok_or_else(|| mismatch(path, "enum", value))
    }

    /// All children sharing the path's final base name, in source order.
    ///
    /// `array("Tag")` collects the `Tag` children of `self`;
    /// `array("ext_desc/content/descriptor")` first resolves the parent
    /// path. An unresolvable parent yields an empty list.
    pub fn array(&self, path: &str) -> Vec<&Field> {
        let (parent, name) = match path.rsplit_once('/') {
            Some((prefix, last)) => match self.get(prefix) {
                Ok(node) => (node, last),
                Err(_) => return Vec::new(),
            },
            None => (self, path),
        };
        parent.children.iter().filter(|c| c.name == name).collect()
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> FieldError {
    FieldError::Mismatch {
        path: path.to_string(),
        expected,
        found: found.kind().hint(),
    }
}

/// A complete parsed container: the root field plus the total size of the
/// source in bytes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldTree {
    root: Field,
    size: u64,
}

impl FieldTree {
    pub fn new(root: Field, size: u64) -> FieldTree {
        FieldTree { root, size }
    }

    /// Total size of the source container, in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The root field.
    pub fn root(&self) -> &Field {
        &self.root
    }

    pub fn contains(&self, path: &str) -> bool {
        self.root.contains(path)
    }

    pub fn get(&self, path: &str) -> Result<&Field, FieldError> {
        self.root.get(path)
    }

    pub fn value(&self, path: &str) -> Result<&Value, FieldError> {
        self.root.value(path)
    }

    pub fn read_u64(&self, path: &str) -> Result<u64, FieldError> {
        self.root.read_u64(path)
    }

    pub fn read_f64(&self, path: &str) -> Result<f64, FieldError> {
        self.root.read_f64(path)
    }

    pub fn read_str(&self, path: &str) -> Result<&str, FieldError> {
        self.root.read_str(path)
    }

    pub fn read_bool(&self, path: &str) -> Result<bool, FieldError> {
        self.root.read_bool(path)
    }

    pub fn read_date(&self, path: &str) -> Result<chrono::DateTime<chrono::Utc>, FieldError> {
        self.root.read_date(path)
    }

    pub fn read_label(&self, path: &str) -> Result<&str, FieldError> {
        self.root.read_label(path)
    }

    pub fn array(&self, path: &str) -> Vec<&Field> {
        self.root.array(path)
    }

    pub fn children(&self) -> impl Iterator<Item = &Field> {
        self.root.children()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Field {
        Field::group(
            "file",
            vec![
                Field::group(
                    "Segment",
                    vec![Field::group(
                        "Info",
                        vec![
                            Field::float("Duration", 5000.0),
                            Field::unsigned("TimecodeScale", 1_000_000),
                            Field::unicode("Title", "A title"),
                        ],
                    )],
                ),
                Field::group("Segment", vec![]),
            ],
        )
    }

    #[test]
    fn test_get_indexed() {
        let root = sample_tree();
        assert!(root.get("Segment[0]/Info").is_ok());
        assert!(root.get("Segment[1]/Info").is_err());
        assert!(root.get("Segment[2]").is_err());
    }

    #[test]
    fn test_unindexed_segment_takes_first() {
        let root = sample_tree();
        assert!(root.get("Segment/Info").is_ok());
    }

    #[test]
    fn test_hinted_value_read() {
        let root = sample_tree();
        let info = root.get("Segment[0]/Info").unwrap();
        assert_eq!(info.read_f64("Duration/float").unwrap(), 5000.0);
        assert_eq!(info.read_u64("TimecodeScale/unsigned").unwrap(), 1_000_000);
        assert_eq!(info.read_str("Title/unicode").unwrap(), "A title");
    }

    #[test]
    fn test_hint_mismatch() {
        let root = sample_tree();
        let info = root.get("Segment[0]/Info").unwrap();
        assert_eq!(
            info.value("Duration/unsigned"),
            Err(FieldError::Mismatch {
                path: "Duration/unsigned".to_string(),
                expected: "unsigned",
                found: "float",
            })
        );
    }

    #[test]
    fn test_contains_subtree_and_leaf() {
        let root = sample_tree();
        assert!(root.contains("Segment[0]"));
        assert!(root.contains("Segment/Info/Duration/float"));
        assert!(!root.contains("Segment/Info/Duration/unsigned"));
        assert!(!root.contains("Attachments"));
    }

    #[test]
    fn test_array_preserves_order() {
        let root = Field::group(
            "Tags",
            vec![
                Field::group("Tag", vec![Field::unicode("TagName", "TITLE")]),
                Field::group("Tag", vec![Field::unicode("TagName", "URL")]),
            ],
        );
        let tags = root.array("Tag");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].read_str("TagName/unicode").unwrap(), "TITLE");
        assert_eq!(tags[1].read_str("TagName/unicode").unwrap(), "URL");
    }

    #[test]
    fn test_array_with_missing_parent() {
        let root = sample_tree();
        assert!(root.array("Tracks/TrackEntry").is_empty());
    }

    #[test]
    fn test_tree_size() {
        let tree = FieldTree::new(sample_tree(), 1_000_000);
        assert_eq!(tree.size(), 1_000_000);
        assert!(tree.contains("Segment[0]"));
    }
}
