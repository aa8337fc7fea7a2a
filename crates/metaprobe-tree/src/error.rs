//! Error types for metaprobe-tree.

use thiserror::Error;

/// Error type for field-tree lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// No field exists at the requested path.
    #[error("missing field: {0}")]
    Missing(String),

    /// A field exists but its leaf kind does not match the path's type hint.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    Mismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}
