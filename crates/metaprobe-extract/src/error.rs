//! Error types for metaprobe-extract.

use thiserror::Error;

use crate::container::ContainerFormat;

/// Result type for metaprobe-extract operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for metadata extraction.
///
/// Only structural failures surface here: a tree without its mandatory
/// root element cannot be extracted at all. Missing optional fields are
/// absorbed inside the extractors and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The mandatory root element of the container is absent.
    #[error("invalid {format} container: missing {element}")]
    MissingRoot {
        format: ContainerFormat,
        element: &'static str,
    },
}
