//! # metaprobe-tree
//!
//! Typed, read-only field trees describing the structure of a parsed
//! multimedia container.
//!
//! A container parser turns the binary layout of a file (Matroska elements,
//! ASF objects, QuickTime atoms, FLV chunks) into a [`FieldTree`]: named
//! nodes that either carry a typed leaf [`Value`] or an ordered list of
//! child fields. Consumers address nodes with slash-separated paths whose
//! final segment names the expected leaf kind:
//!
//! ```
//! use metaprobe_tree::{Field, FieldTree};
//!
//! let root = Field::group(
//!     "file",
//!     vec![Field::group(
//!         "Info",
//!         vec![Field::unsigned("TimecodeScale", 1_000_000)],
//!     )],
//! );
//! let tree = FieldTree::new(root, 4096);
//!
//! assert!(tree.contains("Info"));
//! assert_eq!(tree.read_u64("Info/TimecodeScale/unsigned").unwrap(), 1_000_000);
//! ```
//!
//! Trees are immutable once built; every accessor takes `&self`. Lookups
//! fail fast with [`FieldError`] on absence or on a type-hint mismatch.

pub mod error;
mod path;
pub mod tree;
pub mod value;

pub use error::FieldError;
pub use tree::{Field, FieldTree};
pub use value::{Value, ValueKind};
