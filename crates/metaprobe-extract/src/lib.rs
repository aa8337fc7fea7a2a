//! # metaprobe-extract
//!
//! Normalized metadata extraction for multimedia container field trees.
//!
//! A container parser produces a [`FieldTree`](metaprobe_tree::FieldTree);
//! this crate walks it according to the container's schema and returns a
//! [`Record`]: unit-normalized attributes (durations, rates in Hz, sizes
//! in pixels) plus per-stream child records grouped by media kind.
//!
//! Four formats are supported: Matroska, ASF/WMV, QuickTime MOV and FLV.
//! Each extractor copes with optional sub-elements on its own — a missing
//! field cuts short only the smallest enclosing sub-unit (one track, one
//! stream, one info block) — and fails only when the format's mandatory
//! root element is absent.
//!
//! ## Example
//!
//! ```
//! use metaprobe_extract::{extract, Attr, ContainerFormat, MediaKind};
//! use metaprobe_tree::{Field, FieldTree};
//!
//! let root = Field::group(
//!     "file",
//!     vec![Field::group(
//!         "Segment",
//!         vec![Field::group(
//!             "Info",
//!             vec![
//!                 Field::float("Duration", 5000.0),
//!                 Field::unsigned("TimecodeScale", 1_000_000),
//!                 Field::unicode("Title", "Sintel"),
//!             ],
//!         )],
//!     )],
//! );
//! let tree = FieldTree::new(root, 0);
//!
//! let record = extract(ContainerFormat::Matroska, &tree).unwrap();
//! assert!(record.has(Attr::Duration));
//! assert_eq!(record.get(Attr::Title).unwrap().to_string(), "Sintel");
//! assert_eq!(record.streams_of(MediaKind::Video).count(), 0);
//! ```
//!
//! Extraction is synchronous and pure: `&FieldTree` in, owned [`Record`]
//! out, no I/O and no shared state, so different trees may be processed
//! concurrently without coordination.

pub mod container;
pub mod error;
pub mod record;

pub use container::ContainerFormat;
pub use error::{Error, Result};
pub use record::{Attr, MediaKind, MetaValue, Record, Stream};

use metaprobe_tree::FieldTree;

/// Extract a metadata record from `tree`, interpreted as `format`.
///
/// Returns [`Error::MissingRoot`] when the tree lacks the format's
/// mandatory root element; otherwise a (possibly partially) populated
/// record is always a success.
pub fn extract(format: ContainerFormat, tree: &FieldTree) -> Result<Record> {
    match format {
        ContainerFormat::Matroska => container::mkv::extract(tree),
        ContainerFormat::Asf => container::asf::extract(tree),
        ContainerFormat::QuickTime => container::mov::extract(tree),
        ContainerFormat::Flv => container::flv::extract(tree),
    }
}
