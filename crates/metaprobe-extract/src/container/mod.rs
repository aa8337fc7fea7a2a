//! Per-format extraction modules.

use std::fmt;

pub mod asf;
pub mod flv;
pub mod mkv;
pub mod mov;

/// Supported container formats.
///
/// The mapping from a detected file type to a `ContainerFormat` tag is the
/// caller's concern; extraction itself dispatches statically on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerFormat {
    /// Matroska (.mkv, .webm)
    Matroska,
    /// Advanced Systems Format (.asf, .wmv, .wma)
    Asf,
    /// QuickTime movie (.mov)
    QuickTime,
    /// Flash Video (.flv)
    Flv,
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerFormat::Matroska => "Matroska",
            ContainerFormat::Asf => "ASF",
            ContainerFormat::QuickTime => "QuickTime",
            ContainerFormat::Flv => "FLV",
        })
    }
}
