//! Normalized metadata records and stream groups.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Closed vocabulary of metadata attributes.
///
/// Extractors can only write slots named here; format-specific keys that
/// have no slot are either remapped by an explicit table or folded into
/// [`Attr::Comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attr {
    Album,
    Author,
    BitRate,
    BitsPerPixel,
    BitsPerSample,
    Comment,
    Compression,
    Copyright,
    CreationDate,
    Duration,
    FormatVersion,
    FrameRate,
    Height,
    Language,
    LastModification,
    NbChannel,
    Producer,
    SampleRate,
    SubtitleAuthor,
    Title,
    TrackNumber,
    Url,
    Width,
}

impl Attr {
    /// Stable key string for presentation and serialization.
    pub fn key(self) -> &'static str {
        match self {
            Attr::Album => "album",
            Attr::Author => "author",
            Attr::BitRate => "bit_rate",
            Attr::BitsPerPixel => "bits_per_pixel",
            Attr::BitsPerSample => "bits_per_sample",
            Attr::Comment => "comment",
            Attr::Compression => "compression",
            Attr::Copyright => "copyright",
            Attr::CreationDate => "creation_date",
            Attr::Duration => "duration",
            Attr::FormatVersion => "format_version",
            Attr::FrameRate => "frame_rate",
            Attr::Height => "height",
            Attr::Language => "language",
            Attr::LastModification => "last_modification",
            Attr::NbChannel => "nb_channel",
            Attr::Producer => "producer",
            Attr::SampleRate => "sample_rate",
            Attr::SubtitleAuthor => "subtitle_author",
            Attr::Title => "title",
            Attr::TrackNumber => "track_number",
            Attr::Url => "url",
            Attr::Width => "width",
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One candidate value for an attribute, unit-normalized at write time:
/// durations as [`Duration`], rates in Hz, sizes in pixels or bits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaValue {
    Text(String),
    Unsigned(u64),
    Float(f64),
    Duration(Duration),
    Date(DateTime<Utc>),
    /// A numeric bit rate with a descriptive annotation ("VBR (... max)").
    Rate { value: u64, text: String },
}

impl MetaValue {
    fn is_empty(&self) -> bool {
        matches!(self, MetaValue::Text(s) if s.is_empty())
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            MetaValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Rate { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            MetaValue::Unsigned(v) => Some(*v),
            MetaValue::Rate { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Unsigned(v) => write!(f, "{v}"),
            MetaValue::Float(v) => write!(f, "{v}"),
            MetaValue::Duration(d) => write!(f, "{d:?}"),
            MetaValue::Date(d) => write!(f, "{d}"),
            MetaValue::Rate { text, .. } => f.write_str(text),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<u64> for MetaValue {
    fn from(value: u64) -> Self {
        MetaValue::Unsigned(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<Duration> for MetaValue {
    fn from(value: Duration) -> Self {
        MetaValue::Duration(value)
    }
}

impl From<DateTime<Utc>> for MetaValue {
    fn from(value: DateTime<Utc>) -> Self {
        MetaValue::Date(value)
    }
}

/// Media kind of a stream group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaKind {
    Audio,
    Video,
    Subtitle,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Subtitle => "subtitle",
        })
    }
}

/// One child record of a stream group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stream {
    /// Group the stream belongs to.
    pub kind: MediaKind,
    /// 0-based index within the group, assigned in append order.
    pub index: usize,
    /// Human-readable description ("Audio stream #1").
    pub description: Option<String>,
    /// Per-stream metadata.
    pub record: Record,
}

/// A normalized metadata record for one logical subject: a whole file or
/// one stream.
///
/// Each attribute holds an ordered list of candidate values; [`Record::get`]
/// returns the most recently written candidate (last write wins). Stream
/// groups are ordered and auto-indexed per media kind.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    attrs: BTreeMap<Attr, Vec<MetaValue>>,
    streams: Vec<Stream>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Append a candidate value. Empty text and exact duplicates of an
    /// existing candidate are ignored.
    pub fn set(&mut self, attr: Attr, value: impl Into<MetaValue>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        let candidates = self.attrs.entry(attr).or_default();
        if !candidates.contains(&value) {
            candidates.push(value);
        }
    }

    pub fn has(&self, attr: Attr) -> bool {
        self.attrs.contains_key(&attr)
    }

    /// The current best value: the last candidate written.
    pub fn get(&self, attr: Attr) -> Option<&MetaValue> {
        self.attrs.get(&attr).and_then(|candidates| candidates.last())
    }

    /// Every candidate recorded for `attr`, in write order.
    pub fn candidates(&self, attr: Attr) -> &[MetaValue] {
        self.attrs
            .get(&attr)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Enumerate populated attributes with their best value.
    pub fn attrs(&self) -> impl Iterator<Item = (Attr, &MetaValue)> {
        self.attrs
            .iter()
            .filter_map(|(attr, candidates)| candidates.last().map(|v| (*attr, v)))
    }

    /// Append `record` to the `kind` stream group. The group index is the
    /// number of streams of that kind already present, so indices follow
    /// append order independently per kind.
    pub fn add_stream(&mut self, kind: MediaKind, record: Record, description: Option<&str>) {
        let index = self.streams.iter().filter(|s| s.kind == kind).count();
        self.streams.push(Stream {
            kind,
            index,
            description: description.map(str::to_string),
            record,
        });
    }

    /// All streams in append order, kinds interleaved.
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Streams of one kind, in group-index order.
    pub fn streams_of(&self, kind: MediaKind) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(move |s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_ignores_empty_text() {
        let mut record = Record::new();
        record.set(Attr::Title, "");
        assert!(!record.has(Attr::Title));
    }

    #[test]
    fn test_set_ignores_duplicates() {
        let mut record = Record::new();
        record.set(Attr::Comment, "Is seekable");
        record.set(Attr::Comment, "Is seekable");
        assert_eq!(record.candidates(Attr::Comment).len(), 1);
    }

    #[test]
    fn test_get_is_last_write() {
        let mut record = Record::new();
        record.set(Attr::Producer, "WritingApp");
        record.set(Attr::Producer, "MuxingApp");
        assert_eq!(
            record.get(Attr::Producer),
            Some(&MetaValue::Text("MuxingApp".to_string()))
        );
        assert_eq!(record.candidates(Attr::Producer).len(), 2);
    }

    #[test]
    fn test_stream_indices_are_per_kind() {
        let mut record = Record::new();
        record.add_stream(MediaKind::Audio, Record::new(), None);
        record.add_stream(MediaKind::Video, Record::new(), Some("Video stream"));
        record.add_stream(MediaKind::Audio, Record::new(), None);

        let audio: Vec<_> = record.streams_of(MediaKind::Audio).collect();
        assert_eq!(audio.len(), 2);
        assert_eq!(audio[0].index, 0);
        assert_eq!(audio[1].index, 1);

        let video: Vec<_> = record.streams_of(MediaKind::Video).collect();
        assert_eq!(video.len(), 1);
        assert_eq!(video[0].index, 0);
        assert_eq!(video[0].description.as_deref(), Some("Video stream"));
    }

    #[test]
    fn test_attr_enumeration_uses_best_value() {
        let mut record = Record::new();
        record.set(Attr::Title, "first");
        record.set(Attr::Title, "second");
        record.set(Attr::Width, 640u64);

        let attrs: Vec<_> = record.attrs().collect();
        assert_eq!(attrs.len(), 2);
        assert!(attrs.contains(&(Attr::Title, &MetaValue::Text("second".to_string()))));
    }
}
