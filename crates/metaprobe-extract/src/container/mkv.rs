//! Matroska (MKV/WebM) metadata extraction.

use std::time::Duration;

use metaprobe_tree::{Field, FieldError, FieldTree};

use crate::container::ContainerFormat;
use crate::error::{Error, Result};
use crate::record::{Attr, MediaKind, Record};

/// Simple-tag names copied into the record; every other tag is dropped.
const TAG_ATTRS: &[(&str, Attr)] = &[
    ("TITLE", Attr::Title),
    ("URL", Attr::Url),
    ("COPYRIGHT", Attr::Copyright),
    // May disagree with Info/DateUTC; both are kept as candidates.
    ("DATE_RECORDED", Attr::CreationDate),
    ("SUBTITLE", Attr::SubtitleAuthor),
];

/// Language codes meaning "no usable language".
const LANGUAGE_SENTINELS: &[&str] = &["mis", "und"];

/// Extract metadata from a Matroska field tree.
pub fn extract(tree: &FieldTree) -> Result<Record> {
    if !tree.contains("Segment[0]") {
        return Err(Error::MissingRoot {
            format: ContainerFormat::Matroska,
            element: "Segment",
        });
    }
    let mut record = Record::new();
    for segment in tree.array("Segment") {
        process_segment(segment, &mut record);
    }
    Ok(record)
}

fn process_segment(segment: &Field, record: &mut Record) {
    for field in segment.children() {
        match field.name() {
            "Info" => process_info(field, record),
            "Tags" => {
                for tag in field.array("Tag") {
                    process_tag(tag, record);
                }
            }
            "Tracks" => {
                for entry in field.array("TrackEntry") {
                    process_track(entry, record);
                }
            }
            _ => {}
        }
    }
}

fn process_info(info: &Field, record: &mut Record) {
    let ticks = info.read_f64("Duration/float").ok();
    let scale = info.read_u64("TimecodeScale/unsigned").ok();
    if let (Some(ticks), Some(scale)) = (ticks, scale) {
        if ticks > 0.0 {
            // Raw duration ticks scaled to nanoseconds, then seconds.
            let seconds = ticks * scale as f64 * 1e-9;
            if seconds.is_finite() {
                record.set(Attr::Duration, Duration::from_secs_f64(seconds));
            }
        }
    }
    if let Ok(date) = info.read_date("DateUTC/date") {
        record.set(Attr::CreationDate, date);
    }
    if let Ok(app) = info.read_str("WritingApp/unicode") {
        record.set(Attr::Producer, app);
    }
    // Written after WritingApp so the muxer wins when both are present.
    if let Ok(app) = info.read_str("MuxingApp/unicode") {
        record.set(Attr::Producer, app);
    }
    if let Ok(title) = info.read_str("Title/unicode") {
        record.set(Attr::Title, title);
    }
}

fn process_tag(tag: &Field, record: &mut Record) {
    for simple in tag.array("SimpleTag") {
        let (Ok(name), Ok(value)) = (
            simple.read_str("TagName/unicode"),
            simple.read_str("TagString/unicode"),
        ) else {
            continue;
        };
        match TAG_ATTRS.iter().find(|(tag_name, _)| *tag_name == name) {
            Some((_, attr)) => record.set(*attr, value),
            None => tracing::debug!(tag = name, "dropping unrecognized tag"),
        }
    }
}

/// Classify one track entry and append it to the matching stream group.
///
/// A missing field cuts short that track alone; the partially filled
/// record is still appended and sibling tracks are unaffected.
fn process_track(track: &Field, record: &mut Record) {
    let Ok(track_type) = track.read_label("TrackType/enum") else {
        return;
    };
    match track_type {
        "video" => add_track(record, MediaKind::Video, "Video stream", track, fill_video),
        "audio" => add_track(record, MediaKind::Audio, "Audio stream", track, fill_audio),
        "subtitle" => add_track(record, MediaKind::Subtitle, "Subtitle", track, fill_subtitle),
        other => tracing::debug!(track_type = other, "skipping unclassified track"),
    }
}

fn add_track<F>(record: &mut Record, kind: MediaKind, description: &str, track: &Field, fill: F)
where
    F: Fn(&Field, &mut Record) -> std::result::Result<(), FieldError>,
{
    let mut stream = Record::new();
    if let Err(err) = fill(track, &mut stream) {
        tracing::debug!(%err, "track extraction cut short");
    }
    record.add_stream(kind, stream, Some(description));
}

fn fill_common(track: &Field, stream: &mut Record) {
    if let Ok(name) = track.read_str("Name/unicode") {
        stream.set(Attr::Title, name);
    }
    if let Ok(language) = track.read_str("Language/string") {
        if !LANGUAGE_SENTINELS.contains(&language) {
            stream.set(Attr::Language, language);
        }
    }
}

fn fill_video(track: &Field, stream: &mut Record) -> std::result::Result<(), FieldError> {
    fill_common(track, stream);
    stream.set(Attr::Compression, track.read_str("CodecID/string")?);
    if track.contains("Video") {
        stream.set(Attr::Width, track.read_u64("Video/PixelWidth/unsigned")?);
        stream.set(Attr::Height, track.read_u64("Video/PixelHeight/unsigned")?);
    }
    Ok(())
}

fn fill_audio(track: &Field, stream: &mut Record) -> std::result::Result<(), FieldError> {
    fill_common(track, stream);
    if track.contains("Audio") {
        let frequency = track.read_f64("Audio/SamplingFrequency/float")?;
        stream.set(Attr::SampleRate, frequency as u64);
        stream.set(Attr::NbChannel, track.read_u64("Audio/Channels/unsigned")?);
    }
    stream.set(Attr::Compression, track.read_str("CodecID/string")?);
    Ok(())
}

fn fill_subtitle(track: &Field, stream: &mut Record) -> std::result::Result<(), FieldError> {
    fill_common(track, stream);
    stream.set(Attr::Compression, track.read_str("CodecID/string")?);
    Ok(())
}
