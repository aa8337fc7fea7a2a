//! ASF/WMV metadata extraction.

use std::time::Duration;

use metaprobe_tree::{Field, FieldError, FieldTree, Value};

use crate::container::ContainerFormat;
use crate::error::{Error, Result};
use crate::record::{Attr, MediaKind, MetaValue, Record};

/// Extended descriptors carrying nothing worth keeping.
const SKIPPED_DESCRIPTORS: &[&str] = &[
    "WMFSDKNeeded",
    "WMFSDKVersion",
    "Buffer Average",
    "VBR Peak",
];

/// Descriptor keys with a dedicated attribute slot. Anything else becomes
/// a "key=value" comment.
const DESCRIPTOR_ATTRS: &[(&str, Attr)] = &[
    ("Encoder", Attr::Producer),
    ("ToolName", Attr::Producer),
    ("AlbumTitle", Attr::Album),
    ("Track", Attr::TrackNumber),
    ("TrackNumber", Attr::TrackNumber),
    ("Year", Attr::CreationDate),
];

/// Extract metadata from an ASF field tree.
pub fn extract(tree: &FieldTree) -> Result<Record> {
    let header = tree.get("header/content").map_err(|_| Error::MissingRoot {
        format: ContainerFormat::Asf,
        element: "header/content",
    })?;
    let mut record = Record::new();
    process_header(header, &mut record);
    Ok(record)
}

fn process_header(header: &Field, record: &mut Record) {
    let mut is_vbr = None;
    if header.contains("ext_desc/content") {
        is_vbr = process_descriptors(header, record);
    }
    if let Ok(prop) = header.get("file_prop/content") {
        if let Err(err) = process_file_properties(prop, is_vbr, record) {
            tracing::debug!(%err, "file properties cut short");
        }
    }
    let codecs = collect_codecs(header);
    process_streams(header, &codecs, record);
    if let Ok(info) = header.get("metadata/content") {
        if let Err(err) = process_metadata(info, record) {
            tracing::debug!(%err, "metadata block cut short");
        }
    }
}

/// Normalize the extended content descriptors.
///
/// Returns the tri-state VBR flag pulled out of the `IsVBR` entry:
/// `Some(true)` / `Some(false)` when present, `None` when absent.
fn process_descriptors(header: &Field, record: &mut Record) -> Option<bool> {
    let mut entries: Vec<(String, Value)> = Vec::new();
    for desc in header.array("ext_desc/content/descriptor") {
        let Ok(name) = desc.read_str("name/string") else {
            continue;
        };
        let Some(value) = desc.get("value").ok().and_then(Field::leaf_value) else {
            continue;
        };
        if matches!(value, Value::Binary(_)) {
            continue;
        }
        if SKIPPED_DESCRIPTORS.contains(&name) {
            continue;
        }
        // Strip the namespace prefix: "WM/ToolName" becomes "ToolName".
        let key = name.split_once('/').map_or(name, |(_, rest)| rest);
        if value.as_str().is_some_and(str::is_empty) {
            continue;
        }
        upsert(&mut entries, key, value.clone());
    }

    let has_tool_name = entries.iter().any(|(key, _)| key == "ToolName");
    let has_tool_version = entries.iter().any(|(key, _)| key == "ToolVersion");
    if has_tool_name && has_tool_version {
        if let (Some(name), Some(version)) = (
            remove_key(&mut entries, "ToolName"),
            remove_key(&mut entries, "ToolVersion"),
        ) {
            record.set(
                Attr::Producer,
                format!(
                    "{} (version {})",
                    descriptor_text(&name),
                    descriptor_text(&version)
                ),
            );
        }
    }

    let is_vbr = remove_key(&mut entries, "IsVBR")
        .map(|value| value.as_u64() == Some(1) || value.as_bool() == Some(true));

    for (key, value) in entries {
        let text = descriptor_text(&value);
        match DESCRIPTOR_ATTRS.iter().find(|(name, _)| *name == key) {
            Some((_, attr)) => record.set(*attr, text),
            None => record.set(Attr::Comment, format!("{key}={text}")),
        }
    }
    is_vbr
}

/// Keep first-seen order, let the last value for a key win.
fn upsert(entries: &mut Vec<(String, Value)>, key: &str, value: Value) {
    match entries.iter_mut().find(|entry| entry.0 == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key.to_string(), value)),
    }
}

fn remove_key(entries: &mut Vec<(String, Value)>, key: &str) -> Option<Value> {
    let position = entries.iter().position(|(name, _)| name == key)?;
    Some(entries.remove(position).1)
}

fn descriptor_text(value: &Value) -> String {
    match value {
        Value::Str(s) | Value::Unicode(s) => s.clone(),
        Value::Unsigned(v) => v.to_string(),
        Value::Signed(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Bool(v) => u8::from(*v).to_string(),
        Value::Date(d) => d.to_string(),
        Value::Enum { label, .. } => label.clone(),
        Value::Binary(_) => String::new(),
    }
}

fn process_file_properties(
    prop: &Field,
    is_vbr: Option<bool>,
    record: &mut Record,
) -> std::result::Result<(), FieldError> {
    record.set(Attr::CreationDate, prop.read_date("creation_date/date")?);
    record.set(
        Attr::Duration,
        win64_duration(prop.read_u64("play_duration/unsigned")?),
    );
    if prop.read_bool("seekable/bool")? {
        record.set(Attr::Comment, "Is seekable");
    }
    let max_bitrate = prop.read_u64("max_bitrate/unsigned")?;
    let display = human_bit_rate(max_bitrate);
    let text = match is_vbr {
        Some(true) => format!("VBR ({display} max)"),
        Some(false) => format!("{display} (CBR)"),
        None => format!("{display} (max)"),
    };
    record.set(
        Attr::BitRate,
        MetaValue::Rate {
            value: max_bitrate,
            text,
        },
    );
    Ok(())
}

/// 64-bit Windows durations count 100 ns ticks.
fn win64_duration(ticks: u64) -> Duration {
    Duration::new(ticks / 10_000_000, ((ticks % 10_000_000) * 100) as u32)
}

fn human_bit_rate(rate: u64) -> String {
    const UNITS: &[&str] = &["Kbit/sec", "Mbit/sec", "Gbit/sec"];
    let mut value = rate as f64;
    let mut unit = None;
    for next in UNITS {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = Some(next);
    }
    match unit {
        Some(unit) => format!("{value:.1} {unit}"),
        None => format!("{rate} bit/sec"),
    }
}

fn collect_codecs(header: &Field) -> Vec<String> {
    let mut codecs = Vec::new();
    for codec in header.array("codec_list/content/codec") {
        let Ok(name) = codec.read_str("name/unicode") else {
            continue;
        };
        match codec.read_str("desc/unicode") {
            Ok(desc) if !desc.is_empty() => codecs.push(format!("{name} ({desc})")),
            _ => codecs.push(name.to_string()),
        }
    }
    codecs
}

/// Walk the stream-property array.
///
/// The raw array index addresses the parallel bit-rate array and the codec
/// list; the per-media-kind counters only number the human descriptions.
fn process_streams(header: &Field, codecs: &[String], record: &mut Record) {
    let mut audio_counter = 0u32;
    let mut video_counter = 0u32;
    for (index, stream) in header.array("stream_prop").into_iter().enumerate() {
        if let Ok(audio) = stream.get("content/audio_header") {
            let mut rec = stream_record(header, index);
            if let Err(err) = fill_audio(audio, &mut rec) {
                tracing::debug!(%err, index, "audio stream cut short");
            }
            apply_codec_fallback(&mut rec, codecs, index);
            audio_counter += 1;
            record.add_stream(
                MediaKind::Audio,
                rec,
                Some(&format!("Audio stream #{audio_counter}")),
            );
        } else if let Ok(video) = stream.get("content/video_header") {
            let mut rec = stream_record(header, index);
            if let Err(err) = fill_video(video, &mut rec) {
                tracing::debug!(%err, index, "video stream cut short");
            }
            apply_codec_fallback(&mut rec, codecs, index);
            video_counter += 1;
            record.add_stream(
                MediaKind::Video,
                rec,
                Some(&format!("Video stream #{video_counter}")),
            );
        }
    }
}

/// Seed a stream record with the average bit rate stored in the parallel
/// bit-rate array, addressed by the raw stream index.
fn stream_record(header: &Field, index: usize) -> Record {
    let mut rec = Record::new();
    let path = format!("bit_rates/content/bit_rate[{index}]/avg_bitrate/unsigned");
    if let Ok(rate) = header.read_u64(&path) {
        rec.set(Attr::BitRate, rate);
    }
    rec
}

fn fill_audio(audio: &Field, rec: &mut Record) -> std::result::Result<(), FieldError> {
    if !rec.has(Attr::Compression) {
        rec.set(Attr::Compression, audio.read_label("twocc/enum")?);
    }
    rec.set(Attr::SampleRate, audio.read_u64("sample_rate/unsigned")?);
    rec.set(
        Attr::BitsPerSample,
        audio.read_u64("bits_per_sample/unsigned")?,
    );
    Ok(())
}

fn fill_video(video: &Field, rec: &mut Record) -> std::result::Result<(), FieldError> {
    rec.set(Attr::Width, video.read_u64("width/unsigned")?);
    rec.set(Attr::Height, video.read_u64("height/unsigned")?);
    if video.contains("bmp_info") {
        if !rec.has(Attr::Compression) {
            rec.set(Attr::Compression, video.read_label("bmp_info/codec/enum")?);
        }
        rec.set(Attr::BitsPerPixel, video.read_u64("bmp_info/bpp/unsigned")?);
    }
    Ok(())
}

/// Codec-list labels apply only when a stream ended its own step with no
/// compression label.
fn apply_codec_fallback(rec: &mut Record, codecs: &[String], index: usize) {
    if !rec.has(Attr::Compression) {
        if let Some(label) = codecs.get(index) {
            rec.set(Attr::Compression, label.clone());
        }
    }
}

fn process_metadata(info: &Field, record: &mut Record) -> std::result::Result<(), FieldError> {
    record.set(Attr::Title, info.read_str("title/unicode")?);
    record.set(Attr::Author, info.read_str("author/unicode")?);
    record.set(Attr::Copyright, info.read_str("copyright/unicode")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win64_duration() {
        assert_eq!(win64_duration(10_000_000), Duration::from_secs(1));
        assert_eq!(win64_duration(5_000_000), Duration::from_millis(500));
        assert_eq!(win64_duration(0), Duration::ZERO);
    }

    #[test]
    fn test_human_bit_rate() {
        assert_eq!(human_bit_rate(999), "999 bit/sec");
        assert_eq!(human_bit_rate(128_000), "128.0 Kbit/sec");
        assert_eq!(human_bit_rate(1_500_000), "1.5 Mbit/sec");
    }

    #[test]
    fn test_upsert_last_value_wins_in_place() {
        let mut entries = Vec::new();
        upsert(&mut entries, "Track", Value::Unsigned(1));
        upsert(&mut entries, "Composer", Value::Str("X".to_string()));
        upsert(&mut entries, "Track", Value::Unsigned(2));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("Track".to_string(), Value::Unsigned(2)));
    }
}
