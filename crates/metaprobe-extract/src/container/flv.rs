//! Flash Video (FLV) metadata extraction.

use std::time::Duration;

use metaprobe_tree::{Field, FieldError, FieldTree};

use crate::container::ContainerFormat;
use crate::error::{Error, Result};
use crate::record::{Attr, MediaKind, MetaValue, Record};

/// Audio sample rates addressed by the 2-bit rate index.
const SAMPLE_RATES: [u64; 4] = [5512, 11025, 22050, 44100];

/// Extract metadata from an FLV field tree.
///
/// The true duration would require scanning every media chunk, which is
/// too costly; duration is known only when the script-data side channel
/// supplies it, and the derived bit rate follows the same rule.
pub fn extract(tree: &FieldTree) -> Result<Record> {
    if !tree.contains("header") {
        return Err(Error::MissingRoot {
            format: ContainerFormat::Flv,
            element: "header",
        });
    }
    let mut record = Record::new();

    if let Ok(audio) = tree.get("audio[0]") {
        let mut stream = Record::new();
        if let Err(err) = fill_audio(audio, &mut stream) {
            tracing::debug!(%err, "audio chunk cut short");
        }
        record.add_stream(MediaKind::Audio, stream, None);
    }
    if let Ok(video) = tree.get("video[0]") {
        let mut stream = Record::new();
        if let Err(err) = fill_video(video, &mut stream) {
            tracing::debug!(%err, "video chunk cut short");
        }
        record.add_stream(MediaKind::Video, stream, None);
    }

    record.set(Attr::FormatVersion, format_version(tree));

    if let Ok(script_data) = tree.get("metadata/entry[1]") {
        process_script_data(script_data, &mut record);
    }

    // Derived last: needs the side-channel duration.
    let duration_secs = record
        .get(Attr::Duration)
        .and_then(MetaValue::as_duration)
        .map(|d| d.as_secs_f64());
    if let Some(secs) = duration_secs.filter(|secs| *secs > 0.0) {
        record.set(Attr::BitRate, (tree.size() as f64 / secs) as u64);
    }
    Ok(record)
}

fn fill_audio(audio: &Field, stream: &mut Record) -> std::result::Result<(), FieldError> {
    let rate_index = audio.read_u64("sampling_rate/unsigned")?;
    if let Some(rate) = SAMPLE_RATES.get(rate_index as usize) {
        stream.set(Attr::SampleRate, *rate);
    }
    let bits: u64 = if audio.read_bool("is_16bit/bool")? { 16 } else { 8 };
    stream.set(Attr::BitsPerSample, bits);
    let codec = audio.read_label("codec/enum")?;
    // MP3 chunks may carry a finer-grained description than the codec tag.
    if codec == "MP3" && audio.contains("music_data/string") {
        stream.set(Attr::Compression, audio.read_str("music_data/string")?);
    } else {
        stream.set(Attr::Compression, codec);
    }
    let channels: u64 = if audio.read_bool("is_stereo/bool")? { 2 } else { 1 };
    stream.set(Attr::NbChannel, channels);
    Ok(())
}

fn fill_video(video: &Field, stream: &mut Record) -> std::result::Result<(), FieldError> {
    stream.set(Attr::Compression, video.read_label("codec/enum")?);
    Ok(())
}

fn format_version(tree: &FieldTree) -> String {
    match tree.read_u64("header/version/unsigned") {
        Ok(version) => format!("Macromedia Flash video version {version}"),
        Err(_) => "Macromedia Flash video".to_string(),
    }
}

/// Scan the script-data key/value array; only recognized keys populate
/// top-level attributes.
fn process_script_data(script_data: &Field, record: &mut Record) {
    for item in script_data.array("item") {
        let Ok(key) = item.read_str("key/string") else {
            continue;
        };
        match key {
            "duration" => {
                if let Ok(secs) = item.read_f64("value/float") {
                    if secs.is_finite() && secs >= 0.0 {
                        record.set(Attr::Duration, Duration::from_secs_f64(secs));
                    }
                }
            }
            "creator" | "metadatacreator" => {
                if let Ok(creator) = item.read_str("value/string") {
                    record.set(Attr::Producer, creator);
                }
            }
            "audiosamplerate" => {
                if let Ok(rate) = item.read_f64("value/float") {
                    record.set(Attr::SampleRate, rate as u64);
                }
            }
            "framerate" => {
                if let Ok(rate) = item.read_f64("value/float") {
                    record.set(Attr::FrameRate, rate);
                }
            }
            "metadatadate" => {
                if let Ok(date) = item.read_date("value/date") {
                    record.set(Attr::CreationDate, date);
                }
            }
            "width" => {
                if let Ok(width) = item.read_f64("value/float") {
                    record.set(Attr::Width, width as u64);
                }
            }
            "height" => {
                if let Ok(height) = item.read_f64("value/float") {
                    record.set(Attr::Height, height as u64);
                }
            }
            other => tracing::debug!(key = other, "ignoring script data key"),
        }
    }
}
