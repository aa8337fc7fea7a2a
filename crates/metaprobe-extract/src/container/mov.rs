//! QuickTime (MOV) metadata extraction.
//!
//! Single pass over the movie header only; per-stream detail is not
//! extracted for this format.

use std::time::Duration;

use metaprobe_tree::{Field, FieldError, FieldTree};

use crate::container::ContainerFormat;
use crate::error::{Error, Result};
use crate::record::{Attr, Record};

/// Extract metadata from a QuickTime field tree.
pub fn extract(tree: &FieldTree) -> Result<Record> {
    let movie = tree
        .children()
        .find(|atom| atom.contains("movie"))
        .and_then(|atom| atom.get("movie").ok())
        .ok_or(Error::MissingRoot {
            format: ContainerFormat::QuickTime,
            element: "movie",
        })?;

    let mut record = Record::new();
    for field in movie.children() {
        if let Ok(header) = field.get("movie_hdr") {
            if let Err(err) = process_movie_header(header, &mut record) {
                tracing::debug!(%err, "movie header cut short");
            }
        }
    }
    Ok(record)
}

fn process_movie_header(
    header: &Field,
    record: &mut Record,
) -> std::result::Result<(), FieldError> {
    let ticks = header.read_u64("duration/unsigned")?;
    let time_scale = header.read_u64("time_scale/unsigned")?;
    if time_scale > 0 {
        let millis = ticks.saturating_mul(1000) / time_scale;
        record.set(Attr::Duration, Duration::from_millis(millis));
    }
    record.set(Attr::CreationDate, header.read_date("creat_date/date")?);
    record.set(
        Attr::LastModification,
        header.read_date("lastmod_date/date")?,
    );
    let play_speed = header.read_f64("play_speed/float")?;
    record.set(Attr::Comment, format!("Play speed: {:.1}%", play_speed * 100.0));
    let volume = header.read_u64("volume/unsigned")?;
    // User volume is an 8-bit value scaled to a whole percentage.
    let percent = (volume as f64 * 100.0 / 255.0).floor();
    record.set(Attr::Comment, format!("User volume: {percent:.1}%"));
    Ok(())
}
