//! Capture date and classification tags for a single photo.
//!
//! ## Capture date
//!
//! The EXIF `DateTimeOriginal` field is parsed with the fixed EXIF layout
//! `YYYY:MM:DD HH:MM:SS`. When that works the date is *reliable*. Anything
//! else (no container, no tag, a malformed or zeroed value, a format with no
//! EXIF support) falls back to the file's modification time in local time,
//! and the date is flagged unreliable.
//!
//! The fallback never fails outright: if even the modification time can't be
//! read the date becomes the Unix epoch. Callers always get a usable date and
//! decide what to do with it through [`PhotoMetadata::has_reliable_date`].
//!
//! ## Tags
//!
//! Each [`Tag`] has a keyword. A photo gets the tag when the keyword appears,
//! case-insensitively, in the filename or in any of the embedded text fields
//! (image description, XP title, user comment).

use crate::imaging::{EmbeddedMetadata, ImageBackend, RustBackend};
use crate::types::Tag;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Date layout used by EXIF date/time fields.
pub const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// What the extractor learned about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoMetadata {
    /// Best-effort capture time. Always present.
    pub capture_date: NaiveDateTime,
    /// True only when `capture_date` came from embedded metadata.
    pub has_reliable_date: bool,
    pub tags: BTreeSet<Tag>,
}

/// Extract metadata using the production backend.
pub fn extract(path: &Path) -> PhotoMetadata {
    extract_with_backend(&RustBackend::new(), path)
}

/// Extract metadata using a specific backend (allows testing with mock).
pub fn extract_with_backend(backend: &impl ImageBackend, path: &Path) -> PhotoMetadata {
    let embedded = backend.read_metadata(path).unwrap_or_else(|e| {
        debug!("Metadata read failed for {}: {}", path.display(), e);
        EmbeddedMetadata::default()
    });

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tags = classify(&filename, &embedded);

    match embedded
        .date_time_original
        .as_deref()
        .and_then(parse_exif_date)
    {
        Some(capture_date) => PhotoMetadata {
            capture_date,
            has_reliable_date: true,
            tags,
        },
        None => {
            debug!(
                "No usable capture date in {}, using modification time",
                path.display()
            );
            PhotoMetadata {
                capture_date: modified_time(path),
                has_reliable_date: false,
                tags,
            }
        }
    }
}

/// Parse an EXIF date/time string (`2024:03:09 21:14:05`).
pub fn parse_exif_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), EXIF_DATE_FORMAT).ok()
}

/// Tags whose keyword appears in the filename or an embedded text field.
pub fn classify(filename: &str, embedded: &EmbeddedMetadata) -> BTreeSet<Tag> {
    Tag::ALL
        .iter()
        .copied()
        .filter(|tag| {
            tag.matches(filename) || embedded.text_fields().any(|text| tag.matches(text))
        })
        .collect()
}

/// File modification time as a local wall-clock date.
fn modified_time(path: &Path) -> NaiveDateTime {
    let mtime = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| {
            warn!(
                "Cannot read modification time of {}: {}",
                path.display(),
                e
            );
            UNIX_EPOCH
        });
    local_naive(mtime)
}

/// Convert a filesystem timestamp to local wall-clock time.
pub fn local_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}
