//! EXIF field extraction on top of `kamadak-exif`.
//!
//! Reads four fields from the primary image:
//! - DateTimeOriginal (Exif IFD `0x9003`): capture time, ASCII
//! - ImageDescription (IFD0 `0x010E`): ASCII
//! - XPTitle (IFD0 `0x9C9B`): Windows title, UTF-16LE stored as BYTE
//! - UserComment (Exif IFD `0x9286`): 8-byte character code + payload
//!
//! `kamadak-exif` locates the container for JPEG, PNG, WebP and TIFF.
//! Any failure (no container, truncated data, unsupported format) yields
//! empty metadata rather than an error.

use super::backend::EmbeddedMetadata;
use exif::{Context, Field, In, Reader, Tag, Value};
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use tracing::trace;

const XP_TITLE: Tag = Tag(Context::Tiff, 0x9C9B);

/// Read EXIF metadata from a file.
/// Returns default (empty) metadata on any read or parse failure.
pub fn read_exif(path: &Path) -> EmbeddedMetadata {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            trace!("Cannot open {} for EXIF: {}", path.display(), e);
            return EmbeddedMetadata::default();
        }
    };
    let meta = read_exif_from_container(&mut BufReader::new(file));
    if meta == EmbeddedMetadata::default() {
        trace!("No usable EXIF in {}", path.display());
    }
    meta
}

/// Read EXIF metadata from any seekable image container.
pub fn read_exif_from_container<R: BufRead + Seek>(reader: &mut R) -> EmbeddedMetadata {
    let Ok(exif) = Reader::new().read_from_container(reader) else {
        return EmbeddedMetadata::default();
    };

    let field = |tag: Tag| exif.get_field(tag, In::PRIMARY);

    EmbeddedMetadata {
        date_time_original: field(Tag::DateTimeOriginal).and_then(ascii_value),
        description: field(Tag::ImageDescription).and_then(ascii_value),
        title: field(XP_TITLE).and_then(xp_string_value),
        comment: field(Tag::UserComment).and_then(user_comment_value),
    }
}

// ---------------------------------------------------------------------------
// Value decoding
// ---------------------------------------------------------------------------

fn ascii_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(parts) => {
            let joined: Vec<u8> = parts.join(&b' ');
            non_empty(String::from_utf8_lossy(&joined).into_owned())
        }
        _ => None,
    }
}

/// Windows XP* tags are UTF-16LE with a trailing NUL, typed as BYTE.
fn xp_string_value(field: &Field) -> Option<String> {
    match &field.value {
        Value::Byte(bytes) | Value::Undefined(bytes, _) => non_empty(decode_utf16(bytes, false)),
        _ => None,
    }
}

const CHARSET_ASCII: &[u8; 8] = b"ASCII\0\0\0";
const CHARSET_UNICODE: &[u8; 8] = b"UNICODE\0";

/// UserComment is `[8-byte character code][payload]`.
fn user_comment_value(field: &Field) -> Option<String> {
    let bytes = match &field.value {
        Value::Undefined(bytes, _) | Value::Byte(bytes) => bytes.as_slice(),
        Value::Ascii(_) => return ascii_value(field),
        _ => return None,
    };
    non_empty(decode_user_comment(bytes))
}

fn decode_user_comment(bytes: &[u8]) -> String {
    if bytes.len() < 8 {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    let (code, payload) = bytes.split_at(8);
    if code == CHARSET_UNICODE {
        decode_utf16(payload, looks_big_endian(payload))
    } else if code == CHARSET_ASCII {
        String::from_utf8_lossy(payload).into_owned()
    } else {
        // JIS and "undefined" codes: best-effort byte decoding
        String::from_utf8_lossy(payload).into_owned()
    }
}

/// Guess UTF-16 byte order from where the zero high bytes of ASCII-range
/// characters fall.
fn looks_big_endian(bytes: &[u8]) -> bool {
    let zeros_at = |offset: usize| {
        bytes
            .iter()
            .skip(offset)
            .step_by(2)
            .filter(|&&b| b == 0)
            .count()
    };
    zeros_at(0) > zeros_at(1)
}

fn decode_utf16(bytes: &[u8], big_endian: bool) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16_lossy(&units)
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
