//! Shared test utilities for the photo-gal test suite.
//!
//! Builds real image files for pipeline tests: plain JPEGs and PNGs from the
//! `image` encoders, and JPEGs carrying a hand-assembled EXIF APP1 segment
//! so metadata extraction can be tested without binary fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_jpeg_with_exif(&tmp.path().join("a.jpg"), 64, 48, &ExifFields {
//!     date_time_original: Some("2024:03:09 21:14:05"),
//!     ..Default::default()
//! });
//! write_jpeg(&tmp.path().join("b.jpg"), 64, 48);
//! set_mtime(&tmp.path().join("b.jpg"), 1_700_000_000);
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// =========================================================================
// Plain images
// =========================================================================

/// Encode a gradient JPEG of the given size into memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a JPEG without any metadata.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Write a half-transparent RGBA PNG.
pub fn write_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([200, 30, 30, if x % 2 == 0 { 0 } else { 255 }])
    });
    img.save(path).unwrap();
}

/// Set a file's modification time to `secs` after the Unix epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

/// Read a file's modification time.
pub fn mtime(path: &Path) -> SystemTime {
    std::fs::metadata(path).unwrap().modified().unwrap()
}

// =========================================================================
// EXIF fixtures
// =========================================================================

/// EXIF fields to embed. `None` leaves the tag out entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifFields<'a> {
    /// `YYYY:MM:DD HH:MM:SS`, or anything else to test malformed dates.
    pub date_time_original: Option<&'a str>,
    pub description: Option<&'a str>,
    pub title: Option<&'a str>,
    pub comment: Option<&'a str>,
}

/// Encode a JPEG and splice an EXIF APP1 segment right after SOI.
pub fn jpeg_with_exif(width: u32, height: u32, fields: &ExifFields) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);
    let tiff = build_tiff(fields);

    let mut app1 = Vec::with_capacity(tiff.len() + 10);
    app1.extend_from_slice(&[0xFF, 0xE1]);
    app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut out = Vec::with_capacity(jpeg.len() + app1.len());
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write a JPEG carrying the given EXIF fields.
pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, fields: &ExifFields) {
    std::fs::write(path, jpeg_with_exif(width, height, fields)).unwrap();
}

const TYPE_BYTE: u16 = 1;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_UNDEFINED: u16 = 7;

const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_XP_TITLE: u16 = 0x9C9B;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
const TAG_USER_COMMENT: u16 = 0x9286;

struct RawEntry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

impl RawEntry {
    fn ascii(tag: u16, s: &str) -> Self {
        let mut data = s.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }
}

fn padded(len: usize) -> usize {
    len + len % 2
}

/// Byte length of an IFD including its out-of-line data area.
fn ifd_len(entries: &[RawEntry]) -> usize {
    let data: usize = entries
        .iter()
        .filter(|e| e.data.len() > 4)
        .map(|e| padded(e.data.len()))
        .sum();
    2 + 12 * entries.len() + 4 + data
}

/// Append an IFD that starts at TIFF offset `start`, data area following it.
fn write_ifd(out: &mut Vec<u8>, entries: &[RawEntry], start: usize) {
    let mut data_offset = start + 2 + 12 * entries.len() + 4;
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for e in entries {
        out.extend_from_slice(&e.tag.to_le_bytes());
        out.extend_from_slice(&e.kind.to_le_bytes());
        out.extend_from_slice(&e.count.to_le_bytes());
        if e.data.len() <= 4 {
            let mut inline = e.data.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&(data_offset as u32).to_le_bytes());
            data_offset += padded(e.data.len());
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    for e in entries.iter().filter(|e| e.data.len() > 4) {
        out.extend_from_slice(&e.data);
        if e.data.len() % 2 == 1 {
            out.push(0);
        }
    }
}

/// Little-endian TIFF structure: IFD0 (+ Exif sub-IFD when needed).
fn build_tiff(fields: &ExifFields) -> Vec<u8> {
    let mut exif_entries = Vec::new();
    if let Some(date) = fields.date_time_original {
        exif_entries.push(RawEntry::ascii(TAG_DATE_TIME_ORIGINAL, date));
    }
    if let Some(comment) = fields.comment {
        let mut data = b"ASCII\0\0\0".to_vec();
        data.extend_from_slice(comment.as_bytes());
        exif_entries.push(RawEntry {
            tag: TAG_USER_COMMENT,
            kind: TYPE_UNDEFINED,
            count: data.len() as u32,
            data,
        });
    }

    let mut ifd0 = Vec::new();
    if let Some(desc) = fields.description {
        ifd0.push(RawEntry::ascii(TAG_IMAGE_DESCRIPTION, desc));
    }
    let pointer_index = if exif_entries.is_empty() {
        None
    } else {
        ifd0.push(RawEntry {
            tag: TAG_EXIF_IFD_POINTER,
            kind: TYPE_LONG,
            count: 1,
            data: vec![0; 4],
        });
        Some(ifd0.len() - 1)
    };
    if let Some(title) = fields.title {
        let mut data: Vec<u8> = title.encode_utf16().flat_map(u16::to_le_bytes).collect();
        data.extend_from_slice(&[0, 0]);
        ifd0.push(RawEntry {
            tag: TAG_XP_TITLE,
            kind: TYPE_BYTE,
            count: data.len() as u32,
            data,
        });
    }

    let ifd0_start = 8;
    let exif_start = ifd0_start + ifd_len(&ifd0);
    if let Some(i) = pointer_index {
        ifd0[i].data = (exif_start as u32).to_le_bytes().to_vec();
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&(ifd0_start as u32).to_le_bytes());
    write_ifd(&mut out, &ifd0, ifd0_start);
    if !exif_entries.is_empty() {
        write_ifd(&mut out, &exif_entries, exif_start);
    }
    out
}
