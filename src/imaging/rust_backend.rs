//! Production image backend built on the `image` crate ecosystem.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Flatten alpha | `DynamicImage::to_rgb8` (alpha is dropped, not preserved) |
//! | Encode → WebP (lossy) | `webp::Encoder` |
//! | EXIF metadata | `kamadak-exif` via [`exif_reader`](super::exif_reader) |

use super::backend::{BackendError, Dimensions, EmbeddedMetadata, ImageBackend};
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Backend using `image` for decode/resize and `webp` for encoding.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Flatten to RGB8 and encode as lossy WebP.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let encoded = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
        .encode_simple(false, quality as f32)
        .map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to encode {}x{} WebP: {:?}",
                width, height, e
            ))
        })?;
    std::fs::write(path, &*encoded)?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn read_metadata(&self, path: &Path) -> Result<EmbeddedMetadata, BackendError> {
        Ok(super::exif_reader::read_exif(path))
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };
        save_webp(&resized, &params.output, params.quality.value())
    }
}
