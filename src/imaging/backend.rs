//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, read_metadata, and resize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! `MockBackend` in this module's test submodule, which records calls and
//! returns canned metadata.

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Raw embedded metadata read from an image's EXIF container.
///
/// Values are left unparsed; interpretation (date parsing, tag matching)
/// happens in [`crate::metadata`]. Field mapping:
/// - `date_time_original`: EXIF `DateTimeOriginal` (`0x9003`), e.g. `"2024:03:09 21:14:05"`
/// - `description`: TIFF `ImageDescription` (`0x010E`)
/// - `title`: Windows `XPTitle` (`0x9C9B`), decoded from UTF-16LE
/// - `comment`: EXIF `UserComment` (`0x9286`), character-code prefix stripped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedMetadata {
    pub date_time_original: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub comment: Option<String>,
}

impl EmbeddedMetadata {
    /// The text-bearing fields scanned for classification keywords.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [&self.description, &self.title, &self.comment]
            .into_iter()
            .filter_map(|f| f.as_deref())
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the rest of the
/// codebase is backend-agnostic.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read embedded EXIF metadata.
    ///
    /// A file without a metadata container is not an error: it yields
    /// `EmbeddedMetadata::default()`.
    fn read_metadata(&self, path: &Path) -> Result<EmbeddedMetadata, BackendError>;

    /// Decode the source, resize to exactly `width`x`height`, flatten any
    /// alpha channel and encode to the output path.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
