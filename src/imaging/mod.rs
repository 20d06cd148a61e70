//! Image processing: decode, resize, encode and EXIF reading.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **EXIF metadata** | `kamadak-exif` (date, description, title, comment) |
//! | **Resize → WebP** | Lanczos3 + lossy `webp` encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub(crate) mod exif_reader;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EmbeddedMetadata, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use operations::{DeriveConfig, derive_image, get_dimensions};
pub use params::{MAX_WEBP_EDGE, Quality, ResizeParams};
pub use rust_backend::RustBackend;
