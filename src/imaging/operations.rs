//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{Quality, ResizeParams};
use crate::naming::derived_filename;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for one derivative size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeriveConfig {
    /// Neither output dimension exceeds this.
    pub max_edge: u32,
    pub quality: Quality,
}

/// Plan a derivation without executing it.
pub fn plan_derivative(
    source: &Path,
    dest_dir: &Path,
    base_name: &str,
    original_dims: (u32, u32),
    config: &DeriveConfig,
) -> ResizeParams {
    let (width, height) = calculate_fit_dimensions(original_dims, config.max_edge);
    ResizeParams {
        source: source.to_path_buf(),
        output: dest_dir.join(derived_filename(base_name)),
        width,
        height,
        quality: config.quality,
    }
}

/// Produce a resized, re-encoded copy of `source` at `dest_dir/<base_name>.webp`.
///
/// Creates `dest_dir` if needed. Returns the derived filename. An existing
/// file at the destination is overwritten.
pub fn derive_image(
    backend: &impl ImageBackend,
    source: &Path,
    dest_dir: &Path,
    base_name: &str,
    config: &DeriveConfig,
) -> Result<String> {
    let original = get_dimensions(backend, source)?;
    let params = plan_derivative(source, dest_dir, base_name, original, config);
    std::fs::create_dir_all(dest_dir)?;
    backend.resize(&params)?;
    Ok(derived_filename(base_name))
}
