//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides output paths and target dimensions) and the
//! [`backend`](super::backend) (which does the pixel work). This separation
//! lets tests swap in a mock backend without changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`ResizeParams`]: everything one derivation needs: source, output path, target dimensions, quality.

use std::path::PathBuf;

/// Largest width or height a WebP image can have.
pub const MAX_WEBP_EDGE: u32 = 16383;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Parameters for a resize-and-encode operation.
///
/// `width` and `height` are the final output dimensions, already fitted to
/// the long-edge limit by [`calculate_fit_dimensions`](super::calculations::calculate_fit_dimensions).
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
