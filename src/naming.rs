//! Filename conventions shared by the catalog, process and generate stages.
//!
//! A source photo `IMG_0042.JPG` produces:
//!
//! - base name `IMG_0042` (filename without its last extension)
//! - derivatives `images/large/<group>/IMG_0042.webp` and
//!   `images/thumbs/<group>/IMG_0042.webp`
//!
//! Two sources that share a base name but differ in extension (`a.jpg` and
//! `a.png`) map to the same derivative within a group. The one processed
//! last overwrites the other.

use std::path::Path;

/// Extension of every derivative image.
pub const DERIVED_EXTENSION: &str = "webp";

/// Source extensions accepted by the catalog (compared case-insensitively).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Filename without its last extension.
///
/// - `"IMG_0042.JPG"` → `"IMG_0042"`
/// - `"trip.2024.jpeg"` → `"trip.2024"`
/// - `".hidden"` → `".hidden"`
pub fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Filename of the derivative for a given base name.
pub fn derived_filename(base_name: &str) -> String {
    format!("{}.{}", base_name, DERIVED_EXTENSION)
}

/// Returns true if the path has one of the [`ACCEPTED_EXTENSIONS`].
pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Listing page filename for a group slug.
pub fn page_filename(slug: &str) -> String {
    format!("{}.html", slug)
}
