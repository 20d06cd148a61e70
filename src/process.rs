//! Derivative image generation.
//!
//! Stage 2 of the build pipeline. Takes the catalog from the catalog stage
//! and produces, for every photo, a lightbox-size image and a thumbnail.
//!
//! ## Output Structure
//!
//! ```text
//! images/
//! ├── large/
//! │   ├── .gitkeep               # Preserved across builds
//! │   ├── astro/
//! │   │   └── IMG_astro_001.webp # Longest edge ≤ 1600
//! │   └── 2024-03/
//! │       └── IMG_0001.webp
//! └── thumbs/
//!     ├── .gitkeep
//!     ├── astro/
//!     │   └── IMG_astro_001.webp # Longest edge ≤ 400
//!     └── 2024-03/
//!         └── IMG_0001.webp
//! ```
//!
//! Both trees are emptied (except `.gitkeep`) before anything is written, so
//! a build never leaves derivatives of deleted or regrouped photos behind.
//!
//! ## Failure policy
//!
//! A photo whose source can't be decoded is logged, recorded in
//! [`ProcessReport::skipped`] and left out of the output. The rest of the
//! catalog is still processed. Only failures to clear or create the output
//! directories abort the stage.

use crate::catalog::Catalog;
use crate::config::{SiteConfig, SitePaths};
use crate::imaging::{BackendError, DeriveConfig, ImageBackend, Quality, RustBackend, derive_image};
use crate::types::Group;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Placeholder that keeps an otherwise empty directory under version control.
pub const PLACEHOLDER_FILENAME: &str = ".gitkeep";

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sizes and quality for the two derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessConfig {
    pub large: DeriveConfig,
    pub thumb: DeriveConfig,
}

impl ProcessConfig {
    /// Build a ProcessConfig from SiteConfig values.
    pub fn from_site_config(config: &SiteConfig) -> Self {
        let quality = Quality::new(config.images.quality);
        Self {
            large: DeriveConfig {
                max_edge: config.images.large_edge,
                quality,
            },
            thumb: DeriveConfig {
                max_edge: config.images.thumb_edge,
                quality,
            },
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_site_config(&SiteConfig::default())
    }
}

/// A photo with both derivatives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedPhoto {
    pub name: String,
    pub group: Group,
    /// URL path of the large image, relative to the site root.
    pub large: String,
    /// URL path of the thumbnail, relative to the site root.
    pub thumb: String,
}

/// A photo left out because a derivative could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPhoto {
    pub name: String,
    pub error: String,
}

/// Outcome of the process stage, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub derived: Vec<DerivedPhoto>,
    pub skipped: Vec<SkippedPhoto>,
}

impl ProcessReport {
    /// Derived photos of one group, in catalog order.
    pub fn derived_in(&self, group: Group) -> impl Iterator<Item = &DerivedPhoto> {
        self.derived.iter().filter(move |p| p.group == group)
    }
}

pub fn process(
    catalog: &Catalog,
    paths: &SitePaths,
    config: &ProcessConfig,
) -> Result<ProcessReport, ProcessError> {
    process_with_backend(&RustBackend::new(), catalog, paths, config)
}

/// Process images using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    catalog: &Catalog,
    paths: &SitePaths,
    config: &ProcessConfig,
) -> Result<ProcessReport, ProcessError> {
    clear_derivatives(&paths.large)?;
    clear_derivatives(&paths.thumbs)?;

    let mut report = ProcessReport::default();

    for photo in &catalog.photos {
        let slug = photo.group.slug();
        let large_dir = paths.large.join(&slug);
        let thumb_dir = paths.thumbs.join(&slug);
        debug!("Deriving {} into {}", photo.name, slug);

        let large = match derive_image(
            backend,
            &photo.source_path,
            &large_dir,
            &photo.base_name,
            &config.large,
        ) {
            Ok(file) => file,
            Err(e) => {
                skip(&mut report, &photo.name, e);
                continue;
            }
        };

        let thumb = match derive_image(
            backend,
            &photo.source_path,
            &thumb_dir,
            &photo.base_name,
            &config.thumb,
        ) {
            Ok(file) => file,
            Err(e) => {
                discard_large(&report, &paths.root, &large_dir.join(&large));
                skip(&mut report, &photo.name, e);
                continue;
            }
        };

        report.derived.push(DerivedPhoto {
            name: photo.name.clone(),
            group: photo.group,
            large: url_path(&paths.root, &large_dir.join(large)),
            thumb: url_path(&paths.root, &thumb_dir.join(thumb)),
        });
    }

    info!(
        "Derived {} photos, skipped {}",
        report.derived.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Remove the large image of a photo whose thumbnail failed.
///
/// Photos sharing a base name in one group share a derivative file. If an
/// earlier photo already links to it, the file stays.
fn discard_large(report: &ProcessReport, root: &Path, path: &Path) {
    let url = url_path(root, path);
    if report.derived.iter().any(|d| d.large == url) {
        debug!("Keeping {}: still linked by an earlier photo", url);
        return;
    }
    if let Err(e) = fs::remove_file(path) {
        warn!("Could not remove {}: {}", path.display(), e);
    }
}

fn skip(report: &mut ProcessReport, name: &str, error: BackendError) {
    warn!("Skipping {}: {}", name, error);
    report.skipped.push(SkippedPhoto {
        name: name.to_string(),
        error: error.to_string(),
    });
}

/// Empty a derivative directory, keeping its top-level placeholder file.
///
/// Creates the directory if it doesn't exist.
pub fn clear_derivatives(dir: &Path) -> Result<(), ProcessError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == PLACEHOLDER_FILENAME {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// `/`-separated path of `path` relative to `root`.
///
/// Paths outside the root are rendered in full.
fn url_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
