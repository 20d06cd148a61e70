//! Source directory scanning, grouping and ordering.
//!
//! Stage 1 of the build pipeline. Lists the originals directory, runs the
//! metadata extractor on every accepted file and produces a [`Catalog`] that
//! the process and generate stages consume.
//!
//! ## Source layout
//!
//! ```text
//! images/originals/
//! ├── IMG_0001.jpg          # JPEG with EXIF DateTimeOriginal → 2024-03
//! ├── IMG_astro_001.jpg     # "astro" in the name → astro
//! ├── screenshot.png        # no EXIF → no-timestamp
//! ├── notes.txt             # ignored (extension not accepted)
//! └── nested/               # ignored (subdirectories are not scanned)
//! ```
//!
//! ## Grouping
//!
//! Each photo lands in exactly one group:
//!
//! 1. a tag group when the photo carries a tag (tags win over dates)
//! 2. the `YYYY-MM` month of its capture date when that date is reliable
//! 3. otherwise the `no-timestamp` group
//!
//! ## Ordering
//!
//! Photos are sorted by capture date, newest first. Fallback (mtime) dates
//! sort alongside reliable ones by their raw value. Equal dates fall back to
//! the filename so the order is total.

use crate::imaging::{ImageBackend, RustBackend};
use crate::metadata::{self, PhotoMetadata};
use crate::naming::{base_name, has_accepted_extension};
use crate::types::{Group, Tag};
use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Source directory not found: {0}")]
    SourceMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot list source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One source photo with its derived group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    /// Original filename, case preserved.
    pub name: String,
    /// Filename without its extension; derivatives are named after it.
    pub base_name: String,
    pub source_path: PathBuf,
    pub capture_date: NaiveDateTime,
    pub has_reliable_date: bool,
    pub tags: BTreeSet<Tag>,
    pub group: Group,
}

/// Every photo in display order, plus the distinct groups in index order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub photos: Vec<Photo>,
    pub groups: Vec<Group>,
}

impl Catalog {
    /// Photos of one group, in catalog order.
    pub fn photos_in(&self, group: Group) -> impl Iterator<Item = &Photo> {
        self.photos.iter().filter(move |p| p.group == group)
    }

    /// First photo of the group in catalog order.
    pub fn cover(&self, group: Group) -> Option<&Photo> {
        self.photos_in(group).next()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Build the catalog using the production backend.
pub fn build_catalog(source: &Path) -> Result<Catalog, CatalogError> {
    build_catalog_with_backend(&RustBackend::new(), source)
}

/// Build the catalog using a specific backend (allows testing with mock).
pub fn build_catalog_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
) -> Result<Catalog, CatalogError> {
    if !source.is_dir() {
        return Err(CatalogError::SourceMissing(source.to_path_buf()));
    }

    let mut photos = Vec::new();
    for path in list_sources(source)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = metadata::extract_with_backend(backend, &path);
        let group = assign_group(&meta);
        debug!("{} → {}", name, group);

        photos.push(Photo {
            base_name: base_name(&name),
            name,
            source_path: path,
            capture_date: meta.capture_date,
            has_reliable_date: meta.has_reliable_date,
            tags: meta.tags,
            group,
        });
    }

    sort_photos(&mut photos);
    let groups = collect_groups(&photos);
    info!(
        "Cataloged {} photos in {} groups from {}",
        photos.len(),
        groups.len(),
        source.display()
    );

    Ok(Catalog { photos, groups })
}

/// Accepted files directly inside `source`, sorted by name.
///
/// Only a failure to read `source` itself is an error. An entry that cannot
/// be inspected (dangling symlink, permission denied) is logged and skipped.
fn list_sources(source: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(source)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warn!("Skipping unreadable entry {}: {}", path, err);
                continue;
            }
        };
        if entry.file_type().is_file() && has_accepted_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// The single group a photo belongs to.
pub fn assign_group(meta: &PhotoMetadata) -> Group {
    if let Some(tag) = Tag::ALL.iter().copied().find(|t| meta.tags.contains(t)) {
        Group::Tagged(tag)
    } else if meta.has_reliable_date {
        Group::Month {
            year: meta.capture_date.year(),
            month: meta.capture_date.month(),
        }
    } else {
        Group::NoTimestamp
    }
}

/// Newest first; filename breaks ties.
pub fn sort_photos(photos: &mut [Photo]) {
    photos.sort_by(|a, b| {
        b.capture_date
            .cmp(&a.capture_date)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn collect_groups(photos: &[Photo]) -> Vec<Group> {
    let mut groups: Vec<Group> = photos
        .iter()
        .map(|p| p.group)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    groups.sort();
    groups
}
