//! # Photo Gal
//!
//! A static photo gallery generator. Drop photos into `images/originals`,
//! run `photo-gal build`, and get a browsable site grouped by capture month.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Every build runs three stages in order, each consuming the previous
//! stage's in-memory result:
//!
//! ```text
//! 1. Catalog   images/originals/  →  Catalog         (dates, tags, groups, order)
//! 2. Process   Catalog            →  ProcessReport   (large + thumbnail WebP per photo)
//! 3. Generate  Catalog + report   →  *.html          (index, all photos, one page per group)
//! ```
//!
//! Nothing is persisted between runs. The catalog is rebuilt from the
//! originals every time and the derivative directories are emptied before
//! new images are written, so the output always mirrors the current source
//! directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Stage 1: lists originals, assigns groups, sorts newest first |
//! | [`process`] | Stage 2: clears derivative trees and derives both image sizes, skipping bad files |
//! | [`generate`] | Stage 3: renders the HTML pages with Maud, embeds the lightbox |
//! | [`metadata`] | Capture date (EXIF or file time, flagged) and keyword tags for one file |
//! | [`imaging`] | Dimension math, EXIF reading, resize and WebP encoding behind a backend trait |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`types`] | `Tag` and `Group`, shared by every stage |
//! | [`naming`] | Base names, derivative filenames, page filenames |
//! | [`output`] | CLI output formatting for each stage |
//!
//! # Design Decisions
//!
//! ## Reliability Flag Instead of Errors
//!
//! Metadata extraction never fails. A photo without a readable EXIF date still
//! gets a capture date (its modification time) together with
//! `has_reliable_date = false`. Grouping uses the flag: only reliable dates
//! produce a month group.
//!
//! ## Skip and Continue
//!
//! One corrupt original must not take the site down. Derivation errors are
//! logged and recorded per photo; the photo is left out of every page and the
//! rest of the build proceeds.
//!
//! ## Deterministic Output
//!
//! Sorting is total (capture date, then filename) and the cache-busting token
//! on image URLs is a digest of the catalog itself, so rebuilding an unchanged
//! source directory rewrites byte-identical pages.

pub mod catalog;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
