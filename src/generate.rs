//! HTML site generation.
//!
//! Stage 3 of the build pipeline. Takes the catalog and the process report
//! and writes the static HTML pages into the site root.
//!
//! ## Generated Pages
//!
//! - **Index page** (`index.html`): one card per group with its cover
//!   thumbnail, label and photo count, plus a link to the all-photos page
//! - **All photos** (`all.html`): every derived photo, newest first
//! - **Group pages** (`<slug>.html`): the photos of one group, newest first
//!
//! Only photos that made it through the process stage are shown. A group
//! whose photos were all skipped gets neither a page nor an index card.
//!
//! ## Lightbox
//!
//! Listing pages embed a small overlay viewer (`static/lightbox.js`).
//! Clicking a thumbnail shows its large image; arrow keys or the on-screen
//! buttons step through the page's photos, wrapping at either end; Escape,
//! the close button or a click on the backdrop dismisses it. Without
//! JavaScript each thumbnail is a plain link to the large image.
//!
//! ## Cache busting
//!
//! Image URLs carry `?v=<token>`, a short SHA-256 digest of the catalog
//! (names, capture dates, groups). The token only changes when the photo set
//! does, so rebuilding an unchanged site rewrites identical files.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::catalog::Catalog;
use crate::config::SiteInfo;
use crate::naming::page_filename;
use crate::process::{DerivedPhoto, ProcessReport};
use crate::types::Group;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/lightbox.js");

pub const INDEX_FILENAME: &str = "index.html";
pub const ALL_FILENAME: &str = "all.html";

/// Hex digits kept from the catalog digest.
const TOKEN_LEN: usize = 10;

/// One written HTML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPage {
    pub filename: String,
    pub title: String,
    pub photos: usize,
}

/// Pages written by the generate stage, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    pub pages: Vec<GeneratedPage>,
    pub token: String,
}

/// A group as shown on the index page.
struct IndexEntry<'a> {
    group: Group,
    cover: &'a DerivedPhoto,
    count: usize,
}

pub fn generate(
    catalog: &Catalog,
    report: &ProcessReport,
    site: &SiteInfo,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let token = cache_token(catalog);
    let mut summary = GenerateSummary {
        pages: Vec::new(),
        token: token.clone(),
    };

    let entries: Vec<IndexEntry> = catalog
        .groups
        .iter()
        .filter_map(|&group| {
            let mut photos = report.derived_in(group);
            let cover = photos.next()?;
            Some(IndexEntry {
                group,
                cover,
                count: 1 + photos.count(),
            })
        })
        .collect();

    let index = render_index(site, &entries, &token);
    write_page(
        output_dir,
        INDEX_FILENAME,
        index,
        &site.title,
        report.derived.len(),
        &mut summary,
    )?;

    let all: Vec<&DerivedPhoto> = report.derived.iter().collect();
    let all_title = "All photos (newest first)";
    let all_page = render_listing(site, all_title, &all, &token);
    write_page(
        output_dir,
        ALL_FILENAME,
        all_page,
        all_title,
        all.len(),
        &mut summary,
    )?;

    for entry in &entries {
        let photos: Vec<&DerivedPhoto> = report.derived_in(entry.group).collect();
        let label = entry.group.label();
        let page = render_listing(site, &label, &photos, &token);
        write_page(
            output_dir,
            &page_filename(&entry.group.slug()),
            page,
            &label,
            photos.len(),
            &mut summary,
        )?;
    }

    info!(
        "Generated {} pages in {}",
        summary.pages.len(),
        output_dir.display()
    );
    Ok(summary)
}

fn write_page(
    output_dir: &Path,
    filename: &str,
    markup: Markup,
    title: &str,
    photos: usize,
    summary: &mut GenerateSummary,
) -> Result<(), GenerateError> {
    fs::write(output_dir.join(filename), markup.into_string())?;
    debug!("Wrote {}", filename);
    summary.pages.push(GeneratedPage {
        filename: filename.to_string(),
        title: title.to_string(),
        photos,
    });
    Ok(())
}

/// Short digest of everything that determines the rendered image set.
pub fn cache_token(catalog: &Catalog) -> String {
    let mut hasher = Sha256::new();
    for photo in &catalog.photos {
        hasher.update(photo.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(photo.capture_date.to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(photo.group.slug().as_bytes());
        hasher.update(b"\n");
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(TOKEN_LEN);
    hex
}

fn versioned(url: &str, token: &str) -> String {
    format!("{}?v={}", url, token)
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", n)
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Thumbnail grid where each cell opens the lightbox at its position.
fn thumbnail_grid(photos: &[&DerivedPhoto], token: &str) -> Markup {
    html! {
        div.thumbnail-grid {
            @for (idx, photo) in photos.iter().enumerate() {
                a.thumb-link href=(versioned(&photo.large, token)) data-index=(idx) {
                    img src=(versioned(&photo.thumb, token)) alt=(photo.name) loading="lazy";
                }
            }
        }
    }
}

/// Overlay driven by `lightbox.js`. Hidden until a thumbnail is clicked.
fn lightbox() -> Markup {
    html! {
        div.lightbox id="lightbox" hidden {
            button.lightbox-close type="button" aria-label="Close" { "×" }
            button.lightbox-prev type="button" aria-label="Previous" { "‹" }
            img.lightbox-image alt="";
            button.lightbox-next type="button" aria-label="Next" { "›" }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page with one card per group.
fn render_index(site: &SiteInfo, entries: &[IndexEntry], token: &str) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (site.title) }
            @if let Some(url) = &site.profile_url {
                a.profile-link href=(url) target="_blank" rel="noopener" { (site.profile_label) }
            }
        }
        main.index-page {
            div.album-grid {
                @for entry in entries {
                    a.album-card href=(page_filename(&entry.group.slug())) {
                        img src=(versioned(&entry.cover.thumb, token)) alt=(entry.group.label()) loading="lazy";
                        span.album-title { (entry.group.label()) }
                        span.album-count { (photo_count(entry.count)) }
                    }
                }
            }
            p.all-link {
                a href=(ALL_FILENAME) { "View all photos (newest first)" }
            }
        }
    };

    base_document(&site.title, content)
}

/// Renders a listing page (all photos or one group) with the lightbox.
fn render_listing(site: &SiteInfo, heading: &str, photos: &[&DerivedPhoto], token: &str) -> Markup {
    let content = html! {
        header.site-header {
            a.back-link href=(INDEX_FILENAME) { "← Back" }
            h1 { (heading) }
            p.photo-count { (photo_count(photos.len())) }
        }
        main.listing-page {
            (thumbnail_grid(photos, token))
        }
        (lightbox())
        script { (PreEscaped(JS)) }
    };

    base_document(&format!("{} · {}", heading, site.title), content)
}

// ============================================================================
// Tests
// ============================================================================
