//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (group, photo, page) is its semantic identity: label and
//! positional index. Filesystem paths follow as indented context lines so the
//! output reads as a content inventory while still tracing back to files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Groups
//! 001 Astro (1 photo)
//!     001 IMG_astro_001.jpg
//!         Date: 2023-08-12 22:41:07 (file time)
//! 002 March 2024 (2 photos)
//!     001 IMG_0002.jpg
//!         Date: 2024-03-28 09:12:44
//!     002 IMG_0001.jpg
//!         Date: 2024-03-09 21:14:05
//!
//! Cataloged 3 photos in 2 groups
//! ```
//!
//! ## Process
//!
//! ```text
//! Derived
//! 001 IMG_0002.jpg → images/large/2024-03/IMG_0002.webp
//!     Thumb: images/thumbs/2024-03/IMG_0002.webp
//!
//! Skipped
//! 001 broken.jpg
//!     Error: Processing failed: Failed to decode ...
//!
//! Derived 2 photos, skipped 1
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Photos → index.html
//! 002 All photos (newest first) → all.html (3 photos)
//! 003 Astro → astro.html (1 photo)
//!
//! Generated 3 pages
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::catalog::{Catalog, Photo};
use crate::generate::{GenerateSummary, INDEX_FILENAME};
use crate::process::ProcessReport;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn count_label(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", n)
    }
}

/// Format an entity header: positional index + title, with optional count.
///
/// ```text
/// 001 March 2024 (5 photos)
/// 001 IMG_0001.jpg
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({})", format_index(index), title, count_label(n)),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Capture date line; fallback dates are marked.
fn date_line(photo: &Photo) -> String {
    let date = photo.capture_date.format("%Y-%m-%d %H:%M:%S");
    if photo.has_reliable_date {
        format!("Date: {}", date)
    } else {
        format!("Date: {} (file time)", date)
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the catalog grouped for display, groups in index order.
pub fn format_scan_output(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();

    if !catalog.groups.is_empty() {
        lines.push("Groups".to_string());
    }
    for (gi, group) in catalog.groups.iter().enumerate() {
        let photos: Vec<&Photo> = catalog.photos_in(*group).collect();
        lines.push(entity_header(gi + 1, &group.label(), Some(photos.len())));
        for (pi, photo) in photos.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entity_header(pi + 1, &photo.name, None)));
            lines.push(format!("{}{}", indent(2), date_line(photo)));
            if !photo.tags.is_empty() {
                let tags: Vec<&str> = photo.tags.iter().map(|t| t.as_str()).collect();
                lines.push(format!("{}Tags: {}", indent(2), tags.join(", ")));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Cataloged {} in {} groups",
        count_label(catalog.photos.len()),
        catalog.groups.len()
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(catalog: &Catalog) {
    for line in format_scan_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Process output
// ============================================================================

/// Format the process report: derived photos, then skipped ones.
pub fn format_process_output(report: &ProcessReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.derived.is_empty() {
        lines.push("Derived".to_string());
        for (i, photo) in report.derived.iter().enumerate() {
            lines.push(format!(
                "{} \u{2192} {}",
                entity_header(i + 1, &photo.name, None),
                photo.large
            ));
            lines.push(format!("{}Thumb: {}", indent(1), photo.thumb));
        }
    }

    if !report.skipped.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Skipped".to_string());
        for (i, photo) in report.skipped.iter().enumerate() {
            lines.push(entity_header(i + 1, &photo.name, None));
            lines.push(format!("{}Error: {}", indent(1), photo.error));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Derived {}, skipped {}",
        count_label(report.derived.len()),
        report.skipped.len()
    ));
    lines
}

/// Print process output to stdout.
pub fn print_process_output(report: &ProcessReport) {
    for line in format_process_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format the list of written pages.
///
/// The index page shows no count: it lists groups, not photos.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let header = format!(
                "{} \u{2192} {}",
                entity_header(i + 1, &page.title, None),
                page.filename
            );
            if page.filename == INDEX_FILENAME {
                header
            } else {
                format!("{} ({})", header, count_label(page.photos))
            }
        })
        .collect();

    lines.push(String::new());
    lines.push(format!("Generated {} pages", summary.pages.len()));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
