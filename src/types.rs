//! Shared types used across all pipeline stages.
//!
//! A photo lands in exactly one [`Group`], and every stage (catalog, process,
//! generate) keys its work off the same group values:
//!
//! - the derivative image directories (`images/large/<slug>/`)
//! - the listing page filename (`<slug>.html`)
//! - the ordering of entries on the index page
//!
//! Groups are never persisted. They are recomputed from the photo set on
//! every run.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Classification label derived from embedded metadata text or the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Astro,
}

impl Tag {
    /// Every tag, in the order tag groups appear on the index page.
    pub const ALL: &'static [Tag] = &[Tag::Astro];

    /// Case-insensitive substring that triggers the tag.
    pub fn keyword(self) -> &'static str {
        match self {
            Tag::Astro => "astro",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Astro => "astro",
        }
    }

    /// Returns true if `text` contains this tag's keyword, ignoring case.
    pub fn matches(self, text: &str) -> bool {
        text.to_lowercase().contains(self.keyword())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single bucket a photo belongs to.
///
/// `Ord` is the index-page order: tag buckets first, then months with the
/// most recent first, then the catch-all bucket for photos without a
/// reliable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Tagged(Tag),
    Month { year: i32, month: u32 },
    NoTimestamp,
}

const NO_TIMESTAMP_SLUG: &str = "no-timestamp";

impl Group {
    /// Filesystem- and URL-safe identifier: `astro`, `2024-03`, `no-timestamp`.
    pub fn slug(&self) -> String {
        match self {
            Group::Tagged(tag) => tag.as_str().to_string(),
            Group::Month { year, month } => format!("{:04}-{:02}", year, month),
            Group::NoTimestamp => NO_TIMESTAMP_SLUG.to_string(),
        }
    }

    /// Human-readable heading: `Astro`, `March 2024`, `No timestamp`.
    pub fn label(&self) -> String {
        match self {
            Group::Tagged(tag) => {
                let name = tag.as_str();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Group::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| self.slug()),
            Group::NoTimestamp => "No timestamp".to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Group::Tagged(_) => 0,
            Group::Month { .. } => 1,
            Group::NoTimestamp => 2,
        }
    }
}

impl Ord for Group {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Group::Tagged(a), Group::Tagged(b)) => a.cmp(b),
            (
                Group::Month { year: ya, month: ma },
                Group::Month { year: yb, month: mb },
            ) => (yb, mb).cmp(&(ya, ma)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Group {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug())
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.slug())
    }
}
