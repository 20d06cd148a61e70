//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults reproduce the fixed layout the generator has always used; a
//! `config.toml` in the site root overrides any subset of them.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Optional, overrides stock defaults
//! ├── index.html               # Generated
//! └── images/
//!     ├── originals/           # Source photos
//!     ├── large/               # Generated
//!     └── thumbs/              # Generated
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! originals = "images/originals"
//! large = "images/large"
//! thumbs = "images/thumbs"
//!
//! [images]
//! large_edge = 1600         # Max long edge of the lightbox image
//! thumb_edge = 400          # Max long edge of grid thumbnails
//! quality = 80              # WebP quality (1-100)
//!
//! [site]
//! title = "Photos"
//! profile_url = "https://example.com/me"   # Optional link on the index page
//! profile_label = "Profile"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want.
//!
//! ```toml
//! [images]
//! thumb_edge = 320
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::MAX_WEBP_EDGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the site root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Source and derivative directories, relative to the site root.
    pub paths: PathsConfig,
    /// Derivative sizes and encoding quality.
    pub images: ImagesConfig,
    /// Page title and index links.
    pub site: SiteInfo,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.large_edge == 0 || self.images.thumb_edge == 0 {
            return Err(ConfigError::Validation(
                "images.large_edge and images.thumb_edge must be non-zero".into(),
            ));
        }
        if self.images.thumb_edge > self.images.large_edge {
            return Err(ConfigError::Validation(
                "images.thumb_edge must not exceed images.large_edge".into(),
            ));
        }
        if self.images.large_edge > MAX_WEBP_EDGE {
            return Err(ConfigError::Validation(format!(
                "images.large_edge must not exceed {}",
                MAX_WEBP_EDGE
            )));
        }
        for (key, value) in [
            ("paths.originals", &self.paths.originals),
            ("paths.large", &self.paths.large),
            ("paths.thumbs", &self.paths.thumbs),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{} must not be empty",
                    key
                )));
            }
        }
        self.paths.validate_layout()
    }
}

/// Directory layout, relative to the site root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub originals: String,
    pub large: String,
    pub thumbs: String,
}

impl PathsConfig {
    /// Derivative trees are emptied on every build, so each must be a proper
    /// subdirectory of the site root, disjoint from the originals and from
    /// each other.
    fn validate_layout(&self) -> Result<(), ConfigError> {
        let originals = normalize(Path::new(&self.originals));
        let large = derivative_dir("paths.large", &self.large)?;
        let thumbs = derivative_dir("paths.thumbs", &self.thumbs)?;

        if overlaps(&large, &thumbs) {
            return Err(ConfigError::Validation(
                "paths.large and paths.thumbs must not contain one another".into(),
            ));
        }
        if let Some(originals) = originals {
            for (key, dir) in [("paths.large", &large), ("paths.thumbs", &thumbs)] {
                if overlaps(&originals, dir) {
                    return Err(ConfigError::Validation(format!(
                        "{} must not contain or be inside paths.originals",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Lexically normalized components of a root-relative path.
///
/// `None` for absolute paths and for paths that climb out of the root.
fn normalize(path: &Path) -> Option<Vec<String>> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts)
}

fn derivative_dir(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    match normalize(Path::new(value)) {
        Some(parts) if !parts.is_empty() => Ok(parts),
        _ => Err(ConfigError::Validation(format!(
            "{} must be a subdirectory of the site root",
            key
        ))),
    }
}

fn overlaps(a: &[String], b: &[String]) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            originals: "images/originals".to_string(),
            large: "images/large".to_string(),
            thumbs: "images/thumbs".to_string(),
        }
    }
}

/// Derivative image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Longest edge of the lightbox image.
    pub large_edge: u32,
    /// Longest edge of grid thumbnails.
    pub thumb_edge: u32,
    /// Lossy WebP quality (1-100).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            large_edge: 1600,
            thumb_edge: 400,
            quality: 80,
        }
    }
}

/// Page-level text and links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    /// External profile link shown on the index page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub profile_label: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Photos".to_string(),
            profile_url: None,
            profile_label: "Profile".to_string(),
        }
    }
}

/// Absolute directories resolved against a site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub originals: PathBuf,
    pub large: PathBuf,
    pub thumbs: PathBuf,
}

impl PathsConfig {
    pub fn resolve(&self, root: &Path) -> SitePaths {
        SitePaths {
            root: root.to_path_buf(),
            originals: root.join(&self.originals),
            large: root.join(&self.large),
            thumbs: root.join(&self.thumbs),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-gal configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Place this file in the site root (next to index.html).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directory layout (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
# Source photos (.jpg, .jpeg, .png, .webp). Never modified.
originals = "images/originals"

# Lightbox-size derivatives, one subdirectory per group.
# Everything in here except .gitkeep is deleted on each build, so this
# must be a subdirectory of the site root, apart from originals.
large = "images/large"

# Thumbnail derivatives, one subdirectory per group.
# Everything in here except .gitkeep is deleted on each build.
thumbs = "images/thumbs"

# ---------------------------------------------------------------------------
# Derivative images
# ---------------------------------------------------------------------------
[images]
# Longest edge in pixels (at most 16383). Smaller originals are never upscaled.
large_edge = 1600
thumb_edge = 400

# Lossy WebP quality (1 = worst, 100 = best).
quality = 80

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Photos"

# External profile link shown on the index page.
# profile_url = "https://example.com/you"
profile_label = "Profile"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_fixed_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.originals, "images/originals");
        assert_eq!(config.paths.large, "images/large");
        assert_eq!(config.paths.thumbs, "images/thumbs");
    }

    #[test]
    fn default_config_has_image_settings() {
        let config = SiteConfig::default();
        assert_eq!(config.images.large_edge, 1600);
        assert_eq!(config.images.thumb_edge, 400);
        assert_eq!(config.images.quality, 80);
    }

    #[test]
    fn default_config_has_no_profile_link() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "Photos");
        assert!(config.site.profile_url.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[images]
thumb_edge = 320
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.images.thumb_edge, 320);
        assert_eq!(config.images.large_edge, 1600);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn parse_profile_link() {
        let toml = r#"
[site]
profile_url = "https://example.com/me"
profile_label = "Instagram"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.site.profile_url.as_deref(),
            Some("https://example.com/me")
        );
        assert_eq!(config.site.profile_label, "Instagram");
        assert_eq!(config.site.title, "Photos");
    }

    #[test]
    fn paths_resolve_against_root() {
        let paths = PathsConfig::default().resolve(Path::new("/site"));
        assert_eq!(paths.root, Path::new("/site"));
        assert_eq!(paths.originals, Path::new("/site/images/originals"));
        assert_eq!(paths.large, Path::new("/site/images/large"));
        assert_eq!(paths.thumbs, Path::new("/site/images/thumbs"));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 80"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[images]
large_edge = 1600
quality = 80
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[images]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let images = merged.get("images").unwrap();
        assert_eq!(images.get("quality").unwrap().as_integer(), Some(70));
        assert_eq!(images.get("large_edge").unwrap().as_integer(), Some(1600));
    }

    #[test]
    fn merge_toml_adds_new_keys() {
        let base: toml::Value = toml::from_str(r#"[site]"#).unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
profile_url = "https://example.com"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(
            merged.get("site").unwrap().get("profile_url").unwrap().as_str(),
            Some("https://example.com")
        );
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[images]
qualty = 90
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[imagez]
quality = 90
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[paths]
original = "photos"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = SiteConfig::default();
        config.images.quality = 100;
        assert!(config.validate().is_ok());
        config.images.quality = 1;
        assert!(config.validate().is_ok());
        config.images.quality = 0;
        assert!(config.validate().is_err());
        config.images.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_edge() {
        let mut config = SiteConfig::default();
        config.images.thumb_edge = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_thumb_larger_than_large() {
        let mut config = SiteConfig::default();
        config.images.thumb_edge = 2000;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("thumb_edge"));
    }

    #[test]
    fn validate_empty_path() {
        let mut config = SiteConfig::default();
        config.paths.originals = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_same_derivative_dirs() {
        let mut config = SiteConfig::default();
        config.paths.thumbs = config.paths.large.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_nested_derivative_dirs() {
        let mut config = SiteConfig::default();
        config.paths.thumbs = "images/large/thumbs".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_derivative_dir_containing_originals() {
        let mut config = SiteConfig::default();
        config.paths.large = "images".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("paths.large"));
    }

    #[test]
    fn validate_derivative_dir_inside_originals() {
        let mut config = SiteConfig::default();
        config.paths.thumbs = "images/originals/./thumbs".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("paths.thumbs"));
    }

    #[test]
    fn validate_derivative_dir_at_site_root() {
        for root in [".", "./", "images/.."] {
            let mut config = SiteConfig::default();
            config.paths.large = root.into();
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("subdirectory"), "{} accepted", root);
        }
    }

    #[test]
    fn validate_derivative_dir_outside_site_root() {
        let mut config = SiteConfig::default();
        config.paths.thumbs = "../thumbs".into();
        assert!(config.validate().is_err());

        config.paths.thumbs = "/tmp/thumbs".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_relocated_dirs_pass() {
        let mut config = SiteConfig::default();
        config.paths.originals = "photos".into();
        config.paths.large = "public/large".into();
        config.paths.thumbs = "public/../public/thumbs".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_edge_beyond_webp_limit() {
        let mut config = SiteConfig::default();
        config.images.large_edge = MAX_WEBP_EDGE;
        assert!(config.validate().is_ok());
        config.images.large_edge = MAX_WEBP_EDGE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_rejects_derivatives_over_originals() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[paths]\nlarge = \"images\"\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[paths]
originals = "raw"

[site]
title = "Night sky"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.paths.originals, "raw");
        assert_eq!(config.paths.large, "images/large");
        assert_eq!(config.site.title, "Night sky");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[images\nquality = ").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[images]
quality = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[images]
large_edge = 2048
"#,
        )
        .unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.images.large_edge, 2048);
        assert_eq!(config.images.thumb_edge, 400);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[paths]", "[images]", "[site]"] {
            assert!(content.contains(section), "missing {}", section);
        }
    }
}
