//! Pipeline configuration.
//!
//! Handles loading, validating, and merging `asset-prep.toml`. The file is
//! optional: without it the pipeline runs with the stock defaults below, which
//! match the conventional layout of a site project.
//!
//! ## Config File Location
//!
//! ```text
//! my-site/
//! ├── asset-prep.toml          # Optional, overrides stock defaults
//! ├── content/                 # Primary content root (holds info.yml)
//! ├── content.example/         # Fallback when content/ is absent
//! └── public/                  # Asset root
//!     ├── resized/             # Generated variants (never scanned)
//!     ├── images.json          # Generated manifest
//!     └── info.json            # Generated from info.yml
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! public_dir = "public"        # Asset root, relative to the project root
//! output_dir = "resized"       # Output subdirectory inside the asset root
//! manifest_file = "images.json"
//!
//! [content]
//! primary = "content"
//! fallback = "content.example"
//! info_file = "info.yml"
//! info_output = "info.json"
//!
//! [images]
//! quality = 80                 # Lossy WebP quality (1-100)
//! extensions = ["jpg", "jpeg", "png", "webp"]
//!
//! [[images.sizes]]
//! name = "small"
//! width = 480
//!
//! [[images.sizes]]
//! name = "large"
//! width = 1920
//!
//! [processing]
//! max_processes = 4            # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Tables are merged key by key, so a config file only needs the values it
//! changes. Arrays (`sizes`, `extensions`) replace the stock value wholesale:
//! declaring one `[[images.sizes]]` entry yields exactly one profile.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SizeProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// Name of the optional config file in the project root.
pub const CONFIG_FILENAME: &str = "asset-prep.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `asset-prep.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Asset root, relative to the project root.
    pub public_dir: String,
    /// Output subdirectory name. Any directory with this name is skipped by the scan.
    pub output_dir: String,
    /// Manifest file name, written inside the asset root.
    pub manifest_file: String,
    /// Where `info.yml` lives and where its JSON copy goes.
    pub content: ContentConfig,
    /// Size profiles, encoding quality, and recognized extensions.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            public_dir: "public".to_string(),
            output_dir: "resized".to_string(),
            manifest_file: "images.json".to_string(),
            content: ContentConfig::default(),
            images: ImagesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_single_component("output_dir", &self.output_dir)?;
        require_single_component("manifest_file", &self.manifest_file)?;
        require_single_component("content.info_output", &self.content.info_output)?;
        if self.public_dir.is_empty() {
            return Err(ConfigError::Validation(
                "public_dir must not be empty".into(),
            ));
        }
        if self.images.quality == 0 || self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "images.extensions must not be empty".into(),
            ));
        }
        if self.images.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "images.sizes must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for size in &self.images.sizes {
            require_single_component("images.sizes.name", &size.name)?;
            if size.width == 0 {
                return Err(ConfigError::Validation(format!(
                    "images.sizes entry '{}' must have a non-zero width",
                    size.name
                )));
            }
            if !seen.insert(size.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate size profile '{}'",
                    size.name
                )));
            }
        }
        Ok(())
    }

    /// Whether a file extension (without the dot) is on the image allow-list.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.images
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

/// Reject empty values and anything that is not a single plain path segment.
fn require_single_component(key: &str, value: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{key} must be a single file or directory name, got '{value}'"
        ))),
    }
}

/// Content root candidates and the metadata file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Preferred content directory, relative to the project root.
    pub primary: String,
    /// Used only when `primary` does not exist.
    pub fallback: String,
    /// YAML metadata file inside the content root.
    pub info_file: String,
    /// JSON file written inside the asset root.
    pub info_output: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            primary: "content".to_string(),
            fallback: "content.example".to_string(),
            info_file: "info.yml".to_string(),
            info_output: "info.json".to_string(),
        }
    }
}

/// Responsive variant settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Size profiles; each produces one WebP variant per image.
    pub sizes: Vec<SizeProfile>,
    /// Lossy WebP quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Extensions (case-insensitive, no dot) treated as source images.
    pub extensions: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            sizes: vec![SizeProfile::new("small", 480), SizeProfile::new("large", 1920)],
            quality: 80,
            extensions: ["jpg", "jpeg", "png", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel resize workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value (arrays included)
/// replaces the base value.
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

/// Parse config text, merge it over the stock defaults, and validate.
pub fn parse_config(content: &str) -> Result<PipelineConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value(), overlay);
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file from an explicit path. The file must exist.
pub fn load_config_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load `asset-prep.toml` from the project root, or the defaults if absent.
pub fn load_config(project_root: &Path) -> Result<PipelineConfig, ConfigError> {
    let path = project_root.join(CONFIG_FILENAME);
    if !path.exists() {
        let config = PipelineConfig::default();
        config.validate()?;
        return Ok(config);
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `asset-prep.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# asset-prep configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Asset root, relative to the project root. Every image under it is scanned.
public_dir = "public"

# Output subdirectory inside the asset root. Any directory with this name is
# skipped by the scan, so generated variants are never treated as sources.
output_dir = "resized"

# Manifest of discovered images, written inside the asset root.
manifest_file = "images.json"

# ---------------------------------------------------------------------------
# Content metadata
# ---------------------------------------------------------------------------
[content]
# Content root holding the metadata file. The fallback is used only when the
# primary directory does not exist.
primary = "content"
fallback = "content.example"

# YAML metadata file inside the content root, and its JSON copy inside the
# asset root.
info_file = "info.yml"
info_output = "info.json"

# ---------------------------------------------------------------------------
# Responsive variants
# ---------------------------------------------------------------------------
[images]
# Lossy WebP quality (1 = worst, 100 = best).
quality = 80

# Extensions treated as source images (case-insensitive).
extensions = ["jpg", "jpeg", "png", "webp"]

# One WebP variant per profile, written to <output_dir>/<name>/...
# Images narrower than the width are re-encoded at their own size.
[[images.sizes]]
name = "small"
width = 480

[[images.sizes]]
name = "large"
width = 1920

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel resize workers. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_processes = 4
"##
}
