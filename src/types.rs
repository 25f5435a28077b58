//! Shared types used across pipeline stages.
//!
//! These are the values the scan stage hands to the resize stage and that the
//! config layer deserializes from `asset-prep.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named target width used to produce one resized variant of every image.
///
/// The name doubles as the first path segment under the output root:
/// a `small` profile writes to `resized/small/...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeProfile {
    pub name: String,
    /// Maximum output width in pixels. Images narrower than this are never enlarged.
    pub width: u32,
}

impl SizeProfile {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// A raster image discovered under the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Absolute (or root-joined) path used to read the file.
    pub path: PathBuf,
    /// Directory of the image relative to the asset root (empty for top-level files).
    pub relative_dir: PathBuf,
    /// File name including its original extension, e.g. `photo.png`.
    pub filename: String,
    /// Site-root path as written to the manifest, e.g. `/sub/shot.jpg`.
    pub site_path: String,
}
