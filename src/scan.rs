//! Asset root scanning and image manifest generation.
//!
//! Stage 1 of the pipeline. Walks the asset root depth-first, siblings in
//! file-name order, and collects every file whose extension is on the image
//! allow-list. Directories named like the output subdirectory are pruned at
//! any depth, so generated variants never feed back in as sources.
//!
//! ```text
//! public/                      # Asset root
//! ├── photo.png                # → "/photo.png"
//! ├── favicon.ico              # not an image extension, ignored
//! ├── resized/                 # pruned entirely
//! │   └── small/photo.png.webp
//! └── sub/
//!     └── shot.JPG             # → "/sub/shot.JPG" (case-insensitive match)
//! ```
//!
//! The resulting [`ImageManifest`] is written verbatim as `images.json`.

use crate::config::PipelineConfig;
use crate::types::SourceImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset root not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Failed to walk asset root: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Ordered list of discovered image paths, as served from the site root.
///
/// Serializes as a plain JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageManifest(pub Vec<String>);

impl ImageManifest {
    pub fn paths(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pretty JSON with two-space indentation and no trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Overwrite the manifest file.
    pub fn write(&self, path: &Path) -> Result<(), ScanError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Everything the scan found, in encounter order.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub images: Vec<SourceImage>,
}

impl ScanResult {
    pub fn manifest(&self) -> ImageManifest {
        ImageManifest(self.images.iter().map(|i| i.site_path.clone()).collect())
    }
}

/// Scan `asset_root` for images according to the config's extension
/// allow-list and output directory name.
pub fn scan(asset_root: &Path, config: &PipelineConfig) -> Result<ScanResult, ScanError> {
    if !asset_root.is_dir() {
        return Err(ScanError::RootNotFound(asset_root.to_path_buf()));
    }

    let walker = WalkDir::new(asset_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_output_dir(e, &config.output_dir));

    let mut images = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if !has_image_extension(entry.path(), config) {
            continue;
        }
        images.push(source_image(entry.path(), asset_root));
    }

    Ok(ScanResult { images })
}

/// The root itself is never pruned, even if it shares the output name.
fn is_output_dir(entry: &DirEntry, output_dir: &str) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == output_dir
}

fn has_image_extension(path: &Path, config: &PipelineConfig) -> bool {
    path.extension()
        .map(|e| config.is_image_extension(&e.to_string_lossy()))
        .unwrap_or(false)
}

fn source_image(path: &Path, asset_root: &Path) -> SourceImage {
    // walkdir yields paths joined onto the root, so the prefix always matches
    let relative = path.strip_prefix(asset_root).unwrap_or(path);
    let relative_dir = relative
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    SourceImage {
        path: path.to_path_buf(),
        relative_dir,
        filename,
        site_path: site_path(relative),
    }
}

/// `sub\shot.jpg` or `sub/shot.jpg` → `/sub/shot.jpg`.
pub fn site_path(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::touch;
    use tempfile::TempDir;

    fn scan_default(root: &Path) -> ScanResult {
        scan(root, &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn finds_images_in_scan_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.png"));
        touch(&tmp.path().join("sub/shot.jpg"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(manifest.paths(), ["/photo.png", "/sub/shot.jpg"]);
    }

    #[test]
    fn directories_are_visited_in_place() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/inner.jpg"));
        touch(&tmp.path().join("b.jpg"));
        touch(&tmp.path().join("c/d/deep.webp"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(
            manifest.paths(),
            ["/a/inner.jpg", "/b.jpg", "/c/d/deep.webp"]
        );
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("UPPER.JPG"));
        touch(&tmp.path().join("mixed.Png"));
        touch(&tmp.path().join("long.jpeg"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(manifest.len(), 3);
        assert!(manifest.paths().contains(&"/UPPER.JPG".to_string()));
    }

    #[test]
    fn non_image_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("favicon.ico"));
        touch(&tmp.path().join("robots.txt"));
        touch(&tmp.path().join("images.json"));
        touch(&tmp.path().join("logo.svg"));
        touch(&tmp.path().join("noext"));
        touch(&tmp.path().join(".jpg"));

        assert!(scan_default(tmp.path()).images.is_empty());
    }

    #[test]
    fn output_dir_is_never_scanned() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.png"));
        touch(&tmp.path().join("resized/small/photo.png.webp"));
        touch(&tmp.path().join("resized/large/stray.jpg"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(manifest.paths(), ["/photo.png"]);
    }

    #[test]
    fn nested_output_dir_name_is_pruned_too() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("gallery/resized/old.jpg"));
        touch(&tmp.path().join("gallery/keep.jpg"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(manifest.paths(), ["/gallery/keep.jpg"]);
    }

    #[test]
    fn file_named_like_output_dir_is_not_pruned() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("resized.jpg"));

        let manifest = scan_default(tmp.path()).manifest();
        assert_eq!(manifest.paths(), ["/resized.jpg"]);
    }

    #[test]
    fn custom_output_dir_and_extensions() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("variants/a.jpg"));
        touch(&tmp.path().join("resized/b.jpg"));
        touch(&tmp.path().join("c.gif"));

        let mut config = PipelineConfig::default();
        config.output_dir = "variants".to_string();
        config.images.extensions = vec!["jpg".to_string(), "gif".to_string()];

        let manifest = scan(tmp.path(), &config).unwrap().manifest();
        assert_eq!(manifest.paths(), ["/c.gif", "/resized/b.jpg"]);
    }

    #[test]
    fn source_image_fields() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("sub/dir/shot.jpg"));

        let result = scan_default(tmp.path());
        let image = &result.images[0];
        assert_eq!(image.filename, "shot.jpg");
        assert_eq!(image.relative_dir, Path::new("sub/dir"));
        assert_eq!(image.site_path, "/sub/dir/shot.jpg");
        assert_eq!(image.path, tmp.path().join("sub/dir/shot.jpg"));
    }

    #[test]
    fn top_level_image_has_empty_relative_dir() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("photo.png"));

        let result = scan_default(tmp.path());
        assert_eq!(result.images[0].relative_dir, PathBuf::new());
    }

    #[test]
    fn missing_root_errors() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &PipelineConfig::default());
        assert!(matches!(result, Err(ScanError::RootNotFound(_))));
    }

    #[test]
    fn site_path_normalizes_separators() {
        assert_eq!(site_path(Path::new("photo.png")), "/photo.png");
        assert_eq!(site_path(Path::new("a/b/c.jpg")), "/a/b/c.jpg");
    }

    #[test]
    fn manifest_serializes_as_plain_array() {
        let manifest = ImageManifest(vec!["/a.jpg".into(), "/b/c.png".into()]);
        assert_eq!(manifest.to_json().unwrap(), "[\n  \"/a.jpg\",\n  \"/b/c.png\"\n]");
    }

    #[test]
    fn empty_manifest_serializes_as_empty_array() {
        assert_eq!(ImageManifest::default().to_json().unwrap(), "[]");
    }

    #[test]
    fn manifest_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("images.json");
        std::fs::write(&path, "stale content that is longer than the new one").unwrap();

        ImageManifest(vec!["/x.jpg".into()]).write(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[\n  \"/x.jpg\"\n]");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_listed_under_link_path() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(&outside.path().join("shared.png"));
        std::fs::create_dir_all(tmp.path().join("gallery")).unwrap();
        let link = tmp.path().join("gallery/linked");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();

        let result = scan_default(tmp.path());
        assert_eq!(result.manifest().paths(), ["/gallery/linked/shared.png"]);
        assert_eq!(result.images[0].relative_dir, Path::new("gallery/linked"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_image_file_is_listed() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(&outside.path().join("real.jpg"));
        let target = outside.path().join("real.jpg");
        std::os::unix::fs::symlink(&target, tmp.path().join("alias.jpg")).unwrap();

        let result = scan_default(tmp.path());
        assert_eq!(result.manifest().paths(), ["/alias.jpg"]);
        assert_eq!(result.images[0].filename, "alias.jpg");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loop_fails_the_scan() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/photo.jpg"));
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("a/back")).unwrap();

        let result = scan(tmp.path(), &PipelineConfig::default());
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }
}
