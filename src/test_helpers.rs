//! Shared test utilities for the asset-prep test suite.
//!
//! Builds throwaway project trees in a `TempDir`: a `public/` asset root with
//! synthetic images and a content directory holding `info.yml`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let project = TempDir::new().unwrap();
//! let public = project.path().join("public");
//! create_test_png(&public.join("photo.png"), 2000, 1000);
//! write_info(project.path(), "content", "title: Demo\n");
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

/// Write a valid JPEG with a gradient pattern, creating parent directories.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a valid RGBA PNG, creating parent directories.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, 64, (y % 256) as u8, 200])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write an empty placeholder file, creating parent directories.
///
/// Enough for scan and mock-backend tests, which never decode pixels.
pub fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

/// Write `info.yml` into `<project>/<content_dir>/`.
pub fn write_info(project: &Path, content_dir: &str, yaml: &str) {
    let dir = project.join(content_dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("info.yml"), yaml).unwrap();
}

/// Read a JSON file and parse it.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&content).unwrap()
}
