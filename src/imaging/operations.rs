//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within_width;
use super::params::{Quality, ResizeParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// A variant written by [`create_variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedVariant {
    pub width: u32,
    pub height: u32,
}

/// Plan a width-capped resize without executing it.
pub fn plan_resize(
    source: &Path,
    output: &Path,
    original_dims: (u32, u32),
    max_width: u32,
    quality: Quality,
) -> ResizeParams {
    let (width, height) = fit_within_width(original_dims, max_width);
    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality,
    }
}

/// Write one WebP variant of `source` no wider than `max_width`.
///
/// Reads the source dimensions, caps the width without enlarging, and hands
/// the exact target size to the backend.
pub fn create_variant(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    max_width: u32,
    quality: Quality,
) -> Result<GeneratedVariant> {
    let dims = get_dimensions(backend, source)?;
    let params = plan_resize(source, output, dims, max_width, quality);
    backend.resize(&params)?;
    Ok(GeneratedVariant {
        width: params.width,
        height: params.height,
    })
}
