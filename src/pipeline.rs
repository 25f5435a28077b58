//! Full pre-build run: scan → resize → `images.json` → `info.json`.
//!
//! [`run`] is the single entry point the `build` command uses. It takes the
//! project root, a validated [`PipelineConfig`], and an [`ImageBackend`], and
//! returns a [`BuildReport`] instead of printing, so tests can drive it with a
//! mock backend.
//!
//! Steps run in this order and only resize failures are tolerated; anything
//! else returns early. A failing `info.yml` therefore still leaves a fresh
//! manifest behind.

use crate::config::PipelineConfig;
use crate::imaging::ImageBackend;
use crate::info::{self, InfoError, InfoOutput};
use crate::resize::{self, ResizeError, ResizeEvent, ResizeResult};
use crate::scan::{self, ImageManifest, ScanError};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Info(#[from] InfoError),
}

/// Resolved filesystem locations for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub project_root: PathBuf,
    pub asset_root: PathBuf,
    pub output_root: PathBuf,
    pub manifest_path: PathBuf,
    pub info_output: PathBuf,
}

impl Layout {
    pub fn new(project_root: &Path, config: &PipelineConfig) -> Self {
        let asset_root = project_root.join(&config.public_dir);
        Self {
            project_root: project_root.to_path_buf(),
            output_root: asset_root.join(&config.output_dir),
            manifest_path: asset_root.join(&config.manifest_file),
            info_output: asset_root.join(&config.content.info_output),
            asset_root,
        }
    }
}

/// What a full run produced.
#[derive(Debug)]
pub struct BuildReport {
    pub layout: Layout,
    pub manifest: ImageManifest,
    pub resize: ResizeResult,
    pub info: InfoOutput,
}

/// Run every stage against `project_root`.
///
/// `events` receives resize progress; it is dropped once the resize stage
/// finishes, which ends any receiving loop.
pub fn run(
    project_root: &Path,
    config: &PipelineConfig,
    backend: &impl ImageBackend,
    events: Option<Sender<ResizeEvent>>,
) -> Result<BuildReport, PipelineError> {
    let layout = Layout::new(project_root, config);

    let scanned = scan::scan(&layout.asset_root, config)?;
    tracing::debug!(images = scanned.images.len(), "scan complete");

    let resize = resize::resize(backend, &scanned.images, &layout.output_root, config, events)?;
    if resize.stats.failed > 0 {
        tracing::warn!(failed = resize.stats.failed, "some variants could not be created");
    }

    let manifest = scanned.manifest();
    manifest.write(&layout.manifest_path)?;

    let info = info::write_info(project_root, &config.content, &layout.info_output)?;

    Ok(BuildReport {
        layout,
        manifest,
        resize,
        info,
    })
}
