//! Responsive WebP variant generation.
//!
//! Stage 2 of the pipeline. Takes the images found by the scan and writes one
//! lossy WebP per (image, size profile) pair, mirroring the source directory
//! layout under the output root:
//!
//! ```text
//! public/resized/
//! ├── small/
//! │   ├── photo.png.webp        # ≤ 480px wide
//! │   └── sub/shot.jpg.webp
//! └── large/
//!     ├── photo.png.webp        # ≤ 1920px wide
//!     └── sub/shot.jpg.webp
//! ```
//!
//! ## Skipping
//!
//! An artifact that already exists is never regenerated. Existence is the only
//! check: editing a source image does not refresh its variants until the
//! stale files are deleted.
//!
//! ## Failures
//!
//! A resize that fails (undecodable source, encode or write error) is logged,
//! reported as [`ArtifactStatus::Failed`], and leaves the artifact absent so
//! the next run retries it. Only failing to create output directories aborts
//! the stage.
//!
//! ## Parallel Processing
//!
//! All pending resizes are planned up front and fanned out over the rayon
//! pool. The stage returns once every one of them has settled.

use crate::config::PipelineConfig;
use crate::imaging::{ImageBackend, Quality, create_variant};
use crate::types::{SizeProfile, SourceImage};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One (image, profile) output, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedArtifact {
    pub profile: SizeProfile,
    pub source: SourceImage,
    pub output: PathBuf,
    /// The output file was already present when the plan was made.
    pub exists: bool,
}

/// Outcome of one planned artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Left untouched because the file already existed.
    Existing,
    /// Encoded during this run at the given dimensions.
    Created { width: u32, height: u32 },
    /// Resize failed; the artifact is absent.
    Failed(String),
}

/// A settled artifact, as reported to callers and the progress printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub profile: String,
    /// Manifest path of the source image, e.g. `/sub/shot.jpg`.
    pub source: String,
    pub output: PathBuf,
    pub status: ArtifactStatus,
}

/// Progress events streamed while the stage runs.
#[derive(Debug, Clone)]
pub enum ResizeEvent {
    /// Emitted once, before any encoding starts.
    Started { pending: usize, existing: usize },
    /// Emitted for every artifact as it settles (existing ones first).
    Settled(Artifact),
}

/// Summary of what the stage did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResizeStats {
    pub created: u32,
    pub existing: u32,
    pub failed: u32,
}

impl ResizeStats {
    fn record(&mut self, status: &ArtifactStatus) {
        match status {
            ArtifactStatus::Existing => self.existing += 1,
            ArtifactStatus::Created { .. } => self.created += 1,
            ArtifactStatus::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.created + self.existing + self.failed
    }
}

impl fmt::Display for ResizeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed > 0 {
            write!(
                f,
                "{} existing, {} created, {} failed ({} total)",
                self.existing,
                self.created,
                self.failed,
                self.total()
            )
        } else if self.existing > 0 {
            write!(
                f,
                "{} existing, {} created ({} total)",
                self.existing,
                self.created,
                self.total()
            )
        } else {
            write!(f, "{} created", self.created)
        }
    }
}

/// Result of the resize stage: artifacts in plan order plus totals.
#[derive(Debug, Default)]
pub struct ResizeResult {
    pub artifacts: Vec<Artifact>,
    pub stats: ResizeStats,
}

/// `<output_root>/<profile>/<relative_dir>/<filename>.webp`
pub fn artifact_path(output_root: &Path, profile: &SizeProfile, image: &SourceImage) -> PathBuf {
    output_root
        .join(&profile.name)
        .join(&image.relative_dir)
        .join(format!("{}.webp", image.filename))
}

/// Plan every (image, profile) artifact, image-major, without writing anything.
pub fn plan(
    images: &[SourceImage],
    output_root: &Path,
    profiles: &[SizeProfile],
) -> Vec<PlannedArtifact> {
    images
        .iter()
        .flat_map(|image| {
            profiles.iter().map(move |profile| {
                let output = artifact_path(output_root, profile, image);
                let exists = output.exists();
                PlannedArtifact {
                    profile: profile.clone(),
                    source: image.clone(),
                    output,
                    exists,
                }
            })
        })
        .collect()
}

/// Create the output root and every artifact's parent directory.
pub fn ensure_output_dirs(
    output_root: &Path,
    planned: &[PlannedArtifact],
) -> Result<(), ResizeError> {
    create_dir(output_root)?;
    for artifact in planned {
        if let Some(parent) = artifact.output.parent() {
            create_dir(parent)?;
        }
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), ResizeError> {
    std::fs::create_dir_all(path).map_err(|source| ResizeError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the resize stage for the scanned images.
///
/// Plans, creates directories, then encodes every missing artifact in
/// parallel. Individual resize failures are reported, not returned.
pub fn resize(
    backend: &impl ImageBackend,
    images: &[SourceImage],
    output_root: &Path,
    config: &PipelineConfig,
    events: Option<Sender<ResizeEvent>>,
) -> Result<ResizeResult, ResizeError> {
    let planned = plan(images, output_root, &config.images.sizes);
    ensure_output_dirs(output_root, &planned)?;
    Ok(execute(
        backend,
        &planned,
        Quality::new(config.images.quality),
        events,
    ))
}

/// Settle every planned artifact: existing ones are passed through, missing
/// ones are encoded on the rayon pool.
pub fn execute(
    backend: &impl ImageBackend,
    planned: &[PlannedArtifact],
    quality: Quality,
    events: Option<Sender<ResizeEvent>>,
) -> ResizeResult {
    let existing = planned.iter().filter(|p| p.exists).count();
    emit(
        &events,
        ResizeEvent::Started {
            pending: planned.len() - existing,
            existing,
        },
    );

    let artifacts: Vec<Artifact> = planned
        .par_iter()
        .map(|p| {
            let status = if p.exists {
                tracing::debug!(
                    size = %p.profile.name,
                    file = %p.source.filename,
                    "variant exists, skipping"
                );
                ArtifactStatus::Existing
            } else {
                resize_one(backend, p, quality)
            };
            let artifact = Artifact {
                profile: p.profile.name.clone(),
                source: p.source.site_path.clone(),
                output: p.output.clone(),
                status,
            };
            emit(&events, ResizeEvent::Settled(artifact.clone()));
            artifact
        })
        .collect();

    let mut stats = ResizeStats::default();
    for artifact in &artifacts {
        stats.record(&artifact.status);
    }

    ResizeResult { artifacts, stats }
}

fn resize_one(
    backend: &impl ImageBackend,
    p: &PlannedArtifact,
    quality: Quality,
) -> ArtifactStatus {
    match create_variant(backend, &p.source.path, &p.output, p.profile.width, quality) {
        Ok(variant) => ArtifactStatus::Created {
            width: variant.width,
            height: variant.height,
        },
        Err(e) => {
            tracing::error!(
                size = %p.profile.name,
                file = %p.source.filename,
                error = %e,
                "failed to create resized image"
            );
            ArtifactStatus::Failed(e.to_string())
        }
    }
}

/// A closed receiver only means nobody is listening; the work continues.
fn emit(events: &Option<Sender<ResizeEvent>>, event: ResizeEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}
