//! CLI output formatting for all pipeline stages.
//!
//! Each stage has a `format_*` function that returns `Vec<String>` for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes to
//! stdout. Format functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Images (2)
//! 001 /photo.png
//! 002 /sub/shot.jpg
//! ```
//!
//! ## Resize
//!
//! ```text
//! Resizing 3 variants (1 existing)
//!     small /sub/shot.jpg: existing
//!     small /photo.png: created 480x240
//!     large /broken.jpg: FAILED Processing failed: ...
//! ```
//!
//! ## Check
//!
//! ```text
//! Variants
//!     small /photo.png → small/photo.png.webp (pending)
//!     small /sub/shot.jpg → small/sub/shot.jpg.webp (exists)
//! ```

use crate::resize::{Artifact, ArtifactStatus, PlannedArtifact, ResizeEvent};
use crate::scan::ImageManifest;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `root` with forward slashes, or the full path if outside it.
fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

pub fn format_scan_output(manifest: &ImageManifest) -> Vec<String> {
    let mut lines = vec![format!("Images ({})", manifest.len())];
    for (i, path) in manifest.paths().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), path));
    }
    lines
}

pub fn print_scan_output(manifest: &ImageManifest) {
    for line in format_scan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Resize output
// ============================================================================

fn status_text(status: &ArtifactStatus) -> String {
    match status {
        ArtifactStatus::Existing => "existing".to_string(),
        ArtifactStatus::Created { width, height } => format!("created {}x{}", width, height),
        ArtifactStatus::Failed(error) => format!("FAILED {}", error),
    }
}

fn artifact_line(artifact: &Artifact) -> String {
    format!(
        "{}{} {}: {}",
        indent(1),
        artifact.profile,
        artifact.source,
        status_text(&artifact.status)
    )
}

/// Format a single resize progress event as display lines.
pub fn format_resize_event(event: &ResizeEvent) -> Vec<String> {
    match event {
        ResizeEvent::Started { pending, existing } => {
            vec![format!("Resizing {} variants ({} existing)", pending, existing)]
        }
        ResizeEvent::Settled(artifact) => vec![artifact_line(artifact)],
    }
}

// ============================================================================
// Check (dry run)
// ============================================================================

/// Format the artifact plan without touching the filesystem.
pub fn format_plan_output(planned: &[PlannedArtifact], output_root: &Path) -> Vec<String> {
    let mut lines = vec!["Variants".to_string()];
    for p in planned {
        let state = if p.exists { "exists" } else { "pending" };
        lines.push(format!(
            "{}{} {} \u{2192} {} ({})",
            indent(1),
            p.profile.name,
            p.source.site_path,
            display_relative(&p.output, output_root),
            state
        ));
    }
    let pending = planned.iter().filter(|p| !p.exists).count();
    lines.push(format!(
        "{} of {} variants would be created",
        pending,
        planned.len()
    ));
    lines
}

pub fn print_plan_output(planned: &[PlannedArtifact], output_root: &Path) {
    for line in format_plan_output(planned, output_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Written files
// ============================================================================

/// One line per generated JSON file, relative to the project root.
pub fn format_written(label: &str, path: &Path, project_root: &Path) -> String {
    format!("{} \u{2192} {}", label, display_relative(path, project_root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SizeProfile, SourceImage};
    use std::path::PathBuf;

    fn artifact(profile: &str, source: &str, status: ArtifactStatus) -> Artifact {
        Artifact {
            profile: profile.to_string(),
            source: source.to_string(),
            output: PathBuf::from("/unused"),
            status,
        }
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn scan_output_lists_manifest_in_order() {
        let manifest = ImageManifest(vec!["/photo.png".into(), "/sub/shot.jpg".into()]);
        assert_eq!(
            format_scan_output(&manifest),
            vec!["Images (2)", "001 /photo.png", "002 /sub/shot.jpg"]
        );
    }

    #[test]
    fn scan_output_empty() {
        assert_eq!(format_scan_output(&ImageManifest::default()), vec!["Images (0)"]);
    }

    #[test]
    fn resize_started_line() {
        let lines = format_resize_event(&ResizeEvent::Started {
            pending: 3,
            existing: 1,
        });
        assert_eq!(lines, vec!["Resizing 3 variants (1 existing)"]);
    }

    #[test]
    fn resize_settled_lines() {
        let created = ResizeEvent::Settled(artifact(
            "small",
            "/photo.png",
            ArtifactStatus::Created {
                width: 480,
                height: 240,
            },
        ));
        assert_eq!(
            format_resize_event(&created),
            vec!["    small /photo.png: created 480x240"]
        );

        let existing = ResizeEvent::Settled(artifact(
            "small",
            "/sub/shot.jpg",
            ArtifactStatus::Existing,
        ));
        assert_eq!(
            format_resize_event(&existing),
            vec!["    small /sub/shot.jpg: existing"]
        );

        let failed = ResizeEvent::Settled(artifact(
            "large",
            "/broken.jpg",
            ArtifactStatus::Failed("bad data".into()),
        ));
        assert_eq!(
            format_resize_event(&failed),
            vec!["    large /broken.jpg: FAILED bad data"]
        );
    }

    #[test]
    fn plan_output_shows_state_and_relative_output() {
        let root = Path::new("/site/public/resized");
        let planned = vec![
            PlannedArtifact {
                profile: SizeProfile::new("small", 480),
                source: SourceImage {
                    path: PathBuf::from("/site/public/sub/shot.jpg"),
                    relative_dir: PathBuf::from("sub"),
                    filename: "shot.jpg".into(),
                    site_path: "/sub/shot.jpg".into(),
                },
                output: root.join("small/sub/shot.jpg.webp"),
                exists: true,
            },
            PlannedArtifact {
                profile: SizeProfile::new("large", 1920),
                source: SourceImage {
                    path: PathBuf::from("/site/public/sub/shot.jpg"),
                    relative_dir: PathBuf::from("sub"),
                    filename: "shot.jpg".into(),
                    site_path: "/sub/shot.jpg".into(),
                },
                output: root.join("large/sub/shot.jpg.webp"),
                exists: false,
            },
        ];

        assert_eq!(
            format_plan_output(&planned, root),
            vec![
                "Variants",
                "    small /sub/shot.jpg \u{2192} small/sub/shot.jpg.webp (exists)",
                "    large /sub/shot.jpg \u{2192} large/sub/shot.jpg.webp (pending)",
                "1 of 2 variants would be created",
            ]
        );
    }

    #[test]
    fn written_line_is_project_relative() {
        assert_eq!(
            format_written(
                "Manifest",
                Path::new("/site/public/images.json"),
                Path::new("/site")
            ),
            "Manifest \u{2192} public/images.json"
        );
    }
}
