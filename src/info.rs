//! Site metadata conversion: `info.yml` → `info.json`.
//!
//! The content root is chosen by existence: the primary directory when it
//! exists, otherwise the fallback (typically `content.example/`, shipped so a
//! fresh checkout builds before any real content is added).
//!
//! The YAML document is re-emitted as JSON without validation or
//! transformation. Mapping key order is preserved. Every failure here is
//! fatal: the site cannot render without its metadata.

use crate::config::ContentConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfoError {
    #[error("Neither content directory exists: {primary} or {fallback}")]
    ContentRootMissing { primary: PathBuf, fallback: PathBuf },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yml::Error,
    },
    #[error("Cannot represent {path} as JSON: {source}")]
    Convert {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pick the content root: `primary` if it exists, else `fallback`.
pub fn resolve_content_root(
    project_root: &Path,
    content: &ContentConfig,
) -> Result<PathBuf, InfoError> {
    let primary = project_root.join(&content.primary);
    if primary.exists() {
        return Ok(primary);
    }

    let fallback = project_root.join(&content.fallback);
    if fallback.exists() {
        tracing::info!(
            primary = %primary.display(),
            fallback = %fallback.display(),
            "content directory missing, using fallback"
        );
        return Ok(fallback);
    }

    Err(InfoError::ContentRootMissing { primary, fallback })
}

/// Parse YAML text into a JSON value.
///
/// Non-string mapping keys (numbers, booleans) become JSON strings.
pub fn yaml_to_json(yaml: &str, path: &Path) -> Result<serde_json::Value, InfoError> {
    let parsed: serde_yml::Value = serde_yml::from_str(yaml).map_err(|source| InfoError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_value(&parsed).map_err(|source| InfoError::Convert {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse `info_path` without writing anything.
pub fn read_info(info_path: &Path) -> Result<serde_json::Value, InfoError> {
    let yaml = std::fs::read_to_string(info_path).map_err(|source| InfoError::Read {
        path: info_path.to_path_buf(),
        source,
    })?;
    yaml_to_json(&yaml, info_path)
}

/// Read `info_path`, convert it, and overwrite `output_path` with pretty JSON.
pub fn convert_info(info_path: &Path, output_path: &Path) -> Result<serde_json::Value, InfoError> {
    let value = read_info(info_path)?;

    let json = serde_json::to_string_pretty(&value).map_err(|source| InfoError::Convert {
        path: info_path.to_path_buf(),
        source,
    })?;
    std::fs::write(output_path, json).map_err(|source| InfoError::Write {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(value)
}

/// Result of the metadata step.
#[derive(Debug, Clone)]
pub struct InfoOutput {
    /// The `info.yml` that was read.
    pub source: PathBuf,
    /// The `info.json` that was written.
    pub output: PathBuf,
    pub value: serde_json::Value,
}

/// Resolve the content root and convert its metadata file into `output_path`.
pub fn write_info(
    project_root: &Path,
    content: &ContentConfig,
    output_path: &Path,
) -> Result<InfoOutput, InfoError> {
    let root = resolve_content_root(project_root, content)?;
    let source = root.join(&content.info_file);
    let value = convert_info(&source, output_path)?;
    Ok(InfoOutput {
        source,
        output: output_path.to_path_buf(),
        value,
    })
}
