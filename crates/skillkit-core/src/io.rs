use crate::error::{Result, SkillkitError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// A generated text file, addressed relative to an output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Artifact paths must be relative and free of `..`, so every write stays
/// under the output directory.
fn checked_relative(path: &str) -> Result<&Path> {
    let rel = Path::new(path);
    let normal = rel.components().all(|c| matches!(c, Component::Normal(_)));
    if path.is_empty() || !normal {
        return Err(SkillkitError::UnsafePath(path.to_string()));
    }
    Ok(rel)
}

/// Write every artifact under `dir`, returning the paths written. Nothing is
/// written if any artifact path is unsafe.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    let rels = artifacts
        .iter()
        .map(|a| checked_relative(&a.path))
        .collect::<Result<Vec<_>>>()?;
    let mut written = Vec::with_capacity(artifacts.len());
    for (artifact, rel) in artifacts.iter().zip(rels) {
        let path = dir.join(rel);
        atomic_write(&path, artifact.content.as_bytes())?;
        tracing::debug!(path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}
