//! Regeneration staleness.
//!
//! A marker file is touched after every successful regeneration. The
//! expensive path (recipe, package install, descriptor, configure) only
//! reruns when a descriptor that feeds it is newer than the marker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{ensure_dir, modified};

/// File name of the regeneration marker inside a build directory.
pub const MARKER_NAME: &str = ".keel-generated";

/// Descriptor paths compared against the marker.
#[derive(Debug, Clone)]
pub struct StalenessInputs {
    pub project: PathBuf,
    pub target: Option<PathBuf>,
    pub user_override: Option<PathBuf>,
    pub marker: PathBuf,
}

/// Whether the regenerate path must run.
pub fn is_outdated(inputs: &StalenessInputs) -> Result<bool> {
    let Some(marker) = modified(&inputs.marker)? else {
        tracing::debug!("no marker at {}", inputs.marker.display());
        return Ok(true);
    };

    let candidates = [
        Some(&inputs.project),
        inputs.target.as_ref(),
        inputs.user_override.as_ref(),
    ];

    for path in candidates.into_iter().flatten() {
        if let Some(mtime) = modified(path)? {
            if marker < mtime {
                tracing::debug!("{} is newer than the marker", path.display());
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Record a successful regeneration.
pub fn touch_marker(marker: &Path) -> Result<()> {
    if let Some(parent) = marker.parent() {
        ensure_dir(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(marker)
        .with_context(|| format!("failed to write marker: {}", marker.display()))?;
    file.set_modified(std::time::SystemTime::now())
        .with_context(|| format!("failed to touch marker: {}", marker.display()))?;
    Ok(())
}
