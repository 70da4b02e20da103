//! Asset mirroring.
//!
//! Files under a target's asset directory are copied into the build output
//! when missing or older than the source. The destinations written by the
//! previous run are kept in a manifest so files whose source disappeared can
//! be removed.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{ensure_dir, modified, read_to_string, walk_files, write_string};

/// File name of the asset manifest inside a build directory.
pub const MANIFEST_NAME: &str = "assets.manifest";

/// Counts from one synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: usize,
    pub unchanged: usize,
    pub pruned: usize,
}

/// Destination paths written by the most recent sync, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<PathBuf>,
}

impl AssetManifest {
    /// Load a manifest; a missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(AssetManifest::default());
        }
        let entries = read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect();
        Ok(AssetManifest { entries })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&entry.to_string_lossy());
            contents.push('\n');
        }
        write_string(path, &contents)
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }
}

/// Mirror `source` into `destination`, tracking outputs in `manifest_path`.
pub fn sync_assets(source: &Path, destination: &Path, manifest_path: &Path) -> Result<SyncReport> {
    let previous = AssetManifest::load(manifest_path)?;
    let destination = absolute(destination)?;
    let mut report = SyncReport::default();
    let mut current = AssetManifest::default();

    for src in walk_files(source)? {
        let rel = src.strip_prefix(source).with_context(|| {
            format!("{} is not under {}", src.display(), source.display())
        })?;
        let dst = destination.join(rel);

        let needs_copy = match modified(&dst)? {
            None => true,
            Some(dst_mtime) => modified(&src)?.is_some_and(|src_mtime| src_mtime > dst_mtime),
        };

        if needs_copy {
            if let Some(parent) = dst.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(&src, &dst).with_context(|| {
                format!("failed to copy {} to {}", src.display(), dst.display())
            })?;
            tracing::debug!("copied {}", dst.display());
            report.copied += 1;
        } else {
            report.unchanged += 1;
        }

        current.entries.push(dst);
    }

    let keep: BTreeSet<&PathBuf> = current.entries.iter().collect();
    for stale in previous.entries() {
        if keep.contains(stale) {
            continue;
        }
        if stale.is_file() {
            fs::remove_file(stale)
                .with_context(|| format!("failed to remove {}", stale.display()))?;
            tracing::debug!("removed {}", stale.display());
            report.pruned += 1;
        }
    }

    current.save(manifest_path)?;

    if report.copied > 0 || report.pruned > 0 {
        tracing::info!(
            "Assets: {} copied, {} removed, {} up to date",
            report.copied,
            report.pruned,
            report.unchanged
        );
    }

    Ok(report)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Ok(cwd.join(path))
    }
}
