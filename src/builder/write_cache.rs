//! Content-addressed artifact writes.
//!
//! A generated file is only rewritten when its SHA-256 differs from what is
//! already on disk, so regenerating with unchanged inputs leaves modification
//! times alone and downstream builds are not invalidated.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::util::fs::ensure_dir;
use crate::util::hash::{sha256_file, sha256_str};

/// What happened to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Existing content already matched
    Unchanged,
    /// File was created or replaced
    Written,
}

/// Write `contents` to `path` unless the file already holds the same bytes.
///
/// An existing file that cannot be read counts as different. Replacement goes
/// through a temporary file in the same directory followed by a rename.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<WriteOutcome> {
    let new_hash = sha256_str(contents);

    let old_hash = if path.is_file() {
        match sha256_file(path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!("{:#}; rewriting", e);
                None
            }
        }
    } else {
        None
    };

    tracing::debug!(
        "{}: {} -> {}",
        path.display(),
        old_hash.as_deref().unwrap_or("none"),
        new_hash
    );

    if old_hash.as_deref() == Some(new_hash.as_str()) {
        return Ok(WriteOutcome::Unchanged);
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".keel-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode as a plain create: 0666 minus the umask.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(parent)
        .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temporary file for {}", path.display()))?;

    // A readable file being replaced keeps its permissions.
    if old_hash.is_some() {
        let permissions = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?
            .permissions();
        tmp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("failed to set permissions for {}", path.display()))?;
    }
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    tracing::info!("Wrote {}", path.display());
    Ok(WriteOutcome::Written)
}
