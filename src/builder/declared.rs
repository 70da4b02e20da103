//! Packages declared by the package manager's CMake integration.
//!
//! After an install, every dependency leaves a `<Package>Targets.cmake` file
//! in the build directory. Each contains lines such as
//! `message(STATUS "Conan: Target declared 'ZLIB::ZLIB'")`, which name the
//! imported targets to link against.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::util::fs::read_to_string;

const TARGETS_SUFFIX: &str = "Targets.cmake";
const MODULE_PREFIX: &str = "module-";
const DECLARED_PATTERN: &str = r"Target declared '([^']+)'";

/// `find_package` names and link targets, in stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredPackages {
    pub find_packages: Vec<String>,
    pub link_targets: Vec<String>,
}

/// Scan `build_dir` for `*Targets.cmake` files.
pub fn scan_declared_packages(build_dir: &Path) -> Result<DeclaredPackages> {
    let marker = Regex::new(DECLARED_PATTERN).context("invalid declared-target pattern")?;

    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&build_dir.to_string_lossy()),
        TARGETS_SUFFIX
    );
    let mut files: Vec<_> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("glob error: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut declared = DeclaredPackages::default();
    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let package = file_name.strip_suffix(TARGETS_SUFFIX).unwrap_or(&file_name);

        if !package.is_empty() && !package.starts_with(MODULE_PREFIX) {
            declared.find_packages.push(package.to_string());
        }

        for line in read_to_string(path)?.lines() {
            if let Some(captures) = marker.captures(line) {
                let name = captures[1].to_string();
                if !declared.link_targets.contains(&name) {
                    declared.link_targets.push(name);
                }
            }
        }
    }

    tracing::debug!(
        "declared packages: [{}], link targets: [{}]",
        declared.find_packages.join(", "),
        declared.link_targets.join(", ")
    );

    Ok(declared)
}
