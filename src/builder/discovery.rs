//! Source tree discovery.
//!
//! A target directory is laid out as:
//!
//! ```text
//! <Target>/
//!   Include/   public headers, inline headers, module interfaces
//!   Source/    sources, private headers, private modules
//!   Assets/    files mirrored into the build output
//! ```
//!
//! All lists are sorted so generated text never depends on directory
//! enumeration order.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::walk_files;

/// Public header directory, relative to the target directory.
pub const INCLUDE_DIR: &str = "Include";

/// Private source directory, relative to the target directory.
pub const SOURCE_DIR: &str = "Source";

/// Asset directory, relative to the target directory.
pub const ASSETS_DIR: &str = "Assets";

const SOURCE_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c"];
const HEADER_EXTENSIONS: &[&str] = &["hpp", "h", "hh", "hxx"];
const INLINE_EXTENSIONS: &[&str] = &["inl"];
const MODULE_EXTENSIONS: &[&str] = &["ixx", "cppm"];

/// Files found under a target directory, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSets {
    /// Translation units from both Source and Include
    pub sources: Vec<PathBuf>,
    pub public_headers: Vec<PathBuf>,
    pub public_inline_headers: Vec<PathBuf>,
    pub private_headers: Vec<PathBuf>,
    pub private_inline_headers: Vec<PathBuf>,
    /// Module interface units under Include
    pub module_interfaces: Vec<PathBuf>,
    /// Module units under Source
    pub module_implementations: Vec<PathBuf>,
}

impl FileSets {
    /// Scan `target_dir`. Missing directories contribute nothing.
    pub fn discover(target_dir: &Path) -> Result<Self> {
        let include = walk_files(&target_dir.join(INCLUDE_DIR))?;
        let source = walk_files(&target_dir.join(SOURCE_DIR))?;

        let mut sets = FileSets {
            sources: filter(&source, SOURCE_EXTENSIONS),
            public_headers: filter(&include, HEADER_EXTENSIONS),
            public_inline_headers: filter(&include, INLINE_EXTENSIONS),
            private_headers: filter(&source, HEADER_EXTENSIONS),
            private_inline_headers: filter(&source, INLINE_EXTENSIONS),
            module_interfaces: filter(&include, MODULE_EXTENSIONS),
            module_implementations: filter(&source, MODULE_EXTENSIONS),
        };
        sets.sources.extend(filter(&include, SOURCE_EXTENSIONS));
        sets.sources.sort();

        tracing::debug!(
            "discovered {} sources, {} public headers, {} private headers, {} module units in {}",
            sets.sources.len(),
            sets.public_headers.len(),
            sets.private_headers.len(),
            sets.module_interfaces.len() + sets.module_implementations.len(),
            target_dir.display()
        );

        Ok(sets)
    }

    pub fn has_modules(&self) -> bool {
        !self.module_interfaces.is_empty() || !self.module_implementations.is_empty()
    }
}

fn filter(files: &[PathBuf], extensions: &[&str]) -> Vec<PathBuf> {
    files
        .iter()
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e))
        })
        .cloned()
        .collect()
}
