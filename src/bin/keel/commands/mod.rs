//! Command implementations

pub mod build;
pub mod generate;
pub mod package;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::TargetArgs;
use keel::builder::{CMake, Conan};
use keel::ops::GenerateOptions;
use keel::util::config::{load_config, Config};

/// Directory the project descriptor lives in.
fn project_root(location: &Path) -> PathBuf {
    if location.is_dir() {
        location.to_path_buf()
    } else {
        location
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Merge CLI flags over the layered config (CLI wins).
pub fn resolve_options(args: TargetArgs) -> Result<(GenerateOptions, Config)> {
    let config = load_config(&project_root(&args.project));

    let configuration = args
        .configuration
        .unwrap_or_else(|| config.configuration().to_string());
    let linkage = match args.linkage {
        Some(linkage) => Some(linkage),
        None => config.linkage()?,
    };

    let opts = GenerateOptions {
        project: args.project,
        target: args.target,
        configuration,
        generator: args.generator.or_else(|| config.build.generator.clone()),
        linkage,
        force: args.force,
    };
    Ok((opts, config))
}

/// External tools, honouring `[tools]` overrides.
pub fn tools(config: &Config) -> (Conan, CMake) {
    (
        Conan::new(config.tools.conan.as_deref()),
        CMake::new(config.tools.cmake.as_deref()),
    )
}
