//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.keel/config.toml` - User-wide defaults
//! - Project: `<project>/.keel/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, field by field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::dependency::Linkage;

/// Configuration used when neither CLI nor config name one.
pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Keel configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// External tool locations
    pub tools: ToolsConfig,

    /// Packaging settings
    pub package: PackageConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build configuration (e.g., Release, Debug)
    pub configuration: Option<String>,

    /// CMake generator (e.g., Ninja)
    pub generator: Option<String>,

    /// Forced dependency linkage ("static" or "shared")
    pub linkage: Option<String>,
}

/// `[tools]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to the conan executable
    pub conan: Option<PathBuf>,

    /// Path to the cmake executable
    pub cmake: Option<PathBuf>,
}

/// `[package]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Remote that `Package --Deploy` uploads to
    pub remote: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, falling back to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.configuration.is_some() {
            self.build.configuration = other.build.configuration;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.linkage.is_some() {
            self.build.linkage = other.build.linkage;
        }
        if other.tools.conan.is_some() {
            self.tools.conan = other.tools.conan;
        }
        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }
        if other.package.remote.is_some() {
            self.package.remote = other.package.remote;
        }
    }

    /// Configured build configuration, or [`DEFAULT_CONFIGURATION`].
    pub fn configuration(&self) -> &str {
        self.build
            .configuration
            .as_deref()
            .unwrap_or(DEFAULT_CONFIGURATION)
    }

    /// Parsed `[build] linkage`.
    pub fn linkage(&self) -> Result<Option<Linkage>> {
        self.build
            .linkage
            .as_deref()
            .map(|s| s.parse::<Linkage>().map_err(anyhow::Error::msg))
            .transpose()
    }
}

/// `~/.keel`, if a home directory can be determined.
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".keel"))
}

/// `<project_root>/.keel/config.toml`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".keel").join("config.toml")
}

/// Load global then project configuration.
pub fn load_config(project_root: &Path) -> Config {
    let mut config = match global_config_dir() {
        Some(dir) => Config::load_or_default(&dir.join("config.toml")),
        None => Config::default(),
    };
    config.merge(Config::load_or_default(&project_config_path(project_root)));
    config
}
