//! Where a target's generated state lives.

use std::path::{Path, PathBuf};

use crate::builder::assets::MANIFEST_NAME;
use crate::builder::descriptor::DESCRIPTOR_NAME;
use crate::builder::discovery::ASSETS_DIR;
use crate::builder::recipe::RECIPE_NAME;
use crate::builder::staleness::MARKER_NAME;
use crate::core::project::Project;

/// Directory holding every build tree of a project.
pub const BUILD_ROOT: &str = ".Build";

/// Paths derived from a project, a canonical target name and a configuration.
///
/// The build directory is `<ProjectDir>/.Build/<Configuration>/<TargetName>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    pub target_dir: PathBuf,
    pub build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(project: &Project, target_name: &str, configuration: &str) -> Self {
        let mut build_dir = project.root().join(BUILD_ROOT).join(configuration);
        for segment in target_name.split('/').filter(|s| !s.is_empty()) {
            build_dir.push(segment);
        }

        BuildLayout {
            target_dir: project.target_dir(target_name),
            build_dir,
        }
    }

    pub fn marker(&self) -> PathBuf {
        self.build_dir.join(MARKER_NAME)
    }

    pub fn descriptor(&self) -> PathBuf {
        self.build_dir.join(DESCRIPTOR_NAME)
    }

    pub fn recipe(&self) -> PathBuf {
        self.build_dir.join(RECIPE_NAME)
    }

    pub fn assets_source(&self) -> PathBuf {
        self.target_dir.join(ASSETS_DIR)
    }

    pub fn assets_destination(&self) -> PathBuf {
        self.build_dir.join(ASSETS_DIR)
    }

    pub fn manifest(&self) -> PathBuf {
        self.build_dir.join(MANIFEST_NAME)
    }

    /// A file inside the build directory.
    pub fn artifact(&self, name: &str) -> PathBuf {
        self.build_dir.join(name)
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}
