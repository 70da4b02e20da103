//! Project and target descriptor loading.
//!
//! A project lives in a directory `Foo/` with its descriptor at
//! `Foo/Foo.project`. Targets are declared inline in the project, and may
//! also have a standalone descriptor at `Foo/<Target>/<Target>.target`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::core::errors::KeelError;
use crate::core::target::{RawTarget, DEFAULT_VERSION};
use crate::util::fs::read_to_string;

/// Extension of the project descriptor.
pub const PROJECT_EXTENSION: &str = "project";

/// Extension of a standalone target descriptor.
pub const TARGET_EXTENSION: &str = "target";

/// Extension appended to a target descriptor for local user overrides.
pub const OVERRIDE_EXTENSION: &str = "target.user";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawProject {
    #[serde(default)]
    version: Option<String>,

    #[serde(default)]
    targets: Vec<RawTarget>,
}

/// A loaded project descriptor.
#[derive(Debug, Clone)]
pub struct Project {
    /// Path of the `.project` file
    path: PathBuf,

    /// Directory containing the project file
    root: PathBuf,

    /// Project version, defaulted
    version: String,

    /// Declared target stubs in document order
    targets: Vec<RawTarget>,
}

impl Project {
    /// Load a project from either its directory or its `.project` file.
    pub fn load(location: &Path) -> Result<Self> {
        let path = project_path(location);
        let contents = read_to_string(&path)?;

        let raw: RawProject = if contents.trim().is_empty() {
            RawProject::default()
        } else {
            serde_yaml::from_str(&contents).map_err(|e| KeelError::malformed(&path, &e))?
        };

        for (index, stub) in raw.targets.iter().enumerate() {
            if stub.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                return Err(KeelError::MalformedDescriptor {
                    path: path.clone(),
                    message: format!("Targets[{}] has no Name", index),
                }
                .into());
            }
        }

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let version = raw
            .version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        tracing::debug!(
            "loaded project {} (version {}, {} targets)",
            path.display(),
            version,
            raw.targets.len()
        );

        Ok(Project {
            path,
            root,
            version,
            targets: raw.targets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Declared target stubs in document order.
    pub fn targets(&self) -> &[RawTarget] {
        &self.targets
    }

    /// Declared target names in document order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().filter_map(|t| t.name.as_deref())
    }

    /// Directory holding a target's sources.
    pub fn target_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// `<root>/<name>/<name>.target`; a nested name nests twice.
    pub fn target_descriptor_path(&self, name: &str) -> PathBuf {
        self.root
            .join(name)
            .join(format!("{}.{}", name, TARGET_EXTENSION))
    }

    /// User override sitting next to the target descriptor.
    pub fn override_path(&self, name: &str) -> PathBuf {
        self.root
            .join(name)
            .join(format!("{}.{}", name, OVERRIDE_EXTENSION))
    }
}

/// Resolve a project location to its descriptor path.
///
/// A directory `Foo` maps to `Foo/Foo.project`; anything else is taken as
/// the descriptor itself.
pub fn project_path(location: &Path) -> PathBuf {
    if location.is_dir() {
        let name = location
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "project".to_string());
        location.join(format!("{}.{}", name, PROJECT_EXTENSION))
    } else {
        location.to_path_buf()
    }
}

/// Load a raw target document.
pub fn load_raw_target(path: &Path) -> Result<RawTarget> {
    let contents = read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(RawTarget::default());
    }
    let raw = serde_yaml::from_str(&contents).map_err(|e| KeelError::malformed(path, &e))?;
    Ok(raw)
}

/// Load a user override if one exists.
pub fn load_override(path: &Path) -> Result<Option<RawTarget>> {
    if path.is_file() {
        tracing::debug!("applying user override {}", path.display());
        load_raw_target(path).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_project(dir: &Path, contents: &str) -> PathBuf {
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        let path = dir.join(format!("{}.project", name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Game");
        fs::create_dir_all(&root).unwrap();
        write_project(
            &root,
            "Version: 2.1.0\nTargets:\n  - Name: Engine/Core\n    Type: Library\n  - Name: App\n",
        );

        let project = Project::load(&root).unwrap();
        assert_eq!(project.version(), "2.1.0");
        assert_eq!(
            project.target_names().collect::<Vec<_>>(),
            vec!["Engine/Core", "App"]
        );
        assert_eq!(
            project.target_descriptor_path("Engine/Core"),
            project.root().join("Engine/Core/Engine/Core.target")
        );
    }

    #[test]
    fn test_version_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write_project(tmp.path(), "Targets: []\n");

        let project = Project::load(&path).unwrap();
        assert_eq!(project.version(), DEFAULT_VERSION);
    }

    #[test]
    fn test_malformed_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = write_project(tmp.path(), "Targets: {not: [a list\n");

        let err = Project::load(&path).unwrap_err();
        match err.downcast_ref::<KeelError>() {
            Some(KeelError::MalformedDescriptor { path: p, .. }) => assert_eq!(p, &path),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_stub_without_name_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = write_project(tmp.path(), "Targets:\n  - Type: Library\n");

        let err = Project::load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<KeelError>(),
            Some(KeelError::MalformedDescriptor { .. })
        ));
    }

    #[test]
    fn test_missing_override_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_override(&tmp.path().join("x.target.user"))
            .unwrap()
            .is_none());
    }
}
