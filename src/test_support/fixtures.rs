//! Test fixtures for common test scenarios.
//!
//! A [`ProjectFixture`] lays out a project directory on disk: the
//! `<Dir>/<Dir>.project` descriptor plus any per-target files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A project tree written into a temporary directory.
#[derive(Debug)]
pub struct ProjectFixture {
    // Held so the directory lives as long as the fixture.
    _tmp: TempDir,
    root: PathBuf,
}

impl ProjectFixture {
    /// Create `<tmp>/<name>/<name>.project` with the given YAML.
    pub fn new(name: &str, project_yaml: &str) -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = tmp.path().join(name);
        fs::create_dir_all(&root).expect("failed to create project dir");
        fs::write(root.join(format!("{}.project", name)), project_yaml)
            .expect("failed to write project descriptor");

        ProjectFixture { _tmp: tmp, root }
    }

    /// A project with one static library `Core` that has a source, a
    /// public header and a public dependency on zlib.
    pub fn static_library() -> Self {
        let fixture = Self::new(
            "Game",
            r#"Version: 2.1.0
Targets:
  - Name: Core
    Type: StaticLibrary
    PublicDependencies:
      - zlib/1.2.11
"#,
        );
        fixture.write("Core/Include/Core/Api.hpp", "#pragma once\n");
        fixture.write("Core/Source/Api.cpp", "#include <Core.pch.hpp>\n");
        fixture
    }

    /// Project directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the project descriptor.
    pub fn project_file(&self) -> PathBuf {
        let name = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.root.join(format!("{}.project", name))
    }

    /// Write a file relative to the project directory, creating parents.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
        path
    }

    /// Remove a file relative to the project directory.
    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.root.join(relative)).expect("failed to remove fixture file");
    }
}
