//! Test utilities and fakes for keel unit tests.
//!
//! The pipeline talks to Conan and CMake through the [`PackageManager`] and
//! [`NativeBuild`] traits. [`RecordingTools`] implements both, records every
//! call in order, and leaves behind the files the real tools would produce
//! so the rest of the pipeline has something to read.

pub mod fixtures;

use std::cell::RefCell;
use std::path::Path;

use anyhow::Result;

use crate::builder::cmake::NativeBuild;
use crate::builder::conan::PackageManager;
use crate::core::errors::KeelError;

pub use fixtures::*;

/// Fake package manager and native build tool.
#[derive(Debug, Default)]
pub struct RecordingTools {
    calls: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl RecordingTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any call whose name is `step` (e.g. `"install"`).
    pub fn failing_on(step: &'static str) -> Self {
        RecordingTools {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(step),
        }
    }

    /// Calls recorded so far, as `"<step> <args>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Names of the recorded steps only.
    pub fn steps(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, step: &str, detail: String) -> Result<()> {
        self.calls.borrow_mut().push(format!("{} {}", step, detail));
        if self.fail_on == Some(step) {
            return Err(KeelError::ExternalToolFailure {
                command: format!("fake {}", step),
                code: Some(1),
            }
            .into());
        }
        Ok(())
    }
}

impl PackageManager for RecordingTools {
    fn install(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()> {
        self.record(
            "install",
            format!("{} {}", configuration, generator.unwrap_or("-")),
        )?;
        // CMakeDeps output for one dependency.
        std::fs::write(
            build_dir.join("ZLIBTargets.cmake"),
            "message(${ZLIB_MESSAGE_MODE} \"Conan: Target declared 'ZLIB::ZLIB'\")\n",
        )?;
        Ok(())
    }

    fn export_package(
        &self,
        _build_dir: &Path,
        configuration: &str,
        name: &str,
        version: &str,
    ) -> Result<()> {
        self.record("export", format!("{} {}/{}", configuration, name, version))
    }

    fn upload(&self, _build_dir: &Path, reference: &str, remote: &str) -> Result<()> {
        self.record("upload", format!("{} {}", reference, remote))
    }
}

impl NativeBuild for RecordingTools {
    fn configure(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()> {
        self.record(
            "configure",
            format!("{} {}", configuration, generator.unwrap_or("-")),
        )?;
        std::fs::write(build_dir.join("CMakeCache.txt"), "")?;
        Ok(())
    }

    fn build(&self, _build_dir: &Path, configuration: &str) -> Result<()> {
        self.record("build", configuration.to_string())
    }
}
