//! Native build adapter (CMake).

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::process::{find_tool, ProcessBuilder};

/// Toolchain file written by the package manager's CMake integration.
pub const TOOLCHAIN_FILE: &str = "conan_toolchain.cmake";

/// Configures and compiles a generated build descriptor.
pub trait NativeBuild {
    fn configure(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()>;

    fn build(&self, build_dir: &Path, configuration: &str) -> Result<()>;
}

/// The `cmake` command line.
///
/// The descriptor and the build tree share one directory, so both `-S` and
/// `-B` point at `.` with the build directory as working directory.
#[derive(Debug, Clone)]
pub struct CMake {
    program: PathBuf,
}

impl CMake {
    /// Use `configured` if given, else `cmake` from PATH.
    pub fn new(configured: Option<&Path>) -> Self {
        CMake {
            program: find_tool("cmake", configured),
        }
    }

    pub fn configure_command(
        &self,
        build_dir: &Path,
        configuration: &str,
        generator: Option<&str>,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .args(["-S", ".", "-B", "."])
            .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", TOOLCHAIN_FILE))
            .arg(format!("-DCMAKE_BUILD_TYPE={}", configuration));
        if let Some(generator) = generator {
            cmd = cmd.arg("-G").arg(generator);
        }
        cmd.cwd(build_dir)
    }

    pub fn build_command(&self, build_dir: &Path, configuration: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(["--build", "."])
            .arg("--config")
            .arg(configuration)
            .cwd(build_dir)
    }
}

impl NativeBuild for CMake {
    fn configure(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()> {
        tracing::info!("Configuring CMake project");
        self.configure_command(build_dir, configuration, generator)
            .run()
    }

    fn build(&self, build_dir: &Path, configuration: &str) -> Result<()> {
        tracing::info!("Building CMake project");
        self.build_command(build_dir, configuration).run()
    }
}

/// Check if a directory holds a configured CMake build tree.
pub fn is_configured(build_dir: &Path) -> bool {
    build_dir.join("CMakeCache.txt").exists()
}
