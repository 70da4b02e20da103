//! Package manager adapter (Conan 2).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::recipe::RECIPE_NAME;
use crate::builder::write_cache::write_if_changed;
use crate::util::fs::read_to_string;
use crate::util::process::{find_tool, ProcessBuilder};

/// File the runtime `PATH` is exported to.
pub const RUN_ENV_NAME: &str = "conanrun.env";

/// Installs, exports and publishes dependency packages.
///
/// Every call runs to completion in `build_dir`, which holds the generated
/// recipe. Failure is the only feedback.
pub trait PackageManager {
    fn install(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()>;

    fn export_package(
        &self,
        build_dir: &Path,
        configuration: &str,
        name: &str,
        version: &str,
    ) -> Result<()>;

    fn upload(&self, build_dir: &Path, reference: &str, remote: &str) -> Result<()>;
}

/// The `conan` command line.
#[derive(Debug, Clone)]
pub struct Conan {
    program: PathBuf,
}

impl Conan {
    /// Use `configured` if given, else `conan` from PATH.
    pub fn new(configured: Option<&Path>) -> Self {
        Conan {
            program: find_tool("conan", configured),
        }
    }

    pub fn install_command(
        &self,
        build_dir: &Path,
        configuration: &str,
        generator: Option<&str>,
    ) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program)
            .arg("install")
            .arg(RECIPE_NAME)
            .arg(format!("--settings=build_type={}", configuration))
            .arg("--build=missing");
        if let Some(generator) = generator {
            cmd = cmd
                .arg("-c")
                .arg(format!("tools.cmake.cmaketoolchain:generator={}", generator));
        }
        cmd.cwd(build_dir)
    }

    pub fn export_command(
        &self,
        build_dir: &Path,
        configuration: &str,
        name: &str,
        version: &str,
    ) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg("export-pkg")
            .arg(RECIPE_NAME)
            .arg(format!("--name={}", name))
            .arg(format!("--version={}", version))
            .arg(format!("--settings=build_type={}", configuration))
            .cwd(build_dir)
    }

    pub fn upload_command(&self, build_dir: &Path, reference: &str, remote: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .arg("upload")
            .arg(reference)
            .arg(format!("--remote={}", remote))
            .arg("--confirm")
            .cwd(build_dir)
    }
}

impl PackageManager for Conan {
    fn install(&self, build_dir: &Path, configuration: &str, generator: Option<&str>) -> Result<()> {
        self.install_command(build_dir, configuration, generator).run()
    }

    fn export_package(
        &self,
        build_dir: &Path,
        configuration: &str,
        name: &str,
        version: &str,
    ) -> Result<()> {
        self.export_command(build_dir, configuration, name, version)
            .run()
    }

    fn upload(&self, build_dir: &Path, reference: &str, remote: &str) -> Result<()> {
        self.upload_command(build_dir, reference, remote).run()
    }
}

/// Copy the `PATH` assignment from `conanrunenv-*.bat` into [`RUN_ENV_NAME`].
///
/// The generated run environment is only produced on Windows hosts; nothing
/// is written when no such file exists.
pub fn export_run_env(build_dir: &Path) -> Result<Option<PathBuf>> {
    let pattern = format!(
        "{}/conanrunenv-*.bat",
        glob::Pattern::escape(&build_dir.to_string_lossy())
    );
    let mut scripts: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|entry| entry.ok())
        .collect();
    scripts.sort();

    let Some(script) = scripts.first() else {
        return Ok(None);
    };

    let path_value = read_to_string(script)?
        .lines()
        .find_map(|line| {
            line.trim()
                .strip_prefix("set \"PATH=")
                .and_then(|rest| rest.strip_suffix('"'))
                .map(str::to_string)
        })
        .unwrap_or_default();

    let out = build_dir.join(RUN_ENV_NAME);
    write_if_changed(&out, &format!("{}\n", path_value))?;
    Ok(Some(out))
}
