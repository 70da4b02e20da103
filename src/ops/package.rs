//! Implementation of `keel Package`.

use anyhow::{bail, Result};

use crate::builder::cmake::NativeBuild;
use crate::builder::conan::PackageManager;
use crate::builder::recipe::{package_name, package_reference};
use crate::ops::build::{build_in, BuildReport};
use crate::ops::generate::{GenerateOptions, Workspace};

/// Options for the package command.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    pub build: GenerateOptions,

    /// Upload the exported package after a successful export
    pub deploy: bool,

    /// Remote to upload to
    pub remote: Option<String>,
}

/// Result of a package run.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub build: BuildReport,

    /// `name/version` of the exported package
    pub reference: String,

    /// Remote the package went to, if deployed
    pub uploaded_to: Option<String>,
}

/// Build, export into the local package cache and optionally upload.
pub fn package(
    opts: &PackageOptions,
    packages: &dyn PackageManager,
    native: &dyn NativeBuild,
) -> Result<PackageReport> {
    let ws = Workspace::load(&opts.build)?;

    // A deploy without a remote fails before anything runs.
    let remote = match (opts.deploy, &opts.remote) {
        (true, Some(remote)) => Some(remote.clone()),
        (true, None) => bail!(
            "no remote to deploy to\n\
             hint: set `remote` under [package] in .keel/config.toml"
        ),
        (false, _) => None,
    };

    let build = build_in(&ws, &opts.build, packages, native)?;

    let target = &ws.resolved.target;
    let reference = package_reference(target);
    let build_dir = ws.layout.build_dir();

    tracing::info!("Exporting {}", reference);
    packages.export_package(
        build_dir,
        &opts.build.configuration,
        &package_name(target),
        &target.version,
    )?;

    if let Some(ref remote) = remote {
        tracing::info!("Uploading {} to {}", reference, remote);
        packages.upload(build_dir, &reference, remote)?;
    }

    Ok(PackageReport {
        build,
        reference,
        uploaded_to: remote,
    })
}
