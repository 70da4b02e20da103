//! Implementation of `keel Build`.

use anyhow::Result;

use crate::builder::assets::{sync_assets, SyncReport};
use crate::builder::cmake::NativeBuild;
use crate::builder::conan::PackageManager;
use crate::ops::generate::{generate_in, GenerateOptions, GenerateReport, Workspace};

/// Result of a build run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub generate: GenerateReport,
    pub assets: SyncReport,
}

/// Regenerate if stale, mirror assets, then compile.
pub fn build(
    opts: &GenerateOptions,
    packages: &dyn PackageManager,
    native: &dyn NativeBuild,
) -> Result<BuildReport> {
    let ws = Workspace::load(opts)?;
    build_in(&ws, opts, packages, native)
}

pub(crate) fn build_in(
    ws: &Workspace,
    opts: &GenerateOptions,
    packages: &dyn PackageManager,
    native: &dyn NativeBuild,
) -> Result<BuildReport> {
    let generate = generate_in(ws, opts, packages, native)?;

    let layout = &ws.layout;
    let assets = sync_assets(
        &layout.assets_source(),
        &layout.assets_destination(),
        &layout.manifest(),
    )?;

    tracing::info!("Building `{}` ({})", ws.resolved.name, opts.configuration);
    native.build(layout.build_dir(), &opts.configuration)?;

    Ok(BuildReport { generate, assets })
}
