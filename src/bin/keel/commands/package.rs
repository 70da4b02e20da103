//! `keel Package` command

use anyhow::Result;

use super::{resolve_options, tools};
use crate::cli::PackageArgs;
use keel::ops::{package, PackageOptions};

pub fn execute(args: PackageArgs) -> Result<()> {
    let (build, config) = resolve_options(args.target)?;
    let (conan, cmake) = tools(&config);

    let opts = PackageOptions {
        build,
        deploy: args.deploy,
        remote: args.remote.or_else(|| config.package.remote.clone()),
    };

    let report = package(&opts, &conan, &cmake)?;

    match report.uploaded_to {
        Some(remote) => eprintln!("    Uploaded {} to {}", report.reference, remote),
        None => eprintln!("    Packaged {}", report.reference),
    }
    Ok(())
}
