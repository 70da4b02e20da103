//! `keel Build` command

use anyhow::Result;

use super::{resolve_options, tools};
use crate::cli::TargetArgs;
use keel::ops::build;

pub fn execute(args: TargetArgs) -> Result<()> {
    let (opts, config) = resolve_options(args)?;
    let (conan, cmake) = tools(&config);

    let report = build(&opts, &conan, &cmake)?;

    eprintln!(
        "    Finished {} [{}] in {}",
        report.generate.target,
        opts.configuration,
        report.generate.build_dir.display()
    );
    Ok(())
}
