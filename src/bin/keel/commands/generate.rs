//! `keel Generate` command

use anyhow::Result;

use super::{resolve_options, tools};
use crate::cli::TargetArgs;
use keel::ops::generate;

pub fn execute(args: TargetArgs) -> Result<()> {
    let (opts, config) = resolve_options(args)?;
    let (conan, cmake) = tools(&config);

    let report = generate(&opts, &conan, &cmake)?;

    if report.regenerated {
        eprintln!(
            "    Generated {} ({} files updated) in {}",
            report.target,
            report.written(),
            report.build_dir.display()
        );
    } else {
        eprintln!("    Fresh {}", report.target);
    }
    Ok(())
}
