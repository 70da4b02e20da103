//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use keel::core::Linkage;

/// Keel - build orchestration for Conan and CMake projects
#[derive(Parser)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the build directory of a target (recipe, install, CMake configure)
    #[command(name = "Generate")]
    Generate(TargetArgs),

    /// Generate if stale, sync assets and compile a target
    #[command(name = "Build")]
    Build(TargetArgs),

    /// Build a target and export it as a package
    #[command(name = "Package")]
    Package(PackageArgs),
}

#[derive(Args)]
pub struct TargetArgs {
    /// Project directory or .project file
    #[arg(long = "Project", env = "KEEL_PROJECT", default_value = ".")]
    pub project: PathBuf,

    /// Target name; a unique suffix of a declared name is enough
    #[arg(long = "Target")]
    pub target: String,

    /// Build configuration (defaults to config, else Release)
    #[arg(long = "Configuration")]
    pub configuration: Option<String>,

    /// CMake generator
    #[arg(long = "Generator")]
    pub generator: Option<String>,

    /// Force every dependency to Static or Shared linkage
    #[arg(long = "Linkage")]
    pub linkage: Option<Linkage>,

    /// Regenerate even if nothing changed
    #[arg(long = "Force")]
    pub force: bool,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Upload the package after exporting it
    #[arg(long = "Deploy")]
    pub deploy: bool,

    /// Remote to upload to (defaults to config)
    #[arg(long = "Remote")]
    pub remote: Option<String>,
}
