//! High-level operations.
//!
//! This module contains the implementation of Keel commands.

pub mod build;
pub mod generate;
pub mod layout;
pub mod package;

pub use build::{build, BuildReport};
pub use generate::{generate, Artifact, GenerateOptions, GenerateReport, Workspace};
pub use layout::BuildLayout;
pub use package::{package, PackageOptions, PackageReport};
