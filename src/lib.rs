//! Keel - build orchestration for Conan and CMake projects
//!
//! This crate turns YAML project and target descriptors into generated
//! CMake projects and Conan recipes, resolves dependency linkage, and
//! decides when that generated state has to be rebuilt.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Fixtures and tool fakes for keel unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    dependency::{Dependency, Linkage, ResolvedDependency, Visibility},
    errors::KeelError,
    project::Project,
    target::{Target, TargetType},
};

pub use resolver::{resolve_dependencies, resolve_target, LinkagePolicy, ResolvedTarget};
pub use util::config::Config;
