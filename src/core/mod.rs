//! Core data structures for Keel.
//!
//! This module contains the descriptor model:
//! - Projects and their declared targets
//! - Targets, normalized from raw YAML records
//! - Dependencies and resolved dependency tuples
//! - Domain errors

pub mod dependency;
pub mod errors;
pub mod project;
pub mod target;

pub use dependency::{Dependency, Linkage, ResolvedDependency, Visibility};
pub use errors::KeelError;
pub use project::Project;
pub use target::{RawTarget, Target, TargetType};
