//! Target and dependency resolution.
//!
//! Resolution is pure: descriptors are read, nothing is written.

pub mod closure;
pub mod dependencies;
pub mod target;

pub use closure::{dependency_closure, DependencyClosure};
pub use dependencies::{linkage_settings, resolve_dependencies, LinkagePolicy};
pub use target::{resolve_target, ResolvedTarget};
