//! Build state generation.
//!
//! This module renders the generated artifacts of a target (CMake project,
//! umbrella headers, Conan recipe), writes them through a content-addressed
//! cache, tracks staleness, mirrors assets, and drives the external tools.

pub mod assets;
pub mod cmake;
pub mod conan;
pub mod declared;
pub mod descriptor;
pub mod discovery;
pub mod recipe;
pub mod staleness;
pub mod umbrella;
pub mod write_cache;

pub use assets::{sync_assets, AssetManifest, SyncReport};
pub use cmake::{CMake, NativeBuild};
pub use conan::{Conan, PackageManager};
pub use discovery::FileSets;
pub use write_cache::{write_if_changed, WriteOutcome};
