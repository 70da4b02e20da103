//! Target definitions - what gets built.
//!
//! [`RawTarget`] mirrors the descriptor document with every field optional.
//! [`RawTarget::normalize`] is the single place defaults are applied; the
//! resulting [`Target`] is fully populated and read-only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::dependency::{Dependency, DependencySpec, Visibility};

/// Version used when neither the target nor the project declares one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Separator between segments of a hierarchical target name.
pub const NAME_SEPARATOR: char = '/';

/// The kind of binary a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    Application,
    Library,
    StaticLibrary,
    SharedLibrary,
    Plugin,
    /// Header-only target with no sources of its own.
    Interface,
}

impl TargetType {
    pub fn is_interface(&self) -> bool {
        matches!(self, TargetType::Interface)
    }

    /// Whether the target produces a linkable library artifact.
    pub fn is_library(&self) -> bool {
        matches!(
            self,
            TargetType::Library
                | TargetType::StaticLibrary
                | TargetType::SharedLibrary
                | TargetType::Plugin
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetType::Application => "Application",
            TargetType::Library => "Library",
            TargetType::StaticLibrary => "StaticLibrary",
            TargetType::SharedLibrary => "SharedLibrary",
            TargetType::Plugin => "Plugin",
            TargetType::Interface => "Interface",
        };
        f.write_str(s)
    }
}

/// Target document as written, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTarget {
    pub name: Option<String>,
    pub r#type: Option<TargetType>,
    pub static_linkage: Option<bool>,
    pub package_version: Option<String>,

    pub local_dependencies: Option<Vec<DependencySpec>>,
    pub public_dependencies: Option<Vec<DependencySpec>>,
    pub private_dependencies: Option<Vec<DependencySpec>>,
    pub private_dependency_overrides: Option<Vec<DependencySpec>>,

    pub global_defines: Option<BTreeMap<String, serde_yaml::Value>>,
    pub public_defines: Option<BTreeMap<String, serde_yaml::Value>>,
    pub private_defines: Option<BTreeMap<String, serde_yaml::Value>>,

    pub global_headers: Option<Vec<String>>,
    pub public_includes: Option<Vec<String>>,
    pub private_includes: Option<Vec<String>>,

    pub precompile_local_headers: Option<bool>,
    pub precompile_public_headers: Option<bool>,
    pub precompile_private_headers: Option<bool>,
}

macro_rules! overlay_fields {
    ($base:ident, $top:ident, $($field:ident),+ $(,)?) => {
        RawTarget {
            $($field: $top.$field.or($base.$field)),+
        }
    };
}

impl RawTarget {
    /// Apply `top` over `self`; fields present in `top` win.
    pub fn overlay(self, top: RawTarget) -> RawTarget {
        let base = self;
        overlay_fields!(
            base,
            top,
            name,
            r#type,
            static_linkage,
            package_version,
            local_dependencies,
            public_dependencies,
            private_dependencies,
            private_dependency_overrides,
            global_defines,
            public_defines,
            private_defines,
            global_headers,
            public_includes,
            private_includes,
            precompile_local_headers,
            precompile_public_headers,
            precompile_private_headers,
        )
    }

    /// Resolve every default and produce a fully-populated [`Target`].
    ///
    /// `fallback_name` is used when the document carries no `Name`;
    /// `project_version` feeds the version fallback chain.
    pub fn normalize(self, fallback_name: &str, project_version: &str) -> Result<Target, String> {
        let name = normalize_name(self.name.as_deref().unwrap_or(fallback_name));
        if name.is_empty() {
            return Err("target has an empty Name".to_string());
        }

        let version = self
            .package_version
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| project_version.to_string());

        let precompile_local = self.precompile_local_headers.unwrap_or(false);

        Ok(Target {
            name,
            kind: self.r#type.unwrap_or_default(),
            static_linkage: self.static_linkage.unwrap_or(false),
            package_version: self.package_version,
            version,
            local_dependencies: dependencies(self.local_dependencies),
            public_dependencies: dependencies(self.public_dependencies),
            private_dependencies: dependencies(self.private_dependencies),
            private_dependency_overrides: dependencies(self.private_dependency_overrides),
            global_defines: defines("GlobalDefines", self.global_defines)?,
            public_defines: defines("PublicDefines", self.public_defines)?,
            private_defines: defines("PrivateDefines", self.private_defines)?,
            global_headers: self.global_headers.unwrap_or_default(),
            public_includes: self.public_includes.unwrap_or_default(),
            private_includes: self.private_includes.unwrap_or_default(),
            precompile_local_headers: precompile_local,
            precompile_public_headers: self.precompile_public_headers.unwrap_or(precompile_local),
            precompile_private_headers: self
                .precompile_private_headers
                .unwrap_or(precompile_local),
        })
    }
}

fn normalize_name(name: &str) -> String {
    name.replace('\\', "/").trim_matches(NAME_SEPARATOR).to_string()
}

fn dependencies(specs: Option<Vec<DependencySpec>>) -> Vec<Dependency> {
    specs
        .unwrap_or_default()
        .into_iter()
        .map(DependencySpec::into_dependency)
        .collect()
}

fn defines(
    field: &str,
    raw: Option<BTreeMap<String, serde_yaml::Value>>,
) -> Result<BTreeMap<String, String>, String> {
    let mut out = BTreeMap::new();
    for (key, value) in raw.unwrap_or_default() {
        let rendered = match value {
            serde_yaml::Value::Null => String::new(),
            serde_yaml::Value::Bool(b) => if b { "1" } else { "0" }.to_string(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::String(s) => s,
            _ => {
                return Err(format!(
                    "{}.{} must be a scalar value",
                    field, key
                ))
            }
        };
        out.insert(key, rendered);
    }
    Ok(out)
}

/// A normalized build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Hierarchical name, `/`-separated
    pub name: String,
    pub kind: TargetType,
    pub static_linkage: bool,
    /// Version as declared on the target
    pub package_version: Option<String>,
    /// Effective version: PackageVersion, else the project version
    pub version: String,

    pub local_dependencies: Vec<Dependency>,
    pub public_dependencies: Vec<Dependency>,
    pub private_dependencies: Vec<Dependency>,
    pub private_dependency_overrides: Vec<Dependency>,

    pub global_defines: BTreeMap<String, String>,
    pub public_defines: BTreeMap<String, String>,
    pub private_defines: BTreeMap<String, String>,

    pub global_headers: Vec<String>,
    pub public_includes: Vec<String>,
    pub private_includes: Vec<String>,

    pub precompile_local_headers: bool,
    pub precompile_public_headers: bool,
    pub precompile_private_headers: bool,
}

impl Target {
    /// Create a target with every other field at its default.
    pub fn new(name: &str, kind: TargetType) -> Self {
        Target {
            name: normalize_name(name),
            kind,
            static_linkage: false,
            package_version: None,
            version: DEFAULT_VERSION.to_string(),
            local_dependencies: Vec::new(),
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            private_dependency_overrides: Vec::new(),
            global_defines: BTreeMap::new(),
            public_defines: BTreeMap::new(),
            private_defines: BTreeMap::new(),
            global_headers: Vec::new(),
            public_includes: Vec::new(),
            private_includes: Vec::new(),
            precompile_local_headers: false,
            precompile_public_headers: false,
            precompile_private_headers: false,
        }
    }

    /// Last segment of the hierarchical name; used for the binary and package name.
    pub fn short_name(&self) -> &str {
        self.name
            .rsplit(NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// The dependency list for a visibility.
    pub fn dependencies(&self, visibility: Visibility) -> &[Dependency] {
        match visibility {
            Visibility::Local => &self.local_dependencies,
            Visibility::Public => &self.public_dependencies,
            Visibility::Private => &self.private_dependencies,
            Visibility::PrivateOverride => &self.private_dependency_overrides,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }
}
