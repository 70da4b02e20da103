//! Dependency specification.
//!
//! A Dependency names an external package, optionally pinned to a version
//! (`zlib/1.2.11`), plus per-dependency linkage and override flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between package name and version in a dependency name.
pub const VERSION_SEPARATOR: char = '/';

/// Dependency as it appears in a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Bare name: `- zlib/1.2.11`
    Simple(String),

    /// Detailed specification
    Detailed(DetailedDependencySpec),
}

/// Mapping form of a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetailedDependencySpec {
    pub name: String,

    #[serde(default)]
    pub r#static: Option<bool>,

    #[serde(default)]
    pub r#override: Option<bool>,
}

impl DependencySpec {
    pub fn into_dependency(self) -> Dependency {
        match self {
            DependencySpec::Simple(name) => Dependency::new(name),
            DependencySpec::Detailed(spec) => Dependency {
                name: spec.name,
                r#static: spec.r#static,
                r#override: spec.r#override,
            },
        }
    }
}

/// A normalized dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    name: String,
    r#static: Option<bool>,
    r#override: Option<bool>,
}

impl Dependency {
    /// Create a dependency with no linkage or override flag.
    pub fn new(name: impl Into<String>) -> Self {
        Dependency {
            name: name.into(),
            r#static: None,
            r#override: None,
        }
    }

    /// Set the per-dependency static flag.
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.r#static = Some(is_static);
        self
    }

    /// Set the override flag.
    pub fn with_override(mut self, is_override: bool) -> Self {
        self.r#override = Some(is_override);
        self
    }

    /// The declared name, including any version suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Package portion of the name.
    pub fn package(&self) -> &str {
        self.split().0
    }

    /// Version portion of the name, if pinned.
    pub fn version(&self) -> Option<&str> {
        self.split().1
    }

    /// Explicit static flag, if any.
    pub fn static_flag(&self) -> Option<bool> {
        self.r#static
    }

    /// Explicit override flag, if any.
    pub fn override_flag(&self) -> Option<bool> {
        self.r#override
    }

    fn split(&self) -> (&str, Option<&str>) {
        let mut parts = self.name.splitn(3, VERSION_SEPARATOR);
        let package = parts.next().unwrap_or_default();
        let version = parts.next().filter(|v| !v.is_empty());
        (package, version)
    }
}

/// Which dependency list an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Local,
    Public,
    Private,
    PrivateOverride,
}

impl Visibility {
    /// Declaration order of the dependency lists.
    pub const ALL: [Visibility; 4] = [
        Visibility::Local,
        Visibility::Public,
        Visibility::Private,
        Visibility::PrivateOverride,
    ];

    /// Whether headers and libraries propagate to downstream consumers.
    pub fn is_transitive(&self) -> bool {
        matches!(self, Visibility::Local | Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Local => write!(f, "local"),
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
            Visibility::PrivateOverride => write!(f, "private-override"),
        }
    }
}

/// How a dependency's binary is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    Static,
    #[default]
    Shared,
}

impl Linkage {
    pub fn is_static(&self) -> bool {
        matches!(self, Linkage::Static)
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Linkage::Static => write!(f, "static"),
            Linkage::Shared => write!(f, "shared"),
        }
    }
}

impl FromStr for Linkage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Linkage::Static),
            "shared" | "dynamic" => Ok(Linkage::Shared),
            _ => Err(format!(
                "invalid linkage '{}'; expected 'Static' or 'Shared'",
                s
            )),
        }
    }
}

/// A dependency after version fallback, visibility and linkage policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub package: String,
    pub version: String,
    pub visibility: Visibility,
    pub transitive: bool,
    pub linkage: Linkage,
    pub r#override: bool,
}

impl ResolvedDependency {
    /// `package/version` reference as understood by the package manager.
    pub fn reference(&self) -> String {
        format!("{}{}{}", self.package, VERSION_SEPARATOR, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name() {
        let dep = Dependency::new("zlib/1.2.11");
        assert_eq!(dep.package(), "zlib");
        assert_eq!(dep.version(), Some("1.2.11"));

        let dep = Dependency::new("fmt");
        assert_eq!(dep.package(), "fmt");
        assert_eq!(dep.version(), None);

        let dep = Dependency::new("fmt/");
        assert_eq!(dep.version(), None);
    }

    #[test]
    fn test_parse_both_forms() {
        let yaml = "- zlib/1.2.11\n- Name: fmt\n  Static: true\n  Override: true\n";
        let specs: Vec<DependencySpec> = serde_yaml::from_str(yaml).unwrap();
        let deps: Vec<Dependency> = specs.into_iter().map(|s| s.into_dependency()).collect();

        assert_eq!(deps[0], Dependency::new("zlib/1.2.11"));
        assert_eq!(
            deps[1],
            Dependency::new("fmt").with_static(true).with_override(true)
        );
    }

    #[test]
    fn test_visibility_transitivity() {
        assert!(Visibility::Local.is_transitive());
        assert!(Visibility::Public.is_transitive());
        assert!(!Visibility::Private.is_transitive());
        assert!(!Visibility::PrivateOverride.is_transitive());
    }

    #[test]
    fn test_linkage_from_str() {
        assert_eq!("Static".parse::<Linkage>().unwrap(), Linkage::Static);
        assert_eq!("shared".parse::<Linkage>().unwrap(), Linkage::Shared);
        assert!("both".parse::<Linkage>().is_err());
    }
}
