//! Dependency policy: version fallback, visibility and linkage.

use std::collections::BTreeMap;

use crate::core::dependency::{Linkage, ResolvedDependency, Visibility};
use crate::core::target::Target;

/// How the command line constrains dependency linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkagePolicy {
    /// Follow the per-dependency `Static` flags
    #[default]
    PerDependency,
    /// Force one linkage for every dependency
    Force(Linkage),
}

impl From<Option<Linkage>> for LinkagePolicy {
    fn from(linkage: Option<Linkage>) -> Self {
        linkage.map_or(LinkagePolicy::PerDependency, LinkagePolicy::Force)
    }
}

/// Expand a target's dependency lists into resolved tuples.
///
/// Lists are visited Local, Public, Private, PrivateOverride, and entries
/// keep their declaration order. Duplicates are preserved.
pub fn resolve_dependencies(target: &Target, policy: LinkagePolicy) -> Vec<ResolvedDependency> {
    let mut resolved = Vec::new();

    for visibility in Visibility::ALL {
        for dep in target.dependencies(visibility) {
            let version = dep
                .version()
                .map(str::to_string)
                .unwrap_or_else(|| target.version.clone());

            let linkage = if target.static_linkage {
                Linkage::Static
            } else {
                match policy {
                    LinkagePolicy::Force(linkage) => linkage,
                    LinkagePolicy::PerDependency => {
                        if dep.static_flag().unwrap_or(false) {
                            Linkage::Static
                        } else {
                            Linkage::Shared
                        }
                    }
                }
            };

            let r#override = visibility == Visibility::PrivateOverride
                || dep.override_flag().unwrap_or(false);

            resolved.push(ResolvedDependency {
                package: dep.package().to_string(),
                version,
                visibility,
                transitive: visibility.is_transitive(),
                linkage,
                r#override,
            });
        }
    }

    tracing::debug!("resolved {} dependencies for `{}`", resolved.len(), target.name);
    resolved
}

/// One linkage per package name; the last listed entry wins.
pub fn linkage_settings(resolved: &[ResolvedDependency]) -> BTreeMap<String, Linkage> {
    let mut settings = BTreeMap::new();
    for dep in resolved {
        settings.insert(dep.package.clone(), dep.linkage);
    }
    settings
}
