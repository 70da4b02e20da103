//! Target lookup.
//!
//! A requested name resolves through the standalone descriptor when one
//! exists. Otherwise the project's declared targets are ranked against the
//! request:
//!
//! 0. exact match
//! 1. declared name ends with `/<requested>` (whole trailing segments)
//! 2. declared name ends with `<requested>` as a plain string
//! 3. requested name ends with `/<declared>`; longer names rank first
//!
//! The best non-empty rank must hold exactly one candidate, otherwise the
//! request is ambiguous.

use std::cmp::Reverse;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::errors::KeelError;
use crate::core::project::{load_override, load_raw_target, Project};
use crate::core::target::{RawTarget, Target, NAME_SEPARATOR};

/// Outcome of resolving a requested target name.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// Canonical (declared) name
    pub name: String,

    /// The normalized target record
    pub target: Target,

    /// Standalone descriptor, if that is where the target came from
    pub descriptor: Option<PathBuf>,

    /// Location checked for a user override
    pub override_path: PathBuf,
}

/// Ordering key for a candidate; smaller is better.
type MatchRank = (u8, Reverse<usize>);

fn rank(declared: &str, requested: &str) -> Option<MatchRank> {
    if declared == requested {
        return Some((0, Reverse(0)));
    }
    if declared.len() > requested.len() && declared.ends_with(requested) {
        let boundary = declared.as_bytes()[declared.len() - requested.len() - 1];
        if boundary == NAME_SEPARATOR as u8 {
            return Some((1, Reverse(0)));
        }
        return Some((2, Reverse(0)));
    }
    if requested.len() > declared.len() && requested.ends_with(declared) {
        let boundary = requested.as_bytes()[requested.len() - declared.len() - 1];
        if boundary == NAME_SEPARATOR as u8 {
            return Some((3, Reverse(declared.len())));
        }
    }
    None
}

fn normalize_request(requested: &str) -> String {
    requested
        .replace('\\', "/")
        .trim_matches(NAME_SEPARATOR)
        .to_string()
}

/// Pick the declared stub matching `requested`.
fn match_declared<'a>(project: &'a Project, requested: &str) -> Result<&'a RawTarget> {
    let ranked: Vec<(MatchRank, &str, &RawTarget)> = project
        .targets()
        .iter()
        .filter_map(|stub| {
            let name = stub.name.as_deref()?;
            let declared = normalize_request(name);
            rank(&declared, requested).map(|r| (r, name, stub))
        })
        .collect();

    let Some(best) = ranked.iter().map(|(r, _, _)| *r).min() else {
        return Err(KeelError::TargetNotFound {
            name: requested.to_string(),
            project: project.path().to_path_buf(),
        }
        .into());
    };

    let mut winners: Vec<(&str, &RawTarget)> = ranked
        .into_iter()
        .filter(|(r, _, _)| *r == best)
        .map(|(_, name, stub)| (name, stub))
        .collect();

    if winners.len() > 1 {
        let mut candidates: Vec<String> = winners.iter().map(|(n, _)| n.to_string()).collect();
        candidates.sort();
        return Err(KeelError::AmbiguousTarget {
            name: requested.to_string(),
            candidates,
        }
        .into());
    }

    let (name, stub) = winners.remove(0);
    tracing::debug!("`{}` matched declared target `{}`", requested, name);
    Ok(stub)
}

/// Resolve `requested` against `project` into a normalized target.
pub fn resolve_target(project: &Project, requested: &str) -> Result<ResolvedTarget> {
    let requested = normalize_request(requested);
    if requested.is_empty() {
        return Err(KeelError::TargetNotFound {
            name: requested,
            project: project.path().to_path_buf(),
        }
        .into());
    }

    let standalone = project.target_descriptor_path(&requested);
    let (name, raw, descriptor) = if standalone.is_file() {
        tracing::info!("Loading target {}", standalone.display());
        let raw = load_raw_target(&standalone)?;
        (requested.clone(), raw, Some(standalone))
    } else {
        let stub = match_declared(project, &requested)?;
        let name = normalize_request(stub.name.as_deref().unwrap_or(&requested));
        (name, stub.clone(), None)
    };

    let override_path = project.override_path(&name);
    let raw = match load_override(&override_path)? {
        Some(top) => raw.overlay(top),
        None => raw,
    };

    let malformed_path = descriptor
        .clone()
        .unwrap_or_else(|| project.path().to_path_buf());

    let raw = RawTarget {
        name: Some(name.clone()),
        ..raw
    };
    let target = raw
        .normalize(&name, project.version())
        .map_err(|message| KeelError::MalformedDescriptor {
            path: malformed_path,
            message,
        })?;

    Ok(ResolvedTarget {
        name,
        target,
        descriptor,
        override_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::TargetType;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn project(dir: &Path, yaml: &str) -> Project {
        let path = dir.join("p.project");
        fs::write(&path, yaml).unwrap();
        Project::load(&path).unwrap()
    }

    fn err_of(result: Result<ResolvedTarget>) -> KeelError {
        let err = result.unwrap_err();
        match err.downcast::<KeelError>() {
            Ok(e) => e,
            Err(e) => panic!("unexpected error: {:#}", e),
        }
    }

    #[test]
    fn test_standalone_descriptor_wins() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: Lib\n    Type: Application\n");
        fs::create_dir_all(tmp.path().join("Lib")).unwrap();
        fs::write(tmp.path().join("Lib/Lib.target"), "Type: Library\n").unwrap();

        let resolved = resolve_target(&p, "Lib").unwrap();
        assert_eq!(resolved.name, "Lib");
        assert_eq!(resolved.target.kind, TargetType::Library);
        assert_eq!(resolved.descriptor, Some(tmp.path().join("Lib/Lib.target")));
    }

    #[test]
    fn test_nested_standalone_descriptor() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            tmp.path(),
            "Targets:\n  - Name: Engine/Core\n    Type: Application\n",
        );
        let descriptor = tmp.path().join("Engine/Core/Engine/Core.target");
        fs::create_dir_all(descriptor.parent().unwrap()).unwrap();
        fs::write(&descriptor, "Type: Library\n").unwrap();

        let resolved = resolve_target(&p, "Engine/Core").unwrap();
        assert_eq!(resolved.name, "Engine/Core");
        assert_eq!(resolved.target.kind, TargetType::Library);
        assert_eq!(resolved.descriptor, Some(descriptor));
    }

    #[test]
    fn test_nested_user_override() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: Engine/Core\n");
        let user = tmp.path().join("Engine/Core/Engine/Core.target.user");
        fs::create_dir_all(user.parent().unwrap()).unwrap();
        fs::write(&user, "StaticLinkage: true\n").unwrap();

        let resolved = resolve_target(&p, "Core").unwrap();
        assert_eq!(resolved.override_path, user);
        assert!(resolved.target.static_linkage);
    }

    #[test]
    fn test_exact_beats_suffix() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            tmp.path(),
            "Targets:\n  - Name: Engine/Core\n  - Name: Core\n",
        );

        assert_eq!(resolve_target(&p, "Core").unwrap().name, "Core");
    }

    #[test]
    fn test_segment_suffix() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            tmp.path(),
            "Targets:\n  - Name: Engine/Core\n  - Name: Tools/Editor\n",
        );

        let resolved = resolve_target(&p, "Core").unwrap();
        assert_eq!(resolved.name, "Engine/Core");
        assert_eq!(resolved.target.short_name(), "Core");
        assert!(resolved.descriptor.is_none());
    }

    #[test]
    fn test_segment_suffix_beats_plain_suffix() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            tmp.path(),
            "Targets:\n  - Name: Engine/HardCore\n  - Name: Engine/Core\n",
        );

        assert_eq!(resolve_target(&p, "Core").unwrap().name, "Engine/Core");
    }

    #[test]
    fn test_request_longer_than_declared_prefers_longest() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: Core\n  - Name: Engine/Core\n");

        assert_eq!(
            resolve_target(&p, "Game/Engine/Core").unwrap().name,
            "Engine/Core"
        );
    }

    #[test]
    fn test_ambiguous_suffix() {
        let tmp = TempDir::new().unwrap();
        let p = project(
            tmp.path(),
            "Targets:\n  - Name: Tools/Core\n  - Name: Engine/Core\n",
        );

        match err_of(resolve_target(&p, "Core")) {
            KeelError::AmbiguousTarget { candidates, .. } => {
                assert_eq!(candidates, vec!["Engine/Core", "Tools/Core"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_not_found() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: App\n");

        assert!(matches!(
            err_of(resolve_target(&p, "Server")),
            KeelError::TargetNotFound { .. }
        ));
    }

    #[test]
    fn test_longer_request_needs_segment_boundary() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: Core\n");

        assert!(matches!(
            err_of(resolve_target(&p, "HardCore")),
            KeelError::TargetNotFound { .. }
        ));
        assert_eq!(resolve_target(&p, "Game/Core").unwrap().name, "Core");
    }

    #[test]
    fn test_user_override_applied() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: App\n");
        fs::create_dir_all(tmp.path().join("App")).unwrap();
        fs::write(
            tmp.path().join("App/App.target.user"),
            "StaticLinkage: true\n",
        )
        .unwrap();

        let resolved = resolve_target(&p, "App").unwrap();
        assert!(resolved.target.static_linkage);
        assert!(resolved.descriptor.is_none());
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let tmp = TempDir::new().unwrap();
        let p = project(tmp.path(), "Targets:\n  - Name: Engine/Core\n    Type: Library\n");

        let a = resolve_target(&p, "Core").unwrap();
        let b = resolve_target(&p, "Core").unwrap();
        assert_eq!(a.target, b.target);
    }
}
