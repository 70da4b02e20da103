//! Domain error types.
//!
//! Library functions return `anyhow::Result`; failures that callers may want
//! to match on are raised as a [`KeelError`] and can be recovered with
//! `err.downcast_ref::<KeelError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum KeelError {
    #[error("target `{name}` not found in {}", project.display())]
    TargetNotFound { name: String, project: PathBuf },

    #[error("target `{name}` is ambiguous; candidates: {}", candidates.join(", "))]
    AmbiguousTarget {
        name: String,
        candidates: Vec<String>,
    },

    #[error("malformed descriptor {}: {message}", path.display())]
    MalformedDescriptor { path: PathBuf, message: String },

    #[error("dependency cycle between local targets: {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },

    #[error("`{command}` failed with {}", exit_description(*code))]
    ExternalToolFailure { command: String, code: Option<i32> },
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl KeelError {
    /// Build a `MalformedDescriptor` from a YAML parse error.
    pub fn malformed(path: impl Into<PathBuf>, err: &serde_yaml::Error) -> Self {
        KeelError::MalformedDescriptor {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
