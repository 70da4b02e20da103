//! Implementation of `keel Generate`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::cmake::{is_configured, NativeBuild};
use crate::builder::conan::{export_run_env, PackageManager};
use crate::builder::declared::scan_declared_packages;
use crate::builder::descriptor::{render_cmake_lists, DescriptorInput};
use crate::builder::discovery::FileSets;
use crate::builder::recipe::{render_recipe, RecipeInput};
use crate::builder::staleness::{is_outdated, touch_marker, StalenessInputs};
use crate::builder::umbrella::{
    private_header_name, public_header_name, render_private_header, render_public_header,
};
use crate::builder::write_cache::{write_if_changed, WriteOutcome};
use crate::core::dependency::Linkage;
use crate::core::project::Project;
use crate::ops::layout::BuildLayout;
use crate::resolver::closure::dependency_closure;
use crate::resolver::dependencies::{resolve_dependencies, LinkagePolicy};
use crate::resolver::target::{resolve_target, ResolvedTarget};
use crate::util::fs::ensure_dir;

/// Options shared by `Generate`, `Build` and `Package`.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Project directory or `.project` file
    pub project: PathBuf,

    /// Requested target name
    pub target: String,

    /// Build configuration (e.g., Release)
    pub configuration: String,

    /// CMake generator, if not the tool default
    pub generator: Option<String>,

    /// Linkage forced on every dependency
    pub linkage: Option<Linkage>,

    /// Regenerate even when nothing is stale
    pub force: bool,
}

impl GenerateOptions {
    pub fn new(project: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        GenerateOptions {
            project: project.into(),
            target: target.into(),
            configuration: crate::util::config::DEFAULT_CONFIGURATION.to_string(),
            generator: None,
            linkage: None,
            force: false,
        }
    }

    fn policy(&self) -> LinkagePolicy {
        LinkagePolicy::from(self.linkage)
    }
}

/// A loaded project with its resolved target and build paths.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub project: Project,
    pub resolved: ResolvedTarget,
    pub layout: BuildLayout,
}

impl Workspace {
    /// Load the project and resolve the requested target. No side effects.
    pub fn load(opts: &GenerateOptions) -> Result<Self> {
        let location = opts
            .project
            .canonicalize()
            .with_context(|| format!("project not found: {}", opts.project.display()))?;
        let project = Project::load(&location)?;
        let resolved = resolve_target(&project, &opts.target)?;

        // Fails on cycles between local targets.
        let closure = dependency_closure(&project, &resolved.name)?;
        tracing::debug!(
            "`{}` sees [{}], exports [{}]",
            closure.target,
            closure.visible.join(", "),
            closure.exported.join(", ")
        );

        let layout = BuildLayout::new(&project, &resolved.name, &opts.configuration);
        Ok(Workspace {
            project,
            resolved,
            layout,
        })
    }

    fn staleness_inputs(&self) -> StalenessInputs {
        StalenessInputs {
            project: self.project.path().to_path_buf(),
            target: Some(self.project.target_descriptor_path(&self.resolved.name)),
            user_override: Some(self.resolved.override_path.clone()),
            marker: self.layout.marker(),
        }
    }

    /// Whether the regenerate path has to run.
    pub fn needs_regeneration(&self) -> Result<bool> {
        if !is_configured(self.layout.build_dir()) {
            return Ok(true);
        }
        is_outdated(&self.staleness_inputs())
    }
}

/// A generated file and whether it was touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Result of a generate run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Canonical target name
    pub target: String,

    /// Build directory of the target
    pub build_dir: PathBuf,

    /// False when the marker was current and nothing ran
    pub regenerated: bool,

    /// Generated files in write order
    pub artifacts: Vec<Artifact>,
}

impl GenerateReport {
    /// Number of artifacts whose bytes changed.
    pub fn written(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| a.outcome == WriteOutcome::Written)
            .count()
    }
}

fn write_artifact(path: PathBuf, contents: &str, artifacts: &mut Vec<Artifact>) -> Result<()> {
    let outcome = write_if_changed(&path, contents)?;
    artifacts.push(Artifact { path, outcome });
    Ok(())
}

/// Resolve, then regenerate the target's build state if stale or forced.
pub fn generate(
    opts: &GenerateOptions,
    packages: &dyn PackageManager,
    native: &dyn NativeBuild,
) -> Result<GenerateReport> {
    let ws = Workspace::load(opts)?;
    generate_in(&ws, opts, packages, native)
}

/// The regenerate path for an already loaded workspace.
pub fn generate_in(
    ws: &Workspace,
    opts: &GenerateOptions,
    packages: &dyn PackageManager,
    native: &dyn NativeBuild,
) -> Result<GenerateReport> {
    let target = &ws.resolved.target;
    let layout = &ws.layout;
    let build_dir = layout.build_dir();

    let mut report = GenerateReport {
        target: ws.resolved.name.clone(),
        build_dir: build_dir.to_path_buf(),
        regenerated: false,
        artifacts: Vec::new(),
    };

    if !opts.force && !ws.needs_regeneration()? {
        tracing::info!("`{}` is up to date", ws.resolved.name);
        return Ok(report);
    }

    tracing::info!(
        "Generating `{}` ({}) in {}",
        ws.resolved.name,
        opts.configuration,
        build_dir.display()
    );
    ensure_dir(build_dir)?;

    let policy = opts.policy();
    let dependencies = resolve_dependencies(target, policy);
    let recipe = render_recipe(&RecipeInput {
        target,
        dependencies: &dependencies,
        policy,
        target_dir: &layout.target_dir,
        build_dir,
    });
    write_artifact(layout.recipe(), &recipe, &mut report.artifacts)?;

    let generator = opts.generator.as_deref();
    packages.install(build_dir, &opts.configuration, generator)?;

    let declared = scan_declared_packages(build_dir)?;
    let files = FileSets::discover(&layout.target_dir)?;

    let descriptor = render_cmake_lists(&DescriptorInput {
        target,
        files: &files,
        declared: &declared,
        target_dir: &layout.target_dir,
        build_dir,
    });
    write_artifact(layout.descriptor(), &descriptor, &mut report.artifacts)?;

    let public = render_public_header(target, &files, &layout.target_dir);
    write_artifact(
        layout.artifact(&public_header_name(target)),
        &public,
        &mut report.artifacts,
    )?;

    let private = render_private_header(target, &files, &layout.target_dir);
    write_artifact(
        layout.artifact(&private_header_name(target)),
        &private,
        &mut report.artifacts,
    )?;

    if let Some(run_env) = export_run_env(build_dir)? {
        tracing::debug!("exported run environment to {}", run_env.display());
    }

    native.configure(build_dir, &opts.configuration, generator)?;
    touch_marker(&layout.marker())?;

    report.regenerated = true;
    Ok(report)
}
