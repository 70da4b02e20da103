//! Transitive visibility across project-local targets.
//!
//! A dependency whose package name equals the short name of another target
//! in the same project is a local edge. Local and Public edges re-export the
//! dependency's own exports; Private edges stop propagation.

use std::collections::{BTreeSet, HashMap, VecDeque};

use anyhow::Result;
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::core::errors::KeelError;
use crate::core::project::Project;
use crate::core::target::NAME_SEPARATOR;
use crate::resolver::dependencies::{resolve_dependencies, LinkagePolicy};
use crate::resolver::target::resolve_target;

/// Packages seen by a target and by its consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyClosure {
    /// Canonical name of the root target
    pub target: String,

    /// Packages whose headers/libs are available when compiling the target
    pub visible: Vec<String>,

    /// Packages re-exported to anything that depends on the target
    pub exported: Vec<String>,
}

fn is_local(project: &Project, package: &str) -> bool {
    project
        .target_names()
        .any(|n| n.rsplit(NAME_SEPARATOR).next() == Some(package))
        || project.target_descriptor_path(package).is_file()
}

fn is_ambiguous(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<KeelError>(),
        Some(KeelError::AmbiguousTarget { .. })
    )
}

/// Compute the closure for `requested`, walking local targets as needed.
pub fn dependency_closure(project: &Project, requested: &str) -> Result<DependencyClosure> {
    let root = resolve_target(project, requested)?;
    let root_package = root.target.short_name().to_string();

    let mut graph: DiGraph<String, bool> = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::new();

    let root_node = graph.add_node(root_package.clone());
    nodes.insert(root_package, root_node);
    queue.push_back((root_node, root.target));

    while let Some((node, target)) = queue.pop_front() {
        for dep in resolve_dependencies(&target, LinkagePolicy::PerDependency) {
            let (dep_node, fresh) = match nodes.get(&dep.package) {
                Some(&existing) => (existing, false),
                None => {
                    let idx = graph.add_node(dep.package.clone());
                    nodes.insert(dep.package.clone(), idx);
                    (idx, true)
                }
            };
            graph.update_edge(node, dep_node, dep.transitive);

            if fresh && is_local(project, &dep.package) {
                match resolve_target(project, &dep.package) {
                    Ok(local) => queue.push_back((dep_node, local.target)),
                    Err(e) if is_ambiguous(&e) => {
                        tracing::debug!(
                            "`{}` matches several local targets; treated as a package",
                            dep.package
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    let order = match toposort(&graph, None) {
        Ok(order) => order,
        Err(_) => return Err(cycle_error(&graph).into()),
    };

    let mut exports: HashMap<NodeIndex, BTreeSet<String>> = HashMap::new();
    for &node in order.iter().rev() {
        let mut exported = BTreeSet::new();
        for edge in graph.edges_directed(node, Direction::Outgoing) {
            if *edge.weight() {
                exported.insert(graph[edge.target()].clone());
                if let Some(inner) = exports.get(&edge.target()) {
                    exported.extend(inner.iter().cloned());
                }
            }
        }
        exports.insert(node, exported);
    }

    let mut visible = BTreeSet::new();
    for edge in graph.edges_directed(root_node, Direction::Outgoing) {
        visible.insert(graph[edge.target()].clone());
        if let Some(inner) = exports.get(&edge.target()) {
            visible.extend(inner.iter().cloned());
        }
    }

    Ok(DependencyClosure {
        target: root.name,
        visible: visible.into_iter().collect(),
        exported: exports
            .remove(&root_node)
            .unwrap_or_default()
            .into_iter()
            .collect(),
    })
}

fn cycle_error(graph: &DiGraph<String, bool>) -> KeelError {
    let mut cycle: Vec<String> = kosaraju_scc(graph)
        .into_iter()
        .find(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| scc.into_iter().map(|n| graph[n].clone()).collect())
        .unwrap_or_default();
    cycle.sort();
    if let Some(first) = cycle.first().cloned() {
        cycle.push(first);
    }
    KeelError::DependencyCycle { cycle }
}
