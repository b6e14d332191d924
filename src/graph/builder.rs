use super::{DependencyGraphView, GraphKind};
use crate::model::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Output of the build tool's dependency resolution for one classpath
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// The project being analyzed
    pub root: Coordinates,
    #[serde(default)]
    pub kind: GraphKind,
    /// Every resolved component with its direct dependencies
    #[serde(default)]
    pub components: Vec<ResolvedComponent>,
    /// Loose files declared directly on the classpath; these have no resolution entry
    #[serde(default)]
    pub file_dependencies: Vec<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedComponent {
    pub id: Coordinates,
    #[serde(default)]
    pub dependencies: Vec<ResolvedDependency>,
}

/// One resolved edge out of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub selected: Coordinates,
    /// Version constraint only; never a real edge
    #[serde(default)]
    pub is_constraint: bool,
    /// Regular or enforced platform (BOM)
    #[serde(default)]
    pub is_platform: bool,
}

impl ResolvedDependency {
    pub fn new(selected: Coordinates) -> Self {
        Self {
            selected,
            is_constraint: false,
            is_platform: false,
        }
    }
}

/// Walks a [`ResolutionResult`] depth-first into a [`DependencyGraphView`] rooted on the project
pub struct GraphViewBuilder {
    /// The graph being built
    graph: DependencyGraphView,

    /// Components whose dependencies have been walked
    visited: HashSet<Coordinates>,
}

impl GraphViewBuilder {
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            graph: DependencyGraphView::new(name, kind),
            visited: HashSet::new(),
        }
    }

    /// Build the view for one variant
    pub fn from_resolution(
        name: impl Into<String>,
        result: &ResolutionResult,
    ) -> DependencyGraphView {
        let mut builder = Self::new(name, result.kind);
        builder.walk(result);
        builder.build()
    }

    /// Add every edge reachable from the result's root
    pub fn walk(&mut self, result: &ResolutionResult) {
        let root = &result.root;
        self.graph.add_node(root.clone());

        // File dependencies only show up in the declared list
        for file in &result.file_dependencies {
            self.graph.put_edge(root.clone(), file.clone());
        }

        let components: HashMap<&Coordinates, &[ResolvedDependency]> = result
            .components
            .iter()
            .map(|c| (&c.id, c.dependencies.as_slice()))
            .collect();

        self.visited.insert(root.clone());
        let mut stack: Vec<(&Coordinates, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, next) = (frame.0, frame.1);
            // Components without an entry are leaves
            let dependencies = components.get(node).copied().unwrap_or_default();
            let Some(dependency) = dependencies.get(next) else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let is_self = &dependency.selected == node;
            if dependency.is_constraint || dependency.is_platform || is_self {
                trace!("Skipping {} -> {}", node, dependency.selected);
                continue;
            }

            self.graph.put_edge(node.clone(), dependency.selected.clone());

            if self.visited.insert(dependency.selected.clone()) {
                stack.push((&dependency.selected, 0));
            }
        }

        debug!(
            "Built graph view '{}': {} nodes, {} edges",
            self.graph.name(),
            self.graph.node_count(),
            self.graph.edge_count()
        );
    }

    pub fn build(self) -> DependencyGraphView {
        self.graph
    }
}
