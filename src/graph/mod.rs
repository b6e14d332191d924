mod builder;

pub use builder::{GraphViewBuilder, ResolutionResult, ResolvedComponent, ResolvedDependency};

use crate::model::{Coordinates, DependencyKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

/// Which classpath a graph view describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    #[default]
    CompileTime,
    Runtime,
}

impl GraphKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::CompileTime => "compile_time",
            GraphKind::Runtime => "runtime",
        }
    }
}

/// Resolved dependency graph of one variant and classpath kind.
///
/// Nodes and edges keep insertion order, which is also the serialization order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GraphViewRepr", into = "GraphViewRepr")]
pub struct DependencyGraphView {
    name: String,
    kind: GraphKind,

    /// The underlying directed graph; edges carry no weight
    inner: DiGraph<Coordinates, ()>,

    /// Map from coordinates to node index
    node_map: HashMap<Coordinates, NodeIndex>,
}

impl DependencyGraphView {
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            name: name.into(),
            kind,
            inner: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Add a node if it is not present yet
    pub fn add_node(&mut self, node: Coordinates) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            return idx;
        }
        let idx = self.inner.add_node(node.clone());
        self.node_map.insert(node, idx);
        idx
    }

    /// Add an edge, adding both nodes as needed. Self-loops and duplicate edges are ignored.
    pub fn put_edge(&mut self, from: Coordinates, to: Coordinates) {
        if from == to {
            self.add_node(from);
            return;
        }
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        if !self.inner.contains_edge(from_idx, to_idx) {
            self.inner.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn contains(&self, node: &Coordinates) -> bool {
        self.node_map.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Coordinates> {
        self.inner.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Coordinates, &Coordinates)> {
        self.inner
            .edge_references()
            .map(|edge| (&self.inner[edge.source()], &self.inner[edge.target()]))
    }

    /// Direct successors in insertion order
    pub fn successors(&self, node: &Coordinates) -> Vec<&Coordinates> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Direct predecessors in insertion order
    pub fn predecessors(&self, node: &Coordinates) -> Vec<&Coordinates> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &Coordinates, direction: Direction) -> Vec<&Coordinates> {
        let Some(&idx) = self.node_map.get(node) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest first
        let mut neighbors: Vec<_> = self
            .inner
            .neighbors_directed(idx, direction)
            .map(|n| &self.inner[n])
            .collect();
        neighbors.reverse();
        neighbors
    }

    /// Every node except `root`, sorted
    pub fn classpath(&self, root: &Coordinates) -> BTreeSet<Coordinates> {
        self.nodes().filter(|node| *node != root).cloned().collect()
    }

    /// Every node reachable from `node`, not including `node` itself
    pub fn reachable_from(&self, node: &Coordinates) -> BTreeSet<Coordinates> {
        let Some(&start) = self.node_map.get(node) else {
            return BTreeSet::new();
        };

        let mut reachable = BTreeSet::new();
        let mut dfs = Dfs::new(&self.inner, start);
        while let Some(idx) = dfs.next(&self.inner) {
            if idx != start {
                reachable.insert(self.inner[idx].clone());
            }
        }
        reachable
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Render as Graphviz. Project nodes are filled and project-to-project edges are bold.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "strict digraph \"{}\" {{", escape_dot(&self.name));
        let _ = writeln!(out, "  ratio=0.6;");
        let _ = writeln!(out, "  node [shape=box];");

        for node in self.nodes() {
            let style = if node.kind() == DependencyKind::Project {
                " style=filled fillcolor=\"#008080\""
            } else {
                ""
            };
            let label = escape_dot(&node.gav());
            let _ = writeln!(out, "  \"{}\" [label=\"{}\"{}];", label, label, style);
        }

        for (from, to) in self.edges() {
            let both_projects =
                from.kind() == DependencyKind::Project && to.kind() == DependencyKind::Project;
            let style = if both_projects {
                " [style=bold color=\"#FF6347\" weight=8]"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\"{};",
                escape_dot(&from.gav()),
                escape_dot(&to.gav()),
                style
            );
        }

        out.push_str("}\n");
        out
    }
}

fn escape_dot(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl PartialEq for DependencyGraphView {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.nodes().eq(other.nodes())
            && self.edges().eq(other.edges())
    }
}

impl Eq for DependencyGraphView {}

#[derive(Serialize, Deserialize)]
struct EdgeRepr {
    from: Coordinates,
    to: Coordinates,
}

#[derive(Serialize, Deserialize)]
struct GraphViewRepr {
    name: String,
    #[serde(default)]
    kind: GraphKind,
    #[serde(default)]
    nodes: Vec<Coordinates>,
    #[serde(default)]
    edges: Vec<EdgeRepr>,
}

impl From<GraphViewRepr> for DependencyGraphView {
    fn from(repr: GraphViewRepr) -> Self {
        let mut graph = DependencyGraphView::new(repr.name, repr.kind);
        for node in repr.nodes {
            graph.add_node(node);
        }
        for edge in repr.edges {
            graph.put_edge(edge.from, edge.to);
        }
        graph
    }
}

impl From<DependencyGraphView> for GraphViewRepr {
    fn from(graph: DependencyGraphView) -> Self {
        let edges = graph
            .edges()
            .map(|(from, to)| EdgeRepr {
                from: from.clone(),
                to: to.clone(),
            })
            .collect();
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges,
            name: graph.name,
            kind: graph.kind,
        }
    }
}
