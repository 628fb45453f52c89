//! Collected dependency graphs.
//!
//! A [`DependencyGraph`] is what a metadata source hands back for one root:
//! every artifact the root can reach after version mediation, with one edge per
//! declared dependency. After mediation each `group:artifact:extension:classifier`
//! appears once, so diamonds share a node and a dependency back onto an
//! ancestor becomes a cycle rather than a new node.

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::artifact::ArtifactCoordinate;

/// Attributes of one declared dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Declared `<optional>true</optional>`
    pub optional: bool,
}

/// A node reached during traversal.
///
/// `ancestors` is the chain from the root (inclusive) down to the parent of
/// this node along the path the traversal took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub coordinate: ArtifactCoordinate,
    pub optional: bool,
    pub ancestors: Vec<ArtifactCoordinate>,
}

impl DependencyNode {
    /// Depth below the root (direct dependencies are at depth 1).
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if self.optional {
            write!(f, " (optional)")?;
        }
        Ok(())
    }
}

/// Dependency graph rooted at one artifact.
pub struct DependencyGraph {
    /// The underlying directed graph.
    graph: DiGraph<ArtifactCoordinate, DependencyEdge>,
    /// Map from coordinates to their graph indices.
    node_map: HashMap<ArtifactCoordinate, NodeIndex>,
    root: NodeIndex,
}

impl DependencyGraph {
    /// Create a graph containing only `root`.
    pub fn new(root: ArtifactCoordinate) -> Self {
        let mut graph = DiGraph::new();
        let index = graph.add_node(root.clone());
        let mut node_map = HashMap::new();
        node_map.insert(root, index);
        Self {
            graph,
            node_map,
            root: index,
        }
    }

    /// The artifact the graph was collected for.
    pub fn root(&self) -> &ArtifactCoordinate {
        &self.graph[self.root]
    }

    /// Add a node to the graph if it doesn't already exist.
    fn ensure_node(&mut self, node: ArtifactCoordinate) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node.clone());
            self.node_map.insert(node, index);
            index
        }
    }

    /// Record that `from` declares a dependency on `to`.
    ///
    /// Declaring the same edge twice keeps one edge, which is optional only if
    /// both declarations are.
    pub fn add_dependency(&mut self, from: &ArtifactCoordinate, to: ArtifactCoordinate, optional: bool) {
        let from_idx = self.ensure_node(from.clone());
        let to_idx = self.ensure_node(to);

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => {
                if let Some(weight) = self.graph.edge_weight_mut(edge) {
                    weight.optional &= optional;
                }
            }
            None => {
                self.graph.add_edge(from_idx, to_idx, DependencyEdge {
                    optional,
                });
            }
        }
    }

    /// Outgoing edges of a node in declaration order.
    fn ordered_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        // petgraph walks the adjacency list newest-first
        let mut edges: Vec<EdgeIndex> =
            self.graph.edges_directed(node, Direction::Outgoing).map(|e| e.id()).collect();
        edges.sort();
        edges
    }

    /// Direct dependencies of a node, in declaration order.
    pub fn dependencies(&self, node: &ArtifactCoordinate) -> Vec<(&ArtifactCoordinate, DependencyEdge)> {
        let Some(&index) = self.node_map.get(node) else {
            return Vec::new();
        };
        self.ordered_edges(index)
            .into_iter()
            .filter_map(|edge| {
                let (_, target) = self.graph.edge_endpoints(edge)?;
                Some((&self.graph[target], self.graph[edge]))
            })
            .collect()
    }

    /// Pre-order walk from the root.
    ///
    /// `admit` decides for each reached node whether it is kept and descended
    /// into. A node is visited at most once: the first admitted path wins. The
    /// root itself is not reported.
    pub fn preorder<F>(&self, mut admit: F) -> Vec<DependencyNode>
    where
        F: FnMut(&DependencyNode) -> bool,
    {
        let mut visited = HashSet::new();
        visited.insert(self.root);
        let mut result = Vec::new();
        let mut pending: Vec<(NodeIndex, bool, Vec<ArtifactCoordinate>)> = Vec::new();

        let root_path = vec![self.root().clone()];
        for edge in self.ordered_edges(self.root).into_iter().rev() {
            if let Some((_, target)) = self.graph.edge_endpoints(edge) {
                pending.push((target, self.graph[edge].optional, root_path.clone()));
            }
        }

        while let Some((index, optional, ancestors)) = pending.pop() {
            if visited.contains(&index) {
                continue;
            }
            let node = DependencyNode {
                coordinate: self.graph[index].clone(),
                optional,
                ancestors,
            };
            if !admit(&node) {
                continue;
            }
            visited.insert(index);

            let mut path = node.ancestors.clone();
            path.push(node.coordinate.clone());
            for edge in self.ordered_edges(index).into_iter().rev() {
                if let Some((_, target)) = self.graph.edge_endpoints(edge)
                    && !visited.contains(&target)
                {
                    pending.push((target, self.graph[edge].optional, path.clone()));
                }
            }
            result.push(node);
        }

        result
    }

    /// Get the total number of nodes in the graph, root included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges (dependencies) in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Build a human-readable dependency tree representation.
    pub fn to_tree_string(&self) -> String {
        let mut result = format!("{}\n", self.root());
        let mut visited = HashSet::new();
        visited.insert(self.root);
        let children = self.ordered_edges(self.root);
        for (i, edge) in children.iter().enumerate() {
            self.build_tree_string(*edge, &mut result, "", i == children.len() - 1, &mut visited);
        }
        result
    }

    fn build_tree_string(
        &self,
        edge: EdgeIndex,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let Some((_, node)) = self.graph.edge_endpoints(edge) else {
            return;
        };
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        let marker = if self.graph[edge].optional {
            " (optional)"
        } else {
            ""
        };
        result.push_str(&format!("{}{}{}{}\n", prefix, connector, self.graph[node], marker));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        if !visited.insert(node) {
            if self.graph.edges_directed(node, Direction::Outgoing).next().is_some() {
                result.push_str(&format!("{child_prefix}└── (see above)\n"));
            }
            return;
        }

        let children = self.ordered_edges(node);
        for (i, child) in children.iter().enumerate() {
            self.build_tree_string(*child, result, &child_prefix, i == children.len() - 1, visited);
        }
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("root", self.root())
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
