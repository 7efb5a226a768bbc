use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::graph::IdentifierGraph;

/// Induced subgraph of an [`IdentifierGraph`], held as a member set over the
/// shared graph rather than a copy.
///
/// Nodes are kept sorted by node id, which fixes matrix row order.
#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    graph: &'g IdentifierGraph,
    nodes: Vec<NodeIndex>,
    members: HashSet<NodeIndex>,
}

impl<'g> Subgraph<'g> {
    /// View spanning the whole graph.
    pub fn full(graph: &'g IdentifierGraph) -> Self {
        Self::from_nodes(graph, graph.node_indices().collect())
    }

    pub fn from_nodes(graph: &'g IdentifierGraph, mut nodes: Vec<NodeIndex>) -> Self {
        nodes.sort_by(|a, b| graph.node(*a).id.cmp(&graph.node(*b).id));
        nodes.dedup();
        let members = nodes.iter().copied().collect();
        Self {
            graph,
            nodes,
            members,
        }
    }

    /// Subgraph induced by `nodes`, keeping only edges with both endpoints inside.
    pub fn induced(&self, nodes: Vec<NodeIndex>) -> Subgraph<'g> {
        Self::from_nodes(self.graph, nodes)
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.members.contains(&idx)
    }

    /// Edges of the full graph whose endpoints both belong to this view.
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        let mut edges = Vec::new();
        for &u in &self.nodes {
            for v in self.graph.successors(u) {
                if self.contains(v) {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        let graph = self.graph;
        self.nodes.iter().map(move |idx| graph.node(*idx).id.as_str())
    }
}
