//! Identifier graph: attribute values → the software names they describe.
//!
//! Every non-empty attribute of a [`GuacId`] becomes a `"<Kind>|<value>"`
//! vertex with a directed edge into the identifier's `"Name|<name>"` vertex.
//! Vertices shared between identifiers are what tie them together.

pub mod hardness;

use std::collections::HashMap;

use log::{debug, warn};
use petgraph::algo::kosaraju_scc;
use petgraph::dot::{Config as DotConfig, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use thiserror::Error;

use crate::identifier::table::IdentifierTable;
use crate::models::{GuacId, IdentifierNode, NodeHardness, NodeKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex not found: {0}")]
    MissingVertex(String),
}

/// Directed identifier graph with a node-id lookup index.
#[derive(Debug, Default)]
pub struct IdentifierGraph {
    graph: DiGraph<IdentifierNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl IdentifierGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from every identifier in `table`.
    ///
    /// Insertion failures are logged and skipped; construction never aborts.
    pub fn build(table: &IdentifierTable) -> Self {
        let mut graph = Self::new();
        for id in table.iter() {
            graph.add_identifier(id);
        }
        debug!(
            "built identifier graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Link one identifier's attributes to its name vertex.
    ///
    /// Hardness of every vertex created here is derived from the identifier's
    /// name, not from the attribute value itself.
    pub fn add_identifier(&mut self, id: &GuacId) {
        let hardness = hardness::classify(&id.name);
        let name_id = IdentifierNode::node_id(NodeKind::Name, &id.name);

        if !id.name.is_empty() {
            self.add_vertex(NodeKind::Name, &id.name, hardness);
        }

        let attributes = [
            (NodeKind::Arch, id.arch.as_str()),
            (NodeKind::Ecosystem, id.ecosystem.as_str()),
            (NodeKind::Edition, id.edition.as_str()),
            (NodeKind::SubPath, id.subpath.as_str()),
            (NodeKind::Version, id.version.as_str()),
            (NodeKind::PkgRel, id.pkgrel.as_str()),
            (NodeKind::Namespace, id.namespace.as_str()),
        ]
        .into_iter()
        .chain(id.other.iter().map(|o| (NodeKind::Other, o.as_str())));

        for (kind, value) in attributes.filter(|(_, v)| !v.is_empty()) {
            let attr_id = IdentifierNode::node_id(kind, value);
            if self.contains_node(&attr_id) {
                debug!("vertex already exists: {}", attr_id);
            }
            self.add_vertex(kind, value, hardness);

            match self.add_edge(&attr_id, &name_id) {
                Ok(true) => {}
                Ok(false) => debug!("edge already exists: {} -> {}", attr_id, name_id),
                Err(err) => warn!("cannot link {} -> {}: {}", attr_id, name_id, err),
            }
        }
    }

    /// Insert a vertex unless one with the same id exists; returns its index either way.
    pub fn add_vertex(&mut self, kind: NodeKind, value: &str, hardness: NodeHardness) -> NodeIndex {
        let id = IdentifierNode::node_id(kind, value);
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }

        let idx = self.graph.add_node(IdentifierNode {
            id: id.clone(),
            kind,
            hardness,
            weight: None,
        });
        self.index.insert(id, idx);
        idx
    }

    /// Insert `from → to` unless it exists. `Ok(false)` means it already did.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<bool, GraphError> {
        let source = self
            .node_index(from)
            .ok_or_else(|| GraphError::MissingVertex(from.to_string()))?;
        let target = self
            .node_index(to)
            .ok_or_else(|| GraphError::MissingVertex(to.to_string()))?;

        if self.graph.find_edge(source, target).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(source, target, ());
        Ok(true)
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(source), Some(target)) => self.graph.find_edge(source, target).is_some(),
            _ => false,
        }
    }

    pub fn node(&self, idx: NodeIndex) -> &IdentifierNode {
        &self.graph[idx]
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &IdentifierNode> {
        self.graph.node_weights()
    }

    pub fn successors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of strongly connected components.
    pub fn strongly_connected_components(&self) -> usize {
        kosaraju_scc(&self.graph).len()
    }

    /// Graphviz rendering, one vertex per node labelled with its id and hardness.
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[DotConfig::EdgeNoLabel, DotConfig::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, node)| {
                let color = match node.hardness {
                    NodeHardness::Hard => "firebrick",
                    NodeHardness::Soft => "steelblue",
                };
                format!(
                    "label = \"{}\\n{}\", color = {} ",
                    escape_label(&node.id),
                    node.hardness,
                    color
                )
            },
        );
        format!("{:?}", dot)
    }

    pub fn hardness_counts(&self) -> (usize, usize) {
        self.nodes().fold((0, 0), |(hard, soft), node| match node.hardness {
            NodeHardness::Hard => (hard + 1, soft),
            NodeHardness::Soft => (hard, soft + 1),
        })
    }
}

fn escape_label(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guac_id(name: &str) -> GuacId {
        GuacId {
            ecosystem: "deb".to_string(),
            namespace: "debian".to_string(),
            name: name.to_string(),
            version: "1.0-1".to_string(),
            pkgrel: "1.0-1".to_string(),
            arch: "amd64".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_k_attributes_give_k_edges() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&guac_id("curl"));

        // name + arch + ecosystem + version + pkgrel + namespace
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
        assert!(graph.has_edge("Arch|amd64", "Name|curl"));
        assert!(graph.has_edge("PkgRel|1.0-1", "Name|curl"));
        assert!(graph.has_edge("Version|1.0-1", "Name|curl"));
        assert!(!graph.has_edge("Name|curl", "Arch|amd64"));
    }

    #[test]
    fn test_shared_attributes_reuse_vertices() {
        let mut table = IdentifierTable::new();
        table.insert(guac_id("curl"));
        table.insert(guac_id("wget"));
        table.insert(guac_id("curl"));

        let graph = IdentifierGraph::build(&table);
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn test_adding_twice_is_a_no_op() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&guac_id("curl"));
        graph.add_identifier(&guac_id("curl"));
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.add_edge("Arch|amd64", "Name|curl"), Ok(false));
    }

    #[test]
    fn test_other_entries_each_get_a_vertex() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&GuacId {
            name: "kernel".to_string(),
            other: vec!["flavor|rt".to_string(), "".to_string(), "x".to_string()],
            ..Default::default()
        });
        assert!(graph.contains_node("Other|flavor|rt"));
        assert!(graph.contains_node("Other|x"));
        assert!(!graph.contains_node("Other|"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_hardness_follows_the_name() {
        let digest_name = "d41d8cd98f00b204e9800998ecf8427e";
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&GuacId {
            name: digest_name.to_string(),
            version: "1.0".to_string(),
            ..Default::default()
        });

        let name_idx = graph.node_index(&format!("Name|{}", digest_name)).unwrap();
        let version_idx = graph.node_index("Version|1.0").unwrap();
        assert_eq!(graph.node(name_idx).hardness, NodeHardness::Hard);
        assert_eq!(graph.node(version_idx).hardness, NodeHardness::Hard);

        // first creator wins
        graph.add_identifier(&GuacId {
            name: "myapp".to_string(),
            version: "1.0".to_string(),
            ..Default::default()
        });
        assert_eq!(graph.node(version_idx).hardness, NodeHardness::Hard);
        assert_eq!(graph.hardness_counts(), (2, 1));
    }

    #[test]
    fn test_nameless_identifier_keeps_going() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&GuacId {
            ecosystem: "npm".to_string(),
            ..Default::default()
        });
        assert!(graph.contains_node("Ecosystem|npm"));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(
            graph.add_edge("Ecosystem|npm", "Name|"),
            Err(GraphError::MissingVertex("Name|".to_string()))
        );
    }

    #[test]
    fn test_dot_labels_id_and_hardness() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&guac_id("curl"));
        graph.add_identifier(&GuacId {
            name: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            other: vec!["say \"hi\"".to_string()],
            ..Default::default()
        });

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains(r#"label = "Name|curl\nsoft", color = steelblue"#));
        assert!(dot.contains(r#"label = "Other|say \"hi\"\nhard", color = firebrick"#));
        assert_eq!(dot.matches(" -> ").count(), graph.edge_count());
    }

    #[test]
    fn test_strongly_connected_components() {
        let mut graph = IdentifierGraph::new();
        graph.add_identifier(&guac_id("curl"));
        // attribute -> name edges never close a cycle
        assert_eq!(graph.strongly_connected_components(), graph.node_count());

        graph.add_vertex(NodeKind::Name, "a", NodeHardness::Soft);
        graph.add_vertex(NodeKind::Name, "b", NodeHardness::Soft);
        graph.add_edge("Name|a", "Name|b").unwrap();
        graph.add_edge("Name|b", "Name|a").unwrap();
        assert_eq!(graph.strongly_connected_components(), 7);
    }
}
