//! Report renderers and output writers for a canonicalization run.
//!
//! - [`terminal`] — colored summary box and community table; respects `--verbose` / `--quiet`.
//! - [`json`] — the GuacIDs output file and the JSON community listing.
//! - [`dot`] — Graphviz export of the identifier graph.

pub mod dot;
pub mod json;
pub mod terminal;

use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::IdentifierGraph;
use crate::identifier::table::IdentifierTable;
use crate::identifier::CanonicalizeStats;

/// Counters shown in the report header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub artifacts: usize,
    pub records: usize,
    pub cpe_skipped: usize,
    pub identifiers: usize,
    pub occurrences: u64,
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub hard_nodes: usize,
    pub soft_nodes: usize,
}

impl RunSummary {
    pub fn new(stats: &CanonicalizeStats, table: &IdentifierTable, graph: &IdentifierGraph) -> Self {
        let (hard_nodes, soft_nodes) = graph.hardness_counts();
        RunSummary {
            artifacts: stats.artifacts,
            records: stats.records(),
            cpe_skipped: stats.cpe_skipped,
            identifiers: table.len(),
            occurrences: table.total_occurrences(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            components: graph.strongly_connected_components(),
            hard_nodes,
            soft_nodes,
        }
    }
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }
    Ok(())
}
