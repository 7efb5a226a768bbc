use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::community::Community;
use crate::graph::IdentifierGraph;
use crate::identifier::table::IdentifierTable;
use crate::models::GuacId;

/// Write every identifier, in digest order, as a pretty-printed JSON array.
pub fn write_identifiers(table: &IdentifierTable, path: &Path) -> Result<()> {
    super::create_parent_dirs(path)?;
    let records: Vec<&GuacId> = table.iter().collect();
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json).with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}

/// One community as printed by `--report json`.
#[derive(Debug, Serialize)]
pub struct CommunityRecord<'g> {
    pub id: &'g str,
    pub size: usize,
    pub nodes: Vec<&'g str>,
}

pub fn community_records<'g>(
    communities: &'g [Community],
    graph: &'g IdentifierGraph,
) -> Vec<CommunityRecord<'g>> {
    communities
        .iter()
        .map(|c| CommunityRecord {
            id: &c.id,
            size: c.size,
            nodes: c.members.iter().map(|idx| graph.node(*idx).id.as_str()).collect(),
        })
        .collect()
}

pub fn render(communities: &[Community], graph: &IdentifierGraph) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&community_records(communities, graph))?
    );
    Ok(())
}
