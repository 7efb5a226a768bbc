use std::path::Path;

use anyhow::{Context, Result};

use crate::graph::IdentifierGraph;

/// Write the identifier graph in Graphviz DOT format.
pub fn write_graph(graph: &IdentifierGraph, path: &Path) -> Result<()> {
    super::create_parent_dirs(path)?;
    std::fs::write(path, graph.to_dot())
        .with_context(|| format!("unable to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::table::IdentifierTable;
    use crate::models::GuacId;
    use tempfile::TempDir;

    #[test]
    fn test_write_graph_creates_parents() {
        let mut table = IdentifierTable::new();
        table.insert(GuacId {
            ecosystem: "pypi".to_string(),
            name: "requests".to_string(),
            version: "2.31.0".to_string(),
            ..Default::default()
        });
        let graph = IdentifierGraph::build(&table);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graphs").join("identifiers.dot");
        write_graph(&graph, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("digraph {"));
        assert!(written.contains("Name|requests"));
        assert!(written.contains("Version|2.31.0"));
        assert_eq!(written.matches(" -> ").count(), 2);
    }
}
