use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::community::Community;
use crate::graph::IdentifierGraph;
use crate::models::NodeHardness;

use super::RunSummary;

/// Member ids shown per community row before eliding.
const SAMPLE_MEMBERS: usize = 5;

/// Render a colored terminal report.
pub fn render(
    summary: &RunSummary,
    communities: Option<&[Community]>,
    graph: &IdentifierGraph,
    output: &Path,
    verbose: bool,
    quiet: bool,
) {
    let community_count = communities.map_or(0, |c| c.len());

    if quiet {
        println!(
            "Identifiers: {}  Nodes: {}  Edges: {}  Communities: {}  Skipped CPEs: {}",
            summary.identifiers,
            summary.nodes,
            summary.edges,
            community_count.to_string().green(),
            summary.cpe_skipped.to_string().yellow(),
        );
        return;
    }

    println!(
        "\n {} v{}",
        "guacid-communities".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Output: {}\n", output.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Artifacts fetched     : {}", summary.artifacts)
    );
    println!(
        " │  {:<48} │",
        format!("Records canonicalized : {}", summary.records)
    );
    println!(
        " │  {:<48} │",
        format!(
            "Unique identifiers    : {} ({} occurrences)",
            summary.identifiers, summary.occurrences
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Skipped CPEs       : {:>4}", "⚠".yellow(), summary.cpe_skipped)
    );
    println!(
        " │  {:<48} │",
        format!("Graph                 : {} nodes, {} edges", summary.nodes, summary.edges)
    );
    println!(
        " │  {:<48} │",
        format!("Strong components     : {}", summary.components)
    );
    println!(
        " │  {:<48} │",
        format!(
            "Hard / soft nodes     : {} / {}",
            summary.hard_nodes, summary.soft_nodes
        )
    );
    match communities {
        Some(_) => println!(
            " │  {:<48} │",
            format!("{}  Communities        : {:>4}", "✓".green(), community_count)
        ),
        None => println!(" │  {:<48} │", "Communities           : skipped"),
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    let Some(communities) = communities else {
        return;
    };

    let shown: Vec<&Community> = communities
        .iter()
        .filter(|c| verbose || c.size > 1)
        .collect();
    if shown.is_empty() {
        return;
    }

    let label = if verbose { "All communities:" } else { "Multi-node communities:" };
    println!(" {} {}\n", "[COMMUNITIES]".cyan().bold(), label);
    render_table(&shown, graph);
    println!();
}

fn render_table(communities: &[&Community], graph: &IdentifierGraph) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Community").add_attribute(Attribute::Bold),
            Cell::new("Depth").add_attribute(Attribute::Bold),
            Cell::new("Size").add_attribute(Attribute::Bold),
            Cell::new("Edges").add_attribute(Attribute::Bold),
            Cell::new("Hard").add_attribute(Attribute::Bold),
            Cell::new("Members").add_attribute(Attribute::Bold),
        ]);

    for community in communities {
        let sub = community.subgraph(graph);
        let hard = community
            .members
            .iter()
            .filter(|idx| graph.node(**idx).hardness == NodeHardness::Hard)
            .count();
        let hard_color = if hard > 0 { Color::Green } else { Color::DarkGrey };

        table.add_row(vec![
            Cell::new(&community.id),
            Cell::new(community.depth()).set_alignment(CellAlignment::Right),
            Cell::new(community.size).set_alignment(CellAlignment::Right),
            Cell::new(sub.edge_count()).set_alignment(CellAlignment::Right),
            Cell::new(hard).fg(hard_color).set_alignment(CellAlignment::Right),
            Cell::new(sample_members(sub.node_ids(), community.size)),
        ]);
    }

    println!("{}", table);
}

fn sample_members<'a>(ids: impl Iterator<Item = &'a str>, size: usize) -> String {
    let sample: Vec<&str> = ids.take(SAMPLE_MEMBERS).collect();
    if size > sample.len() {
        format!("{}, … (+{})", sample.join(", "), size - sample.len())
    } else {
        sample.join(", ")
    }
}
