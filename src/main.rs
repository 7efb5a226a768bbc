//! `guacid-communities` — canonicalize GUAC identifiers and group them into communities.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and start logging ([`logging`]).
//! 3. Fetch artifacts, metadata and packages from the upstream store ([`store`]).
//! 4. Canonicalize CPEs and Purls into deduplicated GuacIDs ([`identifier`]).
//! 5. Write the GuacIDs JSON array ([`report::json::write_identifiers`]).
//! 6. Build the identifier graph ([`graph`]), optionally exporting it as DOT ([`report::dot`]).
//! 7. Detect communities by recursive spectral bisection ([`community`]), unless `--no-communities`.
//! 8. Render the requested report ([`report`]).

mod cli;
mod community;
mod config;
mod graph;
mod identifier;
mod logging;
mod models;
mod report;
mod store;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cli::{Cli, ReportFormat};
use community::CommunityDetector;
use config::{load_config, Config};
use graph::IdentifierGraph;
use models::Snapshot;
use report::RunSummary;
use store::graphql::GraphqlStore;
use store::snapshot::SnapshotStore;
use store::{IdentifierStore, StoreDriver};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let _logger = logging::init_logging(logging::level_spec(
        config.store.debug,
        cli.log_level.as_deref(),
    ))?;
    info!(
        "store driver={} address={}",
        config.store.driver, config.store.address
    );

    let snapshot = fetch_snapshot(&config, cli.quiet).await?;

    let (table, stats) = identifier::canonicalize(&snapshot);
    if table.is_empty() {
        warn!("no identifiers found at {}", config.store.address);
    }
    report::json::write_identifiers(&table, &config.output.path)?;
    info!(
        "wrote {} identifiers to {}",
        table.len(),
        config.output.path.display()
    );
    if !cli.quiet {
        eprintln!(
            "  {} {} identifiers → {}",
            "→".cyan(),
            table.len(),
            config.output.path.display()
        );
    }

    let graph = IdentifierGraph::build(&table);
    if let Some(path) = &config.output.graph {
        report::dot::write_graph(&graph, path)?;
        info!("wrote identifier graph to {}", path.display());
    }

    let communities = if cli.no_communities {
        None
    } else {
        let detector = CommunityDetector::new(config.detection.threshold, config.detection.mode);
        let communities = detector.detect(&graph);
        info!("detected {} communities", communities.len());
        Some(communities)
    };

    match cli.report {
        ReportFormat::Terminal => {
            let summary = RunSummary::new(&stats, &table, &graph);
            report::terminal::render(
                &summary,
                communities.as_deref(),
                &graph,
                &config.output.path,
                cli.verbose,
                cli.quiet,
            );
        }
        ReportFormat::Json => {
            report::json::render(communities.as_deref().unwrap_or_default(), &graph)?;
        }
    }

    Ok(())
}

/// CLI flags take precedence over the config file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(driver) = cli.driver {
        config.store.driver = driver;
    }
    if let Some(address) = &cli.address {
        config.store.address = address.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(graph) = &cli.graph_dot {
        config.output.graph = Some(graph.clone());
    }
    if let Some(mode) = cli.mode {
        config.detection.mode = mode;
    }
    if let Some(threshold) = cli.threshold {
        config.detection.threshold = threshold;
    }
    if cli.debug {
        config.store.debug = true;
    }
}

async fn fetch_snapshot(config: &Config, quiet: bool) -> Result<Snapshot> {
    let pb = if !quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.set_message(format!("Fetching identifiers from {}", config.store.address));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = match config.store.driver {
        StoreDriver::Snapshot => {
            SnapshotStore::new(&config.store.address, config.store.auto_migrate)
                .fetch()
                .await
        }
        StoreDriver::Graphql => GraphqlStore::new(&config.store.address)?.fetch().await,
    };

    if let Some(pb) = pb {
        match &result {
            Ok(_) => pb.finish_with_message("Done"),
            Err(_) => pb.abandon_with_message("Failed"),
        }
    }

    result
}
