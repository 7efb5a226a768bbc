use std::path::PathBuf;

use clap::Parser;

use crate::community::modularity::ModularityMode;
use crate::store::StoreDriver;

#[derive(Parser, Debug)]
#[command(
    name = "guacid-communities",
    about = "Canonicalize GUAC identifiers and detect identifier communities",
    version
)]
pub struct Cli {
    /// Config file [default: ./.guacid/config.toml, fallback ~/.config/guacid/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Upstream store driver
    #[arg(long, value_name = "DRIVER")]
    pub driver: Option<StoreDriver>,

    /// Snapshot directory or GraphQL endpoint URL
    #[arg(long, value_name = "ADDR")]
    pub address: Option<String>,

    /// GuacIDs JSON output path
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the identifier graph as Graphviz DOT
    #[arg(long, value_name = "FILE")]
    pub graph_dot: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Modularity matrix form used for splitting
    #[arg(long, value_name = "MODE")]
    pub mode: Option<ModularityMode>,

    /// Minimum leading eigenvalue for a split
    #[arg(long, value_name = "VALUE")]
    pub threshold: Option<f64>,

    /// Stop after writing the GuacIDs file
    #[arg(long)]
    pub no_communities: bool,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Log spec, e.g. `warn` or `guacid_communities::community=debug`
    #[arg(long, value_name = "SPEC")]
    pub log_level: Option<String>,

    /// List every community (not just multi-node ones)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
