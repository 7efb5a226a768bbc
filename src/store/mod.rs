//! Upstream identifier stores.
//!
//! Each store materializes one [`Snapshot`] of artifacts, metadata and
//! packages. Any failure here is fatal for the run.
//!
//! - [`snapshot`] — a directory of GUAC JSON exports.
//! - [`graphql`] — a live GUAC GraphQL endpoint.

pub mod graphql;
pub mod snapshot;

use anyhow::Result;
use serde::Deserialize;

use crate::models::Snapshot;

pub trait IdentifierStore {
    async fn fetch(&self) -> Result<Snapshot>;
}

/// Which [`IdentifierStore`] implementation to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    #[default]
    Snapshot,
    Graphql,
}

impl std::fmt::Display for StoreDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreDriver::Snapshot => write!(f, "snapshot"),
            StoreDriver::Graphql => write!(f, "graphql"),
        }
    }
}
