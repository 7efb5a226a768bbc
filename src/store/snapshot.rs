use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::models::{Artifact, HasMetadata, Package, Snapshot};

pub const ARTIFACTS_FILE: &str = "Artifacts.json";
pub const HAS_METADATA_FILE: &str = "HasMetadata.json";
pub const PACKAGES_FILE: &str = "Packages.json";

/// Store backed by a directory of GUAC JSON exports.
///
/// Each file holds a JSON array in the GraphQL response shape. With
/// `auto_migrate` on, a missing file reads as an empty collection, as a
/// freshly created store would.
pub struct SnapshotStore {
    dir: PathBuf,
    auto_migrate: bool,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, auto_migrate: bool) -> Self {
        Self {
            dir: dir.into(),
            auto_migrate,
        }
    }

    async fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() && self.auto_migrate {
            debug!("{} not found, treating as empty", path.display());
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("unable to read {}", path.display()))?;
        parse_collection(&content, &path)
    }
}

fn parse_collection<T: DeserializeOwned>(content: &str, path: &Path) -> Result<Vec<T>> {
    serde_json::from_str(content).with_context(|| format!("unable to parse {}", path.display()))
}

impl super::IdentifierStore for SnapshotStore {
    async fn fetch(&self) -> Result<Snapshot> {
        let artifacts: Vec<Artifact> = self.read_collection(ARTIFACTS_FILE).await?;
        let metadata: Vec<HasMetadata> = self.read_collection(HAS_METADATA_FILE).await?;
        let packages: Vec<Package> = self.read_collection(PACKAGES_FILE).await?;

        info!(
            "loaded snapshot from {}: {} artifacts, {} metadata, {} packages",
            self.dir.display(),
            artifacts.len(),
            metadata.len(),
            packages.len()
        );

        Ok(Snapshot {
            artifacts,
            metadata,
            packages,
        })
    }
}
