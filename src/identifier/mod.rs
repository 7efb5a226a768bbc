//! Identifier canonicalization: CPE/Purl records → deduplicated [`GuacId`]s.
//!
//! - [`cpe`] — CPE string parser and the CPE → GuacID mapping.
//! - [`purl`] — package hierarchy expansion and the Purl → GuacID mapping.
//! - [`digest`] — content digest over the canonical fields.
//! - [`table`] — the run-scoped digest → identifier accumulator.

pub mod cpe;
pub mod digest;
pub mod purl;
pub mod table;

use log::{debug, warn};

use crate::models::{GuacId, Snapshot};
use cpe::parse_cpe;
use purl::expand_package;
use table::IdentifierTable;

/// Metadata key whose values are CPE strings.
const CPE_METADATA_KEY: &str = "cpe";

/// Counters describing one canonicalization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CanonicalizeStats {
    pub artifacts: usize,
    pub cpe_parsed: usize,
    pub cpe_skipped: usize,
    pub purls: usize,
}

impl CanonicalizeStats {
    pub fn records(&self) -> usize {
        self.cpe_parsed + self.purls
    }
}

/// Canonicalize every CPE metadata record and package leaf of `snapshot`.
///
/// Unparseable CPEs are logged and skipped. Artifacts are only counted.
pub fn canonicalize(snapshot: &Snapshot) -> (IdentifierTable, CanonicalizeStats) {
    let mut table = IdentifierTable::new();
    let mut stats = CanonicalizeStats {
        artifacts: snapshot.artifacts.len(),
        ..Default::default()
    };

    for metadata in snapshot
        .metadata
        .iter()
        .filter(|m| m.key == CPE_METADATA_KEY)
    {
        match parse_cpe(&metadata.value) {
            Ok(cpe) => {
                table.insert(GuacId::from(cpe));
                stats.cpe_parsed += 1;
            }
            Err(err) => {
                warn!("skipping metadata {}: {}", metadata.id, err);
                stats.cpe_skipped += 1;
            }
        }
    }

    for package in &snapshot.packages {
        for purl in expand_package(package) {
            table.insert(GuacId::from(purl));
            stats.purls += 1;
        }
    }

    debug!(
        "canonicalized {} records into {} identifiers",
        stats.records(),
        table.len()
    );

    (table, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        HasMetadata, Package, PackageName, PackageNamespace, PackageQualifier, PackageVersion,
    };

    fn metadata(key: &str, value: &str) -> HasMetadata {
        HasMetadata {
            key: key.to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    fn npm_package(versions: &[&str]) -> Package {
        Package {
            pkg_type: "npm".to_string(),
            namespaces: vec![PackageNamespace {
                namespace: "".to_string(),
                names: vec![PackageName {
                    name: "left-pad".to_string(),
                    versions: versions
                        .iter()
                        .map(|v| PackageVersion {
                            version: v.to_string(),
                            ..Default::default()
                        })
                        .collect(),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_only_cpe_metadata_consumed() {
        let snapshot = Snapshot {
            metadata: vec![
                metadata("cpe", "cpe:/a:vendor:product:1.0:update1:edition1"),
                metadata("license", "MIT"),
                metadata("cpe", "cpe:/*:vendor:product:1.0:update1"),
            ],
            ..Default::default()
        };

        let (table, stats) = canonicalize(&snapshot);
        assert_eq!(table.len(), 1);
        assert_eq!(stats.cpe_parsed, 1);
        assert_eq!(stats.cpe_skipped, 1);
    }

    #[test]
    fn test_same_identifier_twice_counts_two() {
        let snapshot = Snapshot {
            packages: vec![npm_package(&["1.3.0"]), npm_package(&["1.3.0"])],
            ..Default::default()
        };

        let (table, stats) = canonicalize(&snapshot);
        assert_eq!(stats.purls, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().unwrap().count, 2);
    }

    #[test]
    fn test_non_arch_qualifiers_collapse_for_plain_ecosystems() {
        let mut pkg = npm_package(&["1.3.0"]);
        pkg.namespaces[0].names[0].versions[0].qualifiers = vec![
            PackageQualifier {
                key: "repository_url".to_string(),
                value: "a.example".to_string(),
            },
            PackageQualifier {
                key: "repository_url".to_string(),
                value: "b.example".to_string(),
            },
        ];
        let snapshot = Snapshot {
            packages: vec![pkg],
            ..Default::default()
        };

        let (table, stats) = canonicalize(&snapshot);
        assert_eq!(stats.purls, 2);
        assert_eq!(table.len(), 1);
        assert_eq!(table.total_occurrences(), 2);
    }
}
