use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream store records (GUAC GraphQL shape)
// ---------------------------------------------------------------------------

/// An artifact node as returned by the store (`algorithm:digest`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub digest: String,
}

/// A key/value metadata record attached to some subject in the store.
///
/// Only records keyed `"cpe"` are consumed; the subject is not needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasMetadata {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub collector: Option<String>,
    #[serde(default)]
    pub document_ref: Option<String>,
}

/// Root of a package hierarchy: one package type (ecosystem).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub pkg_type: String,
    #[serde(default)]
    pub namespaces: Vec<PackageNamespace>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageNamespace {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub names: Vec<PackageName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageName {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub versions: Vec<PackageVersion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub purl: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub qualifiers: Vec<PackageQualifier>,
    #[serde(default)]
    pub subpath: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageQualifier {
    pub key: String,
    pub value: String,
}

/// Everything one run reads from the store, fully materialized.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub artifacts: Vec<Artifact>,
    pub metadata: Vec<HasMetadata>,
    pub packages: Vec<Package>,
}

// ---------------------------------------------------------------------------
// Parsed identifiers
// ---------------------------------------------------------------------------

/// A parsed CPE string. Fields are empty when absent or wildcarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cpe {
    pub target_sw: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
    /// Never populated by the parser; carried for the GuacID `arch` mapping.
    pub target_hw: String,
    pub update: String,
    pub edition: String,
    pub language: String,
    pub sw_edition: String,
    pub other: Vec<String>,
}

/// One leaf of an expanded package hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Purl {
    pub scheme: String,
    pub pkg_type: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
    /// Value of an `arch` qualifier.
    pub qual_arch: String,
    /// Any non-`arch` qualifier, folded as `key|value`.
    pub qual_x: String,
    pub subpath: String,
}

/// Canonical identifier unifying CPE- and Purl-derived records.
///
/// Serializes only non-empty fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuacId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub digest: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub count: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ecosystem: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arch: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subpath: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pkgrel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edition: String,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Whether an identifier value looks machine-generated (hash/UUID) or human-chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeHardness {
    Soft,
    Hard,
}

impl std::fmt::Display for NodeHardness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeHardness::Soft => write!(f, "soft"),
            NodeHardness::Hard => write!(f, "hard"),
        }
    }
}

/// The attribute a graph node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Name,
    Arch,
    Ecosystem,
    Edition,
    SubPath,
    Version,
    PkgRel,
    Namespace,
    Other,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Name => write!(f, "Name"),
            NodeKind::Arch => write!(f, "Arch"),
            NodeKind::Ecosystem => write!(f, "Ecosystem"),
            NodeKind::Edition => write!(f, "Edition"),
            NodeKind::SubPath => write!(f, "SubPath"),
            NodeKind::Version => write!(f, "Version"),
            NodeKind::PkgRel => write!(f, "PkgRel"),
            NodeKind::Namespace => write!(f, "Namespace"),
            NodeKind::Other => write!(f, "Other"),
        }
    }
}

/// A vertex of the identifier graph, keyed by `"<Kind>|<value>"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifierNode {
    pub id: String,
    pub kind: NodeKind,
    pub hardness: NodeHardness,
    pub weight: Option<f32>,
}

impl IdentifierNode {
    pub fn node_id(kind: NodeKind, value: &str) -> String {
        format!("{}|{}", kind, value)
    }
}
