use sha2::{Digest, Sha256};

use crate::models::GuacId;

/// Content digest of a [`GuacId`]: SHA-256 over its non-empty fields.
///
/// Field order is ecosystem, namespace, name, version, arch, other (sorted),
/// subpath, pkgrel, edition. `digest` and `count` never contribute.
pub fn digest(id: &GuacId) -> String {
    let mut sorted_other: Vec<&str> = id.other.iter().map(String::as_str).collect();
    sorted_other.sort_unstable();

    let mut hasher = Sha256::new();
    let fields = [
        id.ecosystem.as_str(),
        id.namespace.as_str(),
        id.name.as_str(),
        id.version.as_str(),
        id.arch.as_str(),
    ]
    .into_iter()
    .chain(sorted_other)
    .chain([id.subpath.as_str(), id.pkgrel.as_str(), id.edition.as_str()]);

    for field in fields.filter(|f| !f.is_empty()) {
        hasher.update(field.as_bytes());
    }

    hex::encode(hasher.finalize())
}
