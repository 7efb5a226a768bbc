use crate::models::{GuacId, Package, Purl};

const PURL_SCHEME: &str = "pkg";

/// Expand a package hierarchy into one [`Purl`] per leaf.
///
/// Each level inherits its ancestors' fields. A level without children emits
/// the record built so far. Every qualifier of a version yields its own
/// record layered on the version-level fields; qualifiers are never merged.
pub fn expand_package(pkg: &Package) -> Vec<Purl> {
    let base = Purl {
        scheme: PURL_SCHEME.to_string(),
        pkg_type: pkg.pkg_type.clone(),
        ..Default::default()
    };

    if pkg.namespaces.is_empty() {
        return vec![base];
    }

    let mut purls = Vec::new();

    for namespace in &pkg.namespaces {
        let ns_purl = Purl {
            namespace: namespace.namespace.clone(),
            ..base.clone()
        };

        if namespace.names.is_empty() {
            purls.push(ns_purl);
            continue;
        }

        for name in &namespace.names {
            let name_purl = Purl {
                name: name.name.clone(),
                ..ns_purl.clone()
            };

            if name.versions.is_empty() {
                purls.push(name_purl);
                continue;
            }

            for version in &name.versions {
                let version_purl = Purl {
                    version: version.version.clone(),
                    subpath: version.subpath.clone(),
                    ..name_purl.clone()
                };

                if version.qualifiers.is_empty() {
                    purls.push(version_purl);
                    continue;
                }

                for qualifier in &version.qualifiers {
                    let mut qualifier_purl = version_purl.clone();
                    match qualifier.key.as_str() {
                        "arch" => qualifier_purl.qual_arch = qualifier.value.clone(),
                        _ => {
                            qualifier_purl.qual_x = format!("{}|{}", qualifier.key, qualifier.value)
                        }
                    }
                    purls.push(qualifier_purl);
                }
            }
        }
    }

    purls
}

impl From<Purl> for GuacId {
    fn from(purl: Purl) -> Self {
        let mut id = GuacId {
            ecosystem: purl.pkg_type,
            namespace: purl.namespace,
            name: purl.name,
            version: purl.version,
            subpath: purl.subpath,
            ..Default::default()
        };

        match id.ecosystem.as_str() {
            "deb" => id.pkgrel = id.version.clone(),
            // an empty folded qualifier is left out of `other`; the digest skips it anyway
            "core" if !purl.qual_x.is_empty() => id.other = vec![purl.qual_x],
            _ => {}
        }

        // cargo identifiers never carry an architecture
        if id.ecosystem != "cargo" {
            id.arch = purl.qual_arch;
        }

        id
    }
}
