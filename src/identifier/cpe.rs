use thiserror::Error;

use crate::models::{Cpe, GuacId};

const WILDCARD: &str = "*";

/// Returned when a CPE string lacks mandatory segments or wildcards one of them.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid CPE format: {raw}")]
pub struct CpeFormatError {
    pub raw: String,
}

/// Parse a colon-delimited CPE string.
///
/// Segments 1–5 are mandatory and map to target software, vendor, product,
/// version and update, in that order, even for `cpe:2.3` strings where the
/// first segment is the binding version. Segments 6–8 fill edition, language
/// and software edition; everything after that lands in `other`. Wildcards
/// in optional positions are dropped.
pub fn parse_cpe(raw: &str) -> Result<Cpe, CpeFormatError> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 6 || parts[1..6].iter().any(|p| is_wildcard(p)) {
        return Err(CpeFormatError {
            raw: raw.to_string(),
        });
    }

    let optional = |idx: usize| -> String {
        match parts.get(idx) {
            Some(p) if !is_wildcard(p) => p.to_string(),
            _ => String::new(),
        }
    };

    let other = parts
        .iter()
        .skip(9)
        .filter(|p| !is_wildcard(p))
        .map(|p| p.to_string())
        .collect();

    Ok(Cpe {
        target_sw: parts[1].to_string(),
        vendor: parts[2].to_string(),
        product: parts[3].to_string(),
        version: parts[4].to_string(),
        target_hw: String::new(),
        update: parts[5].to_string(),
        edition: optional(6),
        language: optional(7),
        sw_edition: optional(8),
        other,
    })
}

/// `*`, also in the URI-bound form `/*` that follows a `cpe:/` prefix.
fn is_wildcard(segment: &str) -> bool {
    segment.strip_prefix('/').unwrap_or(segment) == WILDCARD
}

impl From<Cpe> for GuacId {
    fn from(cpe: Cpe) -> Self {
        GuacId {
            ecosystem: cpe.target_sw,
            namespace: cpe.vendor,
            name: cpe.product,
            version: cpe.version,
            arch: cpe.target_hw,
            other: cpe.other,
            pkgrel: cpe.update,
            edition: cpe.edition,
            ..Default::default()
        }
    }
}
