use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::NodeHardness;

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$")
        .expect("valid uuid regex")
});
static HEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]+$").expect("valid hex regex"));

/// Hex lengths of common digests: SHAKE128/MD5, SHA-1, SHA-224, SHA-512/224,
/// SHA-256, SHA-384, SHA-512.
const DIGEST_HEX_LENGTHS: [usize; 7] = [32, 40, 48, 56, 64, 96, 128];

/// `true` when `value` is a canonical UUID or a hex string of a known digest length.
pub fn is_sha_or_uuid(value: &str) -> bool {
    if value.len() == 36 && UUID_RE.is_match(value) {
        return true;
    }

    DIGEST_HEX_LENGTHS.contains(&value.len()) && HEX_RE.is_match(value)
}

/// Classify an identifier value as machine-generated (hard) or human-chosen (soft).
pub fn classify(value: &str) -> NodeHardness {
    if is_sha_or_uuid(value) {
        NodeHardness::Hard
    } else {
        NodeHardness::Soft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_is_hard() {
        assert_eq!(classify("d41d8cd98f00b204e9800998ecf8427e"), NodeHardness::Hard);
    }

    #[test]
    fn test_uuid_is_hard() {
        assert_eq!(
            classify("550e8400-e29b-41d4-a716-446655440000"),
            NodeHardness::Hard
        );
    }

    #[test]
    fn test_sha256_is_hard() {
        assert_eq!(
            classify("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
            NodeHardness::Hard
        );
    }

    #[test]
    fn test_human_names_are_soft() {
        assert_eq!(classify("myapp"), NodeHardness::Soft);
        assert_eq!(classify(""), NodeHardness::Soft);
        assert_eq!(classify("deadbeef"), NodeHardness::Soft);
        // 33 hex chars: not a digest length
        assert_eq!(classify("d41d8cd98f00b204e9800998ecf8427ea"), NodeHardness::Soft);
        // right length, not hex
        assert_eq!(classify("z41d8cd98f00b204e9800998ecf8427e"), NodeHardness::Soft);
    }

    #[test]
    fn test_uuid_shape_must_be_exact() {
        assert!(!is_sha_or_uuid("550e8400e29b-41d4-a716-446655440000-"));
        assert!(!is_sha_or_uuid("550e8400-e29b-41d4-a716-44665544000g"));
    }
}
