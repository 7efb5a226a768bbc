use std::collections::BTreeMap;

use crate::identifier::digest::digest;
use crate::models::GuacId;

/// Run-scoped digest → identifier accumulator.
///
/// Identifiers are keyed by [`digest`]; inserting one whose digest is already
/// present bumps the stored record's `count` instead of adding a second entry.
#[derive(Debug, Default)]
pub struct IdentifierTable {
    by_digest: BTreeMap<String, GuacId>,
}

/// Outcome of [`IdentifierTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    New,
    Repeat,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one identifier into the table, stamping its digest and count.
    pub fn insert(&mut self, mut id: GuacId) -> Insertion {
        let key = digest(&id);
        if let Some(existing) = self.by_digest.get_mut(&key) {
            existing.count += 1;
            return Insertion::Repeat;
        }

        id.digest = key.clone();
        id.count = 1;
        self.by_digest.insert(key, id);
        Insertion::New
    }

    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }

    /// Identifiers in digest order.
    pub fn iter(&self) -> impl Iterator<Item = &GuacId> {
        self.by_digest.values()
    }

    /// Sum of all occurrence counts, i.e. the number of records merged.
    pub fn total_occurrences(&self) -> u64 {
        self.by_digest.values().map(|id| id.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str, version: &str) -> GuacId {
        GuacId {
            ecosystem: "pypi".to_string(),
            name: name.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_repeat_increments_count() {
        let mut table = IdentifierTable::new();
        assert_eq!(table.insert(id("requests", "2.31.0")), Insertion::New);
        assert_eq!(table.insert(id("requests", "2.31.0")), Insertion::Repeat);

        assert_eq!(table.len(), 1);
        let stored = table.iter().next().unwrap();
        assert_eq!(stored.count, 2);
        assert_eq!(stored.digest, digest(&id("requests", "2.31.0")));
        assert!(!table.is_empty());
    }

    #[test]
    fn test_distinct_identifiers_kept_apart() {
        let mut table = IdentifierTable::new();
        table.insert(id("requests", "2.31.0"));
        table.insert(id("requests", "2.32.0"));
        table.insert(id("flask", "3.0.0"));
        table.insert(id("flask", "3.0.0"));

        assert_eq!(table.len(), 3);
        assert_eq!(table.total_occurrences(), 4);
    }

    #[test]
    fn test_iteration_is_digest_ordered() {
        let mut table = IdentifierTable::new();
        for v in ["1", "2", "3", "4"] {
            table.insert(id("pkg", v));
        }
        let digests: Vec<&str> = table.iter().map(|i| i.digest.as_str()).collect();
        let mut sorted = digests.clone();
        sorted.sort_unstable();
        assert_eq!(digests, sorted);
    }
}
