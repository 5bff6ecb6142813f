//! # Property-Based Tests
//!
//! Determinism and compaction invariants over the merge primitives.

use kasane_core::compact::{compact_versioned, dedup_versioned, value_at};
use kasane_core::types::{Level, MaybeVersioned, VersionId};
use kasane_core::{AttributeLog, Observed};
use proptest::collection::btree_map;
use proptest::prelude::*;
use std::collections::BTreeMap;

fn versioned_levels() -> impl Strategy<Value = BTreeMap<VersionId, Level>> {
    btree_map(
        (0u16..100).prop_map(VersionId),
        (0u16..200).prop_map(Level),
        0..20,
    )
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Dedup is idempotent: compacting twice changes nothing further.
    #[test]
    fn dedup_is_idempotent(map in versioned_levels()) {
        let mut once = map;
        dedup_versioned(&mut once);
        let mut twice = once.clone();
        dedup_versioned(&mut twice);
        prop_assert_eq!(once, twice);
    }

    /// Dedup never removes the first entry and never invents versions.
    #[test]
    fn dedup_preserves_first_and_subset(map in versioned_levels()) {
        let mut deduped = map.clone();
        dedup_versioned(&mut deduped);

        if let Some((first, value)) = map.first_key_value() {
            prop_assert_eq!(deduped.get(first), Some(value));
        }
        for (version, value) in &deduped {
            prop_assert_eq!(map.get(version), Some(value));
        }
    }

    /// Fill-forward reads are unchanged by compaction at every version.
    #[test]
    fn fill_forward_survives_compaction(map in versioned_levels()) {
        let raw = MaybeVersioned::Versioned { versioned: map.clone() };
        let compacted = compact_versioned(&map);

        // Unwrapping to a bare value widens the domain below the first
        // version, so only versions from the first entry onward must agree.
        let first = map.first_key_value().map_or(u16::MAX, |(version, _)| version.0);
        for probe in first..110 {
            let version = VersionId(probe);
            prop_assert_eq!(value_at(&raw, version), value_at(&compacted, version));
        }
    }

    /// A map whose values are all equal collapses to a bare value.
    #[test]
    fn uniform_map_collapses(
        versions in proptest::collection::btree_set((0u16..100).prop_map(VersionId), 1..10),
        level in (0u16..200).prop_map(Level),
    ) {
        let map: BTreeMap<VersionId, Level> =
            versions.into_iter().map(|version| (version, level)).collect();
        prop_assert_eq!(compact_versioned(&map), MaybeVersioned::Unversioned(level));
    }

    /// Feeding the same observations in any duplication pattern is
    /// superseding, so the log state depends only on the final value per
    /// version.
    #[test]
    fn refeeding_is_superseding(map in versioned_levels()) {
        let mut log_once = AttributeLog::new();
        let mut log_twice = AttributeLog::new();

        for (&version, &level) in &map {
            log_once.record(version, Observed::Present(level));
            log_twice.record(version, Observed::Present(Level(0)));
            log_twice.record(version, Observed::Present(level));
        }
        prop_assert_eq!(log_once, log_twice);
    }
}
