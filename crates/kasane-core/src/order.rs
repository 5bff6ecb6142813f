//! # Ordering Provider
//!
//! Canonical traversal orders over regions and versions.
//!
//! Every component that walks snapshots MUST take its iteration order from
//! here rather than from any incidental map order: output determinism and
//! all "first seen" / "last seen" semantics depend on it. Orders are stable
//! and total; regions and versions are distinct by construction, so ties
//! cannot occur.

use crate::types::{Region, VersionId};
use std::collections::BTreeMap;

/// Traversal order over regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionOrder {
    /// Primary region first (canonical order for merging).
    PrimaryFirst,
    /// Primary region last.
    PrimaryLast,
}

/// Traversal order over versions within a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrder {
    /// Ascending release order (change-log construction).
    OldestFirst,
    /// Descending release order (base attribute seeding).
    NewestFirst,
}

/// All regions in the requested traversal order.
#[must_use]
pub const fn regions(order: RegionOrder) -> [Region; 3] {
    match order {
        RegionOrder::PrimaryFirst => Region::ALL,
        RegionOrder::PrimaryLast => [Region::Cn, Region::Intl, Region::Jp],
    }
}

/// The keys of a version-indexed map in the requested traversal order.
#[must_use]
pub fn versions<T>(map: &BTreeMap<VersionId, T>, order: VersionOrder) -> Vec<VersionId> {
    let mut keys: Vec<VersionId> = map.keys().copied().collect();
    if matches!(order, VersionOrder::NewestFirst) {
        keys.reverse();
    }
    keys
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_first_starts_with_jp() {
        assert_eq!(
            regions(RegionOrder::PrimaryFirst),
            [Region::Jp, Region::Intl, Region::Cn]
        );
    }

    #[test]
    fn primary_last_is_exact_reverse() {
        let mut reversed = regions(RegionOrder::PrimaryFirst);
        reversed.reverse();
        assert_eq!(regions(RegionOrder::PrimaryLast), reversed);
    }

    #[test]
    fn version_orders_are_mirrored() {
        let mut map = BTreeMap::new();
        map.insert(VersionId(15), ());
        map.insert(VersionId(13), ());
        map.insert(VersionId(14), ());

        assert_eq!(
            versions(&map, VersionOrder::OldestFirst),
            vec![VersionId(13), VersionId(14), VersionId(15)]
        );
        assert_eq!(
            versions(&map, VersionOrder::NewestFirst),
            vec![VersionId(15), VersionId(14), VersionId(13)]
        );
    }
}
