//! # Compaction Engine
//!
//! Collapses versioned and regionalized mappings into their minimal
//! equivalent representation. Entity-agnostic and pure.
//!
//! The rules are lossless under fill-forward expansion: reconstructing the
//! value at any version present in the original domain from the compacted
//! form yields the original value. Compacting an already-compacted map is
//! a no-op.

use crate::types::{MaybeRegionalized, MaybeVersioned, Region, VersionId};
use std::collections::BTreeMap;

/// Drop every entry whose value equals the immediately preceding retained
/// entry, keeping the first entry unconditionally.
///
/// This is the shared reduction rule for change logs and versioned values.
pub fn dedup_versioned<T: PartialEq>(map: &mut BTreeMap<VersionId, T>) {
    let versions: Vec<VersionId> = map.keys().copied().collect();
    let mut previous: Option<VersionId> = None;
    for version in versions {
        match previous {
            Some(prev) if map.get(&prev) == map.get(&version) => {
                map.remove(&version);
            }
            _ => previous = Some(version),
        }
    }
}

/// Compact a versioned map: retain only versions where the value changed,
/// unwrapping to a bare value when a single entry survives.
#[must_use]
pub fn compact_versioned<T: Clone + PartialEq>(
    map: &BTreeMap<VersionId, T>,
) -> MaybeVersioned<T> {
    let mut compacted: BTreeMap<VersionId, T> = map.clone();
    dedup_versioned(&mut compacted);
    if compacted.len() == 1 {
        // Single retained entry: the value never changed.
        if let Some((_, value)) = compacted.pop_first() {
            return MaybeVersioned::Unversioned(value);
        }
    }
    MaybeVersioned::Versioned {
        versioned: compacted,
    }
}

/// Compact a regionalized map: compact each region's history, collapsing to
/// a single unregionalized value when every present region agrees.
#[must_use]
pub fn compact_regionalized<T: Clone + PartialEq>(
    map: &BTreeMap<Region, BTreeMap<VersionId, T>>,
) -> MaybeRegionalized<T> {
    let compacted: BTreeMap<Region, MaybeVersioned<T>> = map
        .iter()
        .map(|(region, versions)| (*region, compact_versioned(versions)))
        .collect();

    let mut values = compacted.values();
    if let Some(first) = values.next() {
        if values.all(|value| value == first) {
            return MaybeRegionalized::Unregionalized(first.clone());
        }
    }
    MaybeRegionalized::Regionalized(compacted)
}

/// Fill-forward lookup into a compacted history: the value in effect at
/// `version` is the latest retained entry at or before it.
#[must_use]
pub fn value_at<T>(compacted: &MaybeVersioned<T>, version: VersionId) -> Option<&T> {
    match compacted {
        MaybeVersioned::Unversioned(value) => Some(value),
        MaybeVersioned::Versioned { versioned } => versioned
            .range(..=version)
            .next_back()
            .map(|(_, value)| value),
    }
}

// =============================================================================
// TESTS
// =============================================================================
