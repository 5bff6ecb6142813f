//! # Snapshot Store
//!
//! The immutable two-level input structure consumed by the mergers.
//!
//! A `SnapshotSet<T>` maps `Region -> VersionId -> EntityId -> T`, where
//! `T` is one entity kind's snapshot record. It is built once by the
//! loading stage, then only read; all traversal goes through the ordering
//! provider so downstream passes are deterministic.

use crate::order::{self, RegionOrder, VersionOrder};
use crate::types::{EntityId, Region, VersionId};
use std::collections::BTreeMap;

/// One release's records for a single entity kind.
pub type Release<T> = BTreeMap<EntityId, T>;

/// All snapshots for one entity kind, keyed by region and version.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSet<T> {
    regions: BTreeMap<Region, BTreeMap<VersionId, Release<T>>>,
}

impl<T> SnapshotSet<T> {
    /// Create an empty snapshot set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Insert one release snapshot. Replaces any previous snapshot for the
    /// same (region, version) pair.
    pub fn insert_release(&mut self, region: Region, version: VersionId, release: Release<T>) {
        self.regions
            .entry(region)
            .or_default()
            .insert(version, release);
    }

    /// The release snapshot for one (region, version) pair, if fed.
    #[must_use]
    pub fn release(&self, region: Region, version: VersionId) -> Option<&Release<T>> {
        self.regions.get(&region)?.get(&version)
    }

    /// One entity's record in one release, if present.
    #[must_use]
    pub fn record(&self, region: Region, version: VersionId, entity: EntityId) -> Option<&T> {
        self.release(region, version)?.get(&entity)
    }

    /// Regions that contributed at least one release.
    #[must_use]
    pub fn regions_present(&self) -> Vec<Region> {
        self.regions.keys().copied().collect()
    }

    /// The versions fed for one region, in the requested order.
    #[must_use]
    pub fn region_versions(&self, region: Region, ord: VersionOrder) -> Vec<VersionId> {
        self.regions
            .get(&region)
            .map(|versions| order::versions(versions, ord))
            .unwrap_or_default()
    }

    /// The version fed for a region immediately after `version`, if any.
    #[must_use]
    pub fn next_version(&self, region: Region, version: VersionId) -> Option<VersionId> {
        let versions = self.regions.get(&region)?;
        versions
            .range(VersionId(version.0.checked_add(1)?)..)
            .next()
            .map(|(v, _)| *v)
    }

    /// True if no release was fed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.values().all(BTreeMap::is_empty)
    }

    /// Total number of releases fed across all regions.
    #[must_use]
    pub fn release_count(&self) -> usize {
        self.regions.values().map(BTreeMap::len).sum()
    }

    /// Visit every fed release in the requested region and version order.
    pub fn for_each_ordered<F>(&self, region_order: RegionOrder, version_order: VersionOrder, mut f: F)
    where
        F: FnMut(Region, VersionId, &Release<T>),
    {
        for region in order::regions(region_order) {
            let Some(versions) = self.regions.get(&region) else {
                continue;
            };
            for version in order::versions(versions, version_order) {
                if let Some(release) = versions.get(&version) {
                    f(region, version, release);
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
