//! # Change-Log Builder
//!
//! Tracks, for one scalar attribute of one entity within one region, the
//! sequence of observed values across versions.
//!
//! Observations are fed in ascending version order. An explicit
//! `Observed::Absent` entry means the release was extracted but the
//! attribute was missing from it; a version with no entry was simply never
//! fed. The distinction is what lets the lifecycle classifier tell a
//! removal from a data gap.

use crate::compact::dedup_versioned;
use crate::types::{Observed, VersionId};
use std::collections::BTreeMap;

/// The raw per-version observation log of one attribute in one region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeLog<T> {
    entries: BTreeMap<VersionId, Observed<T>>,
}

impl<T> AttributeLog<T> {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record one observation. Feeding the same version twice keeps the
    /// later observation (patches within a release supersede each other).
    pub fn record(&mut self, version: VersionId, observed: Observed<T>) {
        self.entries.insert(version, observed);
    }

    /// The observation at a version, if that version was fed.
    #[must_use]
    pub fn value_at(&self, version: VersionId) -> Option<&Observed<T>> {
        self.entries.get(&version)
    }

    /// The value at a version, when fed and present.
    #[must_use]
    pub fn present_at(&self, version: VersionId) -> Option<&T> {
        self.value_at(version).and_then(Observed::present)
    }

    /// The earliest version with a present value.
    #[must_use]
    pub fn first_present_version(&self) -> Option<VersionId> {
        self.entries
            .iter()
            .find(|(_, observed)| !observed.is_absent())
            .map(|(version, _)| *version)
    }

    /// True if nothing was ever recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the raw log in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = (VersionId, &Observed<T>)> {
        self.entries.iter().map(|(version, observed)| (*version, observed))
    }
}

impl<T: Clone + PartialEq> AttributeLog<T> {
    /// The compacted log: only versions where the observation changed,
    /// first entry always retained.
    #[must_use]
    pub fn compacted(&self) -> BTreeMap<VersionId, Observed<T>> {
        let mut compacted = self.entries.clone();
        dedup_versioned(&mut compacted);
        compacted
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;

    #[test]
    fn compaction_keeps_first_and_changes_only() {
        let mut log = AttributeLog::new();
        log.record(VersionId(1), Observed::Present(Level(10)));
        log.record(VersionId(2), Observed::Present(Level(10)));
        log.record(VersionId(3), Observed::Present(Level(11)));
        log.record(VersionId(4), Observed::Present(Level(11)));

        let compacted = log.compacted();
        assert_eq!(compacted.len(), 2);
        assert_eq!(compacted.get(&VersionId(1)), Some(&Observed::Present(Level(10))));
        assert_eq!(compacted.get(&VersionId(3)), Some(&Observed::Present(Level(11))));
    }

    #[test]
    fn absence_is_a_distinct_observation() {
        let mut log = AttributeLog::new();
        log.record(VersionId(1), Observed::Present(Level(10)));
        log.record(VersionId(2), Observed::Absent);

        assert_eq!(log.present_at(VersionId(1)), Some(&Level(10)));
        assert_eq!(log.present_at(VersionId(2)), None);
        // Fed as absent, not missing from the log.
        assert_eq!(log.value_at(VersionId(2)), Some(&Observed::Absent));
        // Never fed at all.
        assert_eq!(log.value_at(VersionId(3)), None);
    }

    #[test]
    fn absence_survives_compaction_as_a_change() {
        let mut log = AttributeLog::new();
        log.record(VersionId(1), Observed::Present(Level(10)));
        log.record(VersionId(2), Observed::Absent);
        log.record(VersionId(3), Observed::Absent);

        let compacted = log.compacted();
        assert_eq!(compacted.len(), 2);
        assert_eq!(compacted.get(&VersionId(2)), Some(&Observed::Absent));
    }

    #[test]
    fn zero_level_counts_as_present() {
        let mut log = AttributeLog::new();
        log.record(VersionId(1), Observed::Present(Level(0)));
        assert_eq!(log.present_at(VersionId(1)), Some(&Level(0)));
        assert_eq!(log.first_present_version(), Some(VersionId(1)));
    }

    #[test]
    fn refed_version_supersedes() {
        let mut log = AttributeLog::new();
        log.record(VersionId(1), Observed::Present(Level(10)));
        log.record(VersionId(1), Observed::Present(Level(11)));
        assert_eq!(log.present_at(VersionId(1)), Some(&Level(11)));
    }

    #[test]
    fn first_present_version_skips_leading_absence() {
        let mut log: AttributeLog<Level> = AttributeLog::new();
        log.record(VersionId(1), Observed::Absent);
        log.record(VersionId(2), Observed::Present(Level(5)));
        assert_eq!(log.first_present_version(), Some(VersionId(2)));
    }
}
