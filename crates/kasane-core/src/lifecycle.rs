//! # Lifecycle Classifier
//!
//! Classifies per-region presence transitions of one entity into lifecycle
//! events by walking the region's fed versions in ascending order.
//!
//! The classifier reads the per-difficulty observation logs built by the
//! change-log pass. The base chart (index 0) defines entity presence;
//! higher indexes only ever produce `AddedChart` events. Patch deletions
//! are driven exclusively by the explicit per-record marker collected into
//! `patch_deleted` — never inferred from absence patterns.

use crate::changelog::AttributeLog;
use crate::types::{Level, LifecycleEntry, LifecycleEvent, Observed, VersionId};
use std::collections::BTreeSet;

/// Classify one (entity, region) history into an ordered lifecycle log.
///
/// - `fed_versions`: every version fed for this region, ascending.
/// - `chart_logs`: raw observation logs, one per difficulty index.
/// - `patch_deleted`: versions whose record carried the deleted-in-patch
///   marker while the entity was present.
///
/// Transitions:
/// - base present at V, absent or unrecorded at the previous version
///   → `Added`;
/// - a higher-index chart newly present at V while the base already
///   existed → `AddedChart` with the lowest such index;
/// - base present at the previous version, explicitly absent at V
///   → `RemovedFromRelease`;
/// - V flagged in `patch_deleted` (base present at V) → `RemovedInPatch`;
///   fires even at the first fed version.
///
/// No removal fires when the entity was already absent.
#[must_use]
pub fn classify_region(
    fed_versions: &[VersionId],
    chart_logs: &[AttributeLog<Level>],
    patch_deleted: &BTreeSet<VersionId>,
) -> Vec<LifecycleEntry> {
    let mut events = Vec::new();
    let base = match chart_logs.first() {
        Some(log) => log,
        None => return events,
    };

    let mut previous: Option<VersionId> = None;
    for &version in fed_versions {
        let base_now = base.present_at(version).is_some();
        let base_before = previous.is_some_and(|prev| base.present_at(prev).is_some());

        if base_now {
            if !base_before {
                events.push(LifecycleEntry {
                    version,
                    event: LifecycleEvent::Added,
                });
            } else if let Some(index) = newly_present_index(chart_logs, version, previous) {
                events.push(LifecycleEntry {
                    version,
                    event: LifecycleEvent::AddedChart { index },
                });
            }
            if patch_deleted.contains(&version) {
                events.push(LifecycleEntry {
                    version,
                    event: LifecycleEvent::RemovedInPatch,
                });
            }
        } else if base_before && matches!(base.value_at(version), Some(Observed::Absent)) {
            events.push(LifecycleEntry {
                version,
                event: LifecycleEvent::RemovedFromRelease,
            });
        }

        previous = Some(version);
    }
    events
}

/// The lowest difficulty index above the base that is present at `version`
/// but was not present at the previous fed version.
fn newly_present_index(
    chart_logs: &[AttributeLog<Level>],
    version: VersionId,
    previous: Option<VersionId>,
) -> Option<usize> {
    let prev = previous?;
    chart_logs.iter().enumerate().skip(1).find_map(|(index, log)| {
        (log.present_at(version).is_some() && log.present_at(prev).is_none()).then_some(index)
    })
}

// =============================================================================
// TESTS
// =============================================================================
