//! # Cross-Region Consistency Checker
//!
//! Read-only validation over per-region difficulty logs. Chart levels are
//! expected to be region-invariant for the same version; this pass flags
//! where they are not, without ever altering the merge.
//!
//! Two classes of findings:
//! - hard mismatch: two enforced regions report different levels for the
//!   same (difficulty, version) — an error; the merge proceeds with the
//!   first-ordered region's value as canonical;
//! - pre-release mismatch: a region carried the entity before the primary
//!   region's launch with a level that differs from the primary's launch
//!   value — a lower-severity advisory, expected occasionally.
//!
//! `CONSISTENCY_EXEMPT_REGION` never participates in equality enforcement.

use crate::changelog::AttributeLog;
use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::order::{self, RegionOrder};
use crate::primitives::{CONSISTENCY_EXEMPT_REGION, PRIMARY_REGION};
use crate::types::{EntityId, Level, Region, VersionId};
use std::collections::{BTreeMap, BTreeSet};

/// Validate one entity's per-region difficulty logs.
///
/// - `logs`: per region, one observation log per difficulty index.
/// - `all_versions`: every version fed anywhere, the comparison domain.
///
/// The pre-release baseline is the primary region's first sighting of the
/// entity (its base chart); regions carrying data before that version are
/// compared against the primary's value at that version.
pub fn check_entity(
    entity: EntityId,
    name: &str,
    logs: &BTreeMap<Region, Vec<AttributeLog<Level>>>,
    all_versions: &BTreeSet<VersionId>,
    sink: &mut dyn DiagnosticSink,
) {
    let difficulty_count = logs.values().map(Vec::len).max().unwrap_or(0);
    let primary_first = logs
        .get(&PRIMARY_REGION)
        .and_then(|charts| charts.first())
        .and_then(AttributeLog::first_present_version);

    for difficulty in 0..difficulty_count {
        for &version in all_versions {
            let mut known: Option<(Region, Level)> = None;
            for region in order::regions(RegionOrder::PrimaryFirst) {
                if region == CONSISTENCY_EXEMPT_REGION {
                    continue;
                }
                let Some(level) = logs
                    .get(&region)
                    .and_then(|charts| charts.get(difficulty))
                    .and_then(|log| log.present_at(version))
                else {
                    continue;
                };

                match known {
                    Some((known_region, known_level)) if known_level != *level => {
                        sink.report(Diagnostic::error(
                            DiagnosticKind::ConsistencyMismatch,
                            Some(entity),
                            format!(
                                "chart {difficulty} ({name}) has different same-version level \
                                 ({known_region}: {known_level}, {region}: {level}) in {version}"
                            ),
                        ));
                    }
                    Some(_) => {}
                    None => known = Some((region, *level)),
                }

                if region != PRIMARY_REGION {
                    if let Some(first_seen) = primary_first {
                        if version < first_seen {
                            check_prerelease(
                                entity, name, logs, difficulty, region, version, *level,
                                first_seen, sink,
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Compare a region's pre-launch level against the primary region's value
/// at the primary's own first-seen version.
fn check_prerelease(
    entity: EntityId,
    name: &str,
    logs: &BTreeMap<Region, Vec<AttributeLog<Level>>>,
    difficulty: usize,
    region: Region,
    version: VersionId,
    level: Level,
    first_seen: VersionId,
    sink: &mut dyn DiagnosticSink,
) {
    let Some(first_level) = logs
        .get(&PRIMARY_REGION)
        .and_then(|charts| charts.get(difficulty))
        .and_then(|log| log.present_at(first_seen))
    else {
        // Missing primary data for this difficulty; nothing to compare.
        return;
    };

    if level != *first_level {
        sink.report(Diagnostic::warning(
            DiagnosticKind::PrereleaseMismatch,
            Some(entity),
            format!(
                "chart {difficulty} ({name}) launched pre-release with level \
                 {region}: {level} but {PRIMARY_REGION} opened at {first_level} \
                 in {first_seen} (seen in {version})"
            ),
        ));
    }
}

// =============================================================================
// TESTS
// =============================================================================
