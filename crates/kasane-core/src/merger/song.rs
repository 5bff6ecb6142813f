//! # Song Merger
//!
//! The full multi-pass merge for the song entity kind.
//!
//! Passes, in order:
//! 1. base pass (primary-first, newest-first): seed region-invariant
//!    attributes, grow the global chart list append-only, seed per-region
//!    open dates and first-version tags;
//! 2. change-log pass (primary-first, oldest-first): feed per-difficulty
//!    observation logs per region, with explicit absence markers for
//!    entities missing from a release they were known in, phantom
//!    bonus-chart correction, and patch-deletion marker collection;
//! 3. consistency pass: cross-region validation (read-only);
//! 4. assembly: merged per-difficulty change logs (first-seen region
//!    canonical), per-region lifecycle classification, final compaction.

use crate::changelog::AttributeLog;
use crate::compact::dedup_versioned;
use crate::consistency;
use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::lifecycle;
use crate::order::{RegionOrder, VersionOrder};
use crate::primitives::{MAX_CHART_SLOTS, MAX_NAME_LENGTH, PHANTOM_CHART_INDEX, PHANTOM_CHART_VERSION};
use crate::snapshot::SnapshotSet;
use crate::types::{
    EntityId, Level, MergeError, MergedSong, Observed, Region, RegionalInfo, SongSnapshot,
    VersionId,
};
use std::collections::{BTreeMap, BTreeSet};

/// Per-entity, per-region observation logs (one log per difficulty).
type EntityLogs = BTreeMap<EntityId, BTreeMap<Region, Vec<AttributeLog<Level>>>>;

/// Per-entity, per-region versions whose record carried the patch marker.
type PatchMarkers = BTreeMap<EntityId, BTreeMap<Region, BTreeSet<VersionId>>>;

/// Merge all song snapshots into canonical records.
pub fn merge(
    snapshots: &SnapshotSet<SongSnapshot>,
    sink: &mut dyn DiagnosticSink,
) -> Result<BTreeMap<EntityId, MergedSong>, MergeError> {
    validate(snapshots)?;

    let mut songs = base_pass(snapshots);
    let (logs, patch_markers) = changelog_pass(snapshots, &songs, sink);

    let all_versions: BTreeSet<VersionId> = snapshots
        .regions_present()
        .into_iter()
        .flat_map(|region| snapshots.region_versions(region, VersionOrder::OldestFirst))
        .collect();

    for (&entity, song) in &songs {
        if let Some(entity_logs) = logs.get(&entity) {
            consistency::check_entity(entity, &song.name, entity_logs, &all_versions, sink);
        }
    }

    assemble(snapshots, &mut songs, &logs, &patch_markers, sink);
    Ok(songs)
}

/// Structural validation of every record before any state is built.
fn validate(snapshots: &SnapshotSet<SongSnapshot>) -> Result<(), MergeError> {
    let mut result: Result<(), MergeError> = Ok(());
    snapshots.for_each_ordered(
        RegionOrder::PrimaryFirst,
        VersionOrder::OldestFirst,
        |region, version, release| {
            for (&entity, record) in release {
                if result.is_err() {
                    return;
                }
                let malformed = |detail: String| MergeError::MalformedSnapshot {
                    region,
                    version,
                    entity,
                    detail,
                };
                if record.name.is_empty() || record.name.len() > MAX_NAME_LENGTH {
                    result = Err(malformed("name empty or over length limit".to_string()));
                } else if record.charts.len() != record.chart_levels.len() {
                    result = Err(malformed(format!(
                        "chart list ({}) and level list ({}) lengths differ",
                        record.charts.len(),
                        record.chart_levels.len()
                    )));
                } else if record.charts.len() > MAX_CHART_SLOTS {
                    result = Err(malformed(format!(
                        "chart list exceeds {MAX_CHART_SLOTS} slots"
                    )));
                }
            }
        },
    );
    result
}

/// Number of charts of a record that participate in the merge.
///
/// The phantom bonus chart of the known correction release is excluded:
/// a top-difficulty chart observed only at `PHANTOM_CHART_VERSION`, gone
/// again in the region's next release while the song itself survived, was
/// never real.
fn effective_chart_count(
    snapshots: &SnapshotSet<SongSnapshot>,
    region: Region,
    version: VersionId,
    entity: EntityId,
    record: &SongSnapshot,
) -> usize {
    let count = record.chart_levels.len();
    if version != PHANTOM_CHART_VERSION || count != PHANTOM_CHART_INDEX + 1 {
        return count;
    }
    let confirmed_gone = snapshots
        .next_version(region, version)
        .and_then(|next| snapshots.record(region, next, entity))
        .is_some_and(|next_record| next_record.chart_levels.len() <= PHANTOM_CHART_INDEX);
    if confirmed_gone { PHANTOM_CHART_INDEX } else { count }
}

/// Seed base attributes, the global chart list and per-region info.
fn base_pass(snapshots: &SnapshotSet<SongSnapshot>) -> BTreeMap<EntityId, MergedSong> {
    let mut songs: BTreeMap<EntityId, MergedSong> = BTreeMap::new();

    snapshots.for_each_ordered(
        RegionOrder::PrimaryFirst,
        VersionOrder::NewestFirst,
        |region, version, release| {
            for (&entity, record) in release {
                let chart_count = effective_chart_count(snapshots, region, version, entity, record);
                let song = songs.entry(entity).or_insert_with(|| MergedSong {
                    name: record.name.clone(),
                    artist: record.artist.clone(),
                    genre: record.genre.clone(),
                    bpm: record.bpm,
                    charts: record.charts[..chart_count].to_vec(),
                    level_change_log: Vec::new(),
                    regional_info: BTreeMap::new(),
                });

                // A release with more charts extends the global list; charts
                // are only ever appended, never reordered or removed.
                if song.charts.len() < chart_count {
                    song.charts
                        .extend_from_slice(&record.charts[song.charts.len()..chart_count]);
                }

                let info = song
                    .regional_info
                    .entry(region)
                    .or_insert_with(|| RegionalInfo {
                        first_version: record.release_version,
                        lifecycle: Vec::new(),
                        net_open_date: None,
                        event_date: None,
                    });
                // Newest-first traversal: the newest non-null date wins.
                if info.net_open_date.is_none() {
                    info.net_open_date.clone_from(&record.net_open_date);
                }
                if info.event_date.is_none() {
                    info.event_date.clone_from(&record.event_date);
                }
            }
        },
    );
    songs
}

/// Feed per-difficulty observation logs and collect patch markers.
fn changelog_pass(
    snapshots: &SnapshotSet<SongSnapshot>,
    songs: &BTreeMap<EntityId, MergedSong>,
    sink: &mut dyn DiagnosticSink,
) -> (EntityLogs, PatchMarkers) {
    let known: BTreeSet<EntityId> = songs.keys().copied().collect();
    let mut logs: EntityLogs = known
        .iter()
        .map(|&entity| (entity, BTreeMap::new()))
        .collect();
    let mut patch_markers: PatchMarkers = BTreeMap::new();

    snapshots.for_each_ordered(
        RegionOrder::PrimaryFirst,
        VersionOrder::OldestFirst,
        |region, version, release| {
            let mut unseen = known.clone();

            for (&entity, record) in release {
                let chart_count = effective_chart_count(snapshots, region, version, entity, record);
                if chart_count < record.chart_levels.len() {
                    sink.report(Diagnostic::note(
                        DiagnosticKind::PhantomChartDropped,
                        Some(entity),
                        format!(
                            "dropped phantom chart {PHANTOM_CHART_INDEX} observed only in \
                             {region} {version}"
                        ),
                    ));
                }

                if chart_count > 0 {
                    unseen.remove(&entity);
                    let entity_logs = logs.entry(entity).or_default().entry(region).or_default();
                    if entity_logs.len() < chart_count {
                        entity_logs.resize_with(chart_count, AttributeLog::new);
                    }
                    for (difficulty, &level) in record.chart_levels[..chart_count].iter().enumerate()
                    {
                        entity_logs[difficulty].record(version, Observed::Present(level));
                    }
                }

                if record.deleted_in_patch {
                    if chart_count > 0 {
                        patch_markers
                            .entry(entity)
                            .or_default()
                            .entry(region)
                            .or_default()
                            .insert(version);
                    } else {
                        // A deletion marker with nothing to delete: drop it.
                        sink.report(Diagnostic::error(
                            DiagnosticKind::OrphanPatchDeletion,
                            Some(entity),
                            format!(
                                "patch-deletion marker in {region} {version} for an entity \
                                 with no observed charts"
                            ),
                        ));
                    }
                }
            }

            // Entities known overall but missing from this release get an
            // explicit absence marker in every difficulty they had data for.
            for entity in unseen {
                let Some(entity_logs) = logs.get_mut(&entity).and_then(|r| r.get_mut(&region))
                else {
                    continue;
                };
                for log in entity_logs.iter_mut() {
                    if !log.is_empty() {
                        log.record(version, Observed::Absent);
                    }
                }
            }
        },
    );
    (logs, patch_markers)
}

/// Fill merged change logs and lifecycle logs, then compact.
fn assemble(
    snapshots: &SnapshotSet<SongSnapshot>,
    songs: &mut BTreeMap<EntityId, MergedSong>,
    logs: &EntityLogs,
    patch_markers: &PatchMarkers,
    sink: &mut dyn DiagnosticSink,
) {
    let empty_markers = BTreeSet::new();

    for (&entity, song) in songs.iter_mut() {
        let Some(entity_logs) = logs.get(&entity) else {
            continue;
        };
        song.level_change_log = vec![BTreeMap::new(); song.charts.len()];

        // Primary-first region order: the first-seen region's value is
        // canonical and later regions only fill gaps. The consistency-
        // exempt region sorts last and still contributes where it is the
        // only source.
        for region in Region::ALL {
            let Some(region_logs) = entity_logs.get(&region) else {
                continue;
            };
            for (difficulty, log) in region_logs.iter().enumerate() {
                let Some(merged) = song.level_change_log.get_mut(difficulty) else {
                    continue;
                };
                for (version, observed) in log.iter() {
                    if let Observed::Present(level) = observed {
                        merged.entry(version).or_insert(*level);
                    }
                }
            }
        }

        for merged in &mut song.level_change_log {
            dedup_versioned(merged);
        }

        for (&region, region_logs) in entity_logs {
            let fed = snapshots.region_versions(region, VersionOrder::OldestFirst);
            let markers = patch_markers
                .get(&entity)
                .and_then(|regions| regions.get(&region))
                .unwrap_or(&empty_markers);
            let events = lifecycle::classify_region(&fed, region_logs, markers);
            if let Some(info) = song.regional_info.get_mut(&region) {
                info.lifecycle = events;
            }
        }

        for (difficulty, chart) in song.charts.iter().enumerate() {
            if chart.stats.is_none() {
                sink.report(Diagnostic::warning(
                    DiagnosticKind::MissingStats,
                    Some(entity),
                    format!("chart {difficulty} ({}) has no note statistics", song.name),
                ));
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
