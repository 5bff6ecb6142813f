//! # Basic Merger
//!
//! Merge for attribute-only entity kinds (titles, frames, icons, plates,
//! partners, characters, cards, login bonuses).
//!
//! The per-version attribute sets are accumulated per region (open dates
//! excluded), compacted through the compaction engine, and paired with a
//! separately tracked per-region net-open date where later versions
//! override earlier ones.

use crate::compact::compact_regionalized;
use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::merger::EntityKind;
use crate::order::{RegionOrder, VersionOrder};
use crate::primitives::MAX_NAME_LENGTH;
use crate::snapshot::SnapshotSet;
use crate::types::{
    BasicAttributes, BasicExtra, BasicSnapshot, EntityId, MergeError, MergedBasic, Region,
    VersionId,
};
use std::collections::BTreeMap;

type RegionalAttrs = BTreeMap<Region, BTreeMap<VersionId, BasicAttributes>>;

/// Merge all snapshots of one basic entity kind.
pub fn merge(
    kind: EntityKind,
    snapshots: &SnapshotSet<BasicSnapshot>,
    sink: &mut dyn DiagnosticSink,
) -> Result<BTreeMap<EntityId, MergedBasic>, MergeError> {
    let mut attrs: BTreeMap<EntityId, RegionalAttrs> = BTreeMap::new();
    let mut open_dates: BTreeMap<EntityId, BTreeMap<Region, Option<String>>> = BTreeMap::new();
    let mut validation: Result<(), MergeError> = Ok(());

    snapshots.for_each_ordered(
        RegionOrder::PrimaryFirst,
        VersionOrder::OldestFirst,
        |region, version, release| {
            for (&entity, record) in release {
                if validation.is_err() {
                    return;
                }
                if let Err(error) = validate_record(kind, region, version, entity, record, sink) {
                    validation = Err(error);
                    return;
                }

                attrs
                    .entry(entity)
                    .or_default()
                    .entry(region)
                    .or_default()
                    .insert(
                        version,
                        BasicAttributes {
                            name: record.name.clone(),
                            extra: record.extra.clone(),
                        },
                    );

                // Oldest-first traversal: each non-null date seen later
                // overrides the earlier one within the region.
                let regional_dates = open_dates.entry(entity).or_default();
                let date = regional_dates.entry(region).or_insert(None);
                if record.net_open_date.is_some() {
                    date.clone_from(&record.net_open_date);
                }
            }
        },
    );
    validation?;

    let merged = attrs
        .into_iter()
        .map(|(entity, regional)| {
            let regional_net_open_date = open_dates.remove(&entity).unwrap_or_default();
            (
                entity,
                MergedBasic {
                    value: compact_regionalized(&regional),
                    regional_net_open_date,
                },
            )
        })
        .collect();
    Ok(merged)
}

/// Structural validation of one record against its dispatched kind.
///
/// An image kind without an image reference is tolerated with a warning
/// (thumbnailing may simply not have run); any other extra/kind mismatch is
/// a malformed snapshot and aborts the kind.
fn validate_record(
    kind: EntityKind,
    region: Region,
    version: VersionId,
    entity: EntityId,
    record: &BasicSnapshot,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), MergeError> {
    if record.name.is_empty() || record.name.len() > MAX_NAME_LENGTH {
        return Err(MergeError::MalformedSnapshot {
            region,
            version,
            entity,
            detail: "name empty or over length limit".to_string(),
        });
    }

    let malformed = |detail: &str| MergeError::MalformedSnapshot {
        region,
        version,
        entity,
        detail: detail.to_string(),
    };

    match kind {
        EntityKind::Title => match record.extra {
            BasicExtra::Rarity { .. } => Ok(()),
            _ => Err(malformed("title record without rarity tier")),
        },
        EntityKind::Frame | EntityKind::Icon | EntityKind::Plate => match record.extra {
            BasicExtra::Image { .. } => Ok(()),
            BasicExtra::None {} => {
                sink.report(Diagnostic::warning(
                    DiagnosticKind::MissingImage,
                    Some(entity),
                    format!("{kind} record in {region} {version} has no image reference"),
                ));
                Ok(())
            }
            BasicExtra::Rarity { .. } => Err(malformed("unexpected rarity tier on image kind")),
        },
        EntityKind::Partner | EntityKind::Character | EntityKind::Card | EntityKind::LoginBonus => {
            match record.extra {
                BasicExtra::None {} => Ok(()),
                _ => Err(malformed("unexpected extra attributes on plain kind")),
            }
        }
        // Songs never reach the basic merger; the dispatcher rejects them.
        EntityKind::Song => Err(MergeError::KindMismatch { kind }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
