//! # Entity Mergers
//!
//! One merger per entity kind, composed from the ordering provider, the
//! compaction engine, the change-log builder, the lifecycle classifier and
//! the consistency checker.
//!
//! The kind set is closed: dispatch is an exhaustive match over
//! `EntityKind`, so adding a kind forces every merger decision to be
//! revisited at compile time.

pub mod basic;
pub mod song;

use crate::diag::DiagnosticSink;
use crate::snapshot::SnapshotSet;
use crate::types::{BasicSnapshot, EntityId, MergeError, MergedBasic, MergedSong, SongSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// The closed set of entity kinds the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Song,
    Title,
    Frame,
    Icon,
    Plate,
    Partner,
    Character,
    Card,
    LoginBonus,
}

impl EntityKind {
    /// All kinds in canonical output order.
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Song,
        EntityKind::Title,
        EntityKind::Frame,
        EntityKind::Icon,
        EntityKind::Plate,
        EntityKind::Partner,
        EntityKind::Character,
        EntityKind::Card,
        EntityKind::LoginBonus,
    ];

    /// Stable name used for snapshot file names and output keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Song => "song",
            EntityKind::Title => "title",
            EntityKind::Frame => "frame",
            EntityKind::Icon => "icon",
            EntityKind::Plate => "plate",
            EntityKind::Partner => "partner",
            EntityKind::Character => "character",
            EntityKind::Card => "card",
            EntityKind::LoginBonus => "loginBonus",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Snapshot input for one entity kind.
#[derive(Debug, Clone)]
pub enum KindInput {
    Song(SnapshotSet<SongSnapshot>),
    Basic(SnapshotSet<BasicSnapshot>),
}

/// Merged output for one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MergedKind {
    Song(BTreeMap<EntityId, MergedSong>),
    Basic(BTreeMap<EntityId, MergedBasic>),
}

/// Merge all snapshots of one entity kind into canonical records.
///
/// A structural error aborts this kind only; the caller decides whether to
/// continue with other kinds.
pub fn merge_kind(
    kind: EntityKind,
    input: &KindInput,
    sink: &mut dyn DiagnosticSink,
) -> Result<MergedKind, MergeError> {
    match (kind, input) {
        (EntityKind::Song, KindInput::Song(snapshots)) => {
            song::merge(snapshots, sink).map(MergedKind::Song)
        }
        (
            EntityKind::Title
            | EntityKind::Frame
            | EntityKind::Icon
            | EntityKind::Plate
            | EntityKind::Partner
            | EntityKind::Character
            | EntityKind::Card
            | EntityKind::LoginBonus,
            KindInput::Basic(snapshots),
        ) => basic::merge(kind, snapshots, sink).map(MergedKind::Basic),
        (EntityKind::Song, KindInput::Basic(_)) | (_, KindInput::Song(_)) => {
            Err(MergeError::KindMismatch { kind })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
