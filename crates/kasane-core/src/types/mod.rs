//! # Core Type Definitions
//!
//! This module contains all core types for the Kasane reconciliation engine:
//! - Release coordinates (`Region`, `VersionId`)
//! - Entity identity and values (`EntityId`, `Level`, `Observed`)
//! - Snapshot records as produced by the external extraction stage
//! - Compacted output representations (`MaybeVersioned`, `MaybeRegionalized`)
//! - Merged output records (`MergedSong`, `MergedBasic`)
//! - Error types (`MergeError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (difficulty levels are stored in tenths)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Distinguish explicit absence from never-observed via `Observed`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::merger::EntityKind;

// =============================================================================
// RELEASE COORDINATES
// =============================================================================

/// A release territory for the game.
///
/// The set is fixed and totally ordered: `Jp` is the primary region and
/// sorts first. `Cn` data is known to be less reliable and is exempt from
/// cross-region equality enforcement (see `primitives`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Primary region. Canonical source for region-invariant values.
    Jp,
    /// International (export) builds.
    Intl,
    /// Mainland builds. Excluded from consistency enforcement.
    Cn,
}

impl Region {
    /// All regions in canonical (primary-first) order.
    pub const ALL: [Region; 3] = [Region::Jp, Region::Intl, Region::Cn];

    /// Stable name used in diagnostics and serialized output keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Region::Jp => "JP",
            Region::Intl => "INTL",
            Region::Cn => "CN",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monotonically increasing release sequence number within a region.
///
/// Versions are comparable across regions: the same number denotes the
/// same upstream release, even when regions receive it at different times.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionId(pub u16);

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// =============================================================================
// ENTITY IDENTITY & VALUES
// =============================================================================

/// Stable numeric identifier for one game entity across all snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chart difficulty level in tenths (13.7 is stored as 137).
///
/// Integer tenths keep the engine free of float arithmetic and make
/// structural equality exact. A level of 0 is representable and is real
/// data, distinct from absence (`Observed::Absent`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Level(pub u16);

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// An observation of an attribute at one version.
///
/// `Absent` is an explicit marker: the release snapshot existed but the
/// attribute (or the whole entity) was not in it. A version that was never
/// fed produces no observation at all. The distinction drives removal
/// classification and must never collapse into a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed<T> {
    /// The attribute was present with this value.
    Present(T),
    /// The release was observed but the attribute was not in it.
    Absent,
}

impl<T> Observed<T> {
    /// Returns the contained value if present.
    #[must_use]
    pub const fn present(&self) -> Option<&T> {
        match self {
            Observed::Present(value) => Some(value),
            Observed::Absent => None,
        }
    }

    /// True if this observation is an explicit absence marker.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Observed::Absent)
    }
}

// =============================================================================
// SNAPSHOT RECORDS (INPUT)
// =============================================================================

/// Per-category note counts for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NoteStats {
    pub tap: u32,
    pub hold: u32,
    pub slide: u32,
    pub touch: u32,
    #[serde(rename = "break")]
    pub break_notes: u32,
}

/// One difficulty chart of a song, as extracted from a release.
///
/// The level is deliberately not part of this record: levels are rebalanced
/// between releases and live in the per-difficulty change log instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub designer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<NoteStats>,
}

/// A song as observed in one (region, version) release snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSnapshot {
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub bpm: u32,
    /// Ordered by difficulty index; parallel to `chart_levels`.
    pub charts: Vec<ChartRecord>,
    /// Difficulty level per chart, in tenths.
    pub chart_levels: Vec<Level>,
    /// The in-game "added in" version tag carried by the asset.
    pub release_version: VersionId,
    /// Explicit marker set by the extraction stage when the entity was
    /// removed by a mid-cycle patch rather than a release boundary.
    #[serde(default)]
    pub deleted_in_patch: bool,
    #[serde(default)]
    pub net_open_date: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
}

/// Cosmetic rarity tier for title entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RarityTier {
    Normal,
    Bronze,
    Silver,
    Gold,
    Rainbow,
}

/// Content-addressed reference to an entity's image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub hash: String,
    pub thumb_hash: String,
}

/// Kind-specific extra attributes carried by basic (attribute-only) records.
///
/// Which variant is legal depends on the entity kind; the basic merger
/// enforces the pairing (a rarity tier on a frame is a malformed snapshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasicExtra {
    Rarity {
        #[serde(rename = "rareType")]
        rare_type: RarityTier,
    },
    Image {
        image: ImageRef,
    },
    None {},
}

/// An attribute-only entity as observed in one release snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSnapshot {
    pub name: String,
    #[serde(default)]
    pub net_open_date: Option<String>,
    #[serde(flatten)]
    pub extra: BasicExtra,
}

// =============================================================================
// COMPACTED REPRESENTATIONS (OUTPUT)
// =============================================================================

/// A value that either never changed or carries its per-version history.
///
/// Serializes as the bare value when unversioned, or as
/// `{"versioned": {version: value, ...}}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MaybeVersioned<T> {
    Unversioned(T),
    Versioned {
        versioned: BTreeMap<VersionId, T>,
    },
}

/// A value that is either identical across regions or split per region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MaybeRegionalized<T> {
    Unregionalized(MaybeVersioned<T>),
    Regionalized(BTreeMap<Region, MaybeVersioned<T>>),
}

// =============================================================================
// LIFECYCLE EVENTS
// =============================================================================

/// A classified presence transition for an entity within one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleEvent {
    /// The entity (base chart for songs) first appeared in this release.
    Added,
    /// A higher-index chart was appended to an already-present song.
    AddedChart { index: usize },
    /// Present in the previous release, explicitly absent in this one.
    RemovedFromRelease,
    /// Removed by a mid-cycle patch; the release itself still carried it.
    RemovedInPatch,
}

/// One entry of a per-region lifecycle log, ordered by version.
///
/// A log is a sequence rather than a version-keyed map: an entity added and
/// patch-deleted within the same release produces two entries for one
/// version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleEntry {
    pub version: VersionId,
    pub event: LifecycleEvent,
}

// =============================================================================
// MERGED OUTPUT RECORDS
// =============================================================================

/// Per-region facts about a merged song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalInfo {
    /// The in-game "added in" tag of the newest record seen in this region.
    pub first_version: VersionId,
    pub lifecycle: Vec<LifecycleEntry>,
    pub net_open_date: Option<String>,
    pub event_date: Option<String>,
}

/// The canonical merged record for one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSong {
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub bpm: u32,
    /// Global chart list; grows append-only across releases and regions.
    pub charts: Vec<ChartRecord>,
    /// One compacted level change log per difficulty, spanning all regions.
    pub level_change_log: Vec<BTreeMap<VersionId, Level>>,
    pub regional_info: BTreeMap<Region, RegionalInfo>,
}

/// The merged attribute set of a basic entity, open dates excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAttributes {
    pub name: String,
    #[serde(flatten)]
    pub extra: BasicExtra,
}

/// The canonical merged record for one basic (attribute-only) entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedBasic {
    #[serde(flatten)]
    pub value: MaybeRegionalized<BasicAttributes>,
    /// Most-specific non-null open date per region; later versions override
    /// earlier ones within the same region.
    pub regional_net_open_date: BTreeMap<Region, Option<String>>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the reconciliation engine and its driver.
///
/// - A structural error aborts the entity kind being merged, never the
///   whole engine; the caller decides whether to continue with other kinds.
/// - Non-fatal findings flow through the diagnostics sink instead.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A snapshot record failed structural validation.
    #[error("malformed snapshot record for entity {entity} in {region} {version}: {detail}")]
    MalformedSnapshot {
        region: Region,
        version: VersionId,
        entity: EntityId,
        detail: String,
    },

    /// The snapshot input handed to a merger does not match its kind.
    #[error("snapshot input does not match entity kind '{kind}'")]
    KindMismatch { kind: EntityKind },

    /// An I/O error occurred while loading inputs or writing output.
    #[error("I/O error: {0}")]
    Io(String),

    /// An input document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_are_primary_first() {
        assert_eq!(Region::ALL[0], Region::Jp);
        assert!(Region::Jp < Region::Intl);
        assert!(Region::Intl < Region::Cn);
    }

    #[test]
    fn level_displays_in_tenths() {
        assert_eq!(Level(137).to_string(), "13.7");
        assert_eq!(Level(0).to_string(), "0.0");
    }

    #[test]
    fn observed_zero_level_is_present() {
        let observed = Observed::Present(Level(0));
        assert!(!observed.is_absent());
        assert_eq!(observed.present(), Some(&Level(0)));
    }

    #[test]
    fn maybe_versioned_serializes_bare_or_tagged() {
        let bare = MaybeVersioned::Unversioned(Level(120));
        assert_eq!(serde_json::to_string(&bare).expect("json"), "120");

        let mut map = BTreeMap::new();
        map.insert(VersionId(1), Level(120));
        map.insert(VersionId(3), Level(125));
        let versioned = MaybeVersioned::Versioned { versioned: map };
        assert_eq!(
            serde_json::to_string(&versioned).expect("json"),
            r#"{"versioned":{"1":120,"3":125}}"#
        );
    }

    #[test]
    fn maybe_regionalized_is_externally_tagged() {
        let value: MaybeRegionalized<Level> =
            MaybeRegionalized::Unregionalized(MaybeVersioned::Unversioned(Level(100)));
        assert_eq!(
            serde_json::to_string(&value).expect("json"),
            r#"{"unregionalized":100}"#
        );
    }

    #[test]
    fn basic_extra_roundtrips_each_variant() {
        let rarity: BasicSnapshot = serde_json::from_str(
            r#"{"name":"Ace","netOpenDate":null,"rareType":"Gold"}"#,
        )
        .expect("parse");
        assert_eq!(
            rarity.extra,
            BasicExtra::Rarity {
                rare_type: RarityTier::Gold
            }
        );

        let image: BasicSnapshot = serde_json::from_str(
            r#"{"name":"Spring","netOpenDate":"2023-03-01","image":{"hash":"ab","thumbHash":"cd"}}"#,
        )
        .expect("parse");
        assert!(matches!(image.extra, BasicExtra::Image { .. }));

        let plain: BasicSnapshot =
            serde_json::from_str(r#"{"name":"Rabbit","netOpenDate":null}"#).expect("parse");
        assert_eq!(plain.extra, BasicExtra::None {});
    }

    #[test]
    fn lifecycle_event_serialization() {
        assert_eq!(
            serde_json::to_string(&LifecycleEvent::Added).expect("json"),
            r#""added""#
        );
        assert_eq!(
            serde_json::to_string(&LifecycleEvent::AddedChart { index: 4 }).expect("json"),
            r#"{"addedChart":{"index":4}}"#
        );
    }
}
