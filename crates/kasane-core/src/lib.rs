//! # kasane-core
//!
//! The deterministic merge engine for Kasane - THE LOGIC.
//!
//! This crate consolidates per-region, per-version extracted snapshots of
//! arcade game metadata into one canonical record per entity: region-aware
//! attribute histories, per-difficulty level change logs, lifecycle logs
//! and cross-region consistency findings.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is pure: same snapshot input, same output, byte for byte
//! - Holds no global state; diagnostics flow through an injected sink
//! - Uses ordered maps only, so every traversal and every serialization
//!   is deterministic
//! - Has NO async, NO network, NO filesystem dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod changelog;
pub mod compact;
pub mod consistency;
pub mod diag;
pub mod lifecycle;
pub mod merger;
pub mod order;
pub mod primitives;
pub mod snapshot;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BasicAttributes, BasicExtra, BasicSnapshot, ChartRecord, EntityId, Level, LifecycleEntry,
    LifecycleEvent, MaybeRegionalized, MaybeVersioned, MergeError, MergedBasic, MergedSong,
    NoteStats, Observed, Region, RegionalInfo, SongSnapshot, VersionId,
};

// =============================================================================
// RE-EXPORTS: Merge Engine
// =============================================================================

pub use changelog::AttributeLog;
pub use diag::{Diagnostic, DiagnosticKind, DiagnosticLog, DiagnosticSink, Severity};
pub use merger::{EntityKind, KindInput, MergedKind, merge_kind};
pub use order::{RegionOrder, VersionOrder};
pub use snapshot::{Release, SnapshotSet};
