//! # Snapshot Loader
//!
//! Reads the per-kind JSON dumps of every release in a manifest into the
//! core's snapshot sets. A missing kind file is normal (a release that
//! shipped no new login bonuses simply has no `loginBonus.json`) and is
//! skipped with a warning; an unreadable or unparsable file is an error.

use crate::manifest::Manifest;
use kasane_core::{
    BasicSnapshot, EntityKind, KindInput, MergeError, Release, SnapshotSet, SongSnapshot,
};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of one snapshot dump (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_SNAPSHOT_FILE_SIZE: u64 = 100 * 1024 * 1024;

// =============================================================================
// LOADING
// =============================================================================

/// Load every release of the manifest into one snapshot set per kind.
pub fn load_inputs(manifest: &Manifest) -> Result<BTreeMap<EntityKind, KindInput>, MergeError> {
    let mut inputs: BTreeMap<EntityKind, KindInput> = EntityKind::ALL
        .into_iter()
        .map(|kind| {
            let input = match kind {
                EntityKind::Song => KindInput::Song(SnapshotSet::new()),
                _ => KindInput::Basic(SnapshotSet::new()),
            };
            (kind, input)
        })
        .collect();

    for release in &manifest.releases {
        for kind in EntityKind::ALL {
            let path = release.path.join(format!("{}.json", kind.as_str()));
            let Some(bytes) = read_snapshot_file(&path)? else {
                tracing::warn!(
                    region = %release.region,
                    version = %release.version,
                    kind = %kind,
                    "snapshot file missing, skipping"
                );
                continue;
            };

            match inputs.get_mut(&kind) {
                Some(KindInput::Song(set)) => {
                    let records: Release<SongSnapshot> = parse_snapshot(&path, &bytes)?;
                    tracing::debug!(
                        region = %release.region,
                        version = %release.version,
                        kind = %kind,
                        records = records.len(),
                        "loaded release"
                    );
                    set.insert_release(release.region, release.version, records);
                }
                Some(KindInput::Basic(set)) => {
                    let records: Release<BasicSnapshot> = parse_snapshot(&path, &bytes)?;
                    tracing::debug!(
                        region = %release.region,
                        version = %release.version,
                        kind = %kind,
                        records = records.len(),
                        "loaded release"
                    );
                    set.insert_release(release.region, release.version, records);
                }
                None => {}
            }
        }
    }
    Ok(inputs)
}

/// Read one snapshot file, enforcing the size limit. `Ok(None)` means the
/// file does not exist.
fn read_snapshot_file(path: &Path) -> Result<Option<Vec<u8>>, MergeError> {
    if !path.is_file() {
        return Ok(None);
    }
    let metadata = std::fs::metadata(path)
        .map_err(|e| MergeError::Io(format!("cannot read metadata of '{}': {}", path.display(), e)))?;
    if metadata.len() > MAX_SNAPSHOT_FILE_SIZE {
        return Err(MergeError::Io(format!(
            "snapshot file '{}' is {} bytes, over the {} byte limit",
            path.display(),
            metadata.len(),
            MAX_SNAPSHOT_FILE_SIZE
        )));
    }
    std::fs::read(path)
        .map(Some)
        .map_err(|e| MergeError::Io(format!("cannot read '{}': {}", path.display(), e)))
}

fn parse_snapshot<T: serde::de::DeserializeOwned>(
    path: &Path,
    bytes: &[u8],
) -> Result<T, MergeError> {
    serde_json::from_slice(bytes)
        .map_err(|e| MergeError::Parse(format!("snapshot '{}': {}", path.display(), e)))
}

// =============================================================================
// TESTS
// =============================================================================
