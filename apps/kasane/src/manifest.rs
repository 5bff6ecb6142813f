//! # Snapshot Manifest
//!
//! The TOML index of snapshot releases. Each entry names one (region,
//! version) release and the directory holding its per-kind JSON dumps:
//!
//! ```toml
//! [[releases]]
//! region = "JP"
//! version = 5
//! path = "snapshots/jp/v5"
//! ```

use kasane_core::{MergeError, Region, VersionId};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// =============================================================================
// MANIFEST STRUCTURE
// =============================================================================

/// The parsed release index.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub releases: Vec<ReleaseEntry>,
}

/// One release the engine should ingest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseEntry {
    pub region: Region,
    pub version: VersionId,
    /// Directory holding `<kind>.json` dumps, relative to the manifest.
    pub path: PathBuf,
}

impl Manifest {
    /// Load and validate a manifest file.
    ///
    /// Relative release paths are resolved against the manifest's own
    /// directory, so a manifest travels with its snapshot tree.
    pub fn load(path: &Path) -> Result<Self, MergeError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MergeError::Io(format!("cannot read manifest '{}': {}", path.display(), e))
        })?;
        let mut manifest: Manifest = toml::from_str(&text)
            .map_err(|e| MergeError::Parse(format!("manifest '{}': {}", path.display(), e)))?;
        manifest.validate()?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), MergeError> {
        if self.releases.is_empty() {
            return Err(MergeError::Parse("manifest lists no releases".to_string()));
        }
        let mut seen = BTreeSet::new();
        for entry in &self.releases {
            if !seen.insert((entry.region, entry.version)) {
                return Err(MergeError::Parse(format!(
                    "duplicate release {} {} in manifest",
                    entry.region, entry.version
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for entry in &mut self.releases {
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
