//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::loader;
use crate::manifest::Manifest;
use kasane_core::{DiagnosticLog, EntityKind, MergeError, MergedKind, Severity, merge_kind};
use std::path::{Path, PathBuf};

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Validate the output path: the parent directory must exist and the path
/// must carry a filename.
///
/// Canonicalizing the parent resolves ".." and symlinks, so the written
/// file always lands where the operator sees it land.
fn validate_output_path(path: &Path) -> Result<PathBuf, MergeError> {
    // A bare filename has `Some("")` as its parent, not `None`.
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let canonical_parent = parent.canonicalize().map_err(|e| {
        MergeError::Io(format!(
            "invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(MergeError::Io(format!(
            "output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| MergeError::Io("output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// MERGE COMMAND
// =============================================================================

/// Merge every release in the manifest and write the canonical document.
pub fn cmd_merge(
    manifest_path: &Path,
    out: &Path,
    pretty: bool,
    keep_going: bool,
) -> Result<(), MergeError> {
    let out = validate_output_path(out)?;
    let manifest = Manifest::load(manifest_path)?;
    let inputs = loader::load_inputs(&manifest)?;

    let mut sink = DiagnosticLog::new();
    let mut output = serde_json::Map::new();
    let mut failed = 0usize;

    for kind in EntityKind::ALL {
        let Some(input) = inputs.get(&kind) else {
            continue;
        };
        match merge_kind(kind, input, &mut sink) {
            Ok(merged) => {
                let value = serde_json::to_value(&merged).map_err(|e| {
                    MergeError::Parse(format!("cannot serialize merged '{}': {}", kind, e))
                })?;
                output.insert(kind.as_str().to_string(), value);
            }
            Err(error) if keep_going => {
                failed += 1;
                tracing::error!(kind = %kind, %error, "kind failed, continuing");
            }
            Err(error) => return Err(error),
        }
    }

    report_diagnostics(&sink);

    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .map_err(|e| MergeError::Parse(format!("cannot serialize output: {}", e)))?;

    std::fs::write(&out, json)
        .map_err(|e| MergeError::Io(format!("cannot write '{}': {}", out.display(), e)))?;

    tracing::info!(
        path = %out.display(),
        kinds = output.len(),
        failed,
        "merged output written"
    );

    // The surviving kinds are on disk either way; a nonzero exit is what
    // lets automation catch the omitted ones.
    if failed > 0 {
        return Err(MergeError::Parse(format!(
            "{} entity kind(s) failed and were omitted from the output",
            failed
        )));
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Run the full merge in memory and report what it would produce.
pub fn cmd_check(manifest_path: &Path) -> Result<(), MergeError> {
    let manifest = Manifest::load(manifest_path)?;
    let inputs = loader::load_inputs(&manifest)?;

    let mut sink = DiagnosticLog::new();
    let mut failed = 0usize;

    println!("Kasane Snapshot Check");
    println!("=====================");
    println!("Manifest: {}", manifest_path.display());
    println!("Releases: {}", manifest.releases.len());
    println!();

    for kind in EntityKind::ALL {
        let Some(input) = inputs.get(&kind) else {
            continue;
        };
        match merge_kind(kind, input, &mut sink) {
            Ok(MergedKind::Song(merged)) => {
                println!("{:<12} {} records", kind.as_str(), merged.len());
            }
            Ok(MergedKind::Basic(merged)) => {
                println!("{:<12} {} records", kind.as_str(), merged.len());
            }
            Err(error) => {
                failed += 1;
                println!("{:<12} FAILED: {}", kind.as_str(), error);
            }
        }
    }

    println!();
    println!(
        "Findings: {} errors, {} warnings, {} notes",
        sink.count(Severity::Error),
        sink.count(Severity::Warning),
        sink.count(Severity::Note)
    );
    report_diagnostics(&sink);

    if failed > 0 {
        return Err(MergeError::Parse(format!(
            "{} entity kind(s) failed validation",
            failed
        )));
    }
    Ok(())
}

// =============================================================================
// DIAGNOSTICS REPORTING
// =============================================================================

/// Forward collected findings to the log, one event per finding.
fn report_diagnostics(sink: &DiagnosticLog) {
    for diagnostic in sink.entries() {
        match diagnostic.severity {
            Severity::Error => tracing::error!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Note => tracing::info!("{}", diagnostic),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_output_filename_resolves_to_current_dir() {
        let resolved = validate_output_path(Path::new("merged.json")).expect("resolve");
        let cwd = std::env::current_dir()
            .expect("cwd")
            .canonicalize()
            .expect("canonical");
        assert_eq!(resolved, cwd.join("merged.json"));
    }

    #[test]
    fn nested_relative_output_keeps_its_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolved = validate_output_path(&dir.path().join("out.json")).expect("resolve");
        assert_eq!(resolved.file_name().and_then(|n| n.to_str()), Some("out.json"));
    }

    #[test]
    fn missing_output_directory_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent/out.json");
        assert!(matches!(validate_output_path(&path), Err(MergeError::Io(_))));
    }

    #[test]
    fn output_path_without_filename_is_rejected() {
        assert!(matches!(
            validate_output_path(Path::new("/")),
            Err(MergeError::Io(_))
        ));
    }
}
