//! # Diagnostics Sink
//!
//! Structured, injected diagnostics for the merge engine.
//!
//! The engine never writes text anywhere. Every non-fatal finding is
//! reported as a structured event to a sink supplied by the caller; the
//! binary bridges the sink to `tracing`, tests assert on the collected
//! events directly.

use crate::types::EntityId;
use std::fmt;

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational; expected occasionally in healthy data.
    Note,
    /// Suspicious but tolerated.
    Warning,
    /// A real data problem; the merge continues with a canonical choice.
    Error,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Two enforced regions reported different values for one version.
    ConsistencyMismatch,
    /// A region carried pre-release data that disagrees with the primary
    /// region's launch value.
    PrereleaseMismatch,
    /// A patch-deletion marker for an entity with no observation to delete.
    OrphanPatchDeletion,
    /// A chart without note statistics in the final merged record.
    MissingStats,
    /// An image-carrying entity kind observed without an image reference.
    MissingImage,
    /// A phantom top-difficulty chart observation was dropped.
    PhantomChartDropped,
}

/// One structured diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub entity: Option<EntityId>,
    pub message: String,
}

impl Diagnostic {
    /// An error-severity event.
    #[must_use]
    pub fn error(kind: DiagnosticKind, entity: Option<EntityId>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            entity,
            message: message.into(),
        }
    }

    /// A warning-severity event.
    #[must_use]
    pub fn warning(
        kind: DiagnosticKind,
        entity: Option<EntityId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            entity,
            message: message.into(),
        }
    }

    /// A note-severity event.
    #[must_use]
    pub fn note(kind: DiagnosticKind, entity: Option<EntityId>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Note,
            entity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity {
            Some(entity) => write!(f, "[{:?}] entity {}: {}", self.kind, entity, self.message),
            None => write!(f, "[{:?}] {}", self.kind, self.message),
        }
    }
}

/// Receiver for diagnostic events, injected into every merge pass.
pub trait DiagnosticSink {
    /// Report one event. Must not fail; sinks that buffer decide later
    /// what to do with the events.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A `Vec`-backed sink used by the engine driver and by tests.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected events in report order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of events with the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    /// Events of one kind, in report order.
    #[must_use]
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|entry| entry.kind == kind).collect()
    }

    /// True if no event was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_collects_in_order() {
        let mut log = DiagnosticLog::new();
        log.report(Diagnostic::error(
            DiagnosticKind::ConsistencyMismatch,
            Some(EntityId(11)),
            "levels differ",
        ));
        log.report(Diagnostic::note(
            DiagnosticKind::PhantomChartDropped,
            Some(EntityId(11)),
            "dropped",
        ));

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.count(Severity::Error), 1);
        assert_eq!(log.count(Severity::Note), 1);
        assert_eq!(log.of_kind(DiagnosticKind::ConsistencyMismatch).len(), 1);
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Note < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }
}
