//! # Innate Primitives
//!
//! Hardcoded constants for the Kasane reconciliation engine.
//!
//! The engine starts with zero data but fixed rules. These constants are
//! compiled into the binary and are immutable at runtime.

use crate::types::{Region, VersionId};

/// The primary region.
///
/// - Sorts first in every traversal (`order::regions`).
/// - Its values are canonical wherever regions disagree.
/// - Cross-region consistency is defined relative to it.
pub const PRIMARY_REGION: Region = Region::Jp;

/// The region exempt from cross-region equality enforcement.
///
/// Extraction data from this region is known to be less reliable, so it is
/// never compared for consistency violations. It still contributes entries
/// to merged change logs where the other regions have none.
pub const CONSISTENCY_EXEMPT_REGION: Region = Region::Cn;

/// The single historical release that shipped a phantom top-difficulty chart.
///
/// One release erroneously included a bonus top-tier chart for songs that
/// never had one before or after. Observations of that chart at this
/// version are dropped before any change-log computation when the region's
/// following release confirms the chart is gone.
pub const PHANTOM_CHART_VERSION: VersionId = VersionId(13);

/// Difficulty index of the phantom bonus chart.
pub const PHANTOM_CHART_INDEX: usize = 4;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for entity name strings.
///
/// Names longer than this are rejected as malformed snapshot records.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum number of difficulty charts a single song may carry.
///
/// Five standard difficulties plus bonus slots. Anything beyond this is a
/// malformed snapshot record.
pub const MAX_CHART_SLOTS: usize = 8;
