//! # kasane
//!
//! The command-line driver around `kasane-core`.
//!
//! Everything impure lives here: manifest parsing, snapshot file loading
//! and merged output writing. The core never touches the filesystem.

// =============================================================================
// MODULES
// =============================================================================

pub mod cli;
pub mod loader;
pub mod manifest;
