//! # Kasane CLI Module
//!
//! This module implements the CLI interface for Kasane.
//!
//! ## Available Commands
//!
//! - `merge` - Merge every release in a manifest into one canonical JSON
//!   document
//! - `check` - Validate the manifest and snapshots without writing output

mod commands;

use clap::{Parser, Subcommand};
use kasane_core::MergeError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Kasane - Snapshot Reconciliation Tool
///
/// Consolidates per-region, per-version snapshot dumps of arcade game
/// metadata into one canonical record per entity.
#[derive(Parser, Debug)]
#[command(name = "kasane")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge every release in the manifest into canonical records
    Merge {
        /// Path to the snapshot manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output file path (JSON)
        #[arg(short, long)]
        out: PathBuf,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,

        /// Continue with the remaining kinds when one kind fails
        #[arg(long)]
        keep_going: bool,
    },

    /// Validate the manifest and snapshots without writing output
    Check {
        /// Path to the snapshot manifest (TOML)
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), MergeError> {
    match cli.command {
        Commands::Merge {
            manifest,
            out,
            pretty,
            keep_going,
        } => cmd_merge(&manifest, &out, pretty, keep_going),
        Commands::Check { manifest } => cmd_check(&manifest),
    }
}
