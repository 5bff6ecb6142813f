//! # Kasane - Snapshot Reconciliation Tool
//!
//! The main binary for the Kasane deterministic merge engine.
//!
//! This application consolidates per-region, per-version snapshot dumps of
//! arcade game metadata into one canonical JSON document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                apps/kasane (THE BINARY)             │
//! │                                                     │
//! │  ┌──────────┐   ┌────────────┐   ┌──────────────┐  │
//! │  │   CLI    │   │  Manifest  │   │   Snapshot   │  │
//! │  │  (clap)  │   │   (toml)   │   │ Loader (json)│  │
//! │  └────┬─────┘   └─────┬──────┘   └──────┬───────┘  │
//! │       │               │                 │          │
//! │       └───────────────┼─────────────────┘          │
//! │                       ▼                            │
//! │               ┌───────────────┐                    │
//! │               │  kasane-core  │                    │
//! │               │  (THE LOGIC)  │                    │
//! │               └───────────────┘                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Merge every release listed in the manifest
//! kasane merge --manifest snapshots.toml --out merged.json --pretty
//!
//! # Validate without writing output
//! kasane check --manifest snapshots.toml
//! ```

use clap::Parser;
use kasane::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing — KASANE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KASANE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "kasane=debug,kasane_core=debug"
    } else {
        "kasane=info,kasane_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Kasane startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗  ██╗ █████╗ ███████╗ █████╗ ███╗   ██╗███████╗
  ██║ ██╔╝██╔══██╗██╔════╝██╔══██╗████╗  ██║██╔════╝
  █████╔╝ ███████║███████╗███████║██╔██╗ ██║█████╗
  ██╔═██╗ ██╔══██║╚════██║██╔══██║██║╚██╗██║██╔══╝
  ██║  ██╗██║  ██║███████║██║  ██║██║ ╚████║███████╗
  ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝╚═╝  ╚═══╝╚══════╝

  Snapshot Reconciliation Tool v{}

  Deterministic • Region-Aware • Canonical
"#,
        env!("CARGO_PKG_VERSION")
    );
}
