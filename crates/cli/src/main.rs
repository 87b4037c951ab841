//! # Lyte CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Recording processing into events and a profile summary
//! - Configuration validation
//! - Optional Prometheus text output of a run's metrics

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_events, run_summary, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: cli.log_level().to_string(),
        log_to_stderr: true,
    })?;

    info!(version = env!("CARGO_PKG_VERSION"), "Lyte CLI starting");

    let result = match &cli.command {
        Commands::Events(args) => run_events(args),
        Commands::Summary(args) => run_summary(args),
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
