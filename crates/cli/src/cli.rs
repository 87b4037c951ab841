//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lyte - depth, events and cropped profiles from SnowPilot Lyte probe recordings
#[derive(Parser, Debug)]
#[command(
    name = "lyte",
    author,
    version,
    about = "Process Lyte probe recordings",
    long_about = "Reads a Lyte probe CSV recording, reconstructs the depth of the push,\n\
                  detects start, stop, surface and ground-strike events and reports\n\
                  the profile summary."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LYTE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LYTE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Filter applied when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the events detected in a recording
    Events(ProfileArgs),

    /// Print the headline numbers of a recording
    Summary(SummaryArgs),

    /// Validate a profile configuration file
    Validate(ValidateArgs),
}

/// Inputs shared by every command that processes a recording
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Lyte CSV recording
    pub recording: PathBuf,

    /// Profile configuration (TOML or JSON); defaults apply when omitted
    #[arg(short, long, env = "LYTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Calibration JSON keyed by probe serial number
    #[arg(long, env = "LYTE_CALIBRATION")]
    pub calibration: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `summary` command
#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Also print the run's metrics in Prometheus text format
    #[arg(long)]
    pub metrics: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "lyte.toml", env = "LYTE_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_with_metrics() {
        let cli = Cli::try_parse_from([
            "lyte",
            "summary",
            "push.csv",
            "--config",
            "lyte.toml",
            "--metrics",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Summary(args) => {
                assert!(args.metrics);
                assert!(args.profile.json);
                assert_eq!(args.profile.recording, PathBuf::from("push.csv"));
                assert_eq!(args.profile.config, Some(PathBuf::from("lyte.toml")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_log_level_from_flags() {
        let cli = Cli::try_parse_from(["lyte", "-vv", "events", "push.csv"]).unwrap();
        assert_eq!(cli.log_level(), "trace");

        let cli = Cli::try_parse_from(["lyte", "--quiet", "events", "push.csv"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["lyte", "-q", "-v", "events", "push.csv"]).is_err());
    }

    #[test]
    fn test_events_requires_recording() {
        assert!(Cli::try_parse_from(["lyte", "events"]).is_err());
    }
}
