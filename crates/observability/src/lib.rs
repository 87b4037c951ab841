//! # Observability
//!
//! Tracing setup, metric recording and running statistics.
//!
//! ## Features
//!
//! - Explicit tracing initialization (JSON/Pretty/Compact), honouring `RUST_LOG`
//! - Prometheus text exposition of the pipeline metrics
//! - Per-profile metric recording and Welford running statistics
//!
//! ## Usage
//!
//! ```ignore
//! use observability::{init_with_config, ObservabilityConfig};
//!
//! // once, at process entry
//! init_with_config(ObservabilityConfig::default())?;
//!
//! let summary = profile.summary()?;
//! observability::record_profile_metrics(&summary);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-exports
pub use crate::metrics::{
    record_event_detected, record_event_not_found, record_profile_metrics, RunningStats,
    StatsSummary,
};

/// Initialize tracing with the default configuration.
pub fn init() -> Result<()> {
    init_with_config(ObservabilityConfig::default())
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log output format
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Write logs to stderr so stdout stays machine readable
    pub log_to_stderr: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            log_to_stderr: true,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Human readable multi-line
    Pretty,
    /// Single line
    Compact,
}

/// Initialize tracing with a custom configuration.
///
/// Must be called at most once per process.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level));
    let stderr = config.log_to_stderr;

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(move || writer(stderr));

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer().pretty().with_writer(move || writer(stderr));

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer().compact().with_writer(move || writer(stderr));

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
    }

    tracing::debug!(log_format = ?config.log_format, "Observability initialized");
    Ok(())
}

fn writer(stderr: bool) -> Box<dyn std::io::Write> {
    if stderr {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    }
}

/// Install a global Prometheus recorder without an HTTP listener.
///
/// The returned handle renders the text exposition format on demand.
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.default_log_level, "info");
        assert!(config.log_to_stderr);
    }
}
