//! Layered error definitions
//!
//! Categorized by source: config / input data / calibration

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Argument Errors =====
    /// Search direction other than forward/backward
    #[error("'{value}' is an invalid direction, use either forward or backward")]
    InvalidDirection { value: String },

    // ===== Input Data Errors =====
    /// Time-series input without a `time` column
    #[error("time series data requires a 'time' column to calculate")]
    MissingTimeAxis,

    /// Required channel is absent from the table
    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    /// Two sequences that must pair up have different lengths
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Timestamps are not strictly increasing
    #[error("time axis is not strictly increasing at index {index}")]
    NonMonotonicTime { index: usize },

    /// Neither an accelerometer nor a barometer channel is present
    #[error("recording has neither an accelerometer nor a barometric depth channel")]
    NoDepthSource,

    // ===== Calibration Errors =====
    /// Several calibrations exist for a probe but no measurement date was given
    #[error("multiple calibrations found for serial '{serial}', but no measurement date provided")]
    MissingMeasurementDate { serial: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create length mismatch error
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}
