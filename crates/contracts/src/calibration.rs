//! Calibration coefficients for a single probe

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-sensor polynomial coefficients, highest degree first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSet {
    /// Serial the coefficients were resolved for (`UNKNOWN` for the fallback set)
    pub serial: String,
    pub coefficients: BTreeMap<String, Vec<f64>>,
}

impl CalibrationSet {
    pub fn new(serial: impl Into<String>, coefficients: BTreeMap<String, Vec<f64>>) -> Self {
        Self {
            serial: serial.into(),
            coefficients,
        }
    }

    /// Coefficients for a sensor.
    pub fn get(&self, sensor: &str) -> Option<&[f64]> {
        self.coefficients.get(sensor).map(Vec::as_slice)
    }
}
