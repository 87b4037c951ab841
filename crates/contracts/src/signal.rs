//! Signal - samples paired with their timestamps

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Ordered samples on a strictly increasing time axis (seconds).
///
/// Samples may contain NaN markers; statistics over a signal skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    time: Vec<f64>,
    values: Vec<f64>,
}

impl Signal {
    /// Create a signal, checking the length and time-axis invariants.
    pub fn new(time: Vec<f64>, values: Vec<f64>) -> Result<Self, ContractError> {
        if time.len() != values.len() {
            return Err(ContractError::length_mismatch(
                "signal values",
                time.len(),
                values.len(),
            ));
        }
        check_time_axis(&time)?;
        Ok(Self { time, values })
    }

    /// Pair samples with an axis that has already been checked.
    pub(crate) fn from_trusted(time: Vec<f64>, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    /// Replace the samples while keeping this signal's time axis.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, ContractError> {
        if values.len() != self.time.len() {
            return Err(ContractError::length_mismatch(
                "signal values",
                self.time.len(),
                values.len(),
            ));
        }
        Ok(Self {
            time: self.time.clone(),
            values,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample value at `index`, NaN when out of range.
    pub fn value_at(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(f64::NAN)
    }

    /// Timestamp at `index`, NaN when out of range.
    pub fn time_at(&self, index: usize) -> f64 {
        self.time.get(index).copied().unwrap_or(f64::NAN)
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time, self.values)
    }
}

/// Validate that timestamps are strictly increasing.
pub(crate) fn check_time_axis(time: &[f64]) -> Result<(), ContractError> {
    for (index, pair) in time.windows(2).enumerate() {
        // NaN timestamps compare as None and are rejected as well
        if pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater) {
            return Err(ContractError::NonMonotonicTime { index: index + 1 });
        }
    }
    Ok(())
}
