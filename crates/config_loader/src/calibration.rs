//! Calibration store
//!
//! A JSON document keyed by probe serial. Each entry is either a single
//! `{sensor: [coefficients]}` map or a list of dated calibrations:
//!
//! ```json
//! {
//!   "default": { "Sensor1": [1.0, 0.0] },
//!   "252813070": [
//!     { "date": "2022-11-01", "calibration": { "Sensor1": [0.5, -20.0] } },
//!     { "date": "2023-06-01", "calibration": { "Sensor1": [0.6, -25.0] } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use contracts::{CalibrationSet, ContractError};
use serde::Deserialize;
use tracing::{info, warn};

const DEFAULT_KEY: &str = "default";
const UNKNOWN_SERIAL: &str = "UNKNOWN";

type Coefficients = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Clone, Deserialize)]
struct DatedCalibration {
    date: NaiveDate,
    calibration: Coefficients,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CalibrationEntry {
    Single(Coefficients),
    Dated(Vec<DatedCalibration>),
}

/// Calibrations for every known probe plus the mandatory default.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    default: Coefficients,
    entries: BTreeMap<String, CalibrationEntry>,
}

impl CalibrationStore {
    /// Load a calibration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse calibration JSON.
    ///
    /// # Errors
    /// - `ConfigParse` for malformed JSON or entries of the wrong shape
    /// - `ConfigValidation` when the `default` entry is missing or dated
    pub fn parse(content: &str) -> Result<Self, ContractError> {
        let mut entries: BTreeMap<String, CalibrationEntry> = serde_json::from_str(content)
            .map_err(|e| ContractError::ConfigParse {
                message: format!("calibration parse error: {e}"),
                source: Some(Box::new(e)),
            })?;

        let default = match entries.remove(DEFAULT_KEY) {
            Some(CalibrationEntry::Single(default)) => default,
            Some(CalibrationEntry::Dated(_)) => {
                return Err(ContractError::config_validation(
                    DEFAULT_KEY,
                    "default calibration must be a single sensor map",
                ))
            }
            None => {
                return Err(ContractError::config_validation(
                    DEFAULT_KEY,
                    "calibration file has no default entry",
                ))
            }
        };
        Ok(Self { default, entries })
    }

    /// Serials with a calibration, excluding the default.
    pub fn serials(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn fallback(&self) -> CalibrationSet {
        CalibrationSet::new(UNKNOWN_SERIAL, self.default.clone())
    }

    /// Calibration for a probe at a measurement date.
    ///
    /// Unknown serials get the default set, reported as serial `UNKNOWN`. With
    /// dated calibrations the most recent one on or before `date` is used; when
    /// every calibration is later than `date` the default is used.
    ///
    /// # Errors
    /// `MissingMeasurementDate` when a probe has several calibrations and no
    /// date is given.
    pub fn from_serial(
        &self,
        serial: &str,
        date: Option<NaiveDate>,
    ) -> Result<CalibrationSet, ContractError> {
        let Some(entry) = self.entries.get(serial) else {
            warn!(serial, "no calibration found, using default");
            return Ok(self.fallback());
        };

        let coefficients = match (entry, date) {
            (CalibrationEntry::Single(coefficients), _) => coefficients,
            (CalibrationEntry::Dated(list), None) => match list.as_slice() {
                [only] => &only.calibration,
                [] => {
                    warn!(serial, "empty calibration list, using default");
                    return Ok(self.fallback());
                }
                _ => {
                    return Err(ContractError::MissingMeasurementDate {
                        serial: serial.to_string(),
                    })
                }
            },
            (CalibrationEntry::Dated(list), Some(date)) => {
                match list
                    .iter()
                    .filter(|c| c.date <= date)
                    .max_by_key(|c| c.date)
                {
                    Some(dated) => &dated.calibration,
                    None => {
                        warn!(serial, %date, "all calibrations are later than the measurement, using default");
                        return Ok(self.fallback());
                    }
                }
            }
        };

        info!(serial, "calibration found");
        Ok(CalibrationSet::new(serial, coefficients.clone()))
    }
}
