//! Recording - header metadata plus the sample table

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::SampleTable;

const UNKNOWN_SERIAL: &str = "UNKNOWN";

/// Header formats seen in the `RECORDED` field.
const RECORDED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// A complete, already-captured probe recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub metadata: BTreeMap<String, String>,
    pub table: SampleTable,
}

impl Recording {
    pub fn new(metadata: BTreeMap<String, String>, table: SampleTable) -> Self {
        Self { metadata, table }
    }

    /// Probe serial from the first header key mentioning "serial".
    pub fn serial_number(&self) -> String {
        self.metadata
            .iter()
            .find(|(key, _)| key.to_ascii_lowercase().contains("serial"))
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| UNKNOWN_SERIAL.to_string())
    }

    /// Timestamp of the `RECORDED` header, if present and parseable.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        let raw = self
            .metadata
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("recorded"))
            .map(|(_, value)| value.trim())?;
        RECORDED_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(pairs: &[(&str, &str)]) -> Recording {
        let metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let table =
            SampleTable::from_columns(vec![("time".to_string(), vec![0.0, 1.0])]).unwrap();
        Recording::new(metadata, table)
    }

    #[test]
    fn test_serial_number_from_header() {
        let rec = recording(&[("Serial Num.", "252813070"), ("RECORDED", "2023-01-05")]);
        assert_eq!(rec.serial_number(), "252813070");
        assert_eq!(recording(&[]).serial_number(), "UNKNOWN");
    }

    #[test]
    fn test_recorded_at_formats() {
        let rec = recording(&[("RECORDED", "2023-01-05 10:30:00")]);
        let ts = rec.recorded_at().unwrap();
        assert_eq!(ts.to_string(), "2023-01-05 10:30:00");

        let date_only = recording(&[("RECORDED", "2023-01-05")]);
        assert!(date_only.recorded_at().is_some());

        assert!(recording(&[("RECORDED", "yesterday")]).recorded_at().is_none());
    }
}
