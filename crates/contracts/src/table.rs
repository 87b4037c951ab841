//! SampleTable - Reader output
//!
//! The raw multi-channel recording, one shared time axis and named sensor columns.

use serde::{Deserialize, Serialize};

use crate::signal::check_time_axis;
use crate::{ContractError, Signal};

/// Name of the column holding timestamps (seconds).
pub const TIME_COLUMN: &str = "time";

/// A named sensor channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Multi-channel sample table on a single time axis.
///
/// Column order is preserved as read; lookups are by exact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    time: Vec<f64>,
    columns: Vec<Column>,
}

impl SampleTable {
    /// Create a table from an explicit time axis and its channels.
    pub fn new(time: Vec<f64>, columns: Vec<Column>) -> Result<Self, ContractError> {
        check_time_axis(&time)?;
        for column in &columns {
            if column.values.len() != time.len() {
                return Err(ContractError::length_mismatch(
                    format!("column '{}'", column.name),
                    time.len(),
                    column.values.len(),
                ));
            }
        }
        Ok(Self { time, columns })
    }

    /// Create a table from named columns, one of which must be `time`.
    ///
    /// # Errors
    /// - `MissingTimeAxis` when no `time` column is present
    /// - `LengthMismatch` / `NonMonotonicTime` when the columns are inconsistent
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, ContractError> {
        let mut time = None;
        let mut channels = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if name == TIME_COLUMN && time.is_none() {
                time = Some(values);
            } else {
                channels.push(Column { name, values });
            }
        }
        let time = time.ok_or(ContractError::MissingTimeAxis)?;
        Self::new(time, channels)
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Channel names in file order, excluding `time`.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Samples of a channel.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Samples of a channel, or `MissingColumn`.
    pub fn require(&self, name: &str) -> Result<&[f64], ContractError> {
        self.column(name)
            .ok_or_else(|| ContractError::missing_column(name))
    }

    /// Copy a channel out as a `Signal` on the table's time axis.
    pub fn signal(&self, name: &str) -> Option<Signal> {
        self.column(name)
            .map(|values| Signal::from_trusted(self.time.clone(), values.to_vec()))
    }

    /// Rows `start..=stop`, clamped to the table. Empty when `start > stop`.
    pub fn window(&self, start: usize, stop: usize) -> Self {
        let stop = stop.min(self.len().saturating_sub(1));
        let range = if self.is_empty() || start > stop {
            0..0
        } else {
            start..stop + 1
        };
        Self {
            time: self.time[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[range.clone()].to_vec(),
                })
                .collect(),
        }
    }

    /// Append or replace a channel.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), ContractError> {
        let name = name.into();
        if values.len() != self.time.len() {
            return Err(ContractError::length_mismatch(
                format!("column '{name}'"),
                self.time.len(),
                values.len(),
            ));
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }
}
