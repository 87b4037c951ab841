//! # Reader
//!
//! Loads probe recordings: a `key = value` metadata block followed by a CSV
//! sample table with a `time` column.
//!
//! ```ignore
//! let recording = reader::read_recording("probe.csv")?;
//! println!("{} samples from {}", recording.table.len(), recording.serial_number());
//! ```
//!
//! [`mock::SyntheticPush`] generates deterministic recordings for tests.

mod format;
mod error;
pub mod mock;

pub use format::{parse_recording, read_metadata, read_recording, to_csv_string, write_recording};
pub use error::{ReaderError, Result};
