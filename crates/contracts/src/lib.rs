//! # Contracts
//!
//! Frozen interface contracts shared by every stage of the profile pipeline.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Signal`: samples on a strictly increasing time axis (seconds)
//! - `SampleTable`: the raw multi-channel table produced by the reader
//! - `Event`: an immutable index into a sample axis with its depth and time
//!
//! ## Depth Convention
//! Depth is expressed in centimetres and is negative into the snow. Every depth
//! curve is zero-referenced at the sample where its motion window starts.

mod calibration;
mod config;
mod error;
mod event;
mod recording;
mod signal;
mod summary;
mod table;

pub use calibration::CalibrationSet;
pub use config::*;
pub use error::*;
pub use event::*;
pub use recording::Recording;
pub use signal::Signal;
pub use summary::ProfileSummary;
pub use table::{Column, SampleTable, TIME_COLUMN};
