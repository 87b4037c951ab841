//! # Depth
//!
//! Two independent depth estimators and their fusion.
//!
//! - accelerometer: gravity removed, integrated twice between start and stop
//! - barometer: forced monotonic and smoothed, optionally rescaled onto the
//!   accelerometer's motion window
//!
//! Every estimator returns a [`DepthProfile`]: a full-length depth curve in cm
//! (negative into the snow), zero before and at its start index and holding
//! its final value after its stop index.

mod accelerometer;
mod barometer;
mod constrained;
mod fusion;
mod profile;

pub use accelerometer::{accelerometer_depth, GRAVITY};
pub use barometer::{barometer_depth, monotonic_non_increasing};
pub use constrained::constrained_baro_depth;
pub use fusion::{fuse, select_depth};
pub use profile::DepthProfile;
