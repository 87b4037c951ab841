//! # Conditioning
//!
//! Border-relative bias removal, normalization and the numeric primitives the
//! detection and depth stages build on.
//!
//! All functions are pure: they borrow sample slices and return new vectors.
//! NaN samples are treated as missing and skipped by every statistic.
//!
//! ## Example
//!
//! ```
//! use conditioning::{directional_mean, neutral_bias_at_border};
//! use contracts::Direction;
//!
//! let samples = [1.0, 1.0, 2.0, 2.0];
//! assert_eq!(directional_mean(&samples, 0.5, Direction::Forward), 1.0);
//! assert_eq!(neutral_bias_at_border(&samples, 0.5, Direction::Forward)[0], 0.0);
//! ```

mod align;
mod ambient;
mod border;
mod calibration;
mod filters;
pub mod stats;

pub use align::{interpolate, merge_on_to_time};
pub use ambient::remove_ambient;
pub use border::{
    directional_mean, neutral_bias_at_border, normalized_at_border, points_from_fraction,
};
pub use calibration::apply_calibration;
pub use filters::{cumulative_trapezoid, find_peaks, gradient, rolling_mean};
