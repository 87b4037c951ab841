//! ProfileSummary - per-recording headline numbers

use serde::{Deserialize, Serialize};

use crate::DepthSource;

/// Headline statistics of one processed recording.
///
/// Produced by the profile stage and consumed by metric export and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub serial: String,
    pub samples: usize,
    pub depth_source: DepthSource,
    /// Total travel between start and stop (cm)
    pub distance_traveled_cm: f64,
    /// Travel from the force surface to stop (cm)
    pub distance_through_snow_cm: f64,
    /// Time between start and stop (s)
    pub moving_time_s: f64,
    pub avg_velocity_cm_s: f64,
    pub max_velocity_cm_s: f64,
    pub has_upward_motion: bool,
    pub ground_strike: bool,
    /// Angle from vertical in degrees, when the recording has all three axes
    pub angle_deg: Option<f64>,
}
