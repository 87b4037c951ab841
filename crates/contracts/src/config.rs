//! Profile processing configuration contracts shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Complete configuration for building a profile from one recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProfileConfig {
    /// Event detection thresholds
    #[validate(nested)]
    pub detection: DetectionConfig,

    /// Depth reconstruction parameters
    #[validate(nested)]
    pub depth: DepthConfig,

    /// Optical (NIR) channel correction
    #[validate(nested)]
    pub optical: OpticalConfig,

    /// Channel names in the recording
    pub columns: ColumnNames,

    /// Which estimator drives the reported depth
    pub depth_method: DepthMethod,

    /// Distance from the optical sensor back to the force tip (cm)
    #[validate(range(min = 0.0, max = 100.0))]
    pub surface_detection_offset_cm: f64,

    /// Diameter of the force tip (mm)
    #[validate(range(exclusive_min = 0.0))]
    pub tip_diameter_mm: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            depth: DepthConfig::default(),
            optical: OpticalConfig::default(),
            columns: ColumnNames::default(),
            depth_method: DepthMethod::default(),
            surface_detection_offset_cm: 4.5,
            tip_diameter_mm: 5.0,
        }
    }
}

/// Event detection thresholds.
///
/// Acceleration values are in g after border bias removal; optical and
/// force thresholds apply to border-normalized channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DetectionConfig {
    /// Fraction of samples forming the border used for bias removal
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub border_fraction: f64,

    /// Minimum |acceleration| of a motion peak (g)
    #[validate(range(min = 0.0))]
    pub peak_height: f64,
    /// Minimum separation of motion peaks (samples)
    #[validate(range(min = 1))]
    pub peak_distance: usize,

    pub start_threshold: f64,
    /// Upper bound of the quiet band before motion starts
    pub start_max_threshold: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub start_run_fraction: f64,

    pub stop_threshold: f64,
    pub stop_max_threshold: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub stop_run_fraction: f64,
    #[validate(range(min = 1))]
    pub stop_max_run: usize,

    #[validate(range(min = 0.0))]
    pub optical_surface_threshold: f64,
    #[validate(range(min = 0.0))]
    pub optical_stop_threshold: f64,
    /// Trailing window whose minimum biases the optical stop search
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub optical_stop_window_fraction: f64,

    #[validate(range(min = 0.0))]
    pub sensor_start_threshold: f64,

    #[validate(range(min = 0.0))]
    pub ground_strike_threshold: f64,
    /// Half-width of the ground strike search window around stop
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub ground_strike_window_fraction: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            border_fraction: 0.01,
            peak_height: 0.3,
            peak_distance: 10,
            start_threshold: -0.01,
            start_max_threshold: Some(0.02),
            start_run_fraction: 0.005,
            stop_threshold: -0.03,
            stop_max_threshold: Some(0.01),
            stop_run_fraction: 0.01,
            stop_max_run: 200,
            optical_surface_threshold: 0.1,
            optical_stop_threshold: 0.25,
            optical_stop_window_fraction: 0.05,
            sensor_start_threshold: 0.1,
            ground_strike_threshold: 0.5,
            ground_strike_window_fraction: 0.1,
        }
    }
}

/// Depth reconstruction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DepthConfig {
    /// Border fraction used to remove gravity from acceleration
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub border_fraction: f64,

    /// Smoothing window for barometer depth, as a fraction of the window length
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub smoothing_fraction: f64,

    /// Replacement for runs that move against the penetration direction
    pub monotonic_aggregate: MonotonicAggregate,

    /// Upward velocity (cm/s) tolerated before motion counts as upward
    #[validate(range(min = 0.0))]
    pub upward_velocity_tolerance: f64,

    /// Tail fraction averaged when rescaling the constrained barometer
    #[validate(range(exclusive_min = 0.0, max = 0.5))]
    pub constrained_tail_fraction: f64,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            border_fraction: 0.01,
            smoothing_fraction: 0.15,
            monotonic_aggregate: MonotonicAggregate::default(),
            upward_velocity_tolerance: 1e-3,
            constrained_tail_fraction: 0.1,
        }
    }
}

/// Optical channel correction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OpticalConfig {
    /// Ambient peak-to-peak range required before correction is applied
    #[validate(range(min = 0.0))]
    pub min_ambient_range: f64,

    /// Ambient smoothing window as a fraction of the recording length
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub ambient_smoothing_fraction: f64,
}

impl Default for OpticalConfig {
    fn default() -> Self {
        Self {
            min_ambient_range: 100.0,
            ambient_smoothing_fraction: 0.01,
        }
    }
}

/// Channel names as written by the probe firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub force: String,
    pub ambient: String,
    pub active: String,
    pub barometer_depth: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            force: "Sensor1".to_string(),
            ambient: "Sensor2".to_string(),
            active: "Sensor3".to_string(),
            barometer_depth: "depth".to_string(),
        }
    }
}

/// Depth estimator selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthMethod {
    /// Mean of accelerometer and barometer depth when both exist
    #[default]
    Fused,
    Accelerometer,
    Barometer,
}

/// Aggregate used to replace non-monotonic barometer runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonotonicAggregate {
    #[default]
    Mean,
    Median,
    Min,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProfileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.columns.force, "Sensor1");
        assert_eq!(config.depth_method, DepthMethod::Fused);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: ProfileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProfileConfig::default());
    }

    #[test]
    fn test_partial_section_override() {
        let json = r#"{"depth": {"monotonic_aggregate": "median"}, "depth_method": "barometer"}"#;
        let config: ProfileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.depth.monotonic_aggregate, MonotonicAggregate::Median);
        assert_eq!(config.depth.smoothing_fraction, 0.15);
        assert_eq!(config.depth_method, DepthMethod::Barometer);
    }

    #[test]
    fn test_nested_range_violation() {
        let mut config = ProfileConfig::default();
        config.detection.border_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = ProfileConfig::default();
        config.tip_diameter_mm = 0.0;
        assert!(config.validate().is_err());
    }
}
