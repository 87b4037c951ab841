//! Level changes on the force channel.

use conditioning::{
    neutral_bias_at_border, points_from_fraction,
    stats::{nan_max, nan_range},
};
use contracts::{DetectionConfig, Direction};
use observability::{record_event_detected, record_event_not_found};
use tracing::{debug, warn};

use crate::signal_event::first_crossing;

/// First genuine level change on a force-like channel.
///
/// The channel is zeroed at its leading border and scaled by its largest
/// excursion; the first sample reaching `sensor_start_threshold` is returned.
/// Returns 0 when the channel never changes.
pub fn sensor_start(values: &[f64], config: &DetectionConfig) -> usize {
    let biased = neutral_bias_at_border(values, config.border_fraction, Direction::Forward);
    let magnitude: Vec<f64> = biased.iter().map(|v| v.abs()).collect();
    let scale = nan_max(&magnitude);

    let index = if scale > 0.0 {
        let scaled: Vec<f64> = magnitude.iter().map(|v| v / scale).collect();
        first_crossing(&scaled, config.sensor_start_threshold)
    } else {
        None
    };

    match index {
        Some(index) => {
            debug!(index, "sensor start detected");
            record_event_detected("sensor_start", index);
            index
        }
        None => {
            warn!("sensor start not detected, using first sample");
            record_event_not_found("sensor_start");
            0
        }
    }
}

/// Impact on the ground close to the motion stop.
///
/// Searches `stop` plus or minus `ground_strike_window_fraction` of the
/// recording. The window is zeroed at its leading border and scaled by the
/// full-channel range; the strike is the first sample reaching
/// `ground_strike_threshold`. `None` when the window is already high at its
/// start or never rises.
pub fn ground_strike(force: &[f64], stop: usize, config: &DetectionConfig) -> Option<usize> {
    let n = force.len();
    if n == 0 {
        return None;
    }
    let stop = stop.min(n - 1);
    let buffer = points_from_fraction(n, config.ground_strike_window_fraction, None);
    let lo = stop.saturating_sub(buffer);
    let hi = (stop + buffer).min(n - 1);

    let range = nan_range(force);
    let strike = if range > 0.0 {
        let window = neutral_bias_at_border(&force[lo..=hi], config.border_fraction, Direction::Forward);
        let threshold = config.ground_strike_threshold;
        match window.first() {
            Some(first) if first / range >= threshold => None,
            _ => {
                let scaled: Vec<f64> = window.iter().map(|v| v / range).collect();
                first_crossing(&scaled, threshold).map(|i| lo + i)
            }
        }
    } else {
        None
    };

    match strike {
        Some(index) => {
            debug!(index, stop, "ground strike detected");
            record_event_detected("ground_strike", index);
        }
        None => {
            debug!(stop, lo, hi, "no ground strike");
            record_event_not_found("ground_strike");
        }
    }
    strike
}
