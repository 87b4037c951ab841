//! Motion start/stop from the probe accelerometer.

use conditioning::{find_peaks, neutral_bias_at_border, points_from_fraction};
use contracts::{DetectionConfig, Direction};
use observability::{record_event_detected, record_event_not_found};
use tracing::{debug, warn};

use crate::signal_event::find_signal_event;

/// Accelerometer samples with NaNs removed, keeping their original positions.
struct Compacted {
    positions: Vec<usize>,
    values: Vec<f64>,
}

impl Compacted {
    fn new(acceleration: &[f64]) -> Self {
        let (positions, values) = acceleration
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, v)| (i, *v))
            .unzip();
        Self { positions, values }
    }
}

fn motion_peaks(biased: &[f64], config: &DetectionConfig) -> Vec<usize> {
    let magnitude: Vec<f64> = biased.iter().map(|v| v.abs()).collect();
    find_peaks(
        &magnitude,
        Some(config.peak_height),
        Some(config.peak_distance),
    )
}

/// Index where the probe starts moving.
///
/// Gravity is removed at the leading border, the search is bounded by the
/// first high-magnitude peak, and the result is the last sample of the quiet
/// band preceding it. Returns 0 when no quiet band is found.
pub fn acceleration_start(acceleration: &[f64], config: &DetectionConfig) -> usize {
    let compacted = Compacted::new(acceleration);
    let n = compacted.values.len();
    if n == 0 {
        warn!("acceleration start: no valid samples");
        record_event_not_found("start");
        return 0;
    }

    let biased = neutral_bias_at_border(&compacted.values, config.border_fraction, Direction::Forward);
    let bound = motion_peaks(&biased, config)
        .first()
        .copied()
        .unwrap_or(n - 1);
    let n_points = points_from_fraction(n, config.start_run_fraction, None);

    match find_signal_event(
        &biased[..=bound],
        config.start_threshold,
        Direction::Forward,
        config.start_max_threshold,
        n_points,
    ) {
        Some(idx) => {
            let index = compacted.positions[idx];
            debug!(index, bound, n_points, "acceleration start detected");
            record_event_detected("start", index);
            index
        }
        None => {
            warn!(bound, "acceleration start not found, using first sample");
            record_event_not_found("start");
            0
        }
    }
}

/// Index where the probe comes to rest.
///
/// Gravity is removed at the trailing border and the tail after the last
/// high-magnitude peak is searched backward for the resting band. Returns the
/// last index when no resting band is found.
pub fn acceleration_stop(acceleration: &[f64], config: &DetectionConfig) -> usize {
    let last = acceleration.len().saturating_sub(1);
    let compacted = Compacted::new(acceleration);
    let n = compacted.values.len();
    if n == 0 {
        warn!("acceleration stop: no valid samples");
        record_event_not_found("stop");
        return last;
    }

    let biased =
        neutral_bias_at_border(&compacted.values, config.border_fraction, Direction::Backward);
    let tail_start = motion_peaks(&biased, config).last().copied().unwrap_or(0);
    let n_points = points_from_fraction(n, config.stop_run_fraction, Some(config.stop_max_run));

    match find_signal_event(
        &biased[tail_start..],
        config.stop_threshold,
        Direction::Backward,
        config.stop_max_threshold,
        n_points,
    ) {
        Some(idx) => {
            let index = compacted.positions[tail_start + idx];
            debug!(index, tail_start, n_points, "acceleration stop detected");
            record_event_detected("stop", index);
            index
        }
        None => {
            warn!(tail_start, "acceleration stop not found, using last sample");
            record_event_not_found("stop");
            last
        }
    }
}
