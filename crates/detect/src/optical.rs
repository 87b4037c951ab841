//! Snow surface and stop from the optical (NIR) channels.

use conditioning::{normalized_at_border, points_from_fraction, stats::nan_min};
use contracts::{DetectionConfig, Direction};
use observability::{record_event_detected, record_event_not_found};
use tracing::{debug, warn};

use crate::signal_event::{find_signal_event, first_crossing};

/// Index where the probe tip enters the snow.
///
/// Active and ambient light are normalized at the leading border; once the tip
/// is in scattering snow they diverge. The surface is the first sample whose
/// absolute difference reaches `optical_surface_threshold`. Returns 0 when the
/// channels never diverge.
pub fn optical_surface(active: &[f64], ambient: &[f64], config: &DetectionConfig) -> usize {
    let active = normalized_at_border(active, config.border_fraction, Direction::Forward);
    let ambient = normalized_at_border(ambient, config.border_fraction, Direction::Forward);

    let divergence: Vec<f64> = active
        .iter()
        .zip(&ambient)
        .map(|(a, b)| (a - b).abs())
        .collect();
    let surface = first_crossing(&divergence, config.optical_surface_threshold);

    match surface {
        Some(index) => {
            debug!(index, "optical surface detected");
            record_event_detected("surface", index);
            index
        }
        None => {
            warn!("optical surface not detected, using first sample");
            record_event_not_found("surface");
            0
        }
    }
}

/// Index of the last optically active sample.
///
/// The resting level is the minimum of a trailing window; after removing it
/// and normalizing at the leading border, the trailing quiet band is found
/// searching backward and the sample before it is the stop. Returns the last
/// index when the recording ends while still active or never becomes active.
pub fn optical_stop(nir: &[f64], config: &DetectionConfig) -> usize {
    let n = nir.len();
    let last = n.saturating_sub(1);
    if n == 0 {
        record_event_not_found("optical_stop");
        return last;
    }

    let window = points_from_fraction(n, config.optical_stop_window_fraction, None).min(n);
    let rest = nan_min(&nir[n - window..]);
    let rest = if rest.is_nan() { 0.0 } else { rest };
    let biased: Vec<f64> = nir.iter().map(|v| v - rest).collect();
    let level: Vec<f64> = normalized_at_border(&biased, config.border_fraction, Direction::Forward)
        .into_iter()
        .map(f64::abs)
        .collect();

    if level[last] >= config.optical_stop_threshold {
        debug!(index = last, "optical channel active through the end");
        record_event_detected("optical_stop", last);
        return last;
    }

    // lowest forward index of the trailing quiet band
    match find_signal_event(
        &level,
        f64::NEG_INFINITY,
        Direction::Backward,
        Some(config.optical_stop_threshold),
        1,
    ) {
        Some(quiet_start) if quiet_start > 0 => {
            let index = quiet_start - 1;
            debug!(index, "optical stop detected");
            record_event_detected("optical_stop", index);
            index
        }
        _ => {
            warn!("optical stop not detected, using last sample");
            record_event_not_found("optical_stop");
            last
        }
    }
}
