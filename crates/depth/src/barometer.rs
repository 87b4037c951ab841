//! Depth from the barometric channel.

use conditioning::{
    points_from_fraction, rolling_mean,
    stats::{nan_mean, nan_median, nan_min},
};
use contracts::{ContractError, DepthConfig, DepthSource, MonotonicAggregate, Signal};
use tracing::{debug, warn};

use crate::DepthProfile;

/// Force a depth sequence to be non-increasing.
///
/// Scanning forward, a run of samples shallower than the deepest value so far
/// is replaced by an aggregate of that extreme (weighted by the run length)
/// and the sample that ends the run. The aggregate never exceeds the extreme,
/// and a run that reaches the end is held at the extreme. NaN samples outside
/// a run are left in place.
pub fn monotonic_non_increasing(values: &[f64], aggregate: MonotonicAggregate) -> Vec<f64> {
    let mut out = values.to_vec();
    let mut extreme = f64::NAN;
    let mut i = 0;

    while i < out.len() {
        let v = out[i];
        if v.is_nan() {
            i += 1;
            continue;
        }
        if extreme.is_nan() || v <= extreme {
            extreme = v;
            i += 1;
            continue;
        }

        match (i + 1..out.len()).find(|&j| out[j] <= extreme) {
            Some(j) => {
                let run = j - i;
                let mut group = vec![extreme; run + 1];
                group.push(out[j]);
                let replacement = match aggregate {
                    MonotonicAggregate::Mean => nan_mean(&group),
                    MonotonicAggregate::Median => nan_median(&group),
                    MonotonicAggregate::Min => nan_min(&group),
                };
                out[i..j].fill(replacement);
                extreme = out[j];
                i = j + 1;
            }
            None => {
                out[i..].fill(extreme);
                break;
            }
        }
    }
    out
}

/// Whether a window rises overall and must be flipped to point downward.
pub(crate) fn rises(window: &[f64]) -> bool {
    let first = window.iter().find(|v| !v.is_nan());
    let last = window.iter().rev().find(|v| !v.is_nan());
    matches!((first, last), (Some(first), Some(last)) if last > first)
}

/// Orient a window so its net change is downward.
pub(crate) fn oriented(window: &[f64]) -> Vec<f64> {
    if rises(window) {
        window.iter().map(|v| -v).collect()
    } else {
        window.to_vec()
    }
}

/// Monotonic filter followed by a centred smoothing window.
pub(crate) fn filter_and_smooth(window: &[f64], config: &DepthConfig) -> Vec<f64> {
    let monotonic = monotonic_non_increasing(window, config.monotonic_aggregate);
    let smoothing = points_from_fraction(window.len(), config.smoothing_fraction, None);
    rolling_mean(&monotonic, smoothing)
}

/// Barometric depth over `[start, stop]`.
///
/// The window is oriented downward, made monotonic, smoothed and
/// zero-referenced at `start`. `start >= stop` yields a flat curve.
pub fn barometer_depth(
    depth: &Signal,
    start: usize,
    stop: usize,
    config: &DepthConfig,
) -> Result<DepthProfile, ContractError> {
    let n = depth.len();
    let stop = stop.min(n.saturating_sub(1));
    if n == 0 || start >= stop {
        warn!(start, stop, "degenerate motion window, barometer depth is flat");
        return DepthProfile::flat(
            DepthSource::Barometer,
            depth,
            start,
            stop,
            config.upward_velocity_tolerance,
        );
    }

    let window = oriented(&depth.values()[start..=stop]);
    let smoothed = filter_and_smooth(&window, config);
    debug!(start, stop, "barometer depth filtered");

    DepthProfile::from_window(
        DepthSource::Barometer,
        depth,
        start,
        &smoothed,
        config.upward_velocity_tolerance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(values: Vec<f64>) -> Signal {
        let time = (0..values.len()).map(|i| i as f64 * 0.01).collect();
        Signal::new(time, values).unwrap()
    }

    #[test]
    fn test_monotonic_mean_replacement() {
        let values = [0.0, -1.0, -0.5, -0.2, -2.0, -3.0];
        let out = monotonic_non_increasing(&values, MonotonicAggregate::Mean);
        // extreme -1 over a run of 2, ended by -2: mean of [-1, -1, -1, -2]
        assert_eq!(out, vec![0.0, -1.0, -1.25, -1.25, -2.0, -3.0]);
    }

    #[test]
    fn test_monotonic_aggregates() {
        let values = [0.0, -1.0, 5.0, -4.0];
        let median = monotonic_non_increasing(&values, MonotonicAggregate::Median);
        assert_eq!(median, vec![0.0, -1.0, -1.0, -4.0]);
        let min = monotonic_non_increasing(&values, MonotonicAggregate::Min);
        assert_eq!(min, vec![0.0, -1.0, -4.0, -4.0]);
    }

    #[test]
    fn test_monotonic_run_to_end_holds_extreme() {
        let values = [0.0, -2.0, -1.0, 0.5];
        let out = monotonic_non_increasing(&values, MonotonicAggregate::Mean);
        assert_eq!(out, vec![0.0, -2.0, -2.0, -2.0]);
    }

    #[test]
    fn test_monotonic_output_never_increases() {
        let values: Vec<f64> = (0..400)
            .map(|i| -(i as f64) * 0.1 + 3.0 * (i as f64 * 0.21).sin())
            .collect();
        for aggregate in [
            MonotonicAggregate::Mean,
            MonotonicAggregate::Median,
            MonotonicAggregate::Min,
        ] {
            let out = monotonic_non_increasing(&values, aggregate);
            assert!(
                out.windows(2).all(|w| w[1] <= w[0]),
                "{aggregate:?} produced an increase"
            );
        }
    }

    #[test]
    fn test_barometer_depth_no_upward_velocity() {
        let n = 500;
        // rising pressure depth (wrong sign) with bounces
        let values: Vec<f64> = (0..n)
            .map(|i| 100.0 + i as f64 * 0.2 + 4.0 * (i as f64 * 0.15).sin())
            .collect();
        let config = DepthConfig::default();
        let profile = barometer_depth(&signal(values), 50, 450, &config).unwrap();

        assert_eq!(profile.depth_at(50), 0.0);
        assert!(profile.depth_at(450) < -50.0);
        assert!(!profile.has_upward_motion());
        assert!(profile
            .velocity()
            .iter()
            .all(|v| *v <= config.upward_velocity_tolerance));
    }

    #[test]
    fn test_barometer_depth_degenerate_window() {
        let profile =
            barometer_depth(&signal(vec![1.0, 2.0, 3.0]), 2, 1, &DepthConfig::default()).unwrap();
        assert!(profile.values().iter().all(|v| *v == 0.0));
        let profile =
            barometer_depth(&signal(vec![]), 0, 0, &DepthConfig::default()).unwrap();
        assert!(profile.values().is_empty());
    }
}
