//! Depth from double integration of the accelerometer.

use conditioning::{cumulative_trapezoid, neutral_bias_at_border};
use contracts::{ContractError, DepthConfig, DepthSource, Direction, Signal};
use tracing::{debug, warn};

use crate::DepthProfile;

/// Standard gravity (m/s^2)
pub const GRAVITY: f64 = 9.81;

const M_TO_CM: f64 = 100.0;

/// Integrate acceleration (g) twice over `[start, stop]`.
///
/// Gravity is removed at the leading border and NaN samples count as zero
/// acceleration. The curve is oriented so the net motion is downward and is
/// exactly zero at `start`. A window with `start >= stop` yields a flat curve.
pub fn accelerometer_depth(
    acceleration: &Signal,
    start: usize,
    stop: usize,
    config: &DepthConfig,
) -> Result<DepthProfile, ContractError> {
    let n = acceleration.len();
    let stop = stop.min(n.saturating_sub(1));
    if n == 0 || start >= stop {
        warn!(start, stop, "degenerate motion window, accelerometer depth is flat");
        return DepthProfile::flat(
            DepthSource::Accelerometer,
            acceleration,
            start,
            stop,
            config.upward_velocity_tolerance,
        );
    }

    let biased = neutral_bias_at_border(
        acceleration.values(),
        config.border_fraction,
        Direction::Forward,
    );
    let accel_ms2: Vec<f64> = biased[start..=stop]
        .iter()
        .map(|g| if g.is_nan() { 0.0 } else { g * GRAVITY })
        .collect();
    let time = &acceleration.time()[start..=stop];

    let velocity = cumulative_trapezoid(&accel_ms2, time);
    let mut position: Vec<f64> = cumulative_trapezoid(&velocity, time)
        .into_iter()
        .map(|m| m * M_TO_CM)
        .collect();

    if position.last().is_some_and(|last| *last > 0.0) {
        position.iter_mut().for_each(|v| *v = -*v);
    }
    debug!(
        start,
        stop,
        depth_cm = position.last().copied().unwrap_or(0.0),
        "accelerometer depth integrated"
    );

    DepthProfile::from_window(
        DepthSource::Accelerometer,
        acceleration,
        start,
        &position,
        config.upward_velocity_tolerance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_time(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    /// -1 g at rest with a constant push between `a` and `b`
    fn pushed(n: usize, dt: f64, a: usize, b: usize, g: f64) -> Signal {
        let values = (0..n)
            .map(|i| if (a..b).contains(&i) { -1.0 + g } else { -1.0 })
            .collect();
        Signal::new(uniform_time(n, dt), values).unwrap()
    }

    #[test]
    fn test_depth_zero_at_start() {
        let config = DepthConfig::default();
        for (start, stop) in [(10, 90), (0, 50), (37, 38)] {
            let acc = pushed(100, 0.01, 20, 40, 0.5);
            let profile = accelerometer_depth(&acc, start, stop, &config).unwrap();
            assert_eq!(profile.depth_at(start), 0.0, "start={start}");
            assert!(profile.values()[..start].iter().all(|v| *v == 0.0));
        }
    }

    #[test]
    fn test_constant_acceleration_matches_kinematics() {
        // 0.1 g for 1 s: 0.5 * 0.981 * 1 m = 49.05 cm
        let n = 1001;
        let acc = pushed(n, 0.001, 0, n, 0.1);
        let mut values = acc.values().to_vec();
        values[0] = -1.0;
        let acc = acc.with_values(values).unwrap();
        let config = DepthConfig {
            border_fraction: 0.0001,
            ..Default::default()
        };
        let profile = accelerometer_depth(&acc, 0, n - 1, &config).unwrap();
        let end = profile.depth_at(n - 1);
        assert!((end + 49.05).abs() < 0.2, "depth at end {end}");
        assert!(end < 0.0);
    }

    #[test]
    fn test_holds_after_stop() {
        let acc = pushed(100, 0.01, 20, 40, 0.5);
        let profile = accelerometer_depth(&acc, 10, 60, &DepthConfig::default()).unwrap();
        let hold = profile.depth_at(60);
        assert!(profile.values()[60..].iter().all(|v| *v == hold));
        assert!(hold < 0.0);
    }

    #[test]
    fn test_degenerate_window_is_flat() {
        let acc = pushed(50, 0.01, 10, 20, 0.5);
        let profile = accelerometer_depth(&acc, 30, 30, &DepthConfig::default()).unwrap();
        assert!(profile.values().iter().all(|v| *v == 0.0));
        let profile = accelerometer_depth(&acc, 40, 10, &DepthConfig::default()).unwrap();
        assert_eq!(profile.distance_traveled(), 0.0);
    }

    #[test]
    fn test_nan_samples_are_zero_motion() {
        let acc = pushed(100, 0.01, 20, 40, 0.5);
        let mut values = acc.values().to_vec();
        values[70] = f64::NAN;
        let with_gap = acc.with_values(values).unwrap();
        let profile = accelerometer_depth(&with_gap, 10, 90, &DepthConfig::default()).unwrap();
        assert!(profile.values().iter().all(|v| v.is_finite()));
    }
}
