//! Insertion angle from the resting accelerometer vector.

use conditioning::{points_from_fraction, stats::nan_mean};
use nalgebra::Vector3;

/// Angle between the probe axis (Y) and gravity while at rest, in degrees.
///
/// The gravity vector is the mean of the first `fraction` of each axis. The
/// result is folded to `[0, 90]` so the probe orientation sign does not
/// matter. `None` when an axis has no valid resting samples or the vector
/// has zero length.
pub fn insertion_angle(x: &[f64], y: &[f64], z: &[f64], fraction: f64) -> Option<f64> {
    let n = x.len().min(y.len()).min(z.len());
    if n == 0 {
        return None;
    }
    let rest = points_from_fraction(n, fraction, None);
    let gravity = Vector3::new(
        nan_mean(&x[..rest]),
        nan_mean(&y[..rest]),
        nan_mean(&z[..rest]),
    );
    if gravity.iter().any(|c| c.is_nan()) || gravity.norm() == 0.0 {
        return None;
    }

    let angle = gravity.angle(&Vector3::y()).to_degrees();
    Some(if angle > 90.0 { 180.0 - angle } else { angle })
}
