//! Ambient light correction for the active optical channel.

use contracts::Direction;
use tracing::debug;

use crate::border::{directional_mean, normalized_at_border, points_from_fraction};
use crate::filters::rolling_mean;
use crate::stats::{nan_min, nan_range};

const BORDER_FRACTION: f64 = 0.01;

/// Remove the ambient contribution from the active optical channel.
///
/// Correction only happens when the ambient channel moves by more than
/// `min_ambient_range`. The two channels carry different absolute offsets,
/// so both are normalized at the leading border and the difference is scaled
/// back by the active border level. Where smoothed ambient sits at its floor
/// the raw active sample is kept. Output is shifted non-negative and floored
/// at 1.
pub fn remove_ambient(
    active: &[f64],
    ambient: &[f64],
    min_ambient_range: f64,
    smoothing_fraction: f64,
) -> Vec<f64> {
    let range = nan_range(ambient);
    if range.is_nan() || range <= min_ambient_range || active.len() != ambient.len() {
        debug!(range, min_ambient_range, "ambient correction skipped");
        return active.to_vec();
    }

    let window = points_from_fraction(ambient.len(), smoothing_fraction, None).max(2);
    let smoothed = rolling_mean(ambient, window);
    let floor = nan_min(&smoothed);

    let norm_active = normalized_at_border(active, BORDER_FRACTION, Direction::Forward);
    let norm_ambient = normalized_at_border(&smoothed, BORDER_FRACTION, Direction::Forward);
    let scale = directional_mean(active, BORDER_FRACTION, Direction::Forward);

    let mut corrected: Vec<f64> = norm_active
        .iter()
        .zip(&norm_ambient)
        .zip(smoothed.iter().zip(active))
        .map(|((na, nb), (s, raw))| if *s <= floor { *raw } else { (na - nb) * scale })
        .collect();

    let minimum = nan_min(&corrected);
    if minimum < 0.0 {
        corrected.iter_mut().for_each(|v| *v -= minimum);
    }
    corrected.iter_mut().for_each(|v| *v = v.max(1.0));
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_ambient_scenario() {
        let active = [200.0, 200.0, 400.0, 1000.0];
        let ambient = [200.0, 200.0, 50.0, 50.0];
        let nir = remove_ambient(&active, &ambient, 100.0, 0.01);
        let expected = [1.0, 1.0, 275.0, 1000.0];
        for (i, (a, e)) in nir.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-9, "index {i}: {a} != {e}");
        }
    }

    #[test]
    fn test_remove_ambient_quiet_ambient_unchanged() {
        let active = [200.0, 300.0, 400.0];
        let ambient = [100.0, 120.0, 110.0];
        assert_eq!(remove_ambient(&active, &ambient, 100.0, 0.01), active.to_vec());
    }

    #[test]
    fn test_remove_ambient_never_below_one() {
        let n = 200;
        let ambient: Vec<f64> = (0..n).map(|i| if i < 100 { 3000.0 } else { 100.0 }).collect();
        let active: Vec<f64> = (0..n).map(|i| 2000.0 + (i as f64 * 0.3).sin() * 500.0).collect();
        let nir = remove_ambient(&active, &ambient, 100.0, 0.01);
        assert_eq!(nir.len(), n);
        assert!(nir.iter().all(|v| *v >= 1.0));
    }
}
