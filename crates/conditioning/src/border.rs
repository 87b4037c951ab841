//! Border statistics: fractional sizing, directional mean, bias and scale removal.

use contracts::Direction;

use crate::stats::nan_mean;

/// Number of samples covered by `fraction` of `n`.
///
/// Always at least 1 and, for `n > 1`, strictly below `n`. An optional
/// `maximum` caps the result further.
pub fn points_from_fraction(n: usize, fraction: f64, maximum: Option<usize>) -> usize {
    let raw = (fraction * n as f64).round();
    let mut points = if raw.is_finite() && raw > 1.0 {
        raw as usize
    } else {
        1
    };
    if n > 1 {
        points = points.min(n - 1);
    }
    if let Some(maximum) = maximum {
        points = points.min(maximum.max(1));
    }
    points
}

/// Border slice of `values` sized by `fractional_basis`.
fn border(values: &[f64], fractional_basis: f64, direction: Direction) -> &[f64] {
    let points = points_from_fraction(values.len(), fractional_basis, None).min(values.len());
    match direction {
        Direction::Forward => &values[..points],
        Direction::Backward => &values[values.len() - points..],
    }
}

/// NaN-skipping mean of the leading or trailing border.
pub fn directional_mean(values: &[f64], fractional_basis: f64, direction: Direction) -> f64 {
    nan_mean(border(values, fractional_basis, direction))
}

/// Subtract the border mean so the chosen border averages to zero.
pub fn neutral_bias_at_border(
    values: &[f64],
    fractional_basis: f64,
    direction: Direction,
) -> Vec<f64> {
    let bias = directional_mean(values, fractional_basis, direction);
    values.iter().map(|v| v - bias).collect()
}

/// Divide by the border mean so the chosen border averages to one.
///
/// A border mean of exactly zero leaves the samples unchanged.
pub fn normalized_at_border(
    values: &[f64],
    fractional_basis: f64,
    direction: Direction,
) -> Vec<f64> {
    let scale = directional_mean(values, fractional_basis, direction);
    if scale == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / scale).collect()
}
