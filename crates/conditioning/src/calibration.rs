//! Polynomial calibration of raw sensor counts.

/// Evaluate `coefficients` (highest degree first) at every sample.
///
/// Results are clamped to `[minimum, maximum]` when bounds are given. An empty
/// coefficient list evaluates to zero.
pub fn apply_calibration(
    values: &[f64],
    coefficients: &[f64],
    minimum: Option<f64>,
    maximum: Option<f64>,
) -> Vec<f64> {
    values
        .iter()
        .map(|&x| {
            let mut y = coefficients.iter().fold(0.0, |acc, c| acc * x + c);
            if let Some(min) = minimum {
                y = y.max(min);
            }
            if let Some(max) = maximum {
                y = y.min(max);
            }
            y
        })
        .collect()
}
