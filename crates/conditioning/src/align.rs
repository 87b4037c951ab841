//! Multi-rate time alignment.

use contracts::{Column, ContractError, SampleTable, Signal};
use tracing::debug;

/// Linearly interpolate `(time, values)` onto `target`.
///
/// Targets outside the source time range, or NaN targets, produce NaN.
/// A target that coincides with a source timestamp returns that sample as is.
pub fn interpolate(time: &[f64], values: &[f64], target: &[f64]) -> Vec<f64> {
    let n = time.len().min(values.len());
    if n == 0 {
        return vec![f64::NAN; target.len()];
    }
    let (first, last) = (time[0], time[n - 1]);

    target
        .iter()
        .map(|&t| {
            if t.is_nan() || t < first || t > last {
                return f64::NAN;
            }
            let upper = time[..n].partition_point(|&x| x < t);
            if upper < n && time[upper] == t {
                return values[upper];
            }
            // first < t <= last and no exact match, so 1 <= upper < n
            let lower = upper - 1;
            let span = time[upper] - time[lower];
            let weight = (t - time[lower]) / span;
            values[lower] + weight * (values[upper] - values[lower])
        })
        .collect()
}

/// Resample named signals onto one shared, ascending time axis.
///
/// Each input is interpolated independently; samples outside an input's
/// own time range stay NaN.
///
/// # Errors
/// `NonMonotonicTime` when `target_time` is not strictly increasing.
pub fn merge_on_to_time(
    signals: &[(&str, &Signal)],
    target_time: &[f64],
) -> Result<SampleTable, ContractError> {
    let columns = signals
        .iter()
        .map(|(name, signal)| Column {
            name: name.to_string(),
            values: interpolate(signal.time(), signal.values(), target_time),
        })
        .collect();
    debug!(
        inputs = signals.len(),
        samples = target_time.len(),
        "merged signals onto shared time axis"
    );
    SampleTable::new(target_time.to_vec(), columns)
}
