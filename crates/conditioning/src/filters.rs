//! Smoothing, peak picking and discrete calculus on sample slices.

use std::cmp::Ordering;

/// Centred rolling mean.
///
/// The window is truncated at the edges and NaN samples are skipped, so every
/// output has at least one contributing sample unless its window is all NaN.
/// An even window covers `window / 2` samples before the centre and
/// `window / 2 - 1` after it.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let window = window.max(1);
    let offset = (window - 1) / 2;

    let mut sums = Vec::with_capacity(n + 1);
    let mut counts = Vec::with_capacity(n + 1);
    sums.push(0.0);
    counts.push(0usize);
    for &v in values {
        let (s, c) = (sums[sums.len() - 1], counts[counts.len() - 1]);
        if v.is_nan() {
            sums.push(s);
            counts.push(c);
        } else {
            sums.push(s + v);
            counts.push(c + 1);
        }
    }

    (0..n)
        .map(|i| {
            let hi = (i + offset + 1).min(n);
            let lo = (i + offset + 1).saturating_sub(window);
            let count = counts[hi] - counts[lo];
            if count == 0 {
                f64::NAN
            } else {
                (sums[hi] - sums[lo]) / count as f64
            }
        })
        .collect()
}

/// Indices of local maxima.
///
/// Flat peaks resolve to their middle sample (rounded down). Peaks below
/// `height` are dropped first; then, among peaks closer than `distance`
/// samples, only the tallest survives.
pub fn find_peaks(values: &[f64], height: Option<f64>, distance: Option<usize>) -> Vec<usize> {
    let n = values.len();
    let mut peaks = Vec::new();
    let mut i = 1;
    while i + 1 < n {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead + 1 < n && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }

    if let Some(height) = height {
        peaks.retain(|&p| values[p] >= height);
    }

    match distance {
        Some(distance) if distance > 1 && peaks.len() > 1 => select_by_distance(values, &peaks, distance),
        _ => peaks,
    }
}

fn select_by_distance(values: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    // tallest first, later peaks first among equal heights
    order.sort_by(|&a, &b| {
        values[peaks[b]]
            .partial_cmp(&values[peaks[a]])
            .unwrap_or(Ordering::Equal)
            .then(b.cmp(&a))
    });

    for &j in &order {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Derivative of `values` with respect to `time`.
///
/// Second-order central differences on the interior (non-uniform spacing
/// allowed), first-order one-sided differences at both ends.
pub fn gradient(values: &[f64], time: &[f64]) -> Vec<f64> {
    let n = values.len().min(time.len());
    match n {
        0 => return Vec::new(),
        1 => return vec![0.0],
        _ => {}
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (time[1] - time[0]));
    for i in 1..n - 1 {
        let hl = time[i] - time[i - 1];
        let hr = time[i + 1] - time[i];
        let d = (hl * hl * values[i + 1] - hr * hr * values[i - 1]
            + (hr * hr - hl * hl) * values[i])
            / (hl * hr * (hl + hr));
        out.push(d);
    }
    out.push((values[n - 1] - values[n - 2]) / (time[n - 1] - time[n - 2]));
    out
}

/// Running trapezoidal integral starting at zero.
pub fn cumulative_trapezoid(values: &[f64], time: &[f64]) -> Vec<f64> {
    let n = values.len().min(time.len());
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    let mut total = 0.0;
    out.push(total);
    for i in 1..n {
        total += 0.5 * (values[i] + values[i - 1]) * (time[i] - time[i - 1]);
        out.push(total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-9, "index {i}: {a} != {e}");
        }
    }

    #[test]
    fn test_rolling_mean_even_window() {
        let smoothed = rolling_mean(&[200.0, 200.0, 50.0, 50.0], 2);
        assert_close(&smoothed, &[200.0, 200.0, 125.0, 50.0]);
    }

    #[test]
    fn test_rolling_mean_odd_window_truncates_edges() {
        let smoothed = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_close(&smoothed, &[1.5, 2.0, 3.0, 4.0, 4.5]);
    }

    #[test]
    fn test_rolling_mean_skips_nan() {
        let smoothed = rolling_mean(&[1.0, f64::NAN, 3.0], 3);
        assert_close(&smoothed, &[1.0, 2.0, 3.0]);
        let all_nan = rolling_mean(&[f64::NAN, f64::NAN], 1);
        assert!(all_nan.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_mean_window_one_is_identity() {
        let values = [3.0, -1.0, 7.5];
        assert_eq!(rolling_mean(&values, 1), values.to_vec());
        assert_eq!(rolling_mean(&values, 0), values.to_vec());
    }

    #[test]
    fn test_find_peaks_plateau_and_edges() {
        let values = [5.0, 1.0, 3.0, 3.0, 3.0, 0.0, 2.0, 4.0];
        // edges never count, plateau resolves to its middle
        assert_eq!(find_peaks(&values, None, None), vec![3]);
    }

    #[test]
    fn test_find_peaks_height_and_distance() {
        let values = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0];
        assert_eq!(find_peaks(&values, None, None), vec![1, 3, 5, 11]);
        assert_eq!(find_peaks(&values, Some(1.0), None), vec![1, 3, 5]);
        assert_eq!(find_peaks(&values, None, Some(3)), vec![3, 11]);
    }

    #[test]
    fn test_gradient_linear_and_nonuniform() {
        let time = [0.0, 0.5, 2.0, 2.5];
        let values: Vec<f64> = time.iter().map(|t| 3.0 * t + 1.0).collect();
        assert_close(&gradient(&values, &time), &[3.0; 4]);

        let time = [0.0, 1.0, 3.0];
        let values: Vec<f64> = time.iter().map(|t| t * t).collect();
        // interior is exact for quadratics
        assert!((gradient(&values, &time)[1] - 2.0).abs() < 1e-12);
        assert_eq!(gradient(&[4.0], &[0.0]), vec![0.0]);
    }

    #[test]
    fn test_cumulative_trapezoid_constant() {
        let time = [0.0, 0.1, 0.2, 0.4];
        let integral = cumulative_trapezoid(&[2.0; 4], &time);
        assert_close(&integral, &[0.0, 0.2, 0.4, 0.8]);
        assert!(cumulative_trapezoid(&[], &[]).is_empty());
    }
}
