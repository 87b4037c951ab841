//! NaN-skipping reductions.

use std::cmp::Ordering;

/// Mean of the non-NaN samples, NaN when there are none.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

pub fn nan_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::min)
}

pub fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, f64::max)
}

/// Peak-to-peak range, NaN when every sample is NaN.
pub fn nan_range(values: &[f64]) -> f64 {
    nan_max(values) - nan_min(values)
}

pub fn nan_median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Index of the largest sample; ties resolve to the first occurrence.
pub fn nan_argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Index of the smallest sample; ties resolve to the first occurrence.
pub fn nan_argmin(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reductions_skip_nan() {
        let values = [f64::NAN, 1.0, 3.0, f64::NAN, 2.0];
        assert_eq!(nan_mean(&values), 2.0);
        assert_eq!(nan_min(&values), 1.0);
        assert_eq!(nan_max(&values), 3.0);
        assert_eq!(nan_range(&values), 2.0);
        assert_eq!(nan_median(&values), 2.0);
        assert_eq!(nan_argmax(&values), Some(2));
        assert_eq!(nan_argmin(&values), Some(1));
    }

    #[test]
    fn test_all_nan_yields_nan() {
        let values = [f64::NAN, f64::NAN];
        assert!(nan_mean(&values).is_nan());
        assert!(nan_min(&values).is_nan());
        assert!(nan_median(&[]).is_nan());
        assert_eq!(nan_argmax(&values), None);
    }

    #[test]
    fn test_even_median_and_ties() {
        assert_eq!(nan_median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(nan_argmax(&[1.0, 5.0, 5.0]), Some(1));
        assert_eq!(nan_argmin(&[0.0, 5.0, 0.0]), Some(0));
    }
}
