//! Generic threshold / run-length event locator.

use contracts::Direction;

/// Locate the first qualifying run of at least `n_points` samples.
///
/// A sample qualifies when `threshold <= value` and, with `max_threshold`,
/// `value < max_threshold`. Runs are scanned in search order (reversed for
/// [`Direction::Backward`]) and the index returned is the last sample of the
/// first long-enough run in that order, mapped back onto the forward axis.
pub fn find_signal_event(
    values: &[f64],
    threshold: f64,
    direction: Direction,
    max_threshold: Option<f64>,
    n_points: usize,
) -> Option<usize> {
    let n_points = n_points.max(1);
    let qualifies = |v: f64| threshold <= v && max_threshold.is_none_or(|max| v < max);

    let found = match direction {
        Direction::Forward => run_end(values.iter().copied(), qualifies, n_points),
        Direction::Backward => run_end(values.iter().rev().copied(), qualifies, n_points),
    }?;

    Some(match direction {
        Direction::Forward => found,
        Direction::Backward => values.len() - 1 - found,
    })
}

/// [`find_signal_event`] with the "no event" sentinel: index 0 when searching
/// forward, the last index when searching backward.
pub fn signal_event(
    values: &[f64],
    threshold: f64,
    direction: Direction,
    max_threshold: Option<f64>,
    n_points: usize,
) -> usize {
    find_signal_event(values, threshold, direction, max_threshold, n_points).unwrap_or(
        match direction {
            Direction::Forward => 0,
            Direction::Backward => values.len().saturating_sub(1),
        },
    )
}

/// Position (in iteration order) of the last sample of the first run of at
/// least `n_points` qualifying samples.
fn run_end(
    samples: impl Iterator<Item = f64>,
    qualifies: impl Fn(f64) -> bool,
    n_points: usize,
) -> Option<usize> {
    let mut run = 0;
    let mut last = None;
    for (i, v) in samples.enumerate() {
        if qualifies(v) {
            run += 1;
            last = Some(i);
        } else if run >= n_points {
            return last;
        } else {
            run = 0;
        }
    }
    (run >= n_points).then_some(last).flatten()
}

/// First index whose value reaches `threshold`.
///
/// The running maximum of `values` qualifies on a suffix that starts at the
/// first crossing, so a backward search for that run lands on it.
pub fn first_crossing(values: &[f64], threshold: f64) -> Option<usize> {
    let running_max: Vec<f64> = values
        .iter()
        .scan(f64::NAN, |peak, &v| {
            *peak = peak.max(v);
            Some(*peak)
        })
        .collect();
    find_signal_event(&running_max, threshold, Direction::Backward, None, 1)
}

/// Index of the sample closest to `value`.
///
/// Ties resolve to the lowest index; NaN samples are ignored. Returns 0 when
/// nothing is comparable.
pub fn nearest_value_index(value: f64, series: &[f64]) -> usize {
    series
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, v)| {
            let distance = (v - value).abs();
            match best {
                Some((_, d)) if d <= distance => best,
                _ => Some((i, distance)),
            }
        })
        .map_or(0, |(i, _)| i)
}
