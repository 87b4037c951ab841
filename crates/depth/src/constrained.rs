//! Barometric depth constrained to the accelerometer's motion window.

use conditioning::{
    find_peaks, interpolate, points_from_fraction,
    stats::{nan_argmax, nan_argmin, nan_mean},
};
use contracts::{ContractError, DepthConfig, DepthSource, Signal};
use tracing::{debug, warn};

use crate::barometer::{barometer_depth, filter_and_smooth, rises};
use crate::DepthProfile;

/// Candidate closest to `target`, ties to the lower index.
fn nearest_to(candidates: impl Iterator<Item = usize>, target: usize) -> Option<usize> {
    candidates.min_by_key(|&c| (c.abs_diff(target), c))
}

/// Extremum of `values[range]` closest to `mid`, used when no peak qualifies.
fn extremum_near(values: &[f64], lo: usize, hi: usize, mid: usize, max: bool) -> Option<usize> {
    let slice = values.get(lo..hi)?;
    let best = if max {
        nan_argmax(slice)
    } else {
        nan_argmin(slice)
    }?;
    let target = slice[best];
    nearest_to(
        slice
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == target)
            .map(|(i, _)| lo + i),
        mid,
    )
}

/// Rescale the barometer between the peak near `start` and the valley near
/// `stop` so that its two tails match the accelerometer depth there, then
/// stretch it evenly over the accelerometer's motion window.
///
/// The barometer often lags or stretches relative to the accelerometer. When
/// no usable peak/valley pair exists the plain barometer depth is returned.
pub fn constrained_baro_depth(
    barometer: &Signal,
    accelerometer: &DepthProfile,
    config: &DepthConfig,
) -> Result<DepthProfile, ContractError> {
    let start = accelerometer.start();
    let stop = accelerometer.stop();
    let n = barometer.len();
    if n == 0 || start >= stop || stop >= n || accelerometer.depth().len() != n {
        warn!(start, stop, "constrained barometer unavailable, using plain barometer");
        return barometer_depth(barometer, start, stop, config);
    }

    let baro = oriented_over(barometer.values(), start, stop);
    let mid = (start + stop) / 2;

    let peaks = find_peaks(&baro, None, None);
    let inverted: Vec<f64> = baro.iter().map(|v| -v).collect();
    let valleys = find_peaks(&inverted, None, None);

    let peak = nearest_to(peaks.iter().copied().filter(|&p| p <= mid), start)
        .or_else(|| extremum_near(&baro, 0, mid + 1, mid, true));
    let valley = nearest_to(valleys.iter().copied().filter(|&v| v >= mid), stop)
        .or_else(|| extremum_near(&baro, mid, n, mid, false));

    let (peak, valley) = match (peak, valley) {
        (Some(peak), Some(valley)) if peak < valley => (peak, valley),
        _ => {
            warn!(?peak, ?valley, "no barometer peak/valley pair, using plain barometer");
            return barometer_depth(barometer, start, stop, config);
        }
    };

    let segment = &baro[peak..=valley];
    let tail = points_from_fraction(segment.len(), config.constrained_tail_fraction, None);
    let head_mean = nan_mean(&segment[..tail]);
    let tail_mean = nan_mean(&segment[segment.len() - tail..]);
    let target_head = accelerometer.depth_at(start);
    let target_tail = accelerometer.depth_at(stop);

    let rescaled: Vec<f64> = if head_mean != tail_mean {
        let scale = (target_tail - target_head) / (tail_mean - head_mean);
        segment
            .iter()
            .map(|v| target_head + (v - head_mean) * scale)
            .collect()
    } else {
        segment.iter().map(|v| v - head_mean + target_head).collect()
    };

    let t_start = barometer.time_at(start);
    let t_stop = barometer.time_at(stop);
    let last = rescaled.len() - 1;
    let stretched_time: Vec<f64> = (0..=last)
        .map(|i| match i {
            i if i == last => t_stop,
            i => t_start + (t_stop - t_start) * i as f64 / last as f64,
        })
        .collect();
    let resampled = interpolate(
        &stretched_time,
        &rescaled,
        &barometer.time()[start..=stop],
    );

    let smoothed = filter_and_smooth(&resampled, config);
    debug!(peak, valley, start, stop, "barometer constrained to accelerometer window");

    DepthProfile::from_window(
        DepthSource::Barometer,
        barometer,
        start,
        &smoothed,
        config.upward_velocity_tolerance,
    )
}

/// Full channel flipped, if needed, so it descends across `[start, stop]`.
fn oriented_over(values: &[f64], start: usize, stop: usize) -> Vec<f64> {
    if rises(&values[start..=stop]) {
        values.iter().map(|v| -v).collect()
    } else {
        values.to_vec()
    }
}
