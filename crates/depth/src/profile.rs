//! DepthProfile - a zero-referenced depth curve and its motion statistics

use conditioning::{
    gradient,
    stats::{nan_max, nan_min},
};
use contracts::{ContractError, DepthSource, Signal};

/// Depth curve (cm, negative into the snow) bounded by a motion window.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthProfile {
    source: DepthSource,
    depth: Signal,
    velocity: Vec<f64>,
    start: usize,
    stop: usize,
    tolerance: f64,
}

impl DepthProfile {
    /// Wrap a full-length depth curve.
    ///
    /// `tolerance` is the upward velocity (cm/s) ignored by
    /// [`has_upward_motion`](Self::has_upward_motion).
    pub fn new(
        source: DepthSource,
        depth: Signal,
        start: usize,
        stop: usize,
        tolerance: f64,
    ) -> Self {
        let velocity = gradient(depth.values(), depth.time());
        Self {
            source,
            depth,
            velocity,
            start,
            stop,
            tolerance,
        }
    }

    /// Build a full-length curve from the samples of `[start, stop]`.
    ///
    /// The window is shifted so its first sample is zero. Samples before
    /// `start` are zero and samples after `stop` hold the last window value.
    pub(crate) fn from_window(
        source: DepthSource,
        reference: &Signal,
        start: usize,
        window: &[f64],
        tolerance: f64,
    ) -> Result<Self, ContractError> {
        let n = reference.len();
        let origin = window.first().copied().filter(|v| !v.is_nan()).unwrap_or(0.0);
        let hold = window.last().map_or(0.0, |v| v - origin);

        let mut values = vec![0.0; n];
        for (i, v) in window.iter().enumerate() {
            if let Some(slot) = values.get_mut(start + i) {
                *slot = v - origin;
            }
        }
        let stop = (start + window.len()).saturating_sub(1).min(n.saturating_sub(1));
        for slot in values.iter_mut().skip(stop + 1) {
            *slot = hold;
        }

        Ok(Self::new(
            source,
            reference.with_values(values)?,
            start.min(stop),
            stop,
            tolerance,
        ))
    }

    /// All-zero curve, used for degenerate motion windows.
    pub(crate) fn flat(
        source: DepthSource,
        reference: &Signal,
        start: usize,
        stop: usize,
        tolerance: f64,
    ) -> Result<Self, ContractError> {
        let depth = reference.with_values(vec![0.0; reference.len()])?;
        Ok(Self::new(source, depth, start, stop, tolerance))
    }

    pub fn source(&self) -> DepthSource {
        self.source
    }

    pub fn depth(&self) -> &Signal {
        &self.depth
    }

    pub fn values(&self) -> &[f64] {
        self.depth.values()
    }

    pub fn time(&self) -> &[f64] {
        self.depth.time()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Depth at `index`, NaN when out of range.
    pub fn depth_at(&self, index: usize) -> f64 {
        self.depth.value_at(index)
    }

    /// Time derivative of depth (cm/s) over the full curve.
    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    fn window<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        if values.is_empty() || self.start > self.stop {
            return &[];
        }
        let stop = self.stop.min(values.len() - 1);
        values.get(self.start..=stop).unwrap_or(&[])
    }

    /// Max minus min depth over the motion window.
    pub fn distance_traveled(&self) -> f64 {
        let window = self.window(self.depth.values());
        let distance = nan_max(window) - nan_min(window);
        if distance.is_nan() {
            0.0
        } else {
            distance
        }
    }

    /// Largest speed over the motion window (cm/s).
    pub fn max_velocity(&self) -> f64 {
        let speeds: Vec<f64> = self.window(&self.velocity).iter().map(|v| v.abs()).collect();
        let max = nan_max(&speeds);
        if max.is_nan() {
            0.0
        } else {
            max
        }
    }

    /// Distance traveled over elapsed time (cm/s), 0 for an empty window.
    pub fn avg_velocity(&self) -> f64 {
        let elapsed = self.depth.time_at(self.stop) - self.depth.time_at(self.start);
        if elapsed > 0.0 {
            self.distance_traveled() / elapsed
        } else {
            0.0
        }
    }

    /// Whether the curve moves upward faster than the tolerance anywhere in
    /// the motion window.
    pub fn has_upward_motion(&self) -> bool {
        self.window(&self.velocity)
            .iter()
            .any(|v| *v > self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(n: usize) -> Signal {
        let time = (0..n).map(|i| i as f64 * 0.1).collect();
        Signal::new(time, vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_from_window_layout() {
        let profile = DepthProfile::from_window(
            DepthSource::Barometer,
            &reference(6),
            2,
            &[10.0, 8.0, 5.0],
            1e-3,
        )
        .unwrap();
        assert_eq!(profile.values(), &[0.0, 0.0, 0.0, -2.0, -5.0, -5.0]);
        assert_eq!(profile.start(), 2);
        assert_eq!(profile.stop(), 4);
    }

    #[test]
    fn test_statistics() {
        let profile = DepthProfile::from_window(
            DepthSource::Accelerometer,
            &reference(5),
            1,
            &[0.0, -1.0, -2.0, -4.0],
            1e-3,
        )
        .unwrap();
        assert!((profile.distance_traveled() - 4.0).abs() < 1e-12);
        // 4 cm over 0.3 s
        assert!((profile.avg_velocity() - 4.0 / 0.3).abs() < 1e-9);
        assert!(profile.max_velocity() >= 10.0);
        assert!(!profile.has_upward_motion());
    }

    #[test]
    fn test_upward_motion_flagged() {
        let profile = DepthProfile::from_window(
            DepthSource::Accelerometer,
            &reference(5),
            0,
            &[0.0, -3.0, -1.0, -1.0, -5.0],
            1e-3,
        )
        .unwrap();
        assert!(profile.has_upward_motion());
    }

    #[test]
    fn test_flat_profile() {
        let profile =
            DepthProfile::flat(DepthSource::Barometer, &reference(4), 3, 1, 1e-3).unwrap();
        assert!(profile.values().iter().all(|v| *v == 0.0));
        assert_eq!(profile.distance_traveled(), 0.0);
        assert_eq!(profile.avg_velocity(), 0.0);
        assert_eq!(profile.max_velocity(), 0.0);
    }
}
