//! Channel samples between the snow surface and the motion stop.

use observability::{RunningStats, StatsSummary};
use serde::Serialize;

/// A channel cropped to `[surface, stop]` with depth zero at the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CroppedProfile {
    pub name: String,
    /// Index of the first sample in the recording
    pub offset: usize,
    /// Depth below the surface (cm, negative into the snow)
    pub depth: Vec<f64>,
    pub values: Vec<f64>,
    pub stats: StatsSummary,
}

impl CroppedProfile {
    /// Crop `values` to `[surface, stop]`.
    ///
    /// Empty when `surface > stop` or the window lies outside the channel.
    pub fn new(
        name: impl Into<String>,
        depth: &[f64],
        values: &[f64],
        surface: usize,
        stop: usize,
    ) -> Self {
        let n = depth.len().min(values.len());
        let stop = stop.min(n.saturating_sub(1));
        let range = if n == 0 || surface > stop {
            0..0
        } else {
            surface..stop + 1
        };

        let origin = depth.get(surface).copied().unwrap_or(0.0);
        let depth: Vec<f64> = depth[range.clone()].iter().map(|d| d - origin).collect();
        let values = values[range].to_vec();
        let stats: RunningStats = values.iter().copied().collect();

        Self {
            name: name.into(),
            offset: surface,
            depth,
            stats: stats.summary(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Depth span covered (cm, positive)
    pub fn thickness(&self) -> f64 {
        self.depth.last().map_or(0.0, |d| d.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_zero_references_depth() {
        let depth = [0.0, -1.0, -2.0, -3.0, -4.0, -4.0];
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cropped = CroppedProfile::new("force", &depth, &values, 2, 4);
        assert_eq!(cropped.depth, vec![0.0, -1.0, -2.0]);
        assert_eq!(cropped.values, vec![3.0, 4.0, 5.0]);
        assert_eq!(cropped.offset, 2);
        assert_eq!(cropped.stats.count, 3);
        assert_eq!(cropped.stats.mean, 4.0);
        assert_eq!(cropped.thickness(), 2.0);
    }

    #[test]
    fn test_crop_inverted_window_is_empty() {
        let cropped = CroppedProfile::new("nir", &[0.0, -1.0], &[1.0, 2.0], 1, 0);
        assert!(cropped.is_empty());
        assert_eq!(cropped.stats.count, 0);
        assert_eq!(cropped.thickness(), 0.0);
    }

    #[test]
    fn test_crop_stop_clamped() {
        let cropped = CroppedProfile::new("force", &[0.0, -1.0, -2.0], &[1.0, 2.0, 3.0], 1, 99);
        assert_eq!(cropped.values, vec![2.0, 3.0]);
    }
}
