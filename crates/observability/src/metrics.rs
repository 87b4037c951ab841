//! Profile pipeline metrics
//!
//! Detector outcomes and per-profile headline numbers, plus the running
//! statistics used to summarize cropped channels.

use contracts::ProfileSummary;
use metrics::{counter, gauge, histogram};
use serde::Serialize;

/// Record a detector that located its event.
pub fn record_event_detected(event: &'static str, index: usize) {
    counter!("lyte_event_detected_total", "event" => event).increment(1);
    gauge!("lyte_event_index", "event" => event).set(index as f64);
}

/// Record a detector that fell back to its "no event" outcome.
pub fn record_event_not_found(event: &'static str) {
    counter!("lyte_event_not_found_total", "event" => event).increment(1);
}

/// Record the headline numbers of one processed profile.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_profile_metrics;
///
/// let summary = profile.summary()?;
/// record_profile_metrics(&summary);
/// ```
pub fn record_profile_metrics(summary: &ProfileSummary) {
    let source = summary.depth_source.to_string();

    counter!("lyte_profiles_total", "depth_source" => source.clone()).increment(1);
    histogram!("lyte_profile_samples").record(summary.samples as f64);
    histogram!("lyte_distance_traveled_cm", "depth_source" => source.clone())
        .record(summary.distance_traveled_cm);
    histogram!("lyte_distance_through_snow_cm").record(summary.distance_through_snow_cm);
    histogram!("lyte_moving_time_s").record(summary.moving_time_s);
    histogram!("lyte_avg_velocity_cm_s", "depth_source" => source)
        .record(summary.avg_velocity_cm_s);

    if summary.has_upward_motion {
        counter!("lyte_upward_motion_total").increment(1);
    }
    if summary.ground_strike {
        counter!("lyte_ground_strike_total").increment(1);
    }
    if let Some(angle) = summary.angle_deg {
        histogram!("lyte_insertion_angle_deg").record(angle);
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
///
/// NaN samples are ignored.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

impl Extend<f64> for RunningStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::default();
        stats.extend(iter);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DepthSource;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_running_stats_skips_nan() {
        let stats: RunningStats = [f64::NAN, 2.0, 4.0, f64::NAN].into_iter().collect();
        assert_eq!(stats.count(), 2);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let summary = StatsSummary {
            count: 100,
            min: 20.0,
            max: 80.0,
            mean: 50.0,
            std_dev: 15.0,
        };
        let output = format!("{}", summary);
        assert_eq!(output, "min=20.000, max=80.000, mean=50.000, std=15.000 (n=100)");
        assert_eq!(StatsSummary::default().to_string(), "N/A");
    }

    #[test]
    fn test_summary_serializes() {
        let stats: RunningStats = [1.0, 3.0].into_iter().collect();
        let json = serde_json::to_value(stats.summary()).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["mean"], 2.0);
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        // no global recorder installed in unit tests
        record_event_not_found("surface");
        record_event_detected("start", 12);
        record_profile_metrics(&ProfileSummary {
            serial: "UNKNOWN".to_string(),
            samples: 10,
            depth_source: DepthSource::Fused,
            distance_traveled_cm: 50.0,
            distance_through_snow_cm: 40.0,
            moving_time_s: 1.0,
            avg_velocity_cm_s: 50.0,
            max_velocity_cm_s: 80.0,
            has_upward_motion: false,
            ground_strike: true,
            angle_deg: Some(3.0),
        });
    }
}
