//! Synthetic push recording
//!
//! Deterministic probe recordings for tests without real field data. The
//! probe rests, pushes down along a smooth cycloidal path and rests again.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use contracts::{ContractError, Recording, SampleTable, TIME_COLUMN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GRAVITY_CM_S2: f64 = 981.0;

/// Synthetic push configuration
#[derive(Debug, Clone)]
pub struct SyntheticPush {
    /// Sample rate (Hz)
    pub sample_rate_hz: f64,
    /// Total recording length (s)
    pub duration_s: f64,
    /// Time the push begins (s)
    pub push_start_s: f64,
    /// Duration of the push (s)
    pub push_duration_s: f64,
    /// Total travel (cm)
    pub travel_cm: f64,
    /// Depth below the starting point where snow begins (cm)
    pub snow_surface_cm: f64,
    /// Probe tilt from vertical (degrees)
    pub tilt_deg: f64,
    /// Uniform accelerometer noise amplitude (g)
    pub noise_g: f64,
    /// Barometer lag behind the true motion (s)
    pub barometer_lag_s: f64,
    /// Add a hard impact on the force channel at the end of the push
    pub ground_strike: bool,
    /// Include the accelerometer axes
    pub with_accelerometer: bool,
    /// Include the barometric `depth` column
    pub with_barometer: bool,
    pub seed: u64,
}

impl Default for SyntheticPush {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1000.0,
            duration_s: 3.0,
            push_start_s: 1.0,
            push_duration_s: 1.0,
            travel_cm: 100.0,
            snow_surface_cm: 20.0,
            tilt_deg: 10.0,
            noise_g: 0.004,
            barometer_lag_s: 0.03,
            ground_strike: false,
            with_accelerometer: true,
            with_barometer: true,
            seed: 7,
        }
    }
}

impl SyntheticPush {
    /// Number of samples generated
    pub fn samples(&self) -> usize {
        (self.duration_s * self.sample_rate_hz).round() as usize
    }

    /// Sample index where the push starts
    pub fn push_start_index(&self) -> usize {
        (self.push_start_s * self.sample_rate_hz).round() as usize
    }

    /// Sample index where the push ends
    pub fn push_end_index(&self) -> usize {
        ((self.push_start_s + self.push_duration_s) * self.sample_rate_hz).round() as usize
    }

    fn phase(&self, t: f64) -> f64 {
        ((t - self.push_start_s) / self.push_duration_s).clamp(0.0, 1.0)
    }

    /// True depth at `t` (cm, negative downward)
    pub fn depth_at(&self, t: f64) -> f64 {
        let tau = self.phase(t);
        -self.travel_cm * (tau - (2.0 * PI * tau).sin() / (2.0 * PI))
    }

    /// True acceleration along the probe axis at `t` (cm/s^2)
    fn acceleration_at(&self, t: f64) -> f64 {
        let tau = (t - self.push_start_s) / self.push_duration_s;
        if !(0.0..=1.0).contains(&tau) {
            return 0.0;
        }
        -self.travel_cm * 2.0 * PI * (2.0 * PI * tau).sin()
            / (self.push_duration_s * self.push_duration_s)
    }

    /// Penetration into the snow at `t` (cm)
    fn snow_depth(&self, t: f64) -> f64 {
        (-self.depth_at(t) - self.snow_surface_cm).max(0.0)
    }

    /// Generate the recording
    pub fn generate(&self) -> Result<Recording, ContractError> {
        let n = self.samples();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let tilt = self.tilt_deg.to_radians();
        let strike_from = self.push_start_s + self.push_duration_s - 0.02;

        let mut time = Vec::with_capacity(n);
        let mut force = Vec::with_capacity(n);
        let mut ambient = Vec::with_capacity(n);
        let mut active = Vec::with_capacity(n);
        let mut baro = Vec::with_capacity(n);
        let (mut x_axis, mut y_axis, mut z_axis) =
            (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));

        for i in 0..n {
            let t = i as f64 / self.sample_rate_hz;
            let s = self.snow_depth(t);
            time.push(t);

            let mut f = 100.0 + rng.random_range(-2.0..=2.0);
            if s > 0.0 {
                f += 40.0 * s + 15.0 * (2.0 * s).sin();
            }
            if self.ground_strike && t >= strike_from {
                f += 8000.0;
            }
            force.push(f);

            if s > 0.0 {
                ambient.push(3000.0 * (-s / 5.0).exp() + 50.0);
                active.push(1500.0 + 1000.0 * (0.8 * s).sin());
            } else {
                ambient.push(3000.0 + rng.random_range(-5.0..=5.0));
                active.push(3000.0 + rng.random_range(-5.0..=5.0));
            }

            baro.push(250.0 + self.depth_at(t - self.barometer_lag_s) + rng.random_range(-0.5..=0.5));

            let along = self.acceleration_at(t) / GRAVITY_CM_S2;
            let noise = self.noise_g;
            x_axis.push(tilt.sin() + rng.random_range(-noise..=noise));
            y_axis.push(-tilt.cos() + along + rng.random_range(-noise..=noise));
            z_axis.push(rng.random_range(-noise..=noise));
        }

        let mut columns = vec![
            (TIME_COLUMN.to_string(), time),
            ("Sensor1".to_string(), force),
            ("Sensor2".to_string(), ambient),
            ("Sensor3".to_string(), active),
        ];
        if self.with_barometer {
            columns.push(("depth".to_string(), baro));
        }
        if self.with_accelerometer {
            columns.push(("X-Axis".to_string(), x_axis));
            columns.push(("Y-Axis".to_string(), y_axis));
            columns.push(("Z-Axis".to_string(), z_axis));
        }

        let table = SampleTable::from_columns(columns)?;

        let metadata = BTreeMap::from([
            ("RECORDED".to_string(), "2024-01-15 10:00:00".to_string()),
            ("Serial Num.".to_string(), format!("SYN-{:04}", self.seed)),
            ("Sample Rate".to_string(), format!("{}", self.sample_rate_hz)),
        ]);
        Ok(Recording::new(metadata, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let push = SyntheticPush::default();
        let rec = push.generate().unwrap();
        assert_eq!(rec.table.len(), 3000);
        assert_eq!(rec.serial_number(), "SYN-0007");
        for name in ["Sensor1", "Sensor2", "Sensor3", "depth", "X-Axis", "Y-Axis", "Z-Axis"] {
            assert!(rec.table.has_column(name), "missing {name}");
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = SyntheticPush::default().generate().unwrap();
        let b = SyntheticPush::default().generate().unwrap();
        assert_eq!(a, b);
        let c = SyntheticPush {
            seed: 8,
            ..Default::default()
        }
        .generate()
        .unwrap();
        assert_ne!(a.table.column("Y-Axis"), c.table.column("Y-Axis"));
    }

    #[test]
    fn test_true_depth_path() {
        let push = SyntheticPush::default();
        assert_eq!(push.depth_at(0.5), 0.0);
        assert!((push.depth_at(2.5) + 100.0).abs() < 1e-9);
        assert!((push.depth_at(1.5) + 50.0).abs() < 1e-9);
        assert_eq!(push.push_start_index(), 1000);
        assert_eq!(push.push_end_index(), 2000);
    }

    #[test]
    fn test_optional_channels() {
        let rec = SyntheticPush {
            with_accelerometer: false,
            ..Default::default()
        }
        .generate()
        .unwrap();
        assert!(!rec.table.has_column("Y-Axis"));
        assert!(rec.table.has_column("depth"));
    }
}
