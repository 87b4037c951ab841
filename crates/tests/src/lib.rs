//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract defaults shared by every stage
//! - Synthetic push e2e tests (CSV -> Profile -> summary)
//! - Configuration and calibration wiring

#[cfg(test)]
mod contract_tests {
    use contracts::{DepthMethod, ProfileConfig};

    #[test]
    fn test_default_config_round_trips_through_loader() {
        let config = ProfileConfig::default();
        let toml = config_loader::ConfigLoader::to_toml(&config).unwrap();
        let parsed = config_loader::ConfigLoader::load_from_str(
            &toml,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.depth_method, DepthMethod::Fused);
    }
}

#[cfg(test)]
mod e2e_tests {
    use chrono::NaiveDate;
    use config_loader::{CalibrationStore, ConfigFormat, ConfigLoader};
    use contracts::{DepthSource, ProfileConfig};
    use profile::Profile;
    use reader::mock::SyntheticPush;

    /// Synthetic push written to CSV text and parsed back
    fn reparsed(push: &SyntheticPush) -> contracts::Recording {
        let recording = push.generate().unwrap();
        let text = reader::to_csv_string(&recording).unwrap();
        reader::parse_recording(&text).unwrap()
    }

    /// End-to-end test: SyntheticPush -> CSV -> reader -> Profile
    ///
    /// The profile built from the parsed file must agree with the one built
    /// from the in-memory recording.
    #[test]
    fn test_e2e_csv_profile_matches_in_memory() {
        let push = SyntheticPush::default();
        let direct = Profile::new(push.generate().unwrap(), ProfileConfig::default()).unwrap();
        let parsed = Profile::new(reparsed(&push), ProfileConfig::default()).unwrap();

        assert_eq!(parsed.serial_number(), "SYN-0007");
        assert_eq!(parsed.start().unwrap().index, direct.start().unwrap().index);
        assert_eq!(parsed.stop().unwrap().index, direct.stop().unwrap().index);

        let a = direct.summary().unwrap();
        let b = parsed.summary().unwrap();
        assert_eq!(a.samples, b.samples);
        assert_eq!(b.depth_source, DepthSource::Fused);
        assert!((a.distance_traveled_cm - b.distance_traveled_cm).abs() < 1e-6);
        assert!((a.moving_time_s - b.moving_time_s).abs() < 1e-9);
    }

    #[test]
    fn test_e2e_events_are_ordered() {
        let profile = Profile::new(reparsed(&SyntheticPush::default()), ProfileConfig::default())
            .unwrap();
        let start = profile.start().unwrap();
        let stop = profile.stop().unwrap();
        let surface = profile.surface().unwrap();

        assert!(start.index <= surface.force.index);
        assert!(surface.optical.index <= stop.index);
        assert!(start.time_s < stop.time_s);
        // depth is zero at start and negative into the snow
        assert_eq!(start.depth_cm, 0.0);
        assert!(stop.depth_cm < -50.0, "stop depth {}", stop.depth_cm);
    }

    #[test]
    fn test_e2e_barometer_only_recording() {
        let push = SyntheticPush {
            with_accelerometer: false,
            ..Default::default()
        };
        let profile = Profile::new(reparsed(&push), ProfileConfig::default()).unwrap();

        let summary = profile.summary().unwrap();
        assert_eq!(summary.depth_source, DepthSource::Barometer);
        assert!(summary.angle_deg.is_none());
        assert!(!summary.has_upward_motion);
        assert!(summary.distance_traveled_cm > 0.0);
    }

    #[test]
    fn test_e2e_ground_strike_stops_before_impact() {
        let push = SyntheticPush {
            ground_strike: true,
            ..Default::default()
        };
        let profile = Profile::new(reparsed(&push), ProfileConfig::default()).unwrap();

        let strike = profile.ground_strike().unwrap().cloned().unwrap();
        assert!(profile.stop().unwrap().index <= strike.index);
        assert_eq!(profile.events().unwrap().len(), 5);
    }

    #[test]
    fn test_e2e_config_selects_depth_method() {
        let config = ConfigLoader::load_from_str(
            r#"{"depth_method": "accelerometer"}"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let profile = Profile::new(reparsed(&SyntheticPush::default()), config).unwrap();
        assert_eq!(profile.depth_source().unwrap(), DepthSource::Accelerometer);
        assert!(profile.barometer_depth().unwrap().is_some());
    }

    #[test]
    fn test_e2e_dated_calibration_for_recording_date() {
        let store = CalibrationStore::parse(
            r#"{
                "default": {"Sensor1": [1.0, 0.0]},
                "SYN-0007": [
                    {"date": "2023-01-01", "calibration": {"Sensor1": [2.0, 0.0]}},
                    {"date": "2024-01-01", "calibration": {"Sensor1": [3.0, 0.0]}},
                    {"date": "2025-01-01", "calibration": {"Sensor1": [4.0, 0.0]}}
                ]
            }"#,
        )
        .unwrap();

        let recording = reparsed(&SyntheticPush::default());
        let date = recording.recorded_at().map(|at| at.date());
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15));

        let set = store
            .from_serial(&recording.serial_number(), date)
            .unwrap();
        assert_eq!(set.get("Sensor1"), Some(&[3.0, 0.0][..]));

        let raw = recording.table.column("Sensor1").unwrap()[0];
        let profile = Profile::new(recording, ProfileConfig::default())
            .unwrap()
            .with_calibration(set);
        assert_eq!(profile.force_channel().unwrap()[0], 3.0 * raw);
    }

    #[test]
    fn test_e2e_unknown_probe_uses_default_calibration() {
        let store = CalibrationStore::parse(r#"{"default": {"Sensor1": [1.0, 5.0]}}"#).unwrap();
        let set = store.from_serial("SYN-0007", None).unwrap();
        assert_eq!(set.serial, "UNKNOWN");
        assert_eq!(set.get("Sensor1"), Some(&[1.0, 5.0][..]));
    }

    #[test]
    fn test_e2e_running_stats_match_cropped_force() {
        let profile = Profile::new(reparsed(&SyntheticPush::default()), ProfileConfig::default())
            .unwrap();
        let force = profile.force().unwrap();
        let stats: observability::RunningStats = force.values.iter().copied().collect();
        assert_eq!(stats.summary(), force.stats);
        assert!(force.stats.max >= force.stats.mean);
    }
}

#[cfg(test)]
mod stage_tests {
    use contracts::{DepthConfig, Signal};
    use reader::mock::SyntheticPush;

    /// Detectors and depth estimators composed by hand agree with the
    /// motion window of the synthetic push.
    #[test]
    fn test_stages_compose_without_profile() {
        let push = SyntheticPush::default();
        let recording = push.generate().unwrap();
        let time = recording.table.time().to_vec();
        let accel = recording.table.column("Y-Axis").unwrap().to_vec();
        let config = contracts::ProfileConfig::default();

        let start = detect::acceleration_start(&accel, &config.detection);
        let stop = detect::acceleration_stop(&accel, &config.detection);
        assert!(start < stop);

        let signal = Signal::new(time, accel).unwrap();
        let depth = depth::accelerometer_depth(&signal, start, stop, &DepthConfig::default())
            .unwrap();
        assert_eq!(depth.depth_at(start), 0.0);
        assert!(depth.distance_traveled() > 50.0);
    }
}
