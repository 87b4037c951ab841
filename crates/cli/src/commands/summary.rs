//! `summary` command implementation.

use anyhow::{Context, Result};
use contracts::ProfileSummary;
use observability::StatsSummary;
use profile::Profile;
use serde::Serialize;
use tracing::info;

use crate::cli::SummaryArgs;
use crate::commands::load_profile;

/// Summary for JSON output
#[derive(Debug, Serialize)]
struct SummaryReport {
    recording: String,
    #[serde(flatten)]
    summary: ProfileSummary,
    force: StatsSummary,
    pressure: StatsSummary,
    nir: StatsSummary,
}

/// Execute the `summary` command
pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    info!(recording = %args.profile.recording.display(), "Summarizing recording");

    // the recorder must exist before the detectors run
    let metrics = if args.metrics {
        Some(observability::install_metrics_recorder()?)
    } else {
        None
    };

    let profile = load_profile(&args.profile)?;
    let report = build_report(&args.profile.recording.display().to_string(), &profile)?;
    observability::record_profile_metrics(&report.summary);

    if args.profile.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    if let Some(handle) = metrics {
        println!("{}", handle.render());
    }
    Ok(())
}

fn build_report(recording: &str, profile: &Profile) -> Result<SummaryReport> {
    let summary = profile.summary().context("Profile processing failed")?;
    Ok(SummaryReport {
        recording: recording.to_string(),
        summary,
        force: profile.force()?.stats.clone(),
        pressure: profile.pressure()?.stats.clone(),
        nir: profile.nir_profile()?.stats.clone(),
    })
}

fn print_report(report: &SummaryReport) {
    let summary = &report.summary;
    println!("{} (serial {})", report.recording, summary.serial);
    println!("\n  Samples: {}", summary.samples);
    println!("  Depth source: {}", summary.depth_source);
    println!("  Distance traveled: {:.1} cm", summary.distance_traveled_cm);
    println!(
        "  Distance through snow: {:.1} cm",
        summary.distance_through_snow_cm
    );
    println!("  Moving time: {:.3} s", summary.moving_time_s);
    println!("  Average velocity: {:.1} cm/s", summary.avg_velocity_cm_s);
    println!("  Max velocity: {:.1} cm/s", summary.max_velocity_cm_s);
    if let Some(angle) = summary.angle_deg {
        println!("  Insertion angle: {:.1}°", angle);
    }
    println!(
        "  Force: mean {:.1}, max {:.1} ({} samples)",
        report.force.mean, report.force.max, report.force.count
    );

    if summary.has_upward_motion || summary.ground_strike {
        println!("\n⚠ Warnings:");
        if summary.has_upward_motion {
            println!("  - Depth moves upward during the push");
        }
        if summary.ground_strike {
            println!("  - Probe struck the ground");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProfileArgs;
    use contracts::DepthSource;
    use reader::mock::SyntheticPush;
    use std::io::Write;
    use tempfile::TempDir;

    fn profile_args(dir: &TempDir, push: &SyntheticPush) -> ProfileArgs {
        let path = dir.path().join("push.csv");
        let recording = push.generate().unwrap();
        reader::write_recording(&path, &recording).unwrap();
        ProfileArgs {
            recording: path,
            config: None,
            calibration: None,
            json: true,
        }
    }

    #[test]
    fn test_summary_report_of_default_push() {
        let dir = TempDir::new().unwrap();
        let args = profile_args(&dir, &SyntheticPush::default());
        let profile = load_profile(&args).unwrap();
        let report = build_report("push.csv", &profile).unwrap();

        assert_eq!(report.summary.depth_source, DepthSource::Fused);
        assert!(report.summary.distance_traveled_cm > 50.0);
        assert!(report.summary.moving_time_s > 0.5);
        assert!(report.force.count > 0);
        assert_eq!(report.force.count, report.pressure.count);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["serial"], "SYN-0007");
        assert!(json["force"]["mean"].is_number());
    }

    #[test]
    fn test_summary_honours_config_file() {
        let dir = TempDir::new().unwrap();
        let mut args = profile_args(&dir, &SyntheticPush::default());

        let config_path = dir.path().join("lyte.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "depth_method = \"accelerometer\"").unwrap();
        args.config = Some(config_path);

        let profile = load_profile(&args).unwrap();
        let report = build_report("push.csv", &profile).unwrap();
        assert_eq!(report.summary.depth_source, DepthSource::Accelerometer);
    }

    #[test]
    fn test_summary_applies_calibration() {
        let dir = TempDir::new().unwrap();
        let mut args = profile_args(&dir, &SyntheticPush::default());

        let calibration_path = dir.path().join("calibrations.json");
        std::fs::write(
            &calibration_path,
            r#"{
                "default": {"Sensor1": [1.0, 0.0]},
                "SYN-0007": {"Sensor1": [2.0, 0.0]}
            }"#,
        )
        .unwrap();

        let uncalibrated = load_profile(&args).unwrap();
        let plain = uncalibrated.force_channel().unwrap();

        args.calibration = Some(calibration_path);
        let calibrated = load_profile(&args).unwrap();
        assert_eq!(calibrated.calibration().serial, "SYN-0007");
        let doubled = calibrated.force_channel().unwrap();

        assert!(plain
            .iter()
            .zip(doubled)
            .all(|(p, d)| (d - 2.0 * p).abs() < 1e-9));
        assert!(build_report("push.csv", &calibrated).is_ok());
    }
}
