//! `events` command implementation.

use anyhow::{Context, Result};
use contracts::{DepthSource, Event};
use profile::Profile;
use serde::Serialize;
use tracing::info;

use crate::cli::ProfileArgs;
use crate::commands::load_profile;

/// Detected events for JSON output
#[derive(Debug, Serialize)]
struct EventsReport {
    recording: String,
    serial: String,
    depth_source: DepthSource,
    events: Vec<Event>,
}

/// Execute the `events` command
pub fn run_events(args: &ProfileArgs) -> Result<()> {
    info!(recording = %args.recording.display(), "Detecting events");

    let profile = load_profile(args)?;
    let report = build_report(args, &profile)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize events")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn build_report(args: &ProfileArgs, profile: &Profile) -> Result<EventsReport> {
    let events = profile
        .events()
        .context("Event detection failed")?
        .into_iter()
        .cloned()
        .collect();

    Ok(EventsReport {
        recording: args.recording.display().to_string(),
        serial: profile.serial_number(),
        depth_source: profile.depth_source()?,
        events,
    })
}

fn print_report(report: &EventsReport) {
    println!("{} (serial {})", report.recording, report.serial);
    println!("  Depth source: {}", report.depth_source);
    for event in &report.events {
        println!("  - {}", event);
    }
}
