//! Command implementations.

mod events;
mod summary;
mod validate;

pub use events::run_events;
pub use summary::run_summary;
pub use validate::run_validate;

use anyhow::{Context, Result};
use config_loader::{CalibrationStore, ConfigLoader};
use contracts::ProfileConfig;
use profile::Profile;
use tracing::info;

use crate::cli::ProfileArgs;

/// Read the recording named by `args` and wrap it in a [`Profile`] with the
/// requested configuration and calibration.
pub(crate) fn load_profile(args: &ProfileArgs) -> Result<Profile> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProfileConfig::default(),
    };

    let recording = reader::read_recording(&args.recording)
        .with_context(|| format!("Failed to read recording {}", args.recording.display()))?;

    let calibration = match &args.calibration {
        Some(path) => {
            let store = CalibrationStore::load(path)
                .with_context(|| format!("Failed to load calibration from {}", path.display()))?;
            let date = recording.recorded_at().map(|at| at.date());
            let set = store
                .from_serial(&recording.serial_number(), date)
                .context("Failed to select calibration")?;
            info!(serial = %set.serial, "Calibration selected");
            Some(set)
        }
        None => None,
    };

    let profile = Profile::new(recording, config).context("Recording is missing channels")?;
    Ok(match calibration {
        Some(set) => profile.with_calibration(set),
        None => profile,
    })
}
