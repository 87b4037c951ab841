//! Profile - lazily computed, read-only view of one recording
//!
//! Every derived field is computed on first access and cached for the life of
//! the profile. The recording never changes after construction, so nothing is
//! ever invalidated.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use conditioning::{apply_calibration, remove_ambient};
use contracts::{
    CalibrationSet, ContractError, DepthSource, Event, MotionColumn, ProfileConfig,
    ProfileSummary, Recording, SampleTable, Signal, SurfaceEvents,
};
use depth::{
    accelerometer_depth, barometer_depth, constrained_baro_depth, select_depth, DepthProfile,
};
use detect::{
    acceleration_start, acceleration_stop, ground_strike, nearest_value_index, optical_stop,
    optical_surface, sensor_start,
};
use tracing::{debug, info, instrument, warn};

use crate::angle::insertion_angle;
use crate::cropped::CroppedProfile;

/// Accelerometer column names recognized for motion detection, lowercase.
const MOTION_COLUMNS: &[&str] = &["acceleration", "y-axis"];

const AXIS_COLUMNS: [&str; 3] = ["X-Axis", "Y-Axis", "Z-Axis"];

/// Motion window on the recording's sample axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MotionWindow {
    start: usize,
    stop: usize,
    strike: Option<usize>,
}

fn cached<T>(
    cell: &OnceCell<T>,
    compute: impl FnOnce() -> Result<T, ContractError>,
) -> Result<&T, ContractError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

/// Events, depth and cropped channels of a single probe recording.
///
/// A profile is a single-shot snapshot: cheap to construct, each field is
/// computed at most once on demand. Distinct profiles share nothing and can
/// be processed on separate threads.
pub struct Profile {
    recording: Recording,
    config: ProfileConfig,
    calibration: CalibrationSet,

    motion_column: OnceCell<MotionColumn>,
    force_channel: OnceCell<Vec<f64>>,
    nir: OnceCell<Vec<f64>>,
    window: OnceCell<MotionWindow>,

    accelerometer_depth: OnceCell<Option<DepthProfile>>,
    barometer_depth: OnceCell<Option<DepthProfile>>,
    constrained_barometer: OnceCell<Option<DepthProfile>>,
    depth: OnceCell<DepthProfile>,

    start: OnceCell<Event>,
    stop: OnceCell<Event>,
    surface: OnceCell<SurfaceEvents>,
    ground_strike: OnceCell<Option<Event>>,
    angle: OnceCell<Option<f64>>,

    force: OnceCell<CroppedProfile>,
    pressure: OnceCell<CroppedProfile>,
    nir_profile: OnceCell<CroppedProfile>,
}

impl Profile {
    /// Wrap a recording.
    ///
    /// # Errors
    /// - `MissingColumn` when a configured optical or force channel is absent
    /// - `NoDepthSource` when neither an accelerometer nor a barometric depth
    ///   channel is present
    pub fn new(recording: Recording, config: ProfileConfig) -> Result<Self, ContractError> {
        let table = &recording.table;
        for column in [
            &config.columns.force,
            &config.columns.ambient,
            &config.columns.active,
        ] {
            table.require(column)?;
        }
        let has_accelerometer = motion_column_of(table).is_available();
        if !has_accelerometer && !table.has_column(&config.columns.barometer_depth) {
            return Err(ContractError::NoDepthSource);
        }

        let serial = recording.serial_number();
        Ok(Self {
            calibration: CalibrationSet::new(serial, BTreeMap::new()),
            recording,
            config,
            motion_column: OnceCell::new(),
            force_channel: OnceCell::new(),
            nir: OnceCell::new(),
            window: OnceCell::new(),
            accelerometer_depth: OnceCell::new(),
            barometer_depth: OnceCell::new(),
            constrained_barometer: OnceCell::new(),
            depth: OnceCell::new(),
            start: OnceCell::new(),
            stop: OnceCell::new(),
            surface: OnceCell::new(),
            ground_strike: OnceCell::new(),
            angle: OnceCell::new(),
            force: OnceCell::new(),
            pressure: OnceCell::new(),
            nir_profile: OnceCell::new(),
        })
    }

    /// Use probe calibration coefficients for the force channel.
    pub fn with_calibration(mut self, calibration: CalibrationSet) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn table(&self) -> &SampleTable {
        &self.recording.table
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.recording.metadata
    }

    pub fn serial_number(&self) -> String {
        self.recording.serial_number()
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    fn time(&self) -> &[f64] {
        self.recording.table.time()
    }

    fn time_at(&self, index: usize) -> f64 {
        self.time().get(index).copied().unwrap_or(f64::NAN)
    }

    fn channel(&self, name: &str) -> Result<Signal, ContractError> {
        self.recording
            .table
            .signal(name)
            .ok_or_else(|| ContractError::missing_column(name))
    }

    /// Column used for motion detection.
    pub fn motion_column(&self) -> &MotionColumn {
        self.motion_column
            .get_or_init(|| motion_column_of(&self.recording.table))
    }

    /// Raw accelerometer samples (g), `None` without an accelerometer.
    pub fn acceleration(&self) -> Option<&[f64]> {
        self.motion_column()
            .name()
            .and_then(|name| self.recording.table.column(name))
    }

    /// Calibrated force over the whole recording.
    pub fn force_channel(&self) -> Result<&[f64], ContractError> {
        cached(&self.force_channel, || {
            let raw = self.recording.table.require(&self.config.columns.force)?;
            let coefficients = self
                .calibration
                .get(&self.config.columns.force)
                .unwrap_or(&[1.0, 0.0]);
            Ok(apply_calibration(raw, coefficients, None, None))
        })
        .map(Vec::as_slice)
    }

    /// Active optical channel with the ambient light removed.
    pub fn nir(&self) -> Result<&[f64], ContractError> {
        cached(&self.nir, || {
            let table = &self.recording.table;
            let active = table.require(&self.config.columns.active)?;
            let ambient = table.require(&self.config.columns.ambient)?;
            Ok(remove_ambient(
                active,
                ambient,
                self.config.optical.min_ambient_range,
                self.config.optical.ambient_smoothing_fraction,
            ))
        })
        .map(Vec::as_slice)
    }

    #[instrument(name = "profile_motion_window", skip(self))]
    fn window(&self) -> Result<MotionWindow, ContractError> {
        cached(&self.window, || {
            let detection = &self.config.detection;
            let force = self.force_channel()?;

            let (start, detected_stop) = match self.acceleration() {
                Some(acceleration) => (
                    acceleration_start(acceleration, detection),
                    acceleration_stop(acceleration, detection),
                ),
                None => {
                    warn!("no accelerometer, using force start and optical stop");
                    (sensor_start(force, detection), optical_stop(self.nir()?, detection))
                }
            };

            let strike = ground_strike(force, detected_stop, detection);
            let stop = match strike {
                Some(strike) if start < strike && strike < detected_stop => {
                    debug!(strike, detected_stop, "stop refined by ground strike");
                    strike
                }
                _ => detected_stop,
            };
            info!(start, stop, ?strike, "motion window detected");
            Ok(MotionWindow {
                start,
                stop,
                strike,
            })
        })
        .copied()
    }

    /// Depth from the accelerometer, `None` without an accelerometer.
    #[instrument(name = "profile_accelerometer_depth", skip(self))]
    pub fn accelerometer_depth(&self) -> Result<Option<&DepthProfile>, ContractError> {
        cached(&self.accelerometer_depth, || {
            let Some(name) = self.motion_column().name() else {
                return Ok(None);
            };
            let window = self.window()?;
            let signal = self.channel(name)?;
            accelerometer_depth(&signal, window.start, window.stop, &self.config.depth).map(Some)
        })
        .map(Option::as_ref)
    }

    /// Depth from the barometer over the motion window, `None` without one.
    #[instrument(name = "profile_barometer_depth", skip(self))]
    pub fn barometer_depth(&self) -> Result<Option<&DepthProfile>, ContractError> {
        cached(&self.barometer_depth, || {
            let Some(signal) = self.recording.table.signal(&self.config.columns.barometer_depth)
            else {
                return Ok(None);
            };
            let window = self.window()?;
            barometer_depth(&signal, window.start, window.stop, &self.config.depth).map(Some)
        })
        .map(Option::as_ref)
    }

    /// Barometer depth rescaled onto the accelerometer's motion window.
    ///
    /// `None` unless both channels are present.
    #[instrument(name = "profile_constrained_barometer", skip(self))]
    pub fn constrained_barometer(&self) -> Result<Option<&DepthProfile>, ContractError> {
        cached(&self.constrained_barometer, || {
            let Some(accelerometer) = self.accelerometer_depth()? else {
                return Ok(None);
            };
            let Some(signal) = self.recording.table.signal(&self.config.columns.barometer_depth)
            else {
                return Ok(None);
            };
            constrained_baro_depth(&signal, accelerometer, &self.config.depth).map(Some)
        })
        .map(Option::as_ref)
    }

    /// Reported depth, chosen by the configured depth method.
    pub fn depth(&self) -> Result<&DepthProfile, ContractError> {
        cached(&self.depth, || {
            let accelerometer = self.accelerometer_depth()?;
            let barometer = match self.constrained_barometer()? {
                Some(constrained) => Some(constrained),
                None => self.barometer_depth()?,
            };
            let selected = select_depth(self.config.depth_method, accelerometer, barometer)?
                .ok_or(ContractError::NoDepthSource)?;
            debug!(source = %selected.source(), "depth selected");
            Ok(selected)
        })
    }

    fn event(&self, name: &str, index: usize) -> Result<Event, ContractError> {
        let depth = self.depth()?.depth_at(index);
        Ok(Event::new(name, index, depth, self.time_at(index)))
    }

    /// Motion start.
    pub fn start(&self) -> Result<&Event, ContractError> {
        cached(&self.start, || self.event("start", self.window()?.start))
    }

    /// Motion stop, refined by a ground strike inside the motion window.
    pub fn stop(&self) -> Result<&Event, ContractError> {
        cached(&self.stop, || self.event("stop", self.window()?.stop))
    }

    /// Snow surface as seen by the optical and the force sensors.
    ///
    /// The force sensor sits `surface_detection_offset_cm` behind the optical
    /// sensor, so its surface is the sample nearest that much shallower, at or
    /// after the start and no later than the optical surface.
    #[instrument(name = "profile_surface", skip(self))]
    pub fn surface(&self) -> Result<&SurfaceEvents, ContractError> {
        cached(&self.surface, || {
            let table = &self.recording.table;
            let detection = &self.config.detection;
            let active = table.require(&self.config.columns.active)?;
            let ambient = table.require(&self.config.columns.ambient)?;
            let optical_index = optical_surface(active, ambient, detection);
            let optical = self.event("surface", optical_index)?;

            let start = self.window()?.start;
            let depth = self.depth()?.values();
            let mut force_index = if start <= optical_index {
                let target = optical.depth_cm + self.config.surface_detection_offset_cm;
                start + nearest_value_index(target, &depth[start..=optical_index])
            } else {
                optical_index
            };
            let force_start = sensor_start(self.force_channel()?, detection);
            if force_start > start && force_start < force_index {
                debug!(force_start, force_index, "force rises before the offset surface");
                force_index = force_start;
            }
            let force_index = force_index.clamp(start.min(optical_index), optical_index);
            let force = self.event("force_surface", force_index)?;

            debug!(optical = optical_index, force = force_index, "surface detected");
            Ok(SurfaceEvents { optical, force })
        })
    }

    /// Ground impact near the stop, if one was detected.
    pub fn ground_strike(&self) -> Result<Option<&Event>, ContractError> {
        cached(&self.ground_strike, || {
            self.window()?
                .strike
                .map(|index| self.event("ground_strike", index))
                .transpose()
        })
        .map(Option::as_ref)
    }

    /// Start, stop, both surfaces and the ground strike when present.
    pub fn events(&self) -> Result<Vec<&Event>, ContractError> {
        let surface = self.surface()?;
        let mut events = vec![self.start()?, self.stop()?, &surface.optical, &surface.force];
        events.extend(self.ground_strike()?);
        Ok(events)
    }

    /// Insertion angle from vertical in degrees, `None` without all three axes.
    pub fn angle(&self) -> Option<f64> {
        *self.angle.get_or_init(|| {
            let table = &self.recording.table;
            let [x, y, z] = AXIS_COLUMNS.map(|name| table.column(name));
            let angle = insertion_angle(x?, y?, z?, self.config.detection.border_fraction);
            if let Some(angle) = angle {
                debug!(angle, "insertion angle");
            }
            angle
        })
    }

    fn crop(&self, name: &str, values: &[f64], surface: usize) -> Result<CroppedProfile, ContractError> {
        let stop = self.window()?.stop;
        Ok(CroppedProfile::new(name, self.depth()?.values(), values, surface, stop))
    }

    /// Calibrated force from the force surface to the stop.
    pub fn force(&self) -> Result<&CroppedProfile, ContractError> {
        cached(&self.force, || {
            let surface = self.surface()?.force.index;
            self.crop("force", self.force_channel()?, surface)
        })
    }

    /// Force over the tip area from the force surface to the stop.
    pub fn pressure(&self) -> Result<&CroppedProfile, ContractError> {
        cached(&self.pressure, || {
            let radius = self.config.tip_diameter_mm / 2.0;
            let area = PI * radius * radius;
            let pressure: Vec<f64> = self.force_channel()?.iter().map(|f| f / area).collect();
            let surface = self.surface()?.force.index;
            self.crop("pressure", &pressure, surface)
        })
    }

    /// Ambient-corrected optical channel from the optical surface to the stop.
    pub fn nir_profile(&self) -> Result<&CroppedProfile, ContractError> {
        cached(&self.nir_profile, || {
            let surface = self.surface()?.optical.index;
            self.crop("nir", self.nir()?, surface)
        })
    }

    /// Samples between the motion start and stop.
    pub fn motion_table(&self) -> Result<SampleTable, ContractError> {
        let window = self.window()?;
        Ok(self.recording.table.window(window.start, window.stop))
    }

    /// Samples between the optical surface and the stop.
    pub fn snow_table(&self) -> Result<SampleTable, ContractError> {
        let surface = self.surface()?.optical.index;
        Ok(self.recording.table.window(surface, self.window()?.stop))
    }

    pub fn distance_traveled(&self) -> Result<f64, ContractError> {
        Ok(self.depth()?.distance_traveled())
    }

    /// Travel from the force surface to the stop (cm).
    pub fn distance_through_snow(&self) -> Result<f64, ContractError> {
        let surface = self.surface()?.force.depth_cm;
        let stop = self.stop()?.depth_cm;
        let distance = (stop - surface).abs();
        Ok(if distance.is_nan() { 0.0 } else { distance })
    }

    /// Time between start and stop (s).
    pub fn moving_time(&self) -> Result<f64, ContractError> {
        let elapsed = self.stop()?.time_s - self.start()?.time_s;
        Ok(if elapsed > 0.0 { elapsed } else { 0.0 })
    }

    pub fn avg_velocity(&self) -> Result<f64, ContractError> {
        Ok(self.depth()?.avg_velocity())
    }

    /// Headline statistics of the recording.
    pub fn summary(&self) -> Result<ProfileSummary, ContractError> {
        let depth = self.depth()?;
        Ok(ProfileSummary {
            serial: self.serial_number(),
            samples: self.recording.table.len(),
            depth_source: depth.source(),
            distance_traveled_cm: depth.distance_traveled(),
            distance_through_snow_cm: self.distance_through_snow()?,
            moving_time_s: self.moving_time()?,
            avg_velocity_cm_s: depth.avg_velocity(),
            max_velocity_cm_s: depth.max_velocity(),
            has_upward_motion: depth.has_upward_motion(),
            ground_strike: self.ground_strike()?.is_some(),
            angle_deg: self.angle(),
        })
    }

    /// Source of the reported depth.
    pub fn depth_source(&self) -> Result<DepthSource, ContractError> {
        Ok(self.depth()?.source())
    }
}

/// First column whose name is a recognized accelerometer name.
fn motion_column_of(table: &SampleTable) -> MotionColumn {
    table
        .column_names()
        .find(|name| MOTION_COLUMNS.contains(&name.to_ascii_lowercase().as_str()))
        .map_or(MotionColumn::Unavailable, |name| {
            MotionColumn::Available(name.to_string())
        })
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("serial", &self.serial_number())
            .field("samples", &self.recording.table.len())
            .field("motion_column", self.motion_column())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LyteProfile (Recorded {} points, serial {}",
            self.recording.table.len(),
            self.serial_number()
        )?;
        match self.summary() {
            Ok(summary) => write!(
                f,
                ", {} depth {:.1} cm in {:.2} s)",
                summary.depth_source, summary.distance_traveled_cm, summary.moving_time_s
            ),
            Err(_) => write!(f, ")"),
        }
    }
}
