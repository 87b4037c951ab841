//! # Profile
//!
//! Composes conditioning, event detection and depth reconstruction into a
//! lazily computed view of one probe recording.
//!
//! ```ignore
//! let recording = reader::read_recording("probe.csv")?;
//! let profile = Profile::new(recording, ProfileConfig::default())?;
//! println!("{}", profile.start()?);
//! println!("{:.1} cm through snow", profile.distance_through_snow()?);
//! ```

mod angle;
mod cropped;
mod profile;

pub use angle::insertion_angle;
pub use cropped::CroppedProfile;
pub use profile::Profile;
