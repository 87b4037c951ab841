//! Event records and the small enumerations shared by the pipeline stages

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Which border of a signal a statistic or search starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            _ => Err(ContractError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// Immutable location of a detected event on a sample axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    /// Index into the recording's sample axis
    pub index: usize,
    /// Depth at `index` in cm (negative into the snow)
    pub depth_cm: f64,
    /// Timestamp at `index` in seconds
    pub time_s: f64,
}

impl Event {
    pub fn new(name: impl Into<String>, index: usize, depth_cm: f64, time_s: f64) -> Self {
        Self {
            name: name.into(),
            index,
            depth_cm,
            time_s,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (i={}, t={:.3} s, depth={:.2} cm)",
            self.name, self.index, self.time_s, self.depth_cm
        )
    }
}

/// Surface contact as seen by the two physically separated sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEvents {
    pub optical: Event,
    pub force: Event,
}

/// Column used for motion detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionColumn {
    Available(String),
    Unavailable,
}

impl MotionColumn {
    pub fn name(&self) -> Option<&str> {
        match self {
            MotionColumn::Available(name) => Some(name),
            MotionColumn::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MotionColumn::Available(_))
    }
}

/// Estimator that produced a depth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthSource {
    Accelerometer,
    Barometer,
    Fused,
}

impl fmt::Display for DepthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepthSource::Accelerometer => "accelerometer",
            DepthSource::Barometer => "barometer",
            DepthSource::Fused => "fused",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("Backward".parse::<Direction>().unwrap(), Direction::Backward);
        let err = "sideways".parse::<Direction>().unwrap_err();
        assert!(matches!(err, ContractError::InvalidDirection { ref value } if value == "sideways"));
        assert!(err.to_string().contains("forward or backward"));
    }

    #[test]
    fn test_motion_column() {
        let column = MotionColumn::Available("Y-Axis".to_string());
        assert_eq!(column.name(), Some("Y-Axis"));
        assert!(!MotionColumn::Unavailable.is_available());
    }

    #[test]
    fn test_event_display() {
        let event = Event::new("start", 12, -1.5, 0.25);
        assert_eq!(event.to_string(), "start (i=12, t=0.250 s, depth=-1.50 cm)");
    }
}
