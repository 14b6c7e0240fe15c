//! Core data types for the motion sensing engine.
//!
//! Inputs are raw accelerometer samples; outputs are batched activity reports
//! and, for the location pass-through, location records. Output types carry
//! their wire shape through serde so the host bridge can forward them as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SensingError;

/// A single raw accelerometer reading.
///
/// Values are in m/s² and include gravity, exactly as delivered by the
/// platform sensor. Finite values are expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the acceleration vector in m/s².
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<[f64; 3]> for RawSample {
    fn from(axes: [f64; 3]) -> Self {
        Self::new(axes[0], axes[1], axes[2])
    }
}

impl From<[f32; 3]> for RawSample {
    fn from(axes: [f32; 3]) -> Self {
        Self::new(f64::from(axes[0]), f64::from(axes[1]), f64::from(axes[2]))
    }
}

/// Coarse activity classification.
///
/// Serialized in lowercase (`"stationary"`, `"walking"`, `"running"`), which
/// is the label the host consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Smoothed magnitude below the walking band. Device at rest.
    #[default]
    Stationary,
    /// Smoothed magnitude inside the walking band.
    Walking,
    /// Smoothed magnitude at or above the running threshold.
    Running,
}

impl ActivityType {
    /// Wire label for this activity.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Stationary => "stationary",
            ActivityType::Walking => "walking",
            ActivityType::Running => "running",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = SensingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stationary" => Ok(ActivityType::Stationary),
            "walking" => Ok(ActivityType::Walking),
            "running" => Ok(ActivityType::Running),
            other => Err(SensingError::InvalidConfig {
                field: "activity_type",
                reason: format!("unknown activity label '{other}'"),
            }),
        }
    }
}

/// One batched report emitted by the pipeline.
///
/// Serializes to the activity stream record shape:
/// `{"stepCount": .., "activityType": "walking", "magnitude": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    /// Steps counted since the last start/reset.
    pub step_count: u64,
    /// Committed activity at the time of emission.
    pub activity_type: ActivityType,
    /// Moving-average magnitude at the time of emission (m/s²).
    #[serde(rename = "magnitude")]
    pub smoothed_magnitude: f64,
}

impl ActivityReport {
    pub fn new(step_count: u64, activity_type: ActivityType, smoothed_magnitude: f64) -> Self {
        Self {
            step_count,
            activity_type,
            smoothed_magnitude,
        }
    }

    /// Render the stream record as a JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A location fix as surfaced by the location pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the WGS84 ellipsoid.
    pub altitude: f64,
    /// Ground speed in m/s.
    pub speed: f64,
    /// Horizontal accuracy radius in meters.
    pub accuracy: f64,
    /// Fix time in Unix milliseconds.
    pub timestamp: i64,
}

impl LocationRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
