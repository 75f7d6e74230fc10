//! Launch-monitor measurements, handedness normalization and input bounds.
//!
//! A [`ShotMeasurement`] is ground truth and is never modified. Everything the
//! engine computes starts from a [`NormalizedLaunch`], which is the measurement
//! mirrored into the right-handed frame. [`Handedness::mirror`] is the only
//! place a player's handedness changes a number.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::units::mps_to_mph;

/// Player handedness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    #[serde(alias = "RH", alias = "rh")]
    Right,
    #[serde(alias = "LH", alias = "lh")]
    Left,
}

impl Handedness {
    /// Mirror a signed lateral quantity (horizontal launch, spin axis, offline)
    /// between the device frame and the right-handed analysis frame.
    ///
    /// The mapping is its own inverse.
    pub fn mirror(self, value: f64) -> f64 {
        match self {
            Handedness::Right => value,
            Handedness::Left => -value,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Right => "right",
            Handedness::Left => "left",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" | "rh" | "r" => Ok(Handedness::Right),
            "left" | "lh" | "l" => Ok(Handedness::Left),
            other => Err(AnalysisError::Config(format!("unknown handedness '{other}'"))),
        }
    }
}

/// One shot as measured by the launch monitor
///
/// Fields are private so a measurement cannot be altered once captured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotMeasurement {
    ball_speed_mps: f64,
    vertical_launch_angle_deg: f64,
    horizontal_launch_angle_deg: f64,
    total_spin_rpm: f64,
    spin_axis_deg: f64,
    timestamp: DateTime<Utc>,
}

impl ShotMeasurement {
    pub fn new(
        ball_speed_mps: f64,
        vertical_launch_angle_deg: f64,
        horizontal_launch_angle_deg: f64,
        total_spin_rpm: f64,
        spin_axis_deg: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            ball_speed_mps,
            vertical_launch_angle_deg,
            horizontal_launch_angle_deg,
            total_spin_rpm,
            spin_axis_deg,
            timestamp,
        }
    }

    /// Measurement stamped with the current time
    pub fn now(
        ball_speed_mps: f64,
        vertical_launch_angle_deg: f64,
        horizontal_launch_angle_deg: f64,
        total_spin_rpm: f64,
        spin_axis_deg: f64,
    ) -> Self {
        Self::new(
            ball_speed_mps,
            vertical_launch_angle_deg,
            horizontal_launch_angle_deg,
            total_spin_rpm,
            spin_axis_deg,
            Utc::now(),
        )
    }

    pub fn ball_speed_mps(&self) -> f64 {
        self.ball_speed_mps
    }

    pub fn ball_speed_mph(&self) -> f64 {
        mps_to_mph(self.ball_speed_mps)
    }

    pub fn vertical_launch_angle_deg(&self) -> f64 {
        self.vertical_launch_angle_deg
    }

    pub fn horizontal_launch_angle_deg(&self) -> f64 {
        self.horizontal_launch_angle_deg
    }

    pub fn total_spin_rpm(&self) -> f64 {
        self.total_spin_rpm
    }

    pub fn spin_axis_deg(&self) -> f64 {
        self.spin_axis_deg
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_finite(&self) -> bool {
        self.ball_speed_mps.is_finite()
            && self.vertical_launch_angle_deg.is_finite()
            && self.horizontal_launch_angle_deg.is_finite()
            && self.total_spin_rpm.is_finite()
            && self.spin_axis_deg.is_finite()
    }
}

/// Shot record as delivered by the ingest layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    pub ball_speed_meters_per_second: f64,
    pub vertical_launch_angle_degrees: f64,
    pub horizontal_launch_angle_degrees: f64,
    pub total_spin_rpm: f64,
    pub spin_axis_degrees: f64,
    /// Capture time in nanoseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ns: Option<i64>,
}

impl ShotInput {
    /// Convert into a measurement, stamping the current time when the
    /// record carries none.
    pub fn into_measurement(self) -> ShotMeasurement {
        let timestamp = self
            .timestamp_ns
            .map(DateTime::<Utc>::from_timestamp_nanos)
            .unwrap_or_else(Utc::now);
        ShotMeasurement::new(
            self.ball_speed_meters_per_second,
            self.vertical_launch_angle_degrees,
            self.horizontal_launch_angle_degrees,
            self.total_spin_rpm,
            self.spin_axis_degrees,
            timestamp,
        )
    }
}

impl From<ShotInput> for ShotMeasurement {
    fn from(input: ShotInput) -> Self {
        input.into_measurement()
    }
}

/// Launch parameters in the right-handed analysis frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLaunch {
    pub ball_speed_mps: f64,
    pub vertical_launch_deg: f64,
    /// Positive = start line right of target for a right-handed player
    pub horizontal_launch_deg: f64,
    pub total_spin_rpm: f64,
    /// Positive = axis tilted to curve the ball right for a right-handed player
    pub spin_axis_deg: f64,
    pub handedness: Handedness,
}

impl NormalizedLaunch {
    pub fn from_measurement(measurement: &ShotMeasurement, handedness: Handedness) -> Self {
        Self {
            ball_speed_mps: measurement.ball_speed_mps(),
            vertical_launch_deg: measurement.vertical_launch_angle_deg(),
            horizontal_launch_deg: handedness.mirror(measurement.horizontal_launch_angle_deg()),
            total_spin_rpm: measurement.total_spin_rpm(),
            spin_axis_deg: handedness.mirror(measurement.spin_axis_deg()),
            handedness,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.ball_speed_mps.is_finite()
            && self.vertical_launch_deg.is_finite()
            && self.horizontal_launch_deg.is_finite()
            && self.total_spin_rpm.is_finite()
            && self.spin_axis_deg.is_finite()
    }
}

/// Inclusive range of plausible values for one input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A measured value that was outside its plausible bound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClampedInput {
    pub field: String,
    pub measured: f64,
    pub clamped_to: f64,
}

impl From<&ClampedInput> for AnalysisError {
    fn from(clamp: &ClampedInput) -> Self {
        AnalysisError::InputOutOfRange {
            field: clamp.field.clone(),
            value: clamp.measured,
            clamped_to: clamp.clamped_to,
        }
    }
}

/// Plausible physical bounds applied before simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    pub ball_speed_mps: Bound,
    pub vertical_launch_deg: Bound,
    pub horizontal_launch_deg: Bound,
    pub total_spin_rpm: Bound,
    pub spin_axis_deg: Bound,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            ball_speed_mps: Bound::new(0.0, 100.0),
            vertical_launch_deg: Bound::new(-30.0, 80.0),
            horizontal_launch_deg: Bound::new(-45.0, 45.0),
            total_spin_rpm: Bound::new(0.0, 15_000.0),
            spin_axis_deg: Bound::new(-60.0, 60.0),
        }
    }
}

impl InputBounds {
    /// Clamp every field into its bound and report what moved. Infinities
    /// clamp to the nearer edge.
    ///
    /// NaN passes through untouched; the integrator turns it into an
    /// unavailable simulation.
    pub fn clamp(&self, launch: &NormalizedLaunch) -> (NormalizedLaunch, Vec<ClampedInput>) {
        let mut clamped = Vec::new();
        let mut out = *launch;

        out.ball_speed_mps = clamp_field("ball_speed", launch.ball_speed_mps, self.ball_speed_mps, &mut clamped);
        out.vertical_launch_deg = clamp_field(
            "vertical_launch_angle",
            launch.vertical_launch_deg,
            self.vertical_launch_deg,
            &mut clamped,
        );
        out.horizontal_launch_deg = clamp_field(
            "horizontal_launch_angle",
            launch.horizontal_launch_deg,
            self.horizontal_launch_deg,
            &mut clamped,
        );
        out.total_spin_rpm = clamp_field("total_spin", launch.total_spin_rpm, self.total_spin_rpm, &mut clamped);
        out.spin_axis_deg = clamp_field("spin_axis", launch.spin_axis_deg, self.spin_axis_deg, &mut clamped);

        for clamp in &clamped {
            log::warn!("{}", AnalysisError::from(clamp));
        }

        (out, clamped)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let bounds = [
            ("ball_speed_mps", self.ball_speed_mps),
            ("vertical_launch_deg", self.vertical_launch_deg),
            ("horizontal_launch_deg", self.horizontal_launch_deg),
            ("total_spin_rpm", self.total_spin_rpm),
            ("spin_axis_deg", self.spin_axis_deg),
        ];
        for (name, bound) in bounds {
            if !(bound.min.is_finite() && bound.max.is_finite()) || bound.min > bound.max {
                return Err(AnalysisError::Config(format!(
                    "bound {name} must be finite with min <= max (got {} ..= {})",
                    bound.min, bound.max
                )));
            }
        }
        if self.ball_speed_mps.min < 0.0 || self.total_spin_rpm.min < 0.0 {
            return Err(AnalysisError::Config("speed and spin bounds must be non-negative".to_string()));
        }
        Ok(())
    }
}

fn clamp_field(field: &str, value: f64, bound: Bound, report: &mut Vec<ClampedInput>) -> f64 {
    if value.is_nan() || bound.contains(value) {
        return value;
    }
    let clamped_to = value.clamp(bound.min, bound.max);
    report.push(ClampedInput {
        field: field.to_string(),
        measured: value,
        clamped_to,
    });
    clamped_to
}
