//! Unit conversions between the SI values used internally and the units
//! golfers read.

use serde::{Deserialize, Serialize};

use crate::constants::{METERS_TO_FEET, METERS_TO_YARDS, MPS_TO_MPH, RPM_TO_RAD_S};

/// Unit system for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    UsCustomary,
}

impl UnitSystem {
    /// Speed from m/s into this system (m/s or mph)
    pub fn speed_from_metric(self, mps: f64) -> f64 {
        match self {
            UnitSystem::Metric => mps,
            UnitSystem::UsCustomary => mps_to_mph(mps),
        }
    }

    /// Distance from meters into this system (meters or yards)
    pub fn distance_from_metric(self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters,
            UnitSystem::UsCustomary => meters_to_yards(meters),
        }
    }

    /// Height from meters into this system (meters or feet)
    pub fn height_from_metric(self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters,
            UnitSystem::UsCustomary => meters_to_feet(meters),
        }
    }

    pub fn speed_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::UsCustomary => "mph",
        }
    }

    pub fn distance_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::UsCustomary => "yd",
        }
    }

    pub fn height_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::UsCustomary => "ft",
        }
    }
}

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

pub fn mph_to_mps(mph: f64) -> f64 {
    mph / MPS_TO_MPH
}

pub fn meters_to_yards(meters: f64) -> f64 {
    meters * METERS_TO_YARDS
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * METERS_TO_FEET
}

pub fn rpm_to_rad_s(rpm: f64) -> f64 {
    rpm * RPM_TO_RAD_S
}

pub fn rad_s_to_rpm(rad_s: f64) -> f64 {
    rad_s / RPM_TO_RAD_S
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_round_trip() {
        for mps in [0.0, 1.0, 44.7, 70.0, 83.3] {
            let back = mph_to_mps(mps_to_mph(mps));
            assert!((back - mps).abs() < 1e-12, "{mps} -> {back}");
        }
    }

    #[test]
    fn test_known_conversions() {
        // 100 mph is 44.704 m/s exactly
        assert!((mph_to_mps(100.0) - 44.704).abs() < 1e-9);
        assert!((meters_to_yards(0.9144) - 1.0).abs() < 1e-12);
        assert!((meters_to_feet(0.3048) - 1.0).abs() < 1e-12);
        assert!((rad_s_to_rpm(rpm_to_rad_s(2500.0)) - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_system_metric_is_identity() {
        let units = UnitSystem::Metric;
        assert_eq!(units.speed_from_metric(70.0), 70.0);
        assert_eq!(units.distance_from_metric(230.0), 230.0);
        assert_eq!(units.height_from_metric(30.0), 30.0);
    }

    #[test]
    fn test_unit_system_us_customary() {
        let units = UnitSystem::UsCustomary;
        assert!((units.speed_from_metric(44.704) - 100.0).abs() < 1e-9);
        assert!((units.distance_from_metric(91.44) - 100.0).abs() < 1e-9);
        assert_eq!(units.distance_label(), "yd");
    }
}
