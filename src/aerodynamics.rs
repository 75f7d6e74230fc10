//! Golf ball aerodynamics.
//!
//! Drag, Magnus lift and spin decay as functions of the spin ratio
//! S = rω/V, following Smits & Smith (1994). The dimple pattern keeps the
//! boundary layer turbulent over the whole flight, so the coefficients are
//! treated as independent of Reynolds number.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_DENSITY_SEA_LEVEL, BALL_DIAMETER_M, BALL_MASS_KG, DRAG_COEFF_BASE, DRAG_COEFF_SPIN_SLOPE,
    G_ACCEL_MPS2, LIFT_COEFF_EXPONENT, LIFT_COEFF_MAX, LIFT_COEFF_SCALE, MIN_DIVISION_THRESHOLD,
    MIN_VELOCITY_THRESHOLD, SPIN_DECAY_COEFF,
};
use crate::error::AnalysisError;

/// Aerodynamic model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroModel {
    /// Air density (kg/m³)
    pub air_density_kg_m3: f64,
    /// Ball mass (kg)
    pub ball_mass_kg: f64,
    /// Ball diameter (m)
    pub ball_diameter_m: f64,
    /// C_D = drag_base + drag_spin_slope * S
    pub drag_base: f64,
    pub drag_spin_slope: f64,
    /// C_L = min(lift_scale * S^lift_exponent, lift_max)
    pub lift_scale: f64,
    pub lift_exponent: f64,
    pub lift_max: f64,
    /// dω/dt = -spin_decay * ω * V / r
    pub spin_decay: f64,
}

impl Default for AeroModel {
    fn default() -> Self {
        Self {
            air_density_kg_m3: AIR_DENSITY_SEA_LEVEL,
            ball_mass_kg: BALL_MASS_KG,
            ball_diameter_m: BALL_DIAMETER_M,
            drag_base: DRAG_COEFF_BASE,
            drag_spin_slope: DRAG_COEFF_SPIN_SLOPE,
            lift_scale: LIFT_COEFF_SCALE,
            lift_exponent: LIFT_COEFF_EXPONENT,
            lift_max: LIFT_COEFF_MAX,
            spin_decay: SPIN_DECAY_COEFF,
        }
    }
}

impl AeroModel {
    pub fn radius(&self) -> f64 {
        self.ball_diameter_m / 2.0
    }

    /// Cross-sectional area (m²)
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius() * self.radius()
    }

    /// Spin ratio S = rω/V (dimensionless)
    pub fn spin_ratio(&self, spin_rad_s: f64, speed_mps: f64) -> f64 {
        if speed_mps < MIN_VELOCITY_THRESHOLD {
            return 0.0;
        }
        (self.radius() * spin_rad_s.abs()) / speed_mps
    }

    pub fn drag_coefficient(&self, spin_ratio: f64) -> f64 {
        self.drag_base + self.drag_spin_slope * spin_ratio.max(0.0)
    }

    pub fn lift_coefficient(&self, spin_ratio: f64) -> f64 {
        if spin_ratio <= 0.0 {
            return 0.0;
        }
        (self.lift_scale * spin_ratio.powf(self.lift_exponent)).min(self.lift_max)
    }

    /// Rate of change of spin (rad/s²), always opposing the spin
    pub fn spin_decay_rate(&self, spin_rad_s: f64, speed_mps: f64) -> f64 {
        -self.spin_decay * spin_rad_s * speed_mps / self.radius()
    }

    /// Total acceleration (m/s²) from gravity, drag and Magnus lift
    ///
    /// `spin_axis` must be a unit vector; `spin_rad_s` is the current spin rate.
    pub fn acceleration(
        &self,
        velocity: &Vector3<f64>,
        spin_axis: &Vector3<f64>,
        spin_rad_s: f64,
    ) -> Vector3<f64> {
        let gravity = Vector3::new(0.0, -G_ACCEL_MPS2, 0.0);
        let speed = velocity.norm();
        if speed < MIN_VELOCITY_THRESHOLD {
            return gravity;
        }

        let spin_ratio = self.spin_ratio(spin_rad_s, speed);
        // Force per unit mass per (C * V²)
        let k = 0.5 * self.air_density_kg_m3 * self.area() / self.ball_mass_kg;

        // Drag opposes velocity: a = -k C_D |V| V
        let drag = velocity * (-k * self.drag_coefficient(spin_ratio) * speed);

        // Magnus lift along ω × V, perpendicular to flight
        let magnus_dir = spin_axis.cross(velocity);
        let magnus_norm = magnus_dir.norm();
        let lift = if magnus_norm > MIN_DIVISION_THRESHOLD {
            magnus_dir * (k * self.lift_coefficient(spin_ratio) * speed * speed / magnus_norm)
        } else {
            Vector3::zeros()
        };

        gravity + drag + lift
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let positive = [
            ("air_density_kg_m3", self.air_density_kg_m3),
            ("ball_mass_kg", self.ball_mass_kg),
            ("ball_diameter_m", self.ball_diameter_m),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::Config(format!("aerodynamics.{name} must be positive, got {value}")));
            }
        }
        let non_negative = [
            ("drag_base", self.drag_base),
            ("drag_spin_slope", self.drag_spin_slope),
            ("lift_scale", self.lift_scale),
            ("lift_exponent", self.lift_exponent),
            ("lift_max", self.lift_max),
            ("spin_decay", self.spin_decay),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AnalysisError::Config(format!("aerodynamics.{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}
