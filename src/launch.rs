//! Launch vector decomposition.
//!
//! Coordinates follow the integrator frame:
//! - X: lateral, positive to the right of the target line
//! - Y: vertical, positive up
//! - Z: down-range toward the target

use nalgebra::Vector3;

use crate::constants::MIN_VELOCITY_THRESHOLD;

/// Initial velocity vector (m/s) from ball speed and launch angles in degrees
pub fn launch_velocity(ball_speed_mps: f64, vertical_deg: f64, horizontal_deg: f64) -> Vector3<f64> {
    let vertical = vertical_deg.to_radians();
    let horizontal = horizontal_deg.to_radians();
    let horizontal_speed = ball_speed_mps * vertical.cos();

    Vector3::new(
        horizontal_speed * horizontal.sin(), // X: side (left/right)
        ball_speed_mps * vertical.sin(),     // Y: vertical
        horizontal_speed * horizontal.cos(), // Z: down-range
    )
}

/// Unit vector of the spin axis (right-hand rule) for a given launch direction
///
/// Pure backspin puts the axis horizontal and perpendicular to the launch
/// direction so the Magnus force points up. A positive tilt rotates the axis
/// about the launch direction so the force leans right (fade/slice side).
pub fn spin_axis_unit(launch_velocity: &Vector3<f64>, spin_axis_deg: f64) -> Vector3<f64> {
    let up = Vector3::new(0.0, 1.0, 0.0);

    let direction = if launch_velocity.norm() > MIN_VELOCITY_THRESHOLD {
        launch_velocity.normalize()
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    // Backspin axis: horizontal, perpendicular to flight. Falls back to -X
    // for a vertical launch where the cross product vanishes.
    let backspin = direction.cross(&up);
    let backspin = if backspin.norm() > MIN_VELOCITY_THRESHOLD {
        backspin.normalize()
    } else {
        Vector3::new(-1.0, 0.0, 0.0)
    };

    // Direction the Magnus force points at launch for pure backspin
    let lift = backspin.cross(&direction);

    let tilt = spin_axis_deg.to_radians();
    (backspin * tilt.cos() + lift * tilt.sin()).normalize()
}

/// Backspin and sidespin components (rpm) of a tilted spin axis
///
/// Sidespin is positive when it curves the ball right.
pub fn spin_components(total_spin_rpm: f64, spin_axis_deg: f64) -> (f64, f64) {
    let tilt = spin_axis_deg.to_radians();
    (total_spin_rpm * tilt.cos(), total_spin_rpm * tilt.sin())
}
