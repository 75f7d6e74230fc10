//! Ball-flight simulation.
//!
//! Fixed-step integration of position, velocity and spin under gravity, drag
//! and Magnus lift until the ball returns to launch height. The step budget
//! bounds the worst-case cost of a single shot.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::aerodynamics::AeroModel;
use crate::constants::MIN_VELOCITY_THRESHOLD;
use crate::error::AnalysisError;
use crate::launch::{launch_velocity, spin_axis_unit};
use crate::measurement::{ClampedInput, Handedness, InputBounds, NormalizedLaunch, ShotMeasurement};
use crate::units::{meters_to_feet, meters_to_yards, rad_s_to_rpm, rpm_to_rad_s};

/// Numerical integration scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Classical fourth-order Runge-Kutta
    #[default]
    Rk4,
    /// Semi-implicit Euler
    Euler,
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Integration step (s)
    pub time_step_s: f64,
    /// Step budget before the simulation is reported unavailable
    pub max_steps: usize,
    pub integrator: Integrator,
    pub aerodynamics: AeroModel,
    /// Roll-out = rollout_seconds * landing horizontal speed * descent factor
    pub rollout_seconds: f64,
    /// Descent angle (deg) at which the ball stops where it lands
    pub no_roll_descent_deg: f64,
    /// Floor on the descent factor
    pub min_roll_factor: f64,
    /// Record the flight path at this interval (s) when set
    pub sample_interval_s: Option<f64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            time_step_s: 0.001,
            max_steps: 30_000,
            integrator: Integrator::Rk4,
            aerodynamics: AeroModel::default(),
            rollout_seconds: 3.0,
            no_roll_descent_deg: 55.0,
            min_roll_factor: 0.05,
            sample_interval_s: None,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.time_step_s.is_finite() && self.time_step_s > 0.0 && self.time_step_s <= 0.01) {
            return Err(AnalysisError::Config(format!(
                "simulator.time_step_s must be in (0, 0.01], got {}",
                self.time_step_s
            )));
        }
        if self.max_steps == 0 {
            return Err(AnalysisError::Config("simulator.max_steps must be positive".to_string()));
        }
        if !(self.rollout_seconds.is_finite() && self.rollout_seconds >= 0.0) {
            return Err(AnalysisError::Config("simulator.rollout_seconds must be non-negative".to_string()));
        }
        if !(self.no_roll_descent_deg > 0.0 && self.no_roll_descent_deg <= 90.0) {
            return Err(AnalysisError::Config("simulator.no_roll_descent_deg must be in (0, 90]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_roll_factor) {
            return Err(AnalysisError::Config("simulator.min_roll_factor must be in [0, 1]".to_string()));
        }
        if let Some(interval) = self.sample_interval_s {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(AnalysisError::Config("simulator.sample_interval_s must be positive".to_string()));
            }
        }
        self.aerodynamics.validate()
    }
}

/// One recorded point of the flight path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time_s: f64,
    /// Down-range distance (m)
    pub downrange_m: f64,
    /// Height above launch (m)
    pub height_m: f64,
    /// Lateral offset (m), positive to the push side
    pub lateral_m: f64,
    pub speed_mps: f64,
}

/// Estimated ball flight for one shot
///
/// Every value here is inferred, never measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryEstimate {
    #[serde(rename = "carry_distance_meters")]
    pub carry_distance_m: f64,
    #[serde(rename = "total_distance_meters")]
    pub total_distance_m: f64,
    /// Lateral landing offset in the handedness frame: positive is target-right
    /// for a right-handed player and target-left for a left-handed one.
    #[serde(rename = "offline_distance_meters")]
    pub offline_distance_m: f64,
    #[serde(rename = "apex_height_meters")]
    pub apex_height_m: f64,
    #[serde(rename = "hang_time_seconds")]
    pub hang_time_s: f64,
    #[serde(rename = "descent_angle_degrees")]
    pub descent_angle_deg: f64,
    #[serde(rename = "roll_distance_meters")]
    pub roll_distance_m: f64,
    #[serde(rename = "landing_speed_meters_per_second")]
    pub landing_speed_mps: f64,
    pub landing_spin_rpm: f64,
    pub is_estimated: bool,
    pub model_note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_path: Option<Vec<TrajectorySample>>,
}

impl TrajectoryEstimate {
    /// Estimate for a ball that never left the tee
    pub fn zero(model_note: String) -> Self {
        Self {
            carry_distance_m: 0.0,
            total_distance_m: 0.0,
            offline_distance_m: 0.0,
            apex_height_m: 0.0,
            hang_time_s: 0.0,
            descent_angle_deg: 0.0,
            roll_distance_m: 0.0,
            landing_speed_mps: 0.0,
            landing_spin_rpm: 0.0,
            is_estimated: true,
            model_note,
            flight_path: None,
        }
    }

    pub fn us_customary(&self) -> TrajectoryUsCustomary {
        TrajectoryUsCustomary {
            carry_distance_yards: meters_to_yards(self.carry_distance_m),
            total_distance_yards: meters_to_yards(self.total_distance_m),
            offline_distance_yards: meters_to_yards(self.offline_distance_m),
            apex_height_feet: meters_to_feet(self.apex_height_m),
        }
    }
}

/// Trajectory distances in yards and feet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryUsCustomary {
    pub carry_distance_yards: f64,
    pub total_distance_yards: f64,
    pub offline_distance_yards: f64,
    pub apex_height_feet: f64,
}

/// Result of one simulation
///
/// `result` holds either the estimate or the reason it is unavailable;
/// `clamped_inputs` lists the measurements that were pulled into range first.
#[derive(Debug)]
pub struct SimulationOutcome {
    pub result: Result<TrajectoryEstimate, AnalysisError>,
    pub clamped_inputs: Vec<ClampedInput>,
}

impl SimulationOutcome {
    pub fn estimate(&self) -> Option<&TrajectoryEstimate> {
        self.result.as_ref().ok()
    }

    pub fn is_available(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Copy)]
struct FlightState {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    spin_rad_s: f64,
}

#[derive(Debug, Clone, Copy)]
struct FlightDerivative {
    velocity: Vector3<f64>,
    acceleration: Vector3<f64>,
    spin_rate: f64,
}

/// Fixed-step ball-flight simulator
///
/// The spin axis is set from the launch direction and held fixed in space for
/// the whole flight. It does not rotate with the velocity vector, so curvature
/// late in a strongly curving flight is approximate.
#[derive(Debug, Clone, Default)]
pub struct TrajectorySimulator {
    config: SimulatorConfig,
    bounds: InputBounds,
}

impl TrajectorySimulator {
    pub fn new(config: SimulatorConfig, bounds: InputBounds) -> Self {
        Self { config, bounds }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn model_note(&self) -> String {
        let scheme = match self.config.integrator {
            Integrator::Rk4 => "RK4",
            Integrator::Euler => "Euler",
        };
        format!(
            "Estimated: {scheme} integration at {:.1} ms steps of gravity, drag and Magnus lift \
             (Smits & Smith 1994 coefficients, air density {:.3} kg/m3); \
             spin axis fixed at launch; no wind, turf or altitude modelling",
            self.config.time_step_s * 1000.0,
            self.config.aerodynamics.air_density_kg_m3,
        )
    }

    /// Simulate a measured shot. Never panics or returns early: an unusable
    /// flight is reported through `SimulationOutcome::result`.
    pub fn simulate(&self, measurement: &ShotMeasurement, handedness: Handedness) -> SimulationOutcome {
        let launch = NormalizedLaunch::from_measurement(measurement, handedness);
        self.simulate_launch(&launch)
    }

    pub fn simulate_launch(&self, launch: &NormalizedLaunch) -> SimulationOutcome {
        let (launch, clamped_inputs) = self.bounds.clamp(launch);
        let result = self.integrate(&launch);
        if let Err(ref e) = result {
            log::warn!("trajectory unavailable: {e}");
        }
        SimulationOutcome { result, clamped_inputs }
    }

    fn integrate(&self, launch: &NormalizedLaunch) -> Result<TrajectoryEstimate, AnalysisError> {
        if launch.ball_speed_mps.abs() < MIN_VELOCITY_THRESHOLD {
            return Ok(TrajectoryEstimate::zero(self.model_note()));
        }

        let aero = &self.config.aerodynamics;
        let dt = self.config.time_step_s;

        let velocity = launch_velocity(
            launch.ball_speed_mps,
            launch.vertical_launch_deg,
            launch.horizontal_launch_deg,
        );
        // Fixed for the whole flight
        let spin_axis = spin_axis_unit(&velocity, launch.spin_axis_deg);

        let mut state = FlightState {
            position: Vector3::zeros(),
            velocity,
            spin_rad_s: rpm_to_rad_s(launch.total_spin_rpm),
        };

        let mut time = 0.0;
        let mut apex_height: f64 = 0.0;
        let mut path = self.config.sample_interval_s.map(|_| vec![sample(&state, 0.0)]);
        let mut next_sample_time = self.config.sample_interval_s.unwrap_or(f64::INFINITY);

        for step in 1..=self.config.max_steps {
            let next = match self.config.integrator {
                Integrator::Rk4 => rk4_step(aero, &spin_axis, &state, dt),
                Integrator::Euler => euler_step(aero, &spin_axis, &state, dt),
            };

            if !(next.position.iter().all(|c| c.is_finite()) && next.velocity.iter().all(|c| c.is_finite())) {
                return Err(AnalysisError::SimulationUnavailable { steps: step, elapsed_s: time });
            }

            if next.position.y < 0.0 {
                // Interpolate the crossing of launch height within the step
                let fraction = state.position.y / (state.position.y - next.position.y);
                let landing = FlightState {
                    position: state.position.lerp(&next.position, fraction),
                    velocity: state.velocity.lerp(&next.velocity, fraction),
                    spin_rad_s: state.spin_rad_s + (next.spin_rad_s - state.spin_rad_s) * fraction,
                };
                let hang_time = time + fraction * dt;

                if let Some(ref mut points) = path {
                    points.push(sample(&landing, hang_time));
                }

                log::debug!("ground contact after {step} steps at t={hang_time:.3}s");
                return Ok(self.summarize(&landing, hang_time, apex_height, path));
            }

            state = next;
            time += dt;
            apex_height = apex_height.max(state.position.y);

            if time >= next_sample_time {
                if let Some(ref mut points) = path {
                    points.push(sample(&state, time));
                }
                next_sample_time += self.config.sample_interval_s.unwrap_or(f64::INFINITY);
            }
        }

        Err(AnalysisError::SimulationUnavailable {
            steps: self.config.max_steps,
            elapsed_s: time,
        })
    }

    fn summarize(
        &self,
        landing: &FlightState,
        hang_time: f64,
        apex_height: f64,
        flight_path: Option<Vec<TrajectorySample>>,
    ) -> TrajectoryEstimate {
        let carry = landing.position.x.hypot(landing.position.z);
        let horizontal_speed = landing.velocity.x.hypot(landing.velocity.z);
        let descent_angle = (-landing.velocity.y).atan2(horizontal_speed).to_degrees().max(0.0);
        let roll = self.roll_out(descent_angle, horizontal_speed);

        TrajectoryEstimate {
            carry_distance_m: carry,
            total_distance_m: carry + roll,
            offline_distance_m: landing.position.x,
            apex_height_m: apex_height,
            hang_time_s: hang_time,
            descent_angle_deg: descent_angle,
            roll_distance_m: roll,
            landing_speed_mps: landing.velocity.norm(),
            landing_spin_rpm: rad_s_to_rpm(landing.spin_rad_s),
            is_estimated: true,
            model_note: self.model_note(),
            flight_path,
        }
    }

    /// Empirical roll after landing: steep, slow arrivals stop quickly.
    pub fn roll_out(&self, descent_angle_deg: f64, landing_horizontal_speed_mps: f64) -> f64 {
        let factor = (1.0 - descent_angle_deg / self.config.no_roll_descent_deg)
            .clamp(self.config.min_roll_factor, 1.0);
        (self.config.rollout_seconds * landing_horizontal_speed_mps * factor).max(0.0)
    }
}

fn derivative(aero: &AeroModel, spin_axis: &Vector3<f64>, state: &FlightState) -> FlightDerivative {
    FlightDerivative {
        velocity: state.velocity,
        acceleration: aero.acceleration(&state.velocity, spin_axis, state.spin_rad_s),
        spin_rate: aero.spin_decay_rate(state.spin_rad_s, state.velocity.norm()),
    }
}

fn advance(state: &FlightState, d: &FlightDerivative, h: f64) -> FlightState {
    FlightState {
        position: state.position + d.velocity * h,
        velocity: state.velocity + d.acceleration * h,
        spin_rad_s: state.spin_rad_s + d.spin_rate * h,
    }
}

fn rk4_step(aero: &AeroModel, spin_axis: &Vector3<f64>, state: &FlightState, dt: f64) -> FlightState {
    let k1 = derivative(aero, spin_axis, state);
    let k2 = derivative(aero, spin_axis, &advance(state, &k1, dt * 0.5));
    let k3 = derivative(aero, spin_axis, &advance(state, &k2, dt * 0.5));
    let k4 = derivative(aero, spin_axis, &advance(state, &k3, dt));

    FlightState {
        position: state.position + (k1.velocity + k2.velocity * 2.0 + k3.velocity * 2.0 + k4.velocity) * (dt / 6.0),
        velocity: state.velocity
            + (k1.acceleration + k2.acceleration * 2.0 + k3.acceleration * 2.0 + k4.acceleration) * (dt / 6.0),
        spin_rad_s: state.spin_rad_s + (k1.spin_rate + 2.0 * k2.spin_rate + 2.0 * k3.spin_rate + k4.spin_rate) * (dt / 6.0),
    }
}

fn euler_step(aero: &AeroModel, spin_axis: &Vector3<f64>, state: &FlightState, dt: f64) -> FlightState {
    let d = derivative(aero, spin_axis, state);
    let velocity = state.velocity + d.acceleration * dt;
    FlightState {
        position: state.position + velocity * dt,
        velocity,
        spin_rad_s: state.spin_rad_s + d.spin_rate * dt,
    }
}

fn sample(state: &FlightState, time_s: f64) -> TrajectorySample {
    TrajectorySample {
        time_s,
        downrange_m: state.position.z,
        height_m: state.position.y,
        lateral_m: state.position.x,
        speed_mps: state.velocity.norm(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> TrajectorySimulator {
        TrajectorySimulator::default()
    }

    fn run(speed: f64, vla: f64, hla: f64, spin: f64, axis: f64) -> TrajectoryEstimate {
        let shot = ShotMeasurement::now(speed, vla, hla, spin, axis);
        simulator()
            .simulate(&shot, Handedness::Right)
            .result
            .expect("simulation should land")
    }

    #[test]
    fn test_driver_carry_is_plausible() {
        let t = run(74.0, 10.9, 0.0, 2686.0, 0.0);
        assert!(t.carry_distance_m > 220.0 && t.carry_distance_m < 270.0, "carry {}", t.carry_distance_m);
        assert!(t.apex_height_m > 25.0 && t.apex_height_m < 45.0, "apex {}", t.apex_height_m);
        assert!(t.hang_time_s > 6.0 && t.hang_time_s < 9.0, "hang {}", t.hang_time_s);
        assert!(t.descent_angle_deg > 30.0 && t.descent_angle_deg < 55.0);
        assert!(t.offline_distance_m.abs() < 1e-9);
        assert!(t.total_distance_m > t.carry_distance_m);
        assert!(t.is_estimated);
    }

    #[test]
    fn test_wedge_flies_shorter_and_steeper() {
        let driver = run(74.0, 10.9, 0.0, 2686.0, 0.0);
        let wedge = run(46.0, 24.2, 0.0, 9304.0, 0.0);
        assert!(wedge.carry_distance_m < driver.carry_distance_m);
        assert!(wedge.carry_distance_m > 100.0 && wedge.carry_distance_m < 150.0);
        assert!(wedge.descent_angle_deg > driver.descent_angle_deg);
        assert!(wedge.roll_distance_m < driver.roll_distance_m);
    }

    #[test]
    fn test_zero_speed_is_all_zero() {
        let t = run(0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(t.carry_distance_m, 0.0);
        assert_eq!(t.total_distance_m, 0.0);
        assert_eq!(t.apex_height_m, 0.0);
        assert_eq!(t.hang_time_s, 0.0);
        assert_eq!(t.descent_angle_deg, 0.0);
        assert!(t.is_estimated);
    }

    #[test]
    fn test_spin_axis_curves_ball() {
        let fade = run(70.0, 12.5, 0.0, 2500.0, 10.0);
        let draw = run(70.0, 12.5, 0.0, 2500.0, -10.0);
        assert!(fade.offline_distance_m > 10.0, "fade offline {}", fade.offline_distance_m);
        assert!(draw.offline_distance_m < -10.0, "draw offline {}", draw.offline_distance_m);
        assert!((fade.offline_distance_m + draw.offline_distance_m).abs() < 1e-6);
    }

    #[test]
    fn test_left_handed_offline_is_mirrored() {
        let shot = ShotMeasurement::now(70.0, 12.5, -2.5, 2500.0, 10.0);
        let rh = simulator().simulate(&shot, Handedness::Right).result.unwrap();
        let lh = simulator().simulate(&shot, Handedness::Left).result.unwrap();
        assert!((rh.offline_distance_m + lh.offline_distance_m).abs() < 1e-9);
        assert!((rh.carry_distance_m - lh.carry_distance_m).abs() < 1e-9);
    }

    #[test]
    fn test_negative_launch_lands_immediately() {
        let t = run(60.0, -10.0, 0.0, 3000.0, 0.0);
        assert!(t.carry_distance_m < 1.0);
        assert!(t.hang_time_s <= simulator().config().time_step_s);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let shot = ShotMeasurement::now(150.0, 89.0, 0.0, 40_000.0, 0.0);
        let outcome = simulator().simulate(&shot, Handedness::Right);
        assert!(outcome.is_available());
        let fields: Vec<&str> = outcome.clamped_inputs.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["ball_speed", "vertical_launch_angle", "total_spin"]);
    }

    #[test]
    fn test_model_note_states_fixed_spin_axis() {
        let note = TrajectorySimulator::default().model_note();
        assert!(note.starts_with("Estimated"));
        assert!(note.contains("spin axis fixed at launch"), "{note}");
    }

    #[test]
    fn test_step_budget_exhaustion_is_unavailable() {
        let config = SimulatorConfig {
            max_steps: 100,
            ..SimulatorConfig::default()
        };
        let sim = TrajectorySimulator::new(config, InputBounds::default());
        let shot = ShotMeasurement::now(70.0, 12.5, 0.0, 2500.0, 0.0);
        let outcome = sim.simulate(&shot, Handedness::Right);
        match outcome.result {
            Err(AnalysisError::SimulationUnavailable { steps, .. }) => assert_eq!(steps, 100),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_input_is_unavailable() {
        let shot = ShotMeasurement::now(f64::NAN, 12.0, 0.0, 2500.0, 0.0);
        let outcome = simulator().simulate(&shot, Handedness::Right);
        assert!(!outcome.is_available());
    }

    #[test]
    fn test_euler_agrees_with_rk4() {
        let config = SimulatorConfig {
            integrator: Integrator::Euler,
            ..SimulatorConfig::default()
        };
        let shot = ShotMeasurement::now(70.0, 12.5, 0.0, 2500.0, 0.0);
        let euler = TrajectorySimulator::new(config, InputBounds::default())
            .simulate(&shot, Handedness::Right)
            .result
            .unwrap();
        let rk4 = run(70.0, 12.5, 0.0, 2500.0, 0.0);
        let rel = (euler.carry_distance_m - rk4.carry_distance_m).abs() / rk4.carry_distance_m;
        assert!(rel < 0.01, "euler {} vs rk4 {}", euler.carry_distance_m, rk4.carry_distance_m);
    }

    #[test]
    fn test_flight_path_sampling() {
        let config = SimulatorConfig {
            sample_interval_s: Some(0.5),
            ..SimulatorConfig::default()
        };
        let shot = ShotMeasurement::now(60.0, 14.0, 0.0, 6000.0, 0.0);
        let t = TrajectorySimulator::new(config, InputBounds::default())
            .simulate(&shot, Handedness::Right)
            .result
            .unwrap();
        let path = t.flight_path.expect("path requested");
        assert!(path.len() > 10);
        assert_eq!(path[0].time_s, 0.0);
        let last = path.last().unwrap();
        assert!((last.time_s - t.hang_time_s).abs() < 1e-9);
        assert!(last.height_m.abs() < 1e-6);
        assert!(path.windows(2).all(|w| w[1].time_s > w[0].time_s));
    }

    #[test]
    fn test_us_customary_conversion() {
        let t = run(70.0, 12.5, 0.0, 2500.0, 0.0);
        let us = t.us_customary();
        assert!((us.carry_distance_yards * 0.9144 - t.carry_distance_m).abs() < 1e-9);
    }

    #[test]
    fn test_roll_out_floor() {
        let sim = simulator();
        let steep = sim.roll_out(80.0, 10.0);
        assert!((steep - 3.0 * 10.0 * 0.05).abs() < 1e-12);
        assert_eq!(sim.roll_out(0.0, 0.0), 0.0);
    }
}
