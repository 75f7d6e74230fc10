/// Physical constants used in ball-flight calculations

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Air density at sea level (kg/m³)
///
/// ICAO Standard Atmosphere at 15°C, 1013.25 hPa, dry air.
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.225;

/// Golf ball mass (kg)
///
/// USGA Rule 4 upper limit of 1.620 oz (45.93 g). Practically every
/// tour ball sits at the limit.
pub const BALL_MASS_KG: f64 = 0.04593;

/// Golf ball diameter (m)
///
/// USGA minimum of 1.680 in (42.67 mm).
pub const BALL_DIAMETER_M: f64 = 0.04267;

/// Conversion factor: meters per second to miles per hour
pub const MPS_TO_MPH: f64 = 2.236_936_292_054_4;

/// Conversion factor: meters to yards
pub const METERS_TO_YARDS: f64 = 1.0 / 0.9144;

/// Conversion factor: meters to feet
pub const METERS_TO_FEET: f64 = 1.0 / 0.3048;

/// Conversion factor: revolutions per minute to radians per second
pub const RPM_TO_RAD_S: f64 = 2.0 * std::f64::consts::PI / 60.0;

// Aerodynamic model constants
//
// Smits, A.J. & Smith, D.R. (1994), "A new aerodynamic model of a golf ball
// in flight", Science and Golf II. Valid for the Reynolds numbers of a
// struck ball (roughly 4e4 to 2.5e5) where the dimple pattern keeps the
// boundary layer turbulent.

/// Drag coefficient at zero spin
pub const DRAG_COEFF_BASE: f64 = 0.24;

/// Drag coefficient growth per unit spin ratio
pub const DRAG_COEFF_SPIN_SLOPE: f64 = 0.18;

/// Lift coefficient scale in C_L = scale * S^exponent
pub const LIFT_COEFF_SCALE: f64 = 0.54;

/// Lift coefficient exponent in C_L = scale * S^exponent
pub const LIFT_COEFF_EXPONENT: f64 = 0.4;

/// Upper bound on the lift coefficient
///
/// The power law over-predicts lift for wedge spin ratios (S > 0.3);
/// measured lift flattens out near 0.3.
pub const LIFT_COEFF_MAX: f64 = 0.30;

/// Spin decay constant in dω/dt = -k ω V / r
pub const SPIN_DECAY_COEFF: f64 = 2.0e-5;

// Numerical stability constants

/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
