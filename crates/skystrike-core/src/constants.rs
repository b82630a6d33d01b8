//! Simulation constants shared across crates.
//!
//! Per-aircraft and per-weapon numbers live in tuning structs
//! (`crate::config`), not here. These are the fixed world parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravitational acceleration magnitude (m/s²), straight down (-z).
pub const GRAVITY: f64 = 9.81;

/// Reference speed for lift-coefficient interpolation (m/s).
/// The lift coefficient ramps from zero to the throttle-derived ceiling
/// as speed approaches this value.
pub const LIFT_REFERENCE_SPEED: f64 = 175.0;

/// Forward speed at which the nose-drop pitch bias is fully applied (m/s).
pub const AUTO_PITCH_REFERENCE_SPEED: f64 = 10.0;

/// Residual drag while gliding with the throttle bottomed out.
pub const IDLE_GLIDE_DRAG: f64 = 0.2;

/// Fire-axis value at or above which a weapon trigger counts as pulled.
pub const FIRE_THRESHOLD: f64 = 0.2;

/// Relative-velocity magnitude (squared) below which a target is treated
/// as stationary for intercept purposes.
pub const INTERCEPT_EPSILON: f64 = 1e-3;

/// World radius beyond which entities are despawned (m).
pub const WORLD_RADIUS: f64 = 20_000.0;

/// Distance at which a patrol waypoint counts as reached (m).
pub const WAYPOINT_REACHED_RANGE: f64 = 20.0;
