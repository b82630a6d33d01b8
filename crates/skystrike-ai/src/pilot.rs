//! Freeform patrol / pursuit pilot.
//!
//! Flies between randomly chosen waypoints (or a jittered offset off the
//! player when pursuing), converts attitude errors into control axes,
//! varies throttle on a timer, and chatters the cannon trigger. The
//! heading loop is deliberately loose; overshoot and lazy corrections
//! are part of the flavor.

use glam::DVec3;
use rand::Rng;

use skystrike_core::components::{Controls, RigidBody};
use skystrike_core::config::PilotTuning;
use skystrike_core::constants::WAYPOINT_REACHED_RANGE;
use skystrike_core::types::{delta_angle_deg, forward, right};

/// Persistent pilot memory between ticks.
#[derive(Debug, Clone, Copy)]
pub struct PilotState {
    pub waypoint: DVec3,
    pub waypoint_timer: f64,
    pub throttle_timer: f64,
    pub throttle_cmd: f64,
}

impl Default for PilotState {
    fn default() -> Self {
        Self {
            waypoint: DVec3::ZERO,
            // Force a waypoint pick on the first update.
            waypoint_timer: f64::MAX,
            throttle_timer: f64::MAX,
            throttle_cmd: 0.0,
        }
    }
}

/// Per-tick inputs the policy reads.
pub struct PilotContext<'a> {
    pub body: &'a RigidBody,
    pub tuning: &'a PilotTuning,
    /// Player position, when one exists to pursue.
    pub player_position: Option<DVec3>,
    /// Steering target forced by the navigation layer this tick
    /// (obstacle avoidance); takes precedence over the waypoint without
    /// replacing it.
    pub steer_override: Option<DVec3>,
    /// The navigation layer owns waypoint selection; suppress the
    /// built-in random patrol pick.
    pub external_waypoints: bool,
    pub dt: f64,
}

/// Heading of the nose in degrees, clockwise from north.
pub fn yaw_deg(rotation: glam::DQuat) -> f64 {
    let f = forward(rotation);
    f.x.atan2(f.y).to_degrees()
}

/// Nose elevation above the horizon in degrees.
pub fn pitch_deg(rotation: glam::DQuat) -> f64 {
    forward(rotation).z.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Bank angle in degrees, right wing down positive.
pub fn roll_deg(rotation: glam::DQuat) -> f64 {
    -right(rotation).z.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Produce this tick's control vector.
pub fn update<R: Rng>(state: &mut PilotState, ctx: &PilotContext<'_>, rng: &mut R) -> Controls {
    let tuning = ctx.tuning;
    let position = ctx.body.position;

    state.waypoint_timer += ctx.dt;
    state.throttle_timer += ctx.dt;

    if !ctx.external_waypoints
        && (state.waypoint_timer >= tuning.switch_interval
            || position.distance(state.waypoint) <= WAYPOINT_REACHED_RANGE)
    {
        state.waypoint = pick_waypoint(ctx, rng);
        state.waypoint_timer = 0.0;
    }

    if state.throttle_timer >= tuning.throttle_change_interval {
        state.throttle_cmd = rng.gen_range(tuning.min_throttle..tuning.max_throttle);
        state.throttle_timer = 0.0;
    }

    let steer_target = ctx.steer_override.unwrap_or(state.waypoint);
    let to_waypoint = steer_target - position;
    let rotation = ctx.body.rotation;

    let target_yaw = to_waypoint.x.atan2(to_waypoint.y).to_degrees();
    let target_pitch = (to_waypoint.z / to_waypoint.length().max(1e-9))
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();

    let yaw_error = delta_angle_deg(yaw_deg(rotation), target_yaw);
    let pitch_error = target_pitch - pitch_deg(rotation);
    let bank = roll_deg(rotation);
    let altitude_gap = (steer_target.z - position.z).abs();

    let yaw = (yaw_error / 180.0).clamp(-1.0, 1.0) * tuning.yaw_sensitivity;
    let pitch = ((pitch_error / 180.0) * tuning.pitch_sensitivity * altitude_gap).clamp(-1.0, 1.0);
    let mut roll = (-bank / 180.0).clamp(-1.0, 1.0) * tuning.roll_sensitivity;
    if bank.abs() > tuning.roll_stabilization_threshold_deg {
        // Wings past the comfort band: level out before anything else.
        roll = -bank.signum() * tuning.roll_stabilization_rate;
    }

    // Trigger chatter, half the ticks on average; the mount's own
    // cooldowns set the actual cadence.
    let fire = if rng.gen::<f64>() > 0.5 { 1.0 } else { 0.0 };

    Controls {
        pitch,
        yaw,
        roll,
        throttle: state.throttle_cmd,
        fire,
        weapon_switch: false,
    }
    .clamped()
}

fn pick_waypoint<R: Rng>(ctx: &PilotContext<'_>, rng: &mut R) -> DVec3 {
    let tuning = ctx.tuning;
    if tuning.pursue_player {
        if let Some(player) = ctx.player_position {
            let offset = DVec3::new(
                rng.gen_range(-tuning.max_waypoint_distance..tuning.max_waypoint_distance),
                rng.gen_range(-tuning.min_waypoint_distance..tuning.min_waypoint_distance),
                rng.gen_range(-tuning.min_waypoint_distance..tuning.min_waypoint_distance),
            );
            return player + offset;
        }
    }

    let distance = rng.gen_range(tuning.min_waypoint_distance..tuning.max_waypoint_distance);
    let mut waypoint = random_direction(rng) * distance;
    waypoint.z = waypoint.z.clamp(tuning.min_altitude, tuning.max_altitude);
    waypoint
}

/// Uniform random unit vector.
pub fn random_direction<R: Rng>(rng: &mut R) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..1.0);
    let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let planar = (1.0 - z * z).sqrt();
    DVec3::new(planar * theta.cos(), planar * theta.sin(), z)
}
