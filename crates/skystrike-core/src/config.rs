//! Tuning configuration: immutable after load, shared by reference.
//!
//! Every threshold and multiplier the systems use lives here rather than
//! in code, so aircraft variants are data, not forked code paths. The two
//! built-in flight profiles (`arcade`, `heavy`) reproduce the two source
//! controller variants purely through constants and feature flags.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration load/validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Static per-aircraft flight-model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightTuning {
    // --- Throttle ---
    /// Throttle-state change per second at full axis deflection.
    pub throttle_change_speed: f64,
    /// Forward thrust per unit of throttle.
    pub thrust_multiplier: f64,

    // --- Control torque ---
    pub pitch_multiplier: f64,
    pub yaw_multiplier: f64,
    pub roll_multiplier: f64,
    /// Initial pitch-bias (nose-drop) factor.
    pub pitch_factor: f64,

    // --- Mass scaling (throttle fraction 0 → 1) ---
    /// Mass at zero throttle (the heavy end).
    pub mass_low_throttle: f64,
    /// Mass at full throttle.
    pub mass_high_throttle: f64,

    // --- Drag scaling (throttle fraction 0 → 1) ---
    pub drag_low_throttle: f64,
    pub drag_high_throttle: f64,

    // --- Lift ---
    pub lift_multiplier: f64,
    pub air_density: f64,
    pub wing_area: f64,
    /// Minimum forward speed before lift ramps in (m/s).
    pub min_lift_speed: f64,
    /// Lift-coefficient ceiling under power.
    pub normal_lift_ceiling: f64,
    /// Relaxed ceiling while gliding with throttle bottomed out.
    pub glide_lift_ceiling: f64,

    // --- Velocity alignment ---
    /// Enables blending velocity toward the forward axis each tick.
    pub align_velocity: bool,
    /// Per-tick blend factor when lift is sufficient.
    pub max_alignment_rate: f64,
    /// Per-tick blend factor when lift is insufficient.
    pub min_alignment_rate: f64,
    /// Lift counts as sufficient when |lift| / this divisor ≥ weight.
    pub lift_sufficiency_divisor: f64,

    // --- Stall / dive ---
    /// Pitch dot-product above which the aircraft stalls.
    pub stall_angle: f64,
    /// Stricter threshold past which the stall timer accumulates.
    pub critical_stall_angle: f64,
    /// Negative pitch dot-product at or below which the aircraft dives.
    pub dive_angle: f64,
    /// Seconds past the critical angle before pitch authority decays.
    pub stall_time_threshold: f64,
    /// Maximum per-tick fractional velocity loss while stalled.
    pub stall_speed_loss: f64,
    /// Stall-timer decrement per second while flying level.
    pub stall_recovery_rate: f64,
    /// Pitch-factor decay per second during a held critical stall.
    pub pitch_decay_rate: f64,
    /// Scales forward thrust by the ramped dive multiplier.
    pub dive_thrust_scaling: bool,

    // --- Velocity ---
    pub max_velocity: f64,

    // --- Angular response ---
    pub angular_damping: f64,
    pub max_angular_speed: f64,
}

impl FlightTuning {
    /// Lighter arcade profile: partial stall bleed, fast recovery,
    /// velocity alignment and dive-thrust scaling enabled.
    pub fn arcade() -> Self {
        Self {
            throttle_change_speed: 10.0,
            thrust_multiplier: 120.0,
            pitch_multiplier: 2.4,
            yaw_multiplier: 1.2,
            roll_multiplier: 3.0,
            pitch_factor: 1.0,
            mass_low_throttle: 600.0,
            mass_high_throttle: 10.0,
            drag_low_throttle: 1.5,
            drag_high_throttle: 0.35,
            lift_multiplier: 0.5,
            air_density: 1.225,
            wing_area: 10.0,
            min_lift_speed: 34.0,
            normal_lift_ceiling: 1.0,
            glide_lift_ceiling: 2.0,
            align_velocity: true,
            max_alignment_rate: 0.5,
            min_alignment_rate: 0.05,
            lift_sufficiency_divisor: 2.0,
            stall_angle: 0.75,
            critical_stall_angle: 0.85,
            dive_angle: -0.35,
            stall_time_threshold: 2.0,
            stall_speed_loss: 0.3,
            stall_recovery_rate: 2.0,
            pitch_decay_rate: 1.0,
            dive_thrust_scaling: true,
            max_velocity: 250.0,
            angular_damping: 2.0,
            max_angular_speed: 3.0,
        }
    }

    /// Heavier "critical stall" profile: full velocity bleed at the stall
    /// limit, slower recovery, no velocity alignment.
    pub fn heavy() -> Self {
        Self {
            stall_speed_loss: 1.0,
            stall_recovery_rate: 1.0,
            critical_stall_angle: 0.75,
            align_velocity: false,
            dive_thrust_scaling: false,
            max_velocity: 200.0,
            ..Self::arcade()
        }
    }

    /// Parse and validate a tuning profile from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check invariants the flight system depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mass_low_throttle <= 0.0 || self.mass_high_throttle <= 0.0 {
            return Err(invalid("mass", "masses must be positive"));
        }
        if self.max_velocity <= 0.0 {
            return Err(invalid("max_velocity", "must be positive"));
        }
        if !(-1.0..=1.0).contains(&self.stall_angle)
            || !(-1.0..=1.0).contains(&self.critical_stall_angle)
            || !(-1.0..=1.0).contains(&self.dive_angle)
        {
            return Err(invalid(
                "stall/dive angles",
                "pitch dot-product thresholds must lie in [-1, 1]",
            ));
        }
        if self.critical_stall_angle < self.stall_angle {
            return Err(invalid(
                "critical_stall_angle",
                "must be at least stall_angle",
            ));
        }
        if self.dive_angle >= 0.0 {
            return Err(invalid("dive_angle", "must be negative"));
        }
        if !(0.0..=1.0).contains(&self.stall_speed_loss) {
            return Err(invalid("stall_speed_loss", "must lie in [0, 1]"));
        }
        if self.min_lift_speed <= 0.0 {
            return Err(invalid("min_lift_speed", "must be positive"));
        }
        Ok(())
    }

    /// Mass bounds as (min, max) regardless of which throttle end is heavier.
    pub fn mass_bounds(&self) -> (f64, f64) {
        (
            self.mass_low_throttle.min(self.mass_high_throttle),
            self.mass_low_throttle.max(self.mass_high_throttle),
        )
    }

    /// Drag bounds as (min, max).
    pub fn drag_bounds(&self) -> (f64, f64) {
        (
            self.drag_low_throttle.min(self.drag_high_throttle),
            self.drag_low_throttle.max(self.drag_high_throttle),
        )
    }
}

/// Cannon configuration for a weapon mount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonTuning {
    /// Muzzle positions in body space. Empty = missing configuration.
    pub muzzle_offsets: Vec<DVec3>,
    /// Descriptor identity for the spawned round; `None` = missing
    /// configuration, firing is a no-op.
    pub projectile: Option<String>,
    pub projectile_speed: f64,
    /// Round lifetime before despawn (seconds).
    pub projectile_lifetime: f64,
    /// Forward distance rays converge on.
    pub convergence_distance: f64,
    pub cooldown: f64,
    // --- Burst fire ---
    pub burst_enabled: bool,
    pub shots_per_burst: u32,
    pub burst_shot_cooldown: f64,
    pub burst_cooldown: f64,
}

impl Default for CannonTuning {
    fn default() -> Self {
        Self {
            muzzle_offsets: vec![DVec3::new(-2.0, 1.0, 0.0), DVec3::new(2.0, 1.0, 0.0)],
            projectile: Some("cannon_round".into()),
            projectile_speed: 400.0,
            projectile_lifetime: 4.0,
            convergence_distance: 500.0,
            cooldown: 0.15,
            burst_enabled: true,
            shots_per_burst: 3,
            burst_shot_cooldown: 0.1,
            burst_cooldown: 1.0,
        }
    }
}

/// Missile configuration for a weapon mount and the missiles it fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileTuning {
    /// Tube positions in body space. Empty = missing configuration.
    pub tube_offsets: Vec<DVec3>,
    /// Descriptor identity for the spawned missile; `None` = missing
    /// configuration.
    pub missile: Option<String>,
    pub speed: f64,
    /// Per-tube reload time (seconds).
    pub tube_cooldown: f64,
    /// Guard between consecutive trigger pulls (seconds).
    pub refire_guard: f64,
    /// Target acquisition range at launch.
    pub acquire_range: f64,
    /// Viewport half-width for player acquisition.
    pub acquire_viewport: f64,

    // --- Guidance ---
    /// Boost duration before guidance begins (seconds).
    pub boost_duration: f64,
    /// Boost speed is cruise speed divided by this.
    pub boost_speed_divisor: f64,
    /// Maximum steering rate while seeking (rad/s).
    pub max_turn_rate: f64,
    /// Maximum target bearing off the nose before lock is lost (degrees).
    pub max_cone_angle_deg: f64,
    /// Seconds out of the cone before self-destructing.
    pub out_of_angle_time: f64,
    /// Seek window before the target is dropped (seconds).
    pub seek_duration: f64,
    /// Unguided grace period before self-destructing (seconds).
    pub unguided_grace: f64,

    // --- Detonation ---
    /// Target distance at or below which the missile detonates.
    pub detonation_radius: f64,
    /// Radius of the explosion impulse sphere.
    pub blast_radius: f64,
    /// Impulse at the blast center; falls off linearly to zero at the edge.
    pub explosion_force: f64,
    /// Forward swept-volume probe distance for obstacle detonation.
    pub probe_distance: f64,
    /// Swept-volume probe radius.
    pub probe_radius: f64,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            tube_offsets: vec![DVec3::new(-3.0, 0.0, -0.5), DVec3::new(3.0, 0.0, -0.5)],
            missile: Some("homing_missile".into()),
            speed: 180.0,
            tube_cooldown: 4.0,
            refire_guard: 0.5,
            acquire_range: 2000.0,
            acquire_viewport: 0.25,
            boost_duration: 1.0,
            boost_speed_divisor: 1.5,
            max_turn_rate: 0.35,
            max_cone_angle_deg: 45.0,
            out_of_angle_time: 1.0,
            seek_duration: 5.65,
            unguided_grace: 2.5,
            detonation_radius: 5.0,
            blast_radius: 12.0,
            explosion_force: 250.0,
            probe_distance: 10.0,
            probe_radius: 1.0,
        }
    }
}

/// Bomb configuration: free-fall drop inheriting shooter velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombTuning {
    /// Release position in body space.
    pub spawn_offset: DVec3,
    /// Descriptor identity; `None` = missing configuration.
    pub bomb: Option<String>,
    /// Multiplier on the cannon cooldown for the release interval.
    pub cooldown_factor: f64,
    pub lifetime: f64,
}

impl Default for BombTuning {
    fn default() -> Self {
        Self {
            spawn_offset: DVec3::new(0.0, 0.0, -1.5),
            bomb: Some("napalm_bomb".into()),
            cooldown_factor: 10.0,
            lifetime: 20.0,
        }
    }
}

/// Full weapon loadout for a mount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponTuning {
    pub cannon: CannonTuning,
    pub missile: MissileTuning,
    pub bomb: BombTuning,
}

/// Freeform patrol/pursuit pilot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotTuning {
    /// Waypoint shell radii around the origin (or player offset bounds).
    pub min_waypoint_distance: f64,
    pub max_waypoint_distance: f64,
    /// Seconds between waypoint switches.
    pub switch_interval: f64,
    /// Altitude clamp applied to random waypoints.
    pub min_altitude: f64,
    pub max_altitude: f64,
    /// Bank angle (degrees) past which roll correction overrides.
    pub roll_stabilization_threshold_deg: f64,
    pub roll_stabilization_rate: f64,
    pub yaw_sensitivity: f64,
    pub pitch_sensitivity: f64,
    pub roll_sensitivity: f64,
    /// Throttle axis bounds for periodic variation.
    pub min_throttle: f64,
    pub max_throttle: f64,
    pub throttle_change_interval: f64,
    /// Chase the player instead of patrolling.
    pub pursue_player: bool,
}

impl Default for PilotTuning {
    fn default() -> Self {
        Self {
            min_waypoint_distance: 100.0,
            max_waypoint_distance: 300.0,
            switch_interval: 5.0,
            min_altitude: 200.0,
            max_altitude: 700.0,
            roll_stabilization_threshold_deg: 45.0,
            roll_stabilization_rate: 2.0,
            yaw_sensitivity: 1.5,
            pitch_sensitivity: 1.0,
            roll_sensitivity: 1.0,
            min_throttle: 0.5,
            max_throttle: 1.0,
            throttle_change_interval: 3.0,
            pursue_player: false,
        }
    }
}

/// Cost-based waypoint selection + reactive obstacle avoidance variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaypointTuning {
    /// Radius of the candidate sampling sphere.
    pub area_radius: f64,
    /// Random candidates sampled per selection.
    pub candidate_count: u32,
    /// Cost per meter of climb.
    pub up_cost: f64,
    /// Cost per meter of descent.
    pub down_cost: f64,
    /// Flat cost for level movement.
    pub horizontal_cost: f64,
    /// Penalty per meter of clearance deficit below `min_altitude`.
    pub ground_proximity_cost: f64,
    pub min_altitude: f64,
    /// Forward obstacle probe lookahead.
    pub avoidance_distance: f64,
    /// Bearing error (degrees) past which the pilot turns back on target.
    pub max_avoidance_angle_deg: f64,
    pub waypoint_interval: f64,
}

impl Default for WaypointTuning {
    fn default() -> Self {
        Self {
            area_radius: 1000.0,
            candidate_count: 2,
            up_cost: 5.0,
            down_cost: 0.5,
            horizontal_cost: 1.0,
            ground_proximity_cost: 10.0,
            min_altitude: 10.0,
            avoidance_distance: 10.0,
            max_avoidance_angle_deg: 45.0,
            waypoint_interval: 5.0,
        }
    }
}

/// Stationary turret configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretTuning {
    /// Target acquisition range.
    pub range: f64,
    /// Mean firing cooldown (seconds); each turret draws its own within
    /// ±`cooldown_jitter`.
    pub base_cooldown: f64,
    pub cooldown_jitter: f64,
    /// Aim slerp rate toward the lead bearing (per second).
    pub slew_rate: f64,
    pub projectile_speed: f64,
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            range: 3500.0,
            base_cooldown: 1.0,
            cooldown_jitter: 0.5,
            slew_rate: 8.0,
            projectile_speed: 400.0,
        }
    }
}
