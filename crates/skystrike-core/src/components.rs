//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic. Systems in
//! `skystrike-sim` read and mutate them once per tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::{GuidanceState, PilotKind, WeaponKind};

/// Rigid-body kinematic state, owned exclusively by its entity and
/// mutated once per physics tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Linear velocity in world space (m/s).
    pub velocity: DVec3,
    /// Angular velocity in body space (rad/s).
    pub angular_velocity: DVec3,
    /// Mass (kg). Interpolated from throttle by the flight system.
    pub mass: f64,
    /// Linear drag coefficient. Interpolated from throttle.
    pub drag: f64,
}

impl RigidBody {
    pub fn at(position: DVec3, rotation: DQuat) -> Self {
        Self {
            position,
            rotation,
            velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            mass: 1.0,
            drag: 0.0,
        }
    }

    /// Velocity component along the body forward axis (m/s).
    pub fn forward_speed(&self) -> f64 {
        self.velocity.dot(crate::types::forward(self.rotation))
    }
}

/// Normalized control vector, produced fresh each tick by exactly one
/// pilot source and read-only to the flight system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Pitch axis in [-1, 1]; positive pulls the nose up.
    pub pitch: f64,
    /// Yaw axis in [-1, 1].
    pub yaw: f64,
    /// Roll axis in [-1, 1].
    pub roll: f64,
    /// Throttle rate axis in [-1, 1]; accumulates into the persistent
    /// throttle state.
    pub throttle: f64,
    /// Fire axis in [0, 1].
    pub fire: f64,
    /// Weapon-switch edge; true for the tick the input was pressed.
    pub weapon_switch: bool,
}

impl Controls {
    /// Clamp every axis into its documented domain.
    pub fn clamped(self) -> Self {
        Self {
            pitch: self.pitch.clamp(-1.0, 1.0),
            yaw: self.yaw.clamp(-1.0, 1.0),
            roll: self.roll.clamp(-1.0, 1.0),
            throttle: self.throttle.clamp(-1.0, 1.0),
            fire: self.fire.clamp(0.0, 1.0),
            weapon_switch: self.weapon_switch,
        }
    }
}

/// Which source fills in `Controls` for this aircraft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pilot {
    pub kind: PilotKind,
}

/// Persistent flight-model state alongside the immutable `FlightTuning`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightState {
    /// Accumulated throttle in [0, 100].
    pub throttle: f64,
    /// Current pitch-bias factor; degrades during a held critical stall
    /// and resets to `initial_pitch_factor` after recovery.
    pub pitch_factor: f64,
    /// Configured pitch-bias factor the aircraft started with.
    pub initial_pitch_factor: f64,
    /// Seconds accumulated past the critical stall angle.
    pub stall_timer: f64,
    /// Dive thrust multiplier, ramped while past the dive angle.
    pub dive_speed: f64,
    /// Lift ceiling selected by the throttle branch (normal or glide).
    pub lift_ceiling: f64,
    /// Lift force applied last tick (world space), read by the
    /// velocity-alignment step.
    pub lift_force: DVec3,
    pub stalling: bool,
    pub diving: bool,
}

impl FlightState {
    pub fn new(pitch_factor: f64) -> Self {
        Self {
            throttle: 0.0,
            pitch_factor,
            initial_pitch_factor: pitch_factor,
            stall_timer: 0.0,
            dive_speed: 1.0,
            lift_ceiling: 1.0,
            lift_force: DVec3::ZERO,
            stalling: false,
            diving: false,
        }
    }
}

/// Per-mount weapon cooldown state. Reset on fire, decremented otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponMount {
    pub active: WeaponKind,
    /// Cannon (and bomb) cooldown timer (seconds remaining).
    pub cannon_cooldown: f64,
    /// Round-robin muzzle index for the next cannon shot.
    pub muzzle_index: usize,
    /// Shots fired in the current burst.
    pub burst_shots: u32,
    /// Cooldown between shots within a burst.
    pub burst_shot_cooldown: f64,
    /// Whether a burst is currently in progress.
    pub bursting: bool,
    /// Per-tube missile cooldown timers (seconds remaining).
    pub tube_cooldowns: Vec<f64>,
    /// Guard between consecutive missile trigger pulls.
    pub missile_refire_guard: f64,
    /// World point forward rays converge on; muzzles aim here.
    pub convergence_point: DVec3,
}

impl WeaponMount {
    pub fn new(tube_count: usize) -> Self {
        Self {
            active: WeaponKind::default(),
            cannon_cooldown: 0.0,
            muzzle_index: 0,
            burst_shots: 0,
            burst_shot_cooldown: 0.0,
            bursting: false,
            tube_cooldowns: vec![0.0; tube_count],
            missile_refire_guard: 0.0,
            convergence_point: DVec3::ZERO,
        }
    }
}

/// Guidance state owned by one missile instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MissileSeeker {
    pub state: GuidanceState,
    /// Seconds since the current state began.
    pub state_timer: f64,
    /// Seconds the target has been outside the tracking cone.
    pub out_of_angle_timer: f64,
    /// Cruise speed (m/s), set from the launching mount's tuning.
    pub speed: f64,
    /// Shooter velocity at launch, inherited during boost.
    pub inherited_velocity: DVec3,
}

impl MissileSeeker {
    pub fn new(speed: f64, inherited_velocity: DVec3) -> Self {
        Self {
            state: GuidanceState::Boosting,
            state_timer: 0.0,
            out_of_angle_timer: 0.0,
            speed,
            inherited_velocity,
        }
    }
}

/// Link from a missile to its acquired target entity (absent when the
/// missile flies unguided). Stored separately so core stays free of any
/// ECS handle type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeekerTarget {
    /// Opaque entity id as produced by `hecs::Entity::to_bits`.
    pub entity_bits: Option<u64>,
}

/// Remaining lifetime in seconds; the cleanup system despawns the entity
/// when it reaches zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining_secs: f64,
}

/// Marks an entity as a flyable aircraft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aircraft;

/// Marks an entity as a stationary turret emplacement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Turret;

/// Marks an entity as an unguided cannon round or bomb.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;

/// Marks an entity as a guided missile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Missile;
