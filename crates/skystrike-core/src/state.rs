//! Tick snapshot: the kinematic state handed to downstream consumers
//! after each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::{GuidanceState, WeaponKind};
use crate::events::SimEvent;
use crate::types::SimTime;

/// Complete per-tick output of the simulation core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub time: SimTime,
    pub bodies: Vec<BodyView>,
    pub missiles: Vec<MissileView>,
    pub events: Vec<SimEvent>,
}

/// Kinematic state of one rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyView {
    /// Opaque entity id (`hecs::Entity::to_bits`).
    pub entity: u64,
    pub position: DVec3,
    pub rotation: DQuat,
    pub velocity: DVec3,
    /// Throttle percentage, if the entity flies under a flight model.
    pub throttle: Option<f64>,
    pub stalling: bool,
    pub diving: bool,
    /// Active weapon, if the entity carries a mount.
    pub active_weapon: Option<WeaponKind>,
}

/// Guidance state of one in-flight missile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissileView {
    pub entity: u64,
    pub position: DVec3,
    pub velocity: DVec3,
    pub state: GuidanceState,
    pub has_target: bool,
}
