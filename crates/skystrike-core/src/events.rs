//! Events emitted by the simulation for downstream consumers
//! (rendering, audio, scoring, network replication).

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::SpawnKind;

/// Simulation events produced during a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A cannon round left a muzzle.
    CannonFired { shooter: u64, muzzle_index: usize },
    /// A missile left a tube.
    MissileAway { shooter: u64, tube_index: usize },
    /// A bomb was released.
    BombReleased { shooter: u64 },
    /// A missile detonated; radial impulse was applied around `position`.
    Detonation {
        position: DVec3,
        radius: f64,
        force: f64,
    },
    /// An aircraft crossed into a stall.
    StallEntered { entity: u64 },
    /// An aircraft recovered full pitch authority after a stall.
    StallRecovered { entity: u64 },
    /// A registered target left the simulation.
    TargetDestroyed { entity: u64 },
}

/// Request for the spawn interface: the core asks for an instance, the
/// engine owns creation.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub kind: SpawnKind,
    /// Descriptor identity of the prefab to instantiate.
    pub descriptor: String,
    pub position: DVec3,
    pub rotation: DQuat,
    pub velocity: DVec3,
    /// Entity bits of the shooter, for self-exclusion.
    pub instigator: Option<u64>,
    /// Entity bits of an already-acquired target (missiles).
    pub target: Option<u64>,
    pub lifetime_secs: f64,
}
