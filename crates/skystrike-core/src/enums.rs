//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Missile guidance lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidanceState {
    /// Fixed-duration boost along the launch axis, no steering.
    #[default]
    Boosting,
    /// Homing on an acquired target within the tracking cone.
    Seeking,
    /// Ballistic flight with no target (never acquired, or dropped after
    /// the seek window); self-destructs after a grace period.
    Unguided,
    /// Terminal state: splash damage applied, instance removed.
    Detonated,
}

/// Selectable weapon on a mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Cannon,
    Missile,
    Bomb,
}

impl WeaponKind {
    /// Cycle order used by the weapon-switch input.
    pub fn next(self) -> Self {
        match self {
            WeaponKind::Cannon => WeaponKind::Missile,
            WeaponKind::Missile => WeaponKind::Bomb,
            WeaponKind::Bomb => WeaponKind::Cannon,
        }
    }
}

/// Who produces the control vector for an aircraft each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotKind {
    Human,
    Ai,
}

/// Entity kind requested through the spawn interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    /// Ballistic cannon round.
    CannonRound,
    /// Guided missile.
    Missile,
    /// Free-fall bomb.
    Bomb,
    /// Detonation visual effect (no dynamics).
    Explosion,
}
