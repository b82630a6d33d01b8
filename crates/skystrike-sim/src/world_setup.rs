//! Entity construction: aircraft and turrets with their component sets.
//!
//! Every combatant spawned here is registered as an attackable target.
//! Projectiles and missiles are never spawned directly; they arrive
//! through the engine's spawn buffer.

use glam::{DQuat, DVec3};
use hecs::{Entity, EntityBuilder, World};
use rand_chacha::ChaCha8Rng;

use skystrike_ai::pilot::PilotState;
use skystrike_ai::turret::TurretState;

use skystrike_core::components::{
    Aircraft, Controls, FlightState, Pilot, RigidBody, Turret, WeaponMount,
};
use skystrike_core::config::{FlightTuning, PilotTuning, TurretTuning, WaypointTuning, WeaponTuning};
use skystrike_core::enums::PilotKind;

use crate::registry::TargetRegistry;

/// Spawn the player-controlled aircraft.
pub fn spawn_player(
    world: &mut World,
    registry: &mut TargetRegistry,
    position: DVec3,
    rotation: DQuat,
    flight: FlightTuning,
    weapons: WeaponTuning,
) -> Entity {
    let tube_count = weapons.missile.tube_offsets.len();
    let entity = world.spawn((
        RigidBody::at(position, rotation),
        Controls::default(),
        Pilot {
            kind: PilotKind::Human,
        },
        FlightState::new(flight.pitch_factor),
        flight,
        WeaponMount::new(tube_count),
        weapons,
        Aircraft,
    ));
    registry.register(entity);
    entity
}

/// Spawn an AI-piloted aircraft. Passing `waypoints` switches the pilot
/// from random patrol to cost-based waypoint navigation with obstacle
/// avoidance.
#[allow(clippy::too_many_arguments)]
pub fn spawn_ai_plane(
    world: &mut World,
    registry: &mut TargetRegistry,
    position: DVec3,
    rotation: DQuat,
    flight: FlightTuning,
    weapons: WeaponTuning,
    pilot: PilotTuning,
    waypoints: Option<WaypointTuning>,
) -> Entity {
    let tube_count = weapons.missile.tube_offsets.len();
    let mut builder = EntityBuilder::new();
    builder.add_bundle((
        RigidBody::at(position, rotation),
        Controls::default(),
        Pilot { kind: PilotKind::Ai },
        FlightState::new(flight.pitch_factor),
        flight,
        WeaponMount::new(tube_count),
        weapons,
        PilotState::default(),
        pilot,
        Aircraft,
    ));
    if let Some(waypoints) = waypoints {
        builder.add(waypoints);
    }
    let entity = world.spawn(builder.build());
    registry.register(entity);
    entity
}

/// Spawn a stationary turret emplacement.
pub fn spawn_turret(
    world: &mut World,
    registry: &mut TargetRegistry,
    rng: &mut ChaCha8Rng,
    position: DVec3,
    tuning: TurretTuning,
) -> Entity {
    let state = TurretState::new(&tuning, rng);
    let entity = world.spawn((
        RigidBody::at(position, DQuat::IDENTITY),
        state,
        tuning,
        Turret,
    ));
    registry.register(entity);
    entity
}
