//! Snapshot builder: flattens the ECS world into the serializable
//! per-tick state handed to downstream consumers.

use hecs::World;

use skystrike_core::components::{FlightState, MissileSeeker, RigidBody, SeekerTarget, WeaponMount};
use skystrike_core::events::SimEvent;
use skystrike_core::state::{BodyView, MissileView, TickSnapshot};
use skystrike_core::types::SimTime;

/// Build the complete snapshot for the current tick.
pub fn build_snapshot(world: &World, time: &SimTime, events: Vec<SimEvent>) -> TickSnapshot {
    let mut bodies = Vec::new();
    for (entity, (body, flight, mount)) in world
        .query::<(&RigidBody, Option<&FlightState>, Option<&WeaponMount>)>()
        .iter()
    {
        bodies.push(BodyView {
            entity: entity.to_bits().get(),
            position: body.position,
            rotation: body.rotation,
            velocity: body.velocity,
            throttle: flight.map(|f| f.throttle),
            stalling: flight.map(|f| f.stalling).unwrap_or(false),
            diving: flight.map(|f| f.diving).unwrap_or(false),
            active_weapon: mount.map(|m| m.active),
        });
    }

    let mut missiles = Vec::new();
    for (entity, (body, seeker, target)) in world
        .query::<(&RigidBody, &MissileSeeker, &SeekerTarget)>()
        .iter()
    {
        missiles.push(MissileView {
            entity: entity.to_bits().get(),
            position: body.position,
            velocity: body.velocity,
            state: seeker.state,
            has_target: target.entity_bits.is_some(),
        });
    }

    // Stable ordering for reproducible serialization.
    bodies.sort_by_key(|b| b.entity);
    missiles.sort_by_key(|m| m.entity);

    TickSnapshot {
        time: *time,
        bodies,
        missiles,
        events,
    }
}
