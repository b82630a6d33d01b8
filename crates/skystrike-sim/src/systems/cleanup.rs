//! Cleanup system: expires lifetimes and removes entities that are out
//! of bounds or in a terminal state.

use hecs::{Entity, World};

use skystrike_core::components::{Lifetime, MissileSeeker, RigidBody};
use skystrike_core::constants::WORLD_RADIUS;
use skystrike_core::enums::GuidanceState;
use skystrike_core::events::SimEvent;

use crate::registry::TargetRegistry;

/// Remove expired, out-of-bounds, and detonated entities.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    registry: &mut TargetRegistry,
    dt: f64,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SimEvent>,
) {
    despawn_buffer.clear();

    for (entity, lifetime) in world.query_mut::<&mut Lifetime>() {
        lifetime.remaining_secs -= dt;
        if lifetime.remaining_secs <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;
    for (entity, body) in world.query_mut::<&RigidBody>() {
        if body.position.length_squared() > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    // Detonated missiles had their splash applied by the guidance system
    // this tick; the instance goes now.
    for (entity, seeker) in world.query_mut::<&MissileSeeker>() {
        if seeker.state == GuidanceState::Detonated {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if registry.iter().any(|e| e == entity) {
            events.push(SimEvent::TargetDestroyed {
                entity: entity.to_bits().get(),
            });
        }
        registry.remove(entity);
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DQuat, DVec3};
    use skystrike_core::constants::DT;

    #[test]
    fn test_expired_lifetime_despawns() {
        let mut world = World::new();
        let mut registry = TargetRegistry::new();
        let mut buffer = Vec::new();
        let entity = world.spawn((Lifetime { remaining_secs: DT },));

        let mut events = Vec::new();
        run(&mut world, &mut registry, DT, &mut buffer, &mut events);
        assert!(!world.contains(entity));
        // Unregistered entities despawn without a destruction event.
        assert!(events.is_empty());
    }

    #[test]
    fn test_out_of_bounds_body_despawns_and_leaves_registry() {
        let mut world = World::new();
        let mut registry = TargetRegistry::new();
        let mut buffer = Vec::new();
        let inside = world.spawn((RigidBody::at(DVec3::new(100.0, 0.0, 500.0), DQuat::IDENTITY),));
        let outside = world.spawn((RigidBody::at(
            DVec3::new(WORLD_RADIUS + 1.0, 0.0, 0.0),
            DQuat::IDENTITY,
        ),));
        registry.register(inside);
        registry.register(outside);

        let mut events = Vec::new();
        run(&mut world, &mut registry, DT, &mut buffer, &mut events);
        assert!(world.contains(inside));
        assert!(!world.contains(outside));
        assert_eq!(registry.len(), 1);
        assert!(matches!(
            events.as_slice(),
            [SimEvent::TargetDestroyed { entity }] if *entity == outside.to_bits().get()
        ));
    }

    #[test]
    fn test_detonated_missile_despawns() {
        let mut world = World::new();
        let mut registry = TargetRegistry::new();
        let mut buffer = Vec::new();
        let mut seeker = MissileSeeker::new(180.0, DVec3::ZERO);
        seeker.state = GuidanceState::Detonated;
        let entity = world.spawn((seeker,));

        let mut events = Vec::new();
        run(&mut world, &mut registry, DT, &mut buffer, &mut events);
        assert!(!world.contains(entity));
    }
}
