//! Kinematic integration system.
//!
//! Positions advance from velocity each tick. Ballistic projectiles
//! (cannon rounds, bombs) also take gravity here; aircraft handle their
//! own gravity inside the flight model and missiles fly at motor speed.

use hecs::World;

use skystrike_core::components::{Projectile, RigidBody};
use skystrike_core::constants::GRAVITY;

/// Integrate positions for every rigid body.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (body, projectile)) in
        world.query_mut::<(&mut RigidBody, Option<&Projectile>)>()
    {
        if projectile.is_some() {
            body.velocity.z -= GRAVITY * dt;
        }
        body.position += body.velocity * dt;
    }
}
