//! Missile guidance system: the boost / seek / unguided / detonated
//! state machine.
//!
//! Runs collect-then-apply: missile state is read alongside the target
//! bodies first, the new state is computed as plain data, then written
//! back and the detonation impulses applied. No system holds a world
//! borrow across the decision.

use glam::DVec3;
use hecs::{Entity, World};

use skystrike_core::components::{Missile, MissileSeeker, RigidBody, SeekerTarget};
use skystrike_core::config::MissileTuning;
use skystrike_core::enums::{GuidanceState, SpawnKind};
use skystrike_core::events::{SimEvent, SpawnRequest};
use skystrike_core::types::{angle_between, forward, look_rotation, rotate_towards};

use crate::intercept::intercept_course;
use crate::probe::WorldProbe;

struct MissileUpdate {
    entity: Entity,
    seeker: MissileSeeker,
    velocity: DVec3,
    rotation: glam::DQuat,
    clear_target: bool,
    detonation: Option<Detonation>,
}

struct Detonation {
    position: DVec3,
    radius: f64,
    force: f64,
}

/// Advance every in-flight missile by one tick.
pub fn run(
    world: &mut World,
    probe: &dyn WorldProbe,
    dt: f64,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    let mut updates: Vec<MissileUpdate> = Vec::new();

    for (entity, (body, seeker, target, tuning, _missile)) in world
        .query::<(&RigidBody, &MissileSeeker, &SeekerTarget, &MissileTuning, &Missile)>()
        .iter()
    {
        let target_body = target
            .entity_bits
            .and_then(Entity::from_bits)
            .and_then(|t| world.get::<&RigidBody>(t).ok().map(|b| *b));
        updates.push(step(entity, body, seeker, target_body, tuning, probe, dt));
    }

    let mut detonations: Vec<Detonation> = Vec::new();
    for update in updates {
        if let Ok(mut seeker) = world.get::<&mut MissileSeeker>(update.entity) {
            *seeker = update.seeker;
        }
        if let Ok(mut body) = world.get::<&mut RigidBody>(update.entity) {
            body.velocity = update.velocity;
            body.rotation = update.rotation;
        }
        if update.clear_target {
            if let Ok(mut target) = world.get::<&mut SeekerTarget>(update.entity) {
                target.entity_bits = None;
            }
        }
        if let Some(detonation) = update.detonation {
            events.push(SimEvent::Detonation {
                position: detonation.position,
                radius: detonation.radius,
                force: detonation.force,
            });
            spawns.push(SpawnRequest {
                kind: SpawnKind::Explosion,
                descriptor: "explosion".into(),
                position: detonation.position,
                rotation: glam::DQuat::IDENTITY,
                velocity: DVec3::ZERO,
                instigator: Some(update.entity.to_bits().get()),
                target: None,
                lifetime_secs: 1.0,
            });
            detonations.push(detonation);
        }
    }

    // Radial impulse, falling off linearly to zero at the blast edge.
    for detonation in &detonations {
        for (_entity, body) in world.query_mut::<&mut RigidBody>() {
            let offset = body.position - detonation.position;
            let distance = offset.length();
            if distance >= detonation.radius {
                continue;
            }
            let direction = if distance > 1e-9 {
                offset / distance
            } else {
                DVec3::Z
            };
            let impulse = detonation.force * (1.0 - distance / detonation.radius);
            body.velocity += direction * (impulse / body.mass.max(1e-9));
        }
    }
}

/// Compute one missile's next state as pure data.
fn step(
    entity: Entity,
    body: &RigidBody,
    seeker: &MissileSeeker,
    target_body: Option<RigidBody>,
    tuning: &MissileTuning,
    probe: &dyn WorldProbe,
    dt: f64,
) -> MissileUpdate {
    let mut seeker = *seeker;
    let mut velocity = body.velocity;
    let mut rotation = body.rotation;
    let mut clear_target = false;
    let mut detonate = false;

    seeker.state_timer += dt;

    match seeker.state {
        GuidanceState::Boosting => {
            // Launch transient: the motor spools at reduced speed for the
            // first half of the boost, then runs full out. No steering in
            // either half; the shooter's velocity is carried throughout.
            let boosted = forward(rotation) * seeker.speed + seeker.inherited_velocity;
            velocity = if seeker.state_timer < tuning.boost_duration * 0.5 {
                boosted / tuning.boost_speed_divisor
            } else {
                boosted
            };
            if seeker.state_timer >= tuning.boost_duration {
                seeker.state = if target_body.is_some() {
                    GuidanceState::Seeking
                } else {
                    GuidanceState::Unguided
                };
                seeker.state_timer = 0.0;
            }
        }
        GuidanceState::Seeking => match target_body {
            Some(target) => {
                let to_target = target.position - body.position;
                if to_target.length() <= tuning.detonation_radius {
                    detonate = true;
                } else if angle_between(to_target, forward(rotation)).to_degrees()
                    <= tuning.max_cone_angle_deg
                {
                    seeker.out_of_angle_timer = 0.0;
                    let course = intercept_course(
                        target.position,
                        target.velocity,
                        body.position,
                        velocity.length(),
                    );
                    velocity = rotate_towards(
                        velocity,
                        course * seeker.speed + seeker.inherited_velocity,
                        tuning.max_turn_rate * dt,
                    );
                    rotation = look_rotation(velocity);
                } else {
                    seeker.out_of_angle_timer += dt;
                    if seeker.out_of_angle_timer >= tuning.out_of_angle_time {
                        detonate = true;
                    }
                }

                if !detonate && seeker.state_timer >= tuning.seek_duration {
                    // Seeker battery spent: drop the lock, coast on.
                    clear_target = true;
                    seeker.state = GuidanceState::Unguided;
                    seeker.state_timer = 0.0;
                }
            }
            None => {
                // Target destroyed mid-flight.
                clear_target = true;
                seeker.state = GuidanceState::Unguided;
                seeker.state_timer = 0.0;
            }
        },
        GuidanceState::Unguided => {
            if seeker.state_timer >= tuning.unguided_grace {
                detonate = true;
            }
        }
        GuidanceState::Detonated => {}
    }

    // Swept-volume check ahead of the nose once the motor is past boost.
    if !detonate
        && seeker.state != GuidanceState::Boosting
        && seeker.state != GuidanceState::Detonated
        && probe
            .sphere_cast(
                body.position,
                tuning.probe_radius,
                forward(rotation),
                tuning.probe_distance,
            )
            .is_some()
    {
        detonate = true;
    }

    let detonation = if detonate {
        seeker.state = GuidanceState::Detonated;
        Some(Detonation {
            position: body.position,
            radius: tuning.blast_radius,
            force: tuning.explosion_force,
        })
    } else {
        None
    };

    MissileUpdate {
        entity,
        seeker,
        velocity,
        rotation,
        clear_target,
        detonation,
    }
}
