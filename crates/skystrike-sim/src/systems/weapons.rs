//! Weapon mount system: weapon switching, convergence aiming, cannon
//! and burst fire, missile launch with target acquisition, bomb release.
//!
//! Firing never creates entities directly; it pushes `SpawnRequest`s the
//! engine materializes at the end of the tick. A mount with missing
//! configuration (no descriptor, no muzzles) logs a warning and skips the
//! shot instead of panicking.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, warn};

use skystrike_core::components::{Controls, Pilot, RigidBody, WeaponMount};
use skystrike_core::config::WeaponTuning;
use skystrike_core::constants::FIRE_THRESHOLD;
use skystrike_core::enums::{PilotKind, SpawnKind, WeaponKind};
use skystrike_core::events::{SimEvent, SpawnRequest};
use skystrike_core::types::forward;

use crate::probe::WorldProbe;
use crate::registry::{select_in_viewport, select_nearest, CameraView, TargetRegistry};

/// Run every weapon mount for one tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &World,
    registry: &TargetRegistry,
    camera: Option<&CameraView>,
    probe: &dyn WorldProbe,
    dt: f64,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    // Snapshot the per-mount inputs first; acquisition below needs free
    // access to the world for target bodies.
    let mut mounts: Vec<(Entity, RigidBody, Controls, PilotKind)> = Vec::new();
    for (entity, (body, _mount, _tuning, controls, pilot)) in world
        .query::<(&RigidBody, &WeaponMount, &WeaponTuning, &Controls, &Pilot)>()
        .iter()
    {
        mounts.push((entity, *body, *controls, pilot.kind));
    }

    for (entity, body, controls, pilot_kind) in mounts {
        let tuning = match world.get::<&WeaponTuning>(entity) {
            Ok(t) => t,
            Err(_) => continue,
        };
        let mut mount = match world.get::<&mut WeaponMount>(entity) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if controls.weapon_switch {
            mount.active = mount.active.next();
            mount.bursting = false;
        }

        tick_cooldowns(&mut mount, dt);
        update_convergence(&mut mount, &body, &tuning, probe);

        let trigger = controls.fire >= FIRE_THRESHOLD;
        match mount.active {
            WeaponKind::Cannon => {
                handle_cannon(entity, &body, &mut mount, &tuning, trigger, spawns, events);
            }
            WeaponKind::Missile => handle_missile(
                world, registry, camera, entity, &body, &mut mount, &tuning, pilot_kind, trigger,
                spawns, events,
            ),
            WeaponKind::Bomb => {
                handle_bomb(entity, &body, &mut mount, &tuning, trigger, spawns, events);
            }
        }
    }
}

fn tick_cooldowns(mount: &mut WeaponMount, dt: f64) {
    if mount.cannon_cooldown > 0.0 {
        mount.cannon_cooldown -= dt;
    }
    if mount.burst_shot_cooldown > 0.0 {
        mount.burst_shot_cooldown -= dt;
    }
    if mount.missile_refire_guard > 0.0 {
        mount.missile_refire_guard -= dt;
    }
    for cooldown in &mut mount.tube_cooldowns {
        if *cooldown > 0.0 {
            *cooldown -= dt;
        }
    }
}

/// Aim point for the cannon muzzles: the first obstacle along the nose,
/// or the configured convergence distance out.
fn update_convergence(
    mount: &mut WeaponMount,
    body: &RigidBody,
    tuning: &WeaponTuning,
    probe: &dyn WorldProbe,
) {
    let fwd = forward(body.rotation);
    let distance = tuning.cannon.convergence_distance;
    mount.convergence_point = match probe.raycast(body.position, fwd, distance) {
        Some(hit) => hit.point,
        None => body.position + fwd * distance,
    };
}

fn handle_cannon(
    entity: Entity,
    body: &RigidBody,
    mount: &mut WeaponMount,
    tuning: &WeaponTuning,
    trigger: bool,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    let cannon = &tuning.cannon;

    if cannon.burst_enabled {
        if trigger && !mount.bursting && mount.cannon_cooldown <= 0.0 {
            mount.bursting = true;
            mount.burst_shots = 0;
            mount.burst_shot_cooldown = 0.0;
        }
        if mount.bursting && mount.burst_shot_cooldown <= 0.0 {
            if fire_round(entity, body, mount, tuning, spawns, events) {
                mount.burst_shots += 1;
                mount.burst_shot_cooldown = cannon.burst_shot_cooldown;
            } else {
                mount.bursting = false;
            }
            if mount.burst_shots >= cannon.shots_per_burst {
                mount.bursting = false;
                mount.cannon_cooldown = cannon.burst_cooldown;
            }
        }
    } else if trigger && mount.cannon_cooldown <= 0.0 && fire_round(entity, body, mount, tuning, spawns, events) {
        mount.cannon_cooldown = cannon.cooldown;
    }
}

/// Spawn one cannon round from the current muzzle, aimed at the
/// convergence point. Returns false when the mount is unconfigured.
fn fire_round(
    entity: Entity,
    body: &RigidBody,
    mount: &mut WeaponMount,
    tuning: &WeaponTuning,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) -> bool {
    let cannon = &tuning.cannon;
    let descriptor = match &cannon.projectile {
        Some(d) => d.clone(),
        None => {
            warn!(entity = entity.to_bits().get(), "cannon has no projectile descriptor");
            return false;
        }
    };
    if cannon.muzzle_offsets.is_empty() {
        warn!(entity = entity.to_bits().get(), "cannon has no muzzle positions");
        return false;
    }

    let index = mount.muzzle_index % cannon.muzzle_offsets.len();
    let muzzle_pos = body.position + body.rotation * cannon.muzzle_offsets[index];
    let aim = (mount.convergence_point - muzzle_pos).normalize_or_zero();
    let aim = if aim.length_squared() < 1e-12 {
        forward(body.rotation)
    } else {
        aim
    };

    spawns.push(SpawnRequest {
        kind: SpawnKind::CannonRound,
        descriptor,
        position: muzzle_pos,
        rotation: skystrike_core::types::look_rotation(aim),
        velocity: aim * cannon.projectile_speed + body.velocity,
        instigator: Some(entity.to_bits().get()),
        target: None,
        lifetime_secs: cannon.projectile_lifetime,
    });
    events.push(SimEvent::CannonFired {
        shooter: entity.to_bits().get(),
        muzzle_index: index,
    });
    mount.muzzle_index = (index + 1) % cannon.muzzle_offsets.len();
    true
}

#[allow(clippy::too_many_arguments)]
fn handle_missile(
    world: &World,
    registry: &TargetRegistry,
    camera: Option<&CameraView>,
    entity: Entity,
    body: &RigidBody,
    mount: &mut WeaponMount,
    tuning: &WeaponTuning,
    pilot_kind: PilotKind,
    trigger: bool,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    if !trigger || mount.missile_refire_guard > 0.0 {
        return;
    }

    let missile = &tuning.missile;
    let descriptor = match &missile.missile {
        Some(d) => d.clone(),
        None => {
            warn!(entity = entity.to_bits().get(), "mount has no missile descriptor");
            return;
        }
    };
    if missile.tube_offsets.is_empty() {
        warn!(entity = entity.to_bits().get(), "mount has no missile tubes");
        return;
    }

    let tube_index = match mount
        .tube_cooldowns
        .iter()
        .position(|&cooldown| cooldown <= 0.0)
    {
        Some(i) => i,
        None => {
            debug!(entity = entity.to_bits().get(), "no missile tube ready");
            return;
        }
    };

    // Acquisition happens at launch. Human pilots lock what sits near the
    // crosshair; AI mounts take the nearest registered body, never
    // themselves.
    let target = match (pilot_kind, camera) {
        (PilotKind::Human, Some(camera)) => select_in_viewport(
            world,
            registry,
            camera,
            body.position,
            missile.acquire_range,
            missile.acquire_viewport,
            Some(entity),
        ),
        _ => select_nearest(world, registry, body.position, missile.acquire_range, Some(entity)),
    };

    let tube_pos = body.position + body.rotation * missile.tube_offsets[tube_index % missile.tube_offsets.len()];
    spawns.push(SpawnRequest {
        kind: SpawnKind::Missile,
        descriptor,
        position: tube_pos,
        rotation: body.rotation,
        velocity: body.velocity,
        instigator: Some(entity.to_bits().get()),
        target: target.map(|t| t.to_bits().get()),
        lifetime_secs: missile.boost_duration + missile.seek_duration + missile.unguided_grace,
    });
    events.push(SimEvent::MissileAway {
        shooter: entity.to_bits().get(),
        tube_index,
    });
    mount.tube_cooldowns[tube_index] = missile.tube_cooldown;
    mount.missile_refire_guard = missile.refire_guard;
}

fn handle_bomb(
    entity: Entity,
    body: &RigidBody,
    mount: &mut WeaponMount,
    tuning: &WeaponTuning,
    trigger: bool,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    if !trigger || mount.cannon_cooldown > 0.0 {
        return;
    }
    let bomb = &tuning.bomb;
    let descriptor = match &bomb.bomb {
        Some(d) => d.clone(),
        None => {
            warn!(entity = entity.to_bits().get(), "mount has no bomb descriptor");
            return;
        }
    };

    // Bombs share the cannon timer, stretched by the release factor.
    mount.cannon_cooldown = tuning.cannon.cooldown * bomb.cooldown_factor;

    spawns.push(SpawnRequest {
        kind: SpawnKind::Bomb,
        descriptor,
        position: body.position + body.rotation * bomb.spawn_offset,
        rotation: body.rotation,
        velocity: body.velocity,
        instigator: Some(entity.to_bits().get()),
        target: None,
        lifetime_secs: bomb.lifetime,
    });
    events.push(SimEvent::BombReleased {
        shooter: entity.to_bits().get(),
    });
}

/// Crosshair lead solution for the active cannon: where the pipper should
/// sit so rounds fired now meet the target.
pub fn crosshair_solution(
    world: &World,
    shooter: Entity,
    target: Entity,
    projectile_speed: f64,
) -> Option<DVec3> {
    let shooter_body = world.get::<&RigidBody>(shooter).ok()?;
    let target_body = world.get::<&RigidBody>(target).ok()?;
    Some(crate::intercept::intercept_lead(
        shooter_body.position,
        shooter_body.velocity,
        projectile_speed,
        target_body.position,
        target_body.velocity,
    ))
}
