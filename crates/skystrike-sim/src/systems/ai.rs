//! Bridge between the AI policies and the ECS world.
//!
//! AI-piloted aircraft get their `Controls` overwritten each tick by the
//! pilot policy; turrets get target selection plus an intercept lead
//! computed here, then the turret policy slews and decides the shot.
//! Aircraft carrying a `WaypointTuning` component navigate by cost-based
//! waypoint selection with probe-driven obstacle deflection instead of
//! the random patrol pick.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skystrike_ai::pilot::{self, PilotContext, PilotState};
use skystrike_ai::turret::{self, TurretState};
use skystrike_ai::waypoint;

use skystrike_core::components::{Controls, Pilot, RigidBody, Turret};
use skystrike_core::config::{PilotTuning, TurretTuning, WaypointTuning};
use skystrike_core::constants::WAYPOINT_REACHED_RANGE;
use skystrike_core::enums::{PilotKind, SpawnKind};
use skystrike_core::events::{SimEvent, SpawnRequest};
use skystrike_core::types::{forward, rotate_towards, up};

use crate::intercept::intercept_lead;
use crate::probe::WorldProbe;
use crate::registry::{select_nearest, TargetRegistry};

/// Turret rounds outlive their useful flight long enough to cross the
/// engagement range.
const TURRET_ROUND_LIFETIME: f64 = 5.0;

/// Fill in controls for AI pilots.
pub fn run_pilots(world: &mut World, probe: &dyn WorldProbe, rng: &mut ChaCha8Rng, dt: f64) {
    let player_position = find_player_position(world);

    for (_entity, (body, state, tuning, nav, controls, pilot)) in world.query_mut::<(
        &RigidBody,
        &mut PilotState,
        &PilotTuning,
        Option<&WaypointTuning>,
        &mut Controls,
        &Pilot,
    )>() {
        if pilot.kind != PilotKind::Ai {
            continue;
        }

        let mut steer_override = None;
        if let Some(nav) = nav {
            navigate(body, state, nav, probe, rng);
            steer_override = deflect_around_obstacle(body, state, nav, probe);
        }

        let ctx = PilotContext {
            body,
            tuning,
            player_position,
            steer_override,
            external_waypoints: nav.is_some(),
            dt,
        };
        *controls = pilot::update(state, &ctx, rng);
    }
}

/// Cost-based waypoint selection for aircraft carrying `WaypointTuning`.
/// Replaces the waypoint on the configured interval or once reached.
fn navigate(
    body: &RigidBody,
    state: &mut PilotState,
    nav: &WaypointTuning,
    probe: &dyn WorldProbe,
    rng: &mut ChaCha8Rng,
) {
    if state.waypoint_timer < nav.waypoint_interval
        && body.position.distance(state.waypoint) > WAYPOINT_REACHED_RANGE
    {
        return;
    }
    // Only clearance below min_altitude contributes to the cost.
    state.waypoint = waypoint::best_waypoint(
        body.position,
        nav,
        |point| probe.ground_clearance(point, nav.min_altitude),
        rng,
    );
    state.waypoint_timer = 0.0;
}

/// Forward obstacle probe: when something sits inside the lookahead
/// distance, slide the steering target along the surface, deflecting off
/// the waypoint bearing by at most the configured angle.
fn deflect_around_obstacle(
    body: &RigidBody,
    state: &PilotState,
    nav: &WaypointTuning,
    probe: &dyn WorldProbe,
) -> Option<DVec3> {
    let fwd = forward(body.rotation);
    let hit = probe.raycast(body.position, fwd, nav.avoidance_distance)?;
    let deflect = waypoint::avoidance_direction(up(body.rotation), hit.normal);
    if deflect.length_squared() < 1e-12 {
        return None;
    }

    let to_waypoint = state.waypoint - body.position;
    let capped = rotate_towards(
        to_waypoint,
        deflect * to_waypoint.length(),
        nav.max_avoidance_angle_deg.to_radians(),
    );
    Some(body.position + capped)
}

/// Aim and fire every turret.
pub fn run_turrets(
    world: &mut World,
    registry: &TargetRegistry,
    rng: &mut ChaCha8Rng,
    dt: f64,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<SimEvent>,
) {
    // Target selection first; the policy application below wants mutable
    // access to the turret state.
    let mut turrets: Vec<(Entity, DVec3, Option<DVec3>, TurretTuning)> = Vec::new();
    for (entity, (body, _state, tuning, _turret)) in world
        .query::<(&RigidBody, &TurretState, &TurretTuning, &Turret)>()
        .iter()
    {
        let lead = select_nearest(world, registry, body.position, tuning.range, Some(entity))
            .and_then(|target| world.get::<&RigidBody>(target).ok().map(|b| *b))
            .map(|target| {
                intercept_lead(
                    body.position,
                    DVec3::ZERO,
                    tuning.projectile_speed,
                    target.position,
                    target.velocity,
                )
            });
        turrets.push((entity, body.position, lead, tuning.clone()));
    }

    for (entity, position, lead, tuning) in turrets {
        let mut state = match world.get::<&mut TurretState>(entity) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if turret::update(&mut state, position, lead, &tuning, dt, rng) {
            let aim = forward(state.aim_rotation);
            spawns.push(SpawnRequest {
                kind: SpawnKind::CannonRound,
                descriptor: "turret_round".into(),
                position,
                rotation: state.aim_rotation,
                velocity: aim * tuning.projectile_speed,
                instigator: Some(entity.to_bits().get()),
                target: None,
                lifetime_secs: TURRET_ROUND_LIFETIME,
            });
            events.push(SimEvent::CannonFired {
                shooter: entity.to_bits().get(),
                muzzle_index: 0,
            });
        }
    }
}

fn find_player_position(world: &World) -> Option<DVec3> {
    world
        .query::<(&RigidBody, &Pilot)>()
        .iter()
        .find(|(_, (_, pilot))| pilot.kind == PilotKind::Human)
        .map(|(_, (body, _))| body.position)
}
