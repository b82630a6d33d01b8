use approx::assert_relative_eq;
use glam::{DQuat, DVec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skystrike_core::components::RigidBody;
use skystrike_core::config::{PilotTuning, TurretTuning, WaypointTuning};
use skystrike_core::constants::DT;
use skystrike_core::types::{forward, look_rotation};

use crate::pilot::{self, PilotContext, PilotState};
use crate::turret::{self, TurretState};
use crate::waypoint;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn context<'a>(body: &'a RigidBody, tuning: &'a PilotTuning) -> PilotContext<'a> {
    PilotContext {
        body,
        tuning,
        player_position: None,
        steer_override: None,
        external_waypoints: false,
        dt: DT,
    }
}

#[test]
fn test_pilot_picks_waypoint_within_altitude_band() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 400.0), DQuat::IDENTITY);
    let mut rng = rng(7);

    for seed_state in 0..20 {
        let mut state = PilotState::default();
        state.waypoint_timer = f64::MAX;
        let _ = seed_state;
        pilot::update(&mut state, &context(&body, &tuning), &mut rng);
        assert!(state.waypoint.z >= tuning.min_altitude);
        assert!(state.waypoint.z <= tuning.max_altitude);
    }
}

#[test]
fn test_pilot_switches_waypoint_when_reached() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(50.0, 50.0, 300.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    let reached = body.position + DVec3::new(5.0, 0.0, 0.0);
    state.waypoint = reached;
    state.waypoint_timer = 0.0;
    state.throttle_timer = 0.0;

    let mut rng = rng(3);
    pilot::update(&mut state, &context(&body, &tuning), &mut rng);
    assert_ne!(state.waypoint, reached, "reached waypoint should be replaced");
    assert_eq!(state.waypoint_timer, 0.0);
}

#[test]
fn test_pilot_yaws_toward_waypoint() {
    let tuning = PilotTuning::default();
    // Facing north, waypoint due east at matching altitude.
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    state.waypoint = DVec3::new(1000.0, 0.0, 300.0);
    state.waypoint_timer = 0.0;
    state.throttle_timer = 0.0;

    let mut rng = rng(11);
    let controls = pilot::update(&mut state, &context(&body, &tuning), &mut rng);
    assert!(controls.yaw > 0.0, "east of the nose should command right yaw");
}

#[test]
fn test_pilot_pitches_toward_higher_waypoint() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 200.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    state.waypoint = DVec3::new(0.0, 500.0, 600.0);
    state.waypoint_timer = 0.0;
    state.throttle_timer = 0.0;

    let mut rng = rng(13);
    let controls = pilot::update(&mut state, &context(&body, &tuning), &mut rng);
    assert!(controls.pitch > 0.0);
}

#[test]
fn test_roll_stabilization_overrides_past_threshold() {
    let tuning = PilotTuning::default();
    // Banked hard right, well past the stabilization threshold.
    let rotation = DQuat::from_axis_angle(DVec3::Y, 70f64.to_radians());
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), rotation);
    let mut state = PilotState::default();
    state.waypoint = DVec3::new(500.0, 500.0, 300.0);
    state.waypoint_timer = 0.0;
    state.throttle_timer = 0.0;

    let mut rng = rng(17);
    let controls = pilot::update(&mut state, &context(&body, &tuning), &mut rng);
    // Right bank commands full left roll.
    assert_relative_eq!(controls.roll, -1.0);
}

#[test]
fn test_pilot_throttle_stays_in_configured_band() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    let mut rng = rng(19);

    for _ in 0..200 {
        let controls = pilot::update(&mut state, &context(&body, &tuning), &mut rng);
        assert!(controls.throttle >= tuning.min_throttle);
        assert!(controls.throttle <= tuning.max_throttle);
    }
}

#[test]
fn test_pilot_is_deterministic_per_seed() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), DQuat::IDENTITY);

    let run = |seed: u64| {
        let mut state = PilotState::default();
        let mut rng = rng(seed);
        (0..100)
            .map(|_| pilot::update(&mut state, &context(&body, &tuning), &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_steer_override_takes_precedence_over_waypoint() {
    let tuning = PilotTuning::default();
    // Facing north, waypoint dead ahead; the override points due east.
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    let held = DVec3::new(0.0, 1_000.0, 300.0);
    state.waypoint = held;
    state.waypoint_timer = 0.0;
    state.throttle_timer = 0.0;

    let mut rng = rng(37);
    let ctx = PilotContext {
        steer_override: Some(DVec3::new(1_000.0, 0.0, 300.0)),
        ..context(&body, &tuning)
    };
    let controls = pilot::update(&mut state, &ctx, &mut rng);
    assert!(controls.yaw > 0.0, "override east of the nose should command right yaw");
    // The override steers this tick only; the waypoint survives.
    assert_eq!(state.waypoint, held);
}

#[test]
fn test_external_waypoints_suppress_random_pick() {
    let tuning = PilotTuning::default();
    let body = RigidBody::at(DVec3::new(0.0, 0.0, 300.0), DQuat::IDENTITY);
    let mut state = PilotState::default();
    let held = DVec3::new(0.0, 2_000.0, 300.0);
    state.waypoint = held;
    // An expired timer would force a random pick otherwise.
    state.waypoint_timer = f64::MAX;
    state.throttle_timer = 0.0;

    let mut rng = rng(41);
    let ctx = PilotContext {
        external_waypoints: true,
        ..context(&body, &tuning)
    };
    pilot::update(&mut state, &ctx, &mut rng);
    assert_eq!(state.waypoint, held, "navigation-owned waypoints must not be replaced");
}

#[test]
fn test_movement_cost_shape() {
    let tuning = WaypointTuning::default();
    assert_relative_eq!(waypoint::movement_cost(10.0, &tuning), 10.0 * tuning.up_cost);
    assert_relative_eq!(
        waypoint::movement_cost(-10.0, &tuning),
        10.0 * tuning.down_cost
    );
    assert_relative_eq!(waypoint::movement_cost(0.0, &tuning), tuning.horizontal_cost);
    // Climbing is strictly more expensive than descending the same span.
    assert!(waypoint::movement_cost(50.0, &tuning) > waypoint::movement_cost(-50.0, &tuning));
}

#[test]
fn test_ground_proximity_penalty() {
    let tuning = WaypointTuning::default();
    assert_relative_eq!(waypoint::ground_proximity_cost(Some(100.0), &tuning), 0.0);
    assert_relative_eq!(waypoint::ground_proximity_cost(None, &tuning), 0.0);
    let penalty = waypoint::ground_proximity_cost(Some(tuning.min_altitude / 2.0), &tuning);
    assert_relative_eq!(
        penalty,
        tuning.min_altitude / 2.0 * tuning.ground_proximity_cost
    );
}

#[test]
fn test_best_waypoint_never_descends_below_start() {
    let tuning = WaypointTuning::default();
    let position = DVec3::new(0.0, 0.0, 500.0);
    let mut rng = rng(5);
    for _ in 0..50 {
        let wp = waypoint::best_waypoint(position, &tuning, |_| Some(1_000.0), &mut rng);
        assert!(wp.z >= position.z);
        assert!(position.distance(wp) <= tuning.area_radius * 1.01);
    }
}

#[test]
fn test_avoidance_direction_is_tangent_to_surface() {
    let up = DVec3::Z;
    let normal = DVec3::X;
    let dir = waypoint::avoidance_direction(up, normal);
    assert_relative_eq!(dir.dot(normal), 0.0, epsilon = 1e-12);
    assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_turret_slews_toward_lead() {
    let tuning = TurretTuning::default();
    let mut rng = rng(23);
    let mut state = TurretState::new(&tuning, &mut rng);
    let position = DVec3::ZERO;
    let lead = DVec3::new(1000.0, 1000.0, 200.0);

    for _ in 0..200 {
        turret::update(&mut state, position, Some(lead), &tuning, DT, &mut rng);
    }
    let aim = forward(state.aim_rotation);
    let want = forward(look_rotation(lead - position));
    assert!(aim.dot(want) > 0.999, "aim should converge on the lead bearing");
}

#[test]
fn test_turret_fires_on_randomized_cadence() {
    let tuning = TurretTuning::default();
    let mut rng = rng(29);
    let mut state = TurretState::new(&tuning, &mut rng);
    assert!(state.cooldown >= tuning.base_cooldown - tuning.cooldown_jitter);
    assert!(state.cooldown <= tuning.base_cooldown + tuning.cooldown_jitter);

    let lead = DVec3::new(500.0, 0.0, 100.0);
    let mut shots = 0;
    let ticks = (20.0 / DT) as usize;
    for _ in 0..ticks {
        if turret::update(&mut state, DVec3::ZERO, Some(lead), &tuning, DT, &mut rng) {
            shots += 1;
        }
    }
    // 20 seconds at roughly one shot per second, jitter included.
    assert!((10..=40).contains(&shots), "got {shots} shots");
}

#[test]
fn test_turret_holds_fire_without_target() {
    let tuning = TurretTuning::default();
    let mut rng = rng(31);
    let mut state = TurretState::new(&tuning, &mut rng);

    for _ in 0..500 {
        assert!(!turret::update(
            &mut state,
            DVec3::ZERO,
            None,
            &tuning,
            DT,
            &mut rng
        ));
    }
    assert_eq!(state.fire_timer, 0.0);
}
