//! Stationary turret aim and fire policy.
//!
//! The sim bridge hands the policy a precomputed lead point for the
//! current target; the policy slews the aim toward it and decides when
//! to shoot. Cooldowns are re-randomized after every shot so batteries
//! of turrets do not fire in lockstep.

use glam::{DQuat, DVec3};
use rand::Rng;

use skystrike_core::config::TurretTuning;
use skystrike_core::types::look_rotation;

/// Persistent turret memory between ticks.
#[derive(Debug, Clone, Copy)]
pub struct TurretState {
    pub aim_rotation: DQuat,
    pub fire_timer: f64,
    /// Current cooldown draw, `base_cooldown` ± jitter.
    pub cooldown: f64,
}

impl TurretState {
    pub fn new<R: Rng>(tuning: &TurretTuning, rng: &mut R) -> Self {
        Self {
            aim_rotation: DQuat::IDENTITY,
            fire_timer: 0.0,
            cooldown: draw_cooldown(tuning, rng),
        }
    }
}

fn draw_cooldown<R: Rng>(tuning: &TurretTuning, rng: &mut R) -> f64 {
    let jitter = tuning.cooldown_jitter;
    if jitter > 0.0 {
        rng.gen_range(tuning.base_cooldown - jitter..tuning.base_cooldown + jitter)
    } else {
        tuning.base_cooldown
    }
    .max(0.05)
}

/// Advance the turret one tick. `lead` is the intercept point for the
/// current target, `None` when nothing is in range. Returns true when
/// the turret should fire along its aim this tick.
pub fn update<R: Rng>(
    state: &mut TurretState,
    position: DVec3,
    lead: Option<DVec3>,
    tuning: &TurretTuning,
    dt: f64,
    rng: &mut R,
) -> bool {
    let lead = match lead {
        Some(lead) => lead,
        None => {
            state.fire_timer = 0.0;
            return false;
        }
    };

    let desired = look_rotation(lead - position);
    let t = (tuning.slew_rate * dt).min(1.0);
    state.aim_rotation = state.aim_rotation.slerp(desired, t).normalize();

    state.fire_timer += dt;
    if state.fire_timer >= state.cooldown {
        state.fire_timer = 0.0;
        state.cooldown = draw_cooldown(tuning, rng);
        return true;
    }
    false
}
