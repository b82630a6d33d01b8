//! Flight dynamics system.
//!
//! Runs the arcade flight model once per tick for every aircraft:
//! throttle accumulation, mass/drag scaling, thrust and control torque,
//! a simplified lift equation, optional velocity alignment, stall and
//! dive handling, then the velocity cap. Pure per-entity math in
//! `step`, ECS iteration plus event emission in `run`.

use glam::{DQuat, DVec3};
use hecs::World;

use skystrike_core::components::{Aircraft, Controls, FlightState, RigidBody};
use skystrike_core::config::FlightTuning;
use skystrike_core::constants::{
    AUTO_PITCH_REFERENCE_SPEED, GRAVITY, IDLE_GLIDE_DRAG, LIFT_REFERENCE_SPEED,
};
use skystrike_core::events::SimEvent;
use skystrike_core::types::{clamp01, forward, lerp, up};

/// Per-tick lerp rate toward the ramped dive multiplier.
const DIVE_RAMP_RATE: f64 = 0.125;
/// Per-tick lerp rate back toward neutral when not diving.
const DIVE_RELAX_RATE: f64 = 0.5;

/// Advance one aircraft by one tick of the flight model.
///
/// Mutates the body and flight state in place; `controls` are already
/// clamped by the pilot source.
pub fn step(
    body: &mut RigidBody,
    state: &mut FlightState,
    tuning: &FlightTuning,
    controls: &Controls,
    dt: f64,
) {
    // 1. Throttle accumulation and the throttle-derived parameters.
    state.throttle =
        (state.throttle + controls.throttle * tuning.throttle_change_speed * dt).clamp(0.0, 100.0);
    let throttle_frac = state.throttle / 100.0;

    if state.throttle <= 0.0 && controls.throttle < 0.0 {
        // Idle glide: back pressure on a bottomed-out throttle slicks the
        // airframe and raises the lift ceiling.
        body.drag = lerp(tuning.drag_low_throttle, IDLE_GLIDE_DRAG, controls.throttle.abs());
        state.lift_ceiling = tuning.glide_lift_ceiling;
    } else {
        body.drag = lerp(tuning.drag_low_throttle, tuning.drag_high_throttle, throttle_frac);
        state.lift_ceiling = tuning.normal_lift_ceiling;
    }
    body.mass = lerp(tuning.mass_low_throttle, tuning.mass_high_throttle, throttle_frac);

    let fwd = forward(body.rotation);
    let fwd_speed = body.velocity.dot(fwd);

    // 2. Thrust and control torque.
    let dive_scale = if tuning.dive_thrust_scaling {
        state.dive_speed
    } else {
        1.0
    };
    let thrust = dive_scale * state.throttle * tuning.thrust_multiplier;
    body.velocity += fwd * (thrust / body.mass) * dt;

    // Speed-proportional nose-drop bias, scaled by the (stall-degraded)
    // pitch factor.
    let auto_pitch = lerp(0.0, -1.0, fwd_speed / AUTO_PITCH_REFERENCE_SPEED) * state.pitch_factor;
    let torque = DVec3::new(
        (controls.pitch + auto_pitch) * tuning.pitch_multiplier,
        controls.roll * tuning.roll_multiplier,
        -controls.yaw * tuning.yaw_multiplier,
    );
    body.angular_velocity += torque * dt;
    body.angular_velocity *= 1.0 / (1.0 + tuning.angular_damping * dt);
    let ang_speed = body.angular_velocity.length();
    if ang_speed > tuning.max_angular_speed {
        body.angular_velocity *= tuning.max_angular_speed / ang_speed;
    }
    body.rotation =
        (body.rotation * DQuat::from_scaled_axis(body.angular_velocity * dt)).normalize();

    // 3. Lift.
    let lift_coeff = lerp(
        0.0,
        state.lift_ceiling,
        body.velocity.length() / LIFT_REFERENCE_SPEED,
    );
    let weight = body.mass * GRAVITY;
    let mut lift_magnitude =
        tuning.lift_multiplier * tuning.air_density * fwd_speed * fwd_speed * tuning.wing_area
            * lift_coeff;
    let speed_factor = clamp01((fwd_speed - tuning.min_lift_speed) / tuning.min_lift_speed);
    lift_magnitude = lift_magnitude.min(weight) * speed_factor;
    state.lift_force = up(body.rotation) * lift_magnitude;
    body.velocity += state.lift_force / body.mass * dt;

    // 4. Gravity and drag.
    body.velocity.z -= GRAVITY * dt;
    body.velocity *= (1.0 - body.drag * dt).max(0.0);

    // 5. Velocity alignment: blend velocity onto the nose so turns carry
    // the flight path with them.
    if tuning.align_velocity {
        let sufficient = state.lift_force.length() / tuning.lift_sufficiency_divisor >= weight;
        let rate = if sufficient {
            tuning.max_alignment_rate
        } else {
            tuning.min_alignment_rate
        };
        body.velocity = body.velocity.lerp(fwd * fwd_speed, rate);
    }

    // 6. Stall and dive, keyed off how steeply the nose points up.
    let pitch_angle = forward(body.rotation).z;

    if pitch_angle > tuning.stall_angle {
        let bleed = lerp(
            0.0,
            tuning.stall_speed_loss,
            clamp01((pitch_angle - tuning.stall_angle) / tuning.stall_angle),
        );
        body.velocity *= 1.0 - bleed;
        state.stalling = true;
        state.diving = false;
        if pitch_angle > tuning.critical_stall_angle {
            state.stall_timer += dt;
            if state.stall_timer > tuning.stall_time_threshold {
                state.pitch_factor -= tuning.pitch_decay_rate * dt;
            }
        }
    } else {
        state.stall_timer -= tuning.stall_recovery_rate * dt;
        if state.stall_timer < 0.0 {
            state.stall_timer = 0.0;
            state.pitch_factor = state.initial_pitch_factor;
            state.stalling = false;
        }
    }

    if pitch_angle <= tuning.dive_angle {
        state.pitch_factor = 0.0;
        state.diving = true;
        state.stalling = false;
        let dive_accel = ((pitch_angle - tuning.dive_angle) / tuning.dive_angle + 6.0) / 2.0;
        state.dive_speed =
            lerp(state.dive_speed, dive_accel, DIVE_RAMP_RATE * dt).clamp(1.0, 4.0);
    } else {
        state.diving = false;
        state.dive_speed = lerp(state.dive_speed, 1.0, DIVE_RELAX_RATE * dt);
    }

    // 7. Velocity cap.
    let speed = body.velocity.length();
    if speed > tuning.max_velocity {
        body.velocity *= tuning.max_velocity / speed;
    }
}

/// Run the flight model for every aircraft and emit stall transitions.
pub fn run(world: &mut World, dt: f64, events: &mut Vec<SimEvent>) {
    for (entity, (body, state, tuning, controls, _aircraft)) in world.query_mut::<(
        &mut RigidBody,
        &mut FlightState,
        &FlightTuning,
        &Controls,
        &Aircraft,
    )>() {
        let was_stalling = state.stalling;
        step(body, state, tuning, controls, dt);
        if state.stalling && !was_stalling {
            events.push(SimEvent::StallEntered {
                entity: entity.to_bits().get(),
            });
        } else if was_stalling && !state.stalling {
            events.push(SimEvent::StallRecovered {
                entity: entity.to_bits().get(),
            });
        }
    }
}
