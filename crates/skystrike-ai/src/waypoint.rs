//! Cost-based waypoint selection and reactive obstacle avoidance.
//!
//! The alternative navigation used by heavier aircraft: instead of a
//! pure random shell point, sample a few candidates and keep the
//! cheapest, where climbing is expensive, descending is cheap, and
//! anything close to the ground pays a proximity penalty.

use glam::DVec3;
use rand::Rng;

use skystrike_core::config::WaypointTuning;

use crate::pilot::random_direction;

/// Cost of the vertical component of a candidate move.
pub fn movement_cost(vertical: f64, tuning: &WaypointTuning) -> f64 {
    if vertical > 0.0 {
        vertical * tuning.up_cost
    } else if vertical < 0.0 {
        -vertical * tuning.down_cost
    } else {
        tuning.horizontal_cost
    }
}

/// Penalty for a candidate sitting too close to the ground.
/// `clearance` is the height above terrain at the candidate, `None`
/// when there is no ground below.
pub fn ground_proximity_cost(clearance: Option<f64>, tuning: &WaypointTuning) -> f64 {
    match clearance {
        Some(clearance) if clearance < tuning.min_altitude => {
            (tuning.min_altitude - clearance) * tuning.ground_proximity_cost
        }
        _ => 0.0,
    }
}

/// Sample `candidate_count` random points around `position` (biased
/// upward, never below) and return the cheapest. `clearance_at` reports
/// ground clearance at a candidate.
pub fn best_waypoint<R, F>(
    position: DVec3,
    tuning: &WaypointTuning,
    clearance_at: F,
    rng: &mut R,
) -> DVec3
where
    R: Rng,
    F: Fn(DVec3) -> Option<f64>,
{
    let mut best = position;
    let mut best_cost = f64::MAX;

    for _ in 0..tuning.candidate_count.max(1) {
        let mut offset = random_direction(rng) * rng.gen_range(0.0..tuning.area_radius);
        offset.z = offset.z.abs();
        let candidate = position + offset;

        let cost = movement_cost(offset.z, tuning) + ground_proximity_cost(clearance_at(candidate), tuning);
        if cost < best_cost {
            best_cost = cost;
            best = candidate;
        }
    }

    best
}

/// Steering direction away from an obstacle ahead: slide along the
/// surface, perpendicular to both our up axis and the surface normal.
pub fn avoidance_direction(up: DVec3, surface_normal: DVec3) -> DVec3 {
    up.cross(surface_normal).normalize_or_zero()
}
