//! Intercept prediction math.
//!
//! Pure functions shared by turret aiming, crosshair lead reticles, and
//! missile guidance: closure time against a moving target, the lead
//! position a projectile fired now will reach simultaneously, and the
//! steering direction a constant-speed interceptor should fly.
//! Deterministic given inputs, no side effects.

use glam::DVec3;

use skystrike_core::constants::INTERCEPT_EPSILON;

/// Time until a projectile fired at `projectile_speed` can meet a target
/// at `rel_pos` moving at `rel_vel` (both relative to the shooter).
///
/// Solves `|P + V·t| = s·t` for the smallest non-negative root. Policy
/// for the degenerate cases, in order:
/// - relative velocity near zero: the target is effectively stationary,
///   aim at it directly (t = 0);
/// - leading coefficient `|V|² − s²` near zero: the quadratic collapses
///   to a linear equation, solve it directly and clamp to ≥ 0;
/// - negative discriminant: the target outruns every reachable
///   intercept, return 0;
/// - two real roots: prefer the earliest positive one.
///
/// Never returns a negative time.
pub fn intercept_time(projectile_speed: f64, rel_pos: DVec3, rel_vel: DVec3) -> f64 {
    let vel_sq = rel_vel.length_squared();
    if vel_sq < INTERCEPT_EPSILON {
        return 0.0;
    }

    let a = vel_sq - projectile_speed * projectile_speed;
    let b = 2.0 * rel_vel.dot(rel_pos);
    let c = rel_pos.length_squared();

    if a.abs() < INTERCEPT_EPSILON {
        // Linear: b·t + c = 0.
        return (-c / b).max(0.0);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        let t1 = (-b + sqrt_d) / (2.0 * a);
        let t2 = (-b - sqrt_d) / (2.0 * a);

        if t1 > 0.0 {
            if t2 > 0.0 {
                t1.min(t2)
            } else {
                t1
            }
        } else {
            t2.max(0.0)
        }
    } else if discriminant < 0.0 {
        0.0
    } else {
        (-b / (2.0 * a)).max(0.0)
    }
}

/// Lead position for a shot fired now: where the target will be when a
/// projectile at `shot_speed` arrives. Falls back to the target's
/// current position when no intercept exists.
pub fn intercept_lead(
    shooter_pos: DVec3,
    shooter_vel: DVec3,
    shot_speed: f64,
    target_pos: DVec3,
    target_vel: DVec3,
) -> DVec3 {
    let rel_pos = target_pos - shooter_pos;
    let rel_vel = target_vel - shooter_vel;
    let t = intercept_time(shot_speed, rel_pos, rel_vel);
    target_pos + rel_vel * t
}

/// Unit steering direction for a constant-speed interceptor chasing a
/// moving target. Falls back to pure pursuit (straight at the target)
/// when the target is faster than the interceptor along every course.
pub fn intercept_course(
    target_pos: DVec3,
    target_vel: DVec3,
    interceptor_pos: DVec3,
    interceptor_speed: f64,
) -> DVec3 {
    let to_target = target_pos - interceptor_pos;

    let i_speed_sq = interceptor_speed * interceptor_speed;
    let t_speed_sq = target_vel.length_squared();
    let forward_dot = to_target.dot(target_vel);
    let dist_sq = to_target.length_squared();
    if dist_sq < 1e-9 {
        return to_target.normalize_or_zero();
    }

    let d = forward_dot * forward_dot - dist_sq * (t_speed_sq - i_speed_sq);
    if d < 0.0 {
        return to_target.normalize_or_zero();
    }

    let sqrt_d = d.sqrt();
    let s1 = (-forward_dot - sqrt_d) / dist_sq;
    let s2 = (-forward_dot + sqrt_d) / dist_sq;
    let s = s1.max(s2);

    (to_target * s + target_vel).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stationary_target_time_is_zero() {
        for speed in [1.0, 50.0, 400.0, 10_000.0] {
            let t = intercept_time(speed, DVec3::new(500.0, 200.0, -50.0), DVec3::ZERO);
            assert_eq!(t, 0.0, "stationary target must yield t=0 at speed {speed}");
        }
    }

    #[test]
    fn test_stationary_target_lead_is_current_position() {
        let target_pos = DVec3::new(800.0, 100.0, 40.0);
        let lead = intercept_lead(DVec3::ZERO, DVec3::ZERO, 250.0, target_pos, DVec3::ZERO);
        assert_relative_eq!(lead.x, target_pos.x);
        assert_relative_eq!(lead.y, target_pos.y);
        assert_relative_eq!(lead.z, target_pos.z);
    }

    #[test]
    fn test_head_on_closure() {
        // Target 1000 m out closing at 50 m/s, shot speed 100 m/s:
        // 100t = 1000 - 50t => t = 1000/150.
        let t = intercept_time(
            100.0,
            DVec3::new(1000.0, 0.0, 0.0),
            DVec3::new(-50.0, 0.0, 0.0),
        );
        assert_relative_eq!(t, 1000.0 / 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_never_negative() {
        // Every geometry must clamp to t >= 0, including targets that
        // outrun the shot entirely.
        let cases = [
            (10.0, DVec3::new(100.0, 0.0, 0.0), DVec3::new(50.0, 0.0, 0.0)),
            (100.0, DVec3::new(0.0, 500.0, 0.0), DVec3::new(200.0, 0.0, 0.0)),
            (300.0, DVec3::new(-40.0, 90.0, 10.0), DVec3::new(5.0, -3.0, 1.0)),
            (1.0, DVec3::new(1.0, 1.0, 1.0), DVec3::new(-10.0, 4.0, 2.0)),
        ];
        for (s, p, v) in cases {
            assert!(intercept_time(s, p, v) >= 0.0);
        }
    }

    #[test]
    fn test_time_decreases_with_shot_speed() {
        // Receding target: faster shots must catch it strictly sooner.
        let rel_pos = DVec3::new(1000.0, 0.0, 0.0);
        let rel_vel = DVec3::new(30.0, 0.0, 0.0);
        let mut last = f64::MAX;
        for speed in [60.0, 120.0, 240.0, 480.0, 2000.0] {
            let t = intercept_time(speed, rel_pos, rel_vel);
            assert!(t > 0.0);
            assert!(t < last, "t should fall as shot speed rises");
            last = t;
        }
        // As s -> infinity the intercept approaches instantaneous.
        assert!(intercept_time(1e9, rel_pos, rel_vel) < 1e-5);
    }

    #[test]
    fn test_unreachable_target_returns_zero() {
        // Target receding at twice the shot speed directly away.
        let t = intercept_time(
            50.0,
            DVec3::new(200.0, 0.0, 0.0),
            DVec3::new(100.0, 0.0, 0.0),
        );
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_degenerate_linear_case() {
        // Relative speed equals shot speed: leading coefficient ~ 0,
        // crossing target still has a finite linear solution.
        let speed = 100.0;
        let rel_pos = DVec3::new(0.0, 400.0, 0.0);
        let rel_vel = DVec3::new(0.0, -100.0, 0.0);
        let t = intercept_time(speed, rel_pos, rel_vel);
        // b = 2*(-100*400) = -80000, c = 160000 => t = 2.0
        assert_relative_eq!(t, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lead_is_ahead_of_crossing_target() {
        // Target north of the shooter moving east: the lead point must be
        // east of the target's current position.
        let target_pos = DVec3::new(0.0, 600.0, 0.0);
        let target_vel = DVec3::new(80.0, 0.0, 0.0);
        let lead = intercept_lead(DVec3::ZERO, DVec3::ZERO, 300.0, target_pos, target_vel);
        assert!(lead.x > target_pos.x);
        assert_relative_eq!(lead.y, target_pos.y);
    }

    #[test]
    fn test_lead_accounts_for_shooter_velocity() {
        // Shooter pacing the target exactly: zero relative velocity, so
        // the lead collapses to the target's current position.
        let vel = DVec3::new(120.0, 0.0, 0.0);
        let target_pos = DVec3::new(0.0, 500.0, 0.0);
        let lead = intercept_lead(DVec3::ZERO, vel, 300.0, target_pos, vel);
        assert_relative_eq!(lead.x, target_pos.x, epsilon = 1e-9);
        assert_relative_eq!(lead.y, target_pos.y, epsilon = 1e-9);
    }

    #[test]
    fn test_course_converges_on_crossing_target() {
        // Fly the computed course at constant speed; distance to a
        // crossing target must shrink to near zero.
        let dt = 0.02;
        let speed = 200.0;
        let mut me = DVec3::ZERO;
        let mut target = DVec3::new(0.0, 1500.0, 100.0);
        let target_vel = DVec3::new(60.0, 0.0, 0.0);

        let mut min_range = f64::MAX;
        for _ in 0..2000 {
            let dir = intercept_course(target, target_vel, me, speed);
            me += dir * speed * dt;
            target += target_vel * dt;
            min_range = min_range.min(me.distance(target));
            if min_range < 10.0 {
                break;
            }
        }
        assert!(
            min_range < 10.0,
            "course should converge, min range {min_range:.1} m"
        );
    }

    #[test]
    fn test_course_falls_back_to_pursuit_when_outrun() {
        let target = DVec3::new(0.0, 1000.0, 0.0);
        let target_vel = DVec3::new(0.0, 500.0, 0.0);
        let dir = intercept_course(target, target_vel, DVec3::ZERO, 100.0);
        // Pure pursuit: straight at the target's current position.
        assert_relative_eq!(dir.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(dir.y, 1.0, epsilon = 1e-9);
    }
}
