//! Fundamental geometric and simulation types.
//!
//! World frame: x = East, y = North, z = Up. Body frame: +Y forward,
//! +Z up, +X right. All quantities are f64; glam's double-precision
//! vector/quaternion types carry position and orientation.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Body-frame forward axis (+Y) rotated into world space.
pub fn forward(rotation: DQuat) -> DVec3 {
    rotation * DVec3::Y
}

/// Body-frame up axis (+Z) rotated into world space.
pub fn up(rotation: DQuat) -> DVec3 {
    rotation * DVec3::Z
}

/// Body-frame right axis (+X) rotated into world space.
pub fn right(rotation: DQuat) -> DVec3 {
    rotation * DVec3::X
}

/// Build a rotation whose forward axis points along `dir` with world-up
/// as the reference up vector. Falls back to identity for a degenerate
/// direction.
pub fn look_rotation(dir: DVec3) -> DQuat {
    let fwd = dir.normalize_or_zero();
    if fwd.length_squared() < 1e-12 {
        return DQuat::IDENTITY;
    }
    // Right-handed basis: right = fwd × up_world gives a left-handed set
    // in this frame, so derive right from world-up first.
    let mut right = fwd.cross(DVec3::Z).normalize_or_zero();
    if right.length_squared() < 1e-12 {
        // Looking straight up/down; pick an arbitrary horizontal right.
        right = DVec3::X;
    }
    let up = right.cross(fwd);
    DQuat::from_mat3(&glam::DMat3::from_cols(right, fwd, up))
}

/// Linear interpolation with the parameter clamped to [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Clamp a scalar to [0, 1].
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Smallest signed difference between two angles in degrees, in
/// (-180, 180].
pub fn delta_angle_deg(current: f64, target: f64) -> f64 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Rotate vector `from` toward `to` by at most `max_radians`, preserving
/// the magnitude of `from`. Degenerate inputs return `from` unchanged.
pub fn rotate_towards(from: DVec3, to: DVec3, max_radians: f64) -> DVec3 {
    let from_len = from.length();
    let to_len = to.length();
    if from_len < 1e-9 || to_len < 1e-9 {
        return from;
    }

    let from_dir = from / from_len;
    let to_dir = to / to_len;
    let angle = from_dir.dot(to_dir).clamp(-1.0, 1.0).acos();
    if angle <= max_radians || angle < 1e-9 {
        return to_dir * from_len;
    }

    let axis = from_dir.cross(to_dir).normalize_or_zero();
    if axis.length_squared() < 1e-12 {
        // Anti-parallel; any perpendicular axis works.
        let fallback = if from_dir.dot(DVec3::Z).abs() < 0.99 {
            from_dir.cross(DVec3::Z).normalize()
        } else {
            from_dir.cross(DVec3::X).normalize()
        };
        return DQuat::from_axis_angle(fallback, max_radians) * from;
    }

    DQuat::from_axis_angle(axis, max_radians) * from
}

/// Angle between two vectors in radians; zero if either is degenerate.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let denom = a.length() * b.length();
    if denom < 1e-12 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}
