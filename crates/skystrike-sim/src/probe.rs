//! World geometry queries behind a trait.
//!
//! Systems that need rays or swept volumes (missile obstacle detonation,
//! convergence aiming, AI terrain avoidance) take a `&dyn WorldProbe`
//! instead of talking to any physics backend directly. The engine owns
//! one probe implementation; tests substitute their own.

use glam::DVec3;

/// Result of a ray or swept-sphere query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Distance from the query origin along the direction.
    pub distance: f64,
    /// World-space hit point.
    pub point: DVec3,
    /// Surface normal at the hit point.
    pub normal: DVec3,
}

/// Geometry queries against static world collision.
pub trait WorldProbe {
    /// Cast a ray from `origin` along `direction` (need not be unit
    /// length) up to `max_distance`. Returns the nearest hit, if any.
    fn raycast(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<ProbeHit>;

    /// Sweep a sphere of `radius` from `origin` along `direction` up to
    /// `max_distance`.
    fn sphere_cast(
        &self,
        origin: DVec3,
        radius: f64,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<ProbeHit>;

    /// Vertical clearance from `position` down to the ground, if the
    /// ground is below within `max_distance`.
    fn ground_clearance(&self, position: DVec3, max_distance: f64) -> Option<f64> {
        self.raycast(position, -DVec3::Z, max_distance)
            .map(|hit| hit.distance)
    }
}

/// Flat ground plane at a fixed height. The default probe: sufficient
/// for open-air engagements and for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FlatTerrainProbe {
    pub ground_z: f64,
}

impl Default for FlatTerrainProbe {
    fn default() -> Self {
        Self { ground_z: 0.0 }
    }
}

impl WorldProbe for FlatTerrainProbe {
    fn raycast(&self, origin: DVec3, direction: DVec3, max_distance: f64) -> Option<ProbeHit> {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 1e-12 || dir.z.abs() < 1e-12 {
            return None;
        }
        let t = (self.ground_z - origin.z) / dir.z;
        if t < 0.0 || t > max_distance {
            return None;
        }
        Some(ProbeHit {
            distance: t,
            point: origin + dir * t,
            normal: DVec3::Z,
        })
    }

    fn sphere_cast(
        &self,
        origin: DVec3,
        radius: f64,
        direction: DVec3,
        max_distance: f64,
    ) -> Option<ProbeHit> {
        // Sweeping a sphere against a plane is a raycast from the sphere
        // surface point nearest the plane.
        let shifted = DVec3::new(origin.x, origin.y, origin.z - radius);
        self.raycast(shifted, direction, max_distance)
    }
}
