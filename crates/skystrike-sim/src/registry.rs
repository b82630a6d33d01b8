//! Target registry and acquisition.
//!
//! Entities register on spawn and are removed on destruction. Queries
//! tolerate stale entries: anything that no longer resolves in the ECS
//! world is skipped, never dereferenced. Selection comes in two modes:
//! viewport-scored (player aiming aids) and nearest-with-body (turret
//! and missile auto-targeting, no camera involved).

use glam::{DQuat, DVec2, DVec3};
use hecs::{Entity, World};

use skystrike_core::components::RigidBody;

/// Shared registry of attackable entities.
#[derive(Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<Entity>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target. Duplicate registrations are ignored.
    pub fn register(&mut self, entity: Entity) {
        if !self.targets.contains(&entity) {
            self.targets.push(entity);
        }
    }

    /// Remove a target. Unknown entities are ignored.
    pub fn remove(&mut self, entity: Entity) {
        self.targets.retain(|&e| e != entity);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.targets.iter().copied()
    }

    /// Drop entries that no longer resolve in the world.
    pub fn prune(&mut self, world: &World) {
        self.targets.retain(|&e| world.contains(e));
    }
}

/// Camera pose used to project targets into viewport space for the
/// viewport-scored acquisition mode. Passed by reference rather than
/// looked up through a process-wide singleton.
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Width / height.
    pub aspect: f64,
}

impl CameraView {
    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self {
            position,
            rotation,
            fov_y: 60f64.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }

    /// Project a world point into viewport coordinates ([0,1]² with
    /// (0.5, 0.5) at center). Returns `None` for points behind the
    /// camera.
    pub fn world_to_viewport(&self, world: DVec3) -> Option<DVec2> {
        let cam_space = self.rotation.inverse() * (world - self.position);
        // +Y is the view direction in camera space.
        if cam_space.y <= 1e-6 {
            return None;
        }
        let half_h = (self.fov_y * 0.5).tan();
        let x = cam_space.x / (cam_space.y * half_h * self.aspect);
        let z = cam_space.z / (cam_space.y * half_h);
        Some(DVec2::new(0.5 + 0.5 * x, 0.5 + 0.5 * z))
    }

    /// Whether a viewport point lies within `threshold` of center on
    /// both axes.
    pub fn in_viewport(point: DVec2, threshold: f64) -> bool {
        (point.x - 0.5).abs() <= threshold && (point.y - 0.5).abs() <= threshold
    }
}

/// Viewport-scored acquisition: among registered targets within
/// `range_threshold` of `origin` that project inside the center box,
/// return the one minimizing `distance + deviation * range_threshold`
/// (closer and more centered wins).
pub fn select_in_viewport(
    world: &World,
    registry: &TargetRegistry,
    camera: &CameraView,
    origin: DVec3,
    range_threshold: f64,
    viewport_threshold: f64,
    excluder: Option<Entity>,
) -> Option<Entity> {
    let mut best: Option<Entity> = None;
    let mut best_score = f64::MAX;

    for entity in registry.iter() {
        if Some(entity) == excluder {
            continue;
        }
        let body = match world.get::<&RigidBody>(entity) {
            Ok(b) => *b,
            Err(_) => continue, // destroyed since registration
        };

        let distance = origin.distance(body.position);
        if distance >= range_threshold {
            continue;
        }

        let viewport = match camera.world_to_viewport(body.position) {
            Some(p) => p,
            None => continue,
        };
        if !CameraView::in_viewport(viewport, viewport_threshold) {
            continue;
        }

        let deviation = viewport.distance(DVec2::new(0.5, 0.5));
        let score = distance + deviation * range_threshold;
        if score < best_score {
            best_score = score;
            best = Some(entity);
        }
    }

    best
}

/// Physics-mode acquisition: nearest registered target within range that
/// carries a dynamics body and is not the excluded entity. Ignores the
/// camera entirely.
pub fn select_nearest(
    world: &World,
    registry: &TargetRegistry,
    origin: DVec3,
    range_threshold: f64,
    excluder: Option<Entity>,
) -> Option<Entity> {
    let mut best: Option<Entity> = None;
    let mut best_distance = range_threshold;

    for entity in registry.iter() {
        if Some(entity) == excluder {
            continue;
        }
        let body = match world.get::<&RigidBody>(entity) {
            Ok(b) => *b,
            Err(_) => continue,
        };

        let distance = origin.distance(body.position);
        if distance < best_distance {
            best_distance = distance;
            best = Some(entity);
        }
    }

    best
}
