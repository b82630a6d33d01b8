//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world, the RNG, the target
//! registry, and the spawn/despawn buffers. It runs all systems in a
//! fixed order each tick and produces `TickSnapshot`s. Completely
//! headless, so the full engagement loop runs in tests with no renderer
//! or physics backend attached.

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use skystrike_core::components::{
    Controls, Lifetime, Missile, MissileSeeker, Pilot, Projectile, RigidBody, SeekerTarget,
};
use skystrike_core::config::{
    FlightTuning, MissileTuning, PilotTuning, TurretTuning, WaypointTuning, WeaponTuning,
};
use skystrike_core::constants::DT;
use skystrike_core::enums::{PilotKind, SpawnKind};
use skystrike_core::events::{SimEvent, SpawnRequest};
use skystrike_core::state::TickSnapshot;
use skystrike_core::types::SimTime;

use crate::probe::{FlatTerrainProbe, WorldProbe};
use crate::registry::{CameraView, TargetRegistry};
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    registry: TargetRegistry,
    camera: Option<CameraView>,
    probe: Box<dyn WorldProbe>,
    player: Option<Entity>,
    human_controls: Controls,
    spawn_buffer: Vec<SpawnRequest>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            registry: TargetRegistry::new(),
            camera: None,
            probe: Box::new(FlatTerrainProbe::default()),
            player: None,
            human_controls: Controls::default(),
            spawn_buffer: Vec::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Replace the world-geometry probe.
    pub fn set_probe(&mut self, probe: Box<dyn WorldProbe>) {
        self.probe = probe;
    }

    /// Update the camera pose used for viewport target acquisition.
    pub fn set_camera(&mut self, camera: CameraView) {
        self.camera = Some(camera);
    }

    /// Set the player's control vector for the next tick. The
    /// weapon-switch flag is an edge: it is consumed by the tick it
    /// applies to.
    pub fn set_player_controls(&mut self, controls: Controls) {
        self.human_controls = controls.clamped();
    }

    /// Spawn the player aircraft.
    pub fn spawn_player(
        &mut self,
        position: DVec3,
        flight: FlightTuning,
        weapons: WeaponTuning,
    ) -> Entity {
        let entity = world_setup::spawn_player(
            &mut self.world,
            &mut self.registry,
            position,
            glam::DQuat::IDENTITY,
            flight,
            weapons,
        );
        self.player = Some(entity);
        entity
    }

    /// Spawn an AI aircraft. `waypoints` selects cost-based navigation
    /// instead of random patrol.
    pub fn spawn_ai_plane(
        &mut self,
        position: DVec3,
        flight: FlightTuning,
        weapons: WeaponTuning,
        pilot: PilotTuning,
        waypoints: Option<WaypointTuning>,
    ) -> Entity {
        world_setup::spawn_ai_plane(
            &mut self.world,
            &mut self.registry,
            position,
            glam::DQuat::IDENTITY,
            flight,
            weapons,
            pilot,
            waypoints,
        )
    }

    /// Spawn a stationary turret.
    pub fn spawn_turret(&mut self, position: DVec3, tuning: TurretTuning) -> Entity {
        world_setup::spawn_turret(
            &mut self.world,
            &mut self.registry,
            &mut self.rng,
            position,
            tuning,
        )
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> TickSnapshot {
        self.apply_human_controls();

        systems::ai::run_pilots(&mut self.world, self.probe.as_ref(), &mut self.rng, DT);
        systems::ai::run_turrets(
            &mut self.world,
            &self.registry,
            &mut self.rng,
            DT,
            &mut self.spawn_buffer,
            &mut self.events,
        );
        systems::flight::run(&mut self.world, DT, &mut self.events);
        systems::weapons::run(
            &self.world,
            &self.registry,
            self.camera.as_ref(),
            self.probe.as_ref(),
            DT,
            &mut self.spawn_buffer,
            &mut self.events,
        );
        systems::missile::run(
            &mut self.world,
            self.probe.as_ref(),
            DT,
            &mut self.spawn_buffer,
            &mut self.events,
        );
        systems::movement::run(&mut self.world, DT);
        systems::cleanup::run(
            &mut self.world,
            &mut self.registry,
            DT,
            &mut self.despawn_buffer,
            &mut self.events,
        );
        self.process_spawns();

        self.time.advance();
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, events)
    }

    /// Current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the target registry.
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// The player entity, if one was spawned.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Lead point for the player's cannon against `target`, for the
    /// crosshair pipper.
    pub fn crosshair_lead(&self, target: Entity) -> Option<DVec3> {
        let player = self.player?;
        let speed = self
            .world
            .get::<&WeaponTuning>(player)
            .ok()?
            .cannon
            .projectile_speed;
        systems::weapons::crosshair_solution(&self.world, player, target, speed)
    }

    fn apply_human_controls(&mut self) {
        let commanded = self.human_controls;
        for (_entity, (controls, pilot)) in self.world.query_mut::<(&mut Controls, &Pilot)>() {
            if pilot.kind == PilotKind::Human {
                *controls = commanded;
            }
        }
        // Consume the switch edge.
        self.human_controls.weapon_switch = false;
    }

    /// Materialize buffered spawn requests into entities.
    fn process_spawns(&mut self) {
        let requests = std::mem::take(&mut self.spawn_buffer);
        for request in requests {
            let mut body = RigidBody::at(request.position, request.rotation);
            body.velocity = request.velocity;

            match request.kind {
                SpawnKind::CannonRound | SpawnKind::Bomb => {
                    self.world.spawn((
                        body,
                        Projectile,
                        Lifetime {
                            remaining_secs: request.lifetime_secs,
                        },
                    ));
                }
                SpawnKind::Missile => {
                    let tuning = self.missile_tuning_for(request.instigator);
                    let seeker = MissileSeeker::new(tuning.speed, request.velocity);
                    self.world.spawn((
                        body,
                        Missile,
                        seeker,
                        SeekerTarget {
                            entity_bits: request.target,
                        },
                        tuning,
                    ));
                }
                SpawnKind::Explosion => {
                    self.world.spawn((
                        body,
                        Lifetime {
                            remaining_secs: request.lifetime_secs,
                        },
                    ));
                }
            }
        }
    }

    /// Missile tuning inherited from the launching mount, or defaults
    /// when the shooter is already gone.
    fn missile_tuning_for(&self, instigator: Option<u64>) -> MissileTuning {
        let resolved = instigator
            .and_then(Entity::from_bits)
            .and_then(|shooter| self.world.get::<&WeaponTuning>(shooter).ok())
            .map(|tuning| tuning.missile.clone());
        match resolved {
            Some(tuning) => tuning,
            None => {
                warn!("missile spawned without a resolvable mount, using default tuning");
                MissileTuning::default()
            }
        }
    }
}
