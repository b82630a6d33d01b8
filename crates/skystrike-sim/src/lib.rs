//! Simulation engine for SKYSTRIKE.
//!
//! Owns the hecs ECS world, runs the flight, weapon, guidance, and AI
//! bridge systems at a fixed tick rate, and produces TickSnapshots for
//! downstream consumers.

pub mod engine;
pub mod intercept;
pub mod probe;
pub mod registry;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use skystrike_core as core;
