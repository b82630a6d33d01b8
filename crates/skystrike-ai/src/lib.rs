//! AI control policies for SKYSTRIKE.
//!
//! Pure decision logic: every policy reads kinematic state plus tuning
//! and produces either a control vector (pilots) or an aim/fire decision
//! (turrets). No ECS access and no world queries happen here; the sim
//! crate bridges world state in and applies the outputs.

pub mod pilot;
pub mod turret;
pub mod waypoint;

#[cfg(test)]
mod tests;
