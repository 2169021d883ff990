//! Simulation driver for RUBBLE RATS.
//!
//! Owns the hecs world, feeds each probe its tick context in roster order,
//! applies driver commands and produces SwarmSnapshots for consumers.

pub mod clock;
pub mod engine;
pub mod formation;
pub mod systems;
pub mod world_setup;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::SwarmEngine;
pub use rubblerats_core as core;

#[cfg(test)]
mod tests;
