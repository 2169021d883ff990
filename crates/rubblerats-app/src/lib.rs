//! RUBBLE RATS headless runner.
//!
//! Wires the swarm engine to a fixed-rate loop thread or a stepped,
//! clock-scripted run, and exposes the latest snapshot to the caller.

pub mod game_loop;
pub mod options;
pub mod runner;
pub mod state;

pub use rubblerats_core as core;
