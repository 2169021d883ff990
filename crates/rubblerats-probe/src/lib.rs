//! Probe behaviour for RUBBLE RATS.
//!
//! Implements the per-tick probe update: battery drain, sensor drift,
//! coordinated alert, breadcrumb sampling, goal seeking, retrace-to-base
//! and local avoidance. No ECS dependency; it operates on plain data owned
//! by the driver.

pub mod avoidance;
pub mod fsm;
pub mod probe;
pub mod random;
pub mod sensors;
pub mod trail;

pub use probe::{PeerFix, Probe, ProbeSpawn, TickContext, TickReport};
pub use random::RandomSource;
pub use rubblerats_core as core;
