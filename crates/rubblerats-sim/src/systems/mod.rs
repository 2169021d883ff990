//! Per-tick systems over the engine's world.
//!
//! Systems are free functions over `&mut World` (or `&World` when read-only)
//! plus whatever engine state they need passed in explicitly.

pub mod field;
pub mod mesh;
pub mod probes;
pub mod snapshot;
