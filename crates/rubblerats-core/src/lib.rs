//! Core types and definitions for the RUBBLE RATS swarm simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, tunable parameters, driver commands, events,
//! snapshots, errors and constants. It has no runtime logic of its own.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
