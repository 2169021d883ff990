//! Error types surfaced to the driver.
//!
//! The per-tick probe update never fails; these cover construction inputs,
//! configuration and driver commands.

use std::path::PathBuf;

use thiserror::Error;

use crate::enums::ProbeStatus;

/// Invalid tunable parameter.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} range is inverted: [{lo}, {hi})")]
    InvertedRange { field: &'static str, lo: f64, hi: f64 },
}

/// Invalid construction input for a probe or an obstacle.
#[derive(Debug, Error, PartialEq)]
pub enum EntityError {
    #[error("probe id must not be empty")]
    EmptyId,
    #[error("position must be finite, got ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },
    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f64),
    #[error("battery must be within [0, 100], got {0}")]
    InvalidBattery(f64),
    #[error("obstacle radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
}

/// Driver-level errors.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid entity: {0}")]
    Entity(#[from] EntityError),
    #[error("a probe with id {0:?} is already in the roster")]
    DuplicateProbeId(String),
    #[error("no probe with id {0:?}")]
    UnknownProbe(String),
    #[error("probe {id:?} cannot go from {from:?} on {trigger}")]
    IllegalTransition {
        id: String,
        from: ProbeStatus,
        trigger: String,
    },
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
