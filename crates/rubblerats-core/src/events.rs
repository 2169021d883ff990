//! Events emitted by the simulation for UI and telemetry consumers.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Something noteworthy that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SwarmEvent {
    /// Coordinated three-channel alert fired; the probe is now paused.
    Detection {
        probe_id: String,
        position: Point,
        co2: f64,
        microphone: f64,
        thermal: f64,
        tick: u64,
    },
    /// Battery fell below the low threshold; the probe is retracing.
    RetraceStarted {
        probe_id: String,
        battery: f64,
        tick: u64,
    },
    /// Retracing probe reached base and went idle.
    RetraceComplete { probe_id: String, tick: u64 },
    /// A moving probe reached its target.
    TargetReached { probe_id: String, tick: u64 },
    /// A queued driver command could not be applied.
    CommandRejected { reason: String, tick: u64 },
}
