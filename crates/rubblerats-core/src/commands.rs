//! Driver commands sent from a controller (UI, script, network bridge)
//! to the simulation.
//!
//! Commands are validated and queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible driver actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DriverCommand {
    // --- Roster ---
    /// Add a probe. Sensors, heading and (unless given) speed and battery
    /// are randomized.
    SpawnProbe {
        id: String,
        x: f64,
        y: f64,
        #[serde(default)]
        speed: Option<f64>,
        #[serde(default)]
        battery: Option<f64>,
    },
    /// Remove a probe from the roster.
    RemoveProbe { id: String },

    // --- Field ---
    /// Place a static obstacle.
    AddObstacle {
        x: f64,
        y: f64,
        radius: f64,
        #[serde(default)]
        kind: ObstacleKind,
    },
    /// Remove every obstacle.
    ClearObstacles,
    /// Move the home point.
    SetBase { x: f64, y: f64 },

    // --- Movement ---
    /// Assign a goal to one probe.
    SetTarget { id: String, x: f64, y: f64 },
    /// Drop a probe's goal; it stops where it is.
    ClearTarget { id: String },
    /// Lay out every eligible probe in a formation around a center point.
    Formation {
        kind: FormationType,
        center_x: f64,
        center_y: f64,
        #[serde(default)]
        spacing: Option<f64>,
    },
    /// Send every eligible probe back to base in RETURNING status.
    RecallAll,

    // --- Status ---
    /// Set a driver-reserved status (IDLE, SCANNING, ALERT, RETURNING).
    Dispatch { id: String, status: ProbeStatus },
    /// Freeze one probe.
    Pause { id: String },
    /// Unfreeze one probe, restoring the status it was paused from.
    Resume { id: String },
    /// Freeze the whole swarm.
    PauseAll,
    /// Unfreeze the whole swarm.
    ResumeAll,
}
