//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Probe operating status. Drives every branch of the per-tick update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeStatus {
    /// Stationary, waiting for a target.
    #[default]
    Idle,
    /// Driver-assigned survey mode; behaves like free movement.
    Scanning,
    /// Heading toward a driver-assigned target.
    Moving,
    /// Driver-assigned alert posture; behaves like free movement.
    Alert,
    /// Driver recall toward base; behaves like free movement.
    Returning,
    /// Low-battery recovery: walking the breadcrumb trail back to base.
    Retracing,
    /// Frozen. Nothing changes until the driver resumes the probe.
    Paused,
}

/// Obstacle category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    #[default]
    Rubble,
    Wall,
}

/// Target layout the driver can assign to the whole swarm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormationType {
    #[default]
    Circle,
    Square,
    Line,
    Wedge,
}

impl ProbeStatus {
    pub const ALL: [ProbeStatus; 7] = [
        ProbeStatus::Idle,
        ProbeStatus::Scanning,
        ProbeStatus::Moving,
        ProbeStatus::Alert,
        ProbeStatus::Returning,
        ProbeStatus::Retracing,
        ProbeStatus::Paused,
    ];

    /// Statuses the driver may set directly through a dispatch.
    pub fn is_dispatchable(self) -> bool {
        matches!(
            self,
            ProbeStatus::Idle | ProbeStatus::Scanning | ProbeStatus::Alert | ProbeStatus::Returning
        )
    }
}
