//! Swarm state snapshot: the complete visible state handed to renderers
//! and telemetry after each tick.

use serde::{Deserialize, Serialize};

use crate::components::{Gyroscope, Obstacle, Sensors};
use crate::enums::ProbeStatus;
use crate::events::SwarmEvent;
use crate::types::{Point, SimTime};

/// Complete swarm state after a tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmSnapshot {
    pub time: SimTime,
    pub base: Point,
    /// Probes in roster (spawn) order.
    pub probes: Vec<ProbeView>,
    pub obstacles: Vec<Obstacle>,
    /// Events raised since the previous snapshot.
    pub events: Vec<SwarmEvent>,
    pub stats: SwarmStats,
}

/// One probe as seen by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeView {
    pub id: String,
    pub position: Point,
    pub target: Option<Point>,
    pub battery: f64,
    pub status: ProbeStatus,
    pub sensors: Sensors,
    pub gyro: Gyroscope,
    /// Heading (radians).
    pub heading: f64,
    pub speed: f64,
    /// Breadcrumb trail, oldest first.
    pub path: Vec<Point>,
    pub low_battery_latched: bool,
    pub mesh_neighbors: Vec<String>,
}

/// Aggregate counters for status bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmStats {
    pub probe_count: u32,
    pub moving: u32,
    pub paused: u32,
    pub retracing: u32,
    pub mean_battery: f64,
    /// Detections since the engine was created.
    pub detections_total: u32,
}
