//! Snapshot system: reads the world and builds a complete SwarmSnapshot.
//!
//! Read-only; it never modifies the world.

use hecs::{Entity, World};

use rubblerats_core::enums::ProbeStatus;
use rubblerats_core::events::SwarmEvent;
use rubblerats_core::state::{ProbeView, SwarmSnapshot, SwarmStats};
use rubblerats_core::types::{Point, SimTime};
use rubblerats_probe::Probe;

use crate::systems::field;

/// Build a SwarmSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    roster: &[Entity],
    base: Point,
    time: &SimTime,
    events: Vec<SwarmEvent>,
    detections_total: u32,
) -> SwarmSnapshot {
    let probes = build_probes(world, roster);
    let stats = build_stats(&probes, detections_total);

    SwarmSnapshot {
        time: *time,
        base,
        probes,
        obstacles: field::obstacles(world),
        events,
        stats,
    }
}

/// Probe views in roster order.
fn build_probes(world: &World, roster: &[Entity]) -> Vec<ProbeView> {
    roster
        .iter()
        .filter_map(|&entity| world.get::<&Probe>(entity).ok().map(|p| view(&p)))
        .collect()
}

pub fn view(probe: &Probe) -> ProbeView {
    ProbeView {
        id: probe.id().to_string(),
        position: probe.position(),
        target: probe.target(),
        battery: probe.battery(),
        status: probe.status(),
        sensors: *probe.sensors(),
        gyro: *probe.gyro(),
        heading: probe.heading(),
        speed: probe.speed(),
        path: probe.path().to_vec(),
        low_battery_latched: probe.low_battery_latched(),
        mesh_neighbors: probe.mesh_neighbors().to_vec(),
    }
}

fn build_stats(probes: &[ProbeView], detections_total: u32) -> SwarmStats {
    let count = |status: ProbeStatus| probes.iter().filter(|p| p.status == status).count() as u32;
    let mean_battery = if probes.is_empty() {
        0.0
    } else {
        probes.iter().map(|p| p.battery).sum::<f64>() / probes.len() as f64
    };

    SwarmStats {
        probe_count: probes.len() as u32,
        moving: count(ProbeStatus::Moving),
        paused: count(ProbeStatus::Paused),
        retracing: count(ProbeStatus::Retracing),
        mean_battery,
        detections_total,
    }
}
