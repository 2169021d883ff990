//! Local repulsion from obstacles and neighboring probes.
//!
//! Nudges are applied one triggering entity at a time, obstacles first and
//! then peers, each distance check seeing the position left by the previous
//! nudge.

use glam::DVec2;

use rubblerats_core::components::Obstacle;
use rubblerats_core::config::ProbeParams;
use rubblerats_core::types::Point;

use crate::probe::PeerFix;

/// What avoidance did to one probe this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AvoidanceResult {
    /// Raw (pre-nudge) distance to the last obstacle that triggered.
    pub ultrasonic: Option<f64>,
    pub obstacle_nudges: u32,
    pub peer_nudges: u32,
}

/// Push `position` out of every obstacle band and peer bubble it is inside.
/// `self_id` is skipped in the peer list.
pub fn steer_clear(
    position: &mut Point,
    self_id: &str,
    obstacles: &[Obstacle],
    peers: &[PeerFix],
    params: &ProbeParams,
) -> AvoidanceResult {
    let mut pos = position.as_dvec2();
    let mut result = AvoidanceResult::default();

    for obstacle in obstacles {
        let offset = pos - obstacle.position.as_dvec2();
        let dist = offset.length();
        if dist < obstacle.radius + params.obstacle_clearance {
            pos += away(offset) * params.obstacle_push;
            result.ultrasonic = Some(dist);
            result.obstacle_nudges += 1;
        }
    }

    for peer in peers {
        if peer.id == self_id {
            continue;
        }
        let offset = pos - peer.position.as_dvec2();
        let dist = offset.length();
        if dist < params.peer_avoid_radius {
            pos += away(offset) * params.peer_push;
            result.peer_nudges += 1;
        }
    }

    *position = pos.into();
    result
}

/// Unit vector along `offset`. Coincident points push along +x.
fn away(offset: DVec2) -> DVec2 {
    DVec2::from_angle(offset.y.atan2(offset.x))
}
