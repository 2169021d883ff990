//! Probe update system: runs every probe's tick in roster order and turns
//! what happened into swarm events.
//!
//! Updates are sequential. Each probe's roster entry is refreshed right
//! after it moves, so probes later in the roster avoid where earlier ones
//! ended up this tick, not where they started.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use rubblerats_core::components::Obstacle;
use rubblerats_core::config::ProbeParams;
use rubblerats_core::events::SwarmEvent;
use rubblerats_core::types::Point;
use rubblerats_probe::{PeerFix, Probe, TickContext};

/// Shared inputs for one pass over the roster.
pub struct ProbePass<'a> {
    pub roster: &'a [Entity],
    pub obstacles: &'a [Obstacle],
    pub base: Point,
    pub now_ms: u64,
    /// Tick number stamped on events (the tick being computed).
    pub tick: u64,
    pub params: &'a ProbeParams,
}

/// Update every probe once. Returns the number of detections.
pub fn run(
    world: &mut World,
    pass: &ProbePass<'_>,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SwarmEvent>,
) -> u32 {
    let (live, mut peers): (Vec<Entity>, Vec<PeerFix>) = pass
        .roster
        .iter()
        .filter_map(|&entity| {
            let probe = world.get::<&Probe>(entity).ok()?;
            Some((entity, probe.fix()))
        })
        .unzip();

    let mut detections = 0;
    for (slot, &entity) in live.iter().enumerate() {
        let Ok(mut probe) = world.get::<&mut Probe>(entity) else {
            continue;
        };

        let ctx = TickContext {
            obstacles: pass.obstacles,
            peers: &peers,
            base: pass.base,
            now_ms: pass.now_ms,
            params: pass.params,
        };
        let mut detection = None;
        let report = probe.update(&ctx, rng, |p: &Probe| {
            detection = Some(SwarmEvent::Detection {
                probe_id: p.id().to_string(),
                position: p.position(),
                co2: p.sensors().co2,
                microphone: p.sensors().microphone,
                thermal: p.sensors().thermal,
                tick: pass.tick,
            });
        });

        if let Some(fix) = peers.get_mut(slot) {
            fix.position = probe.position();
        }

        if let Some(event) = detection {
            info!(
                probe = probe.id(),
                x = probe.position().x,
                y = probe.position().y,
                co2 = probe.sensors().co2,
                microphone = probe.sensors().microphone,
                thermal = probe.sensors().thermal,
                "coordinated alert, probe paused"
            );
            detections += 1;
            events.push(event);
        }
        if report.retrace_started {
            warn!(probe = probe.id(), battery = probe.battery(), "low battery, retracing to base");
            events.push(SwarmEvent::RetraceStarted {
                probe_id: probe.id().to_string(),
                battery: probe.battery(),
                tick: pass.tick,
            });
        }
        if report.retrace_complete {
            info!(probe = probe.id(), "retrace complete, probe home");
            events.push(SwarmEvent::RetraceComplete {
                probe_id: probe.id().to_string(),
                tick: pass.tick,
            });
        }
        if report.target_reached {
            debug!(probe = probe.id(), "target reached");
            events.push(SwarmEvent::TargetReached {
                probe_id: probe.id().to_string(),
                tick: pass.tick,
            });
        }
    }
    detections
}
