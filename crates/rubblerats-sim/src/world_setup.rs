//! Initial field layout: the starting roster around the base and a scatter
//! of rubble and wall segments across the field.

use std::f64::consts::TAU;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rubblerats_core::components::Obstacle;
use rubblerats_core::config::ScenarioConfig;
use rubblerats_core::constants::*;
use rubblerats_core::enums::ObstacleKind;
use rubblerats_core::error::EntityError;
use rubblerats_core::types::Point;
use rubblerats_probe::ProbeSpawn;

/// Fraction of generated obstacles that are wall segments.
const WALL_FRACTION: f64 = 0.25;

/// Placement attempts per obstacle before it is skipped.
const PLACEMENT_ATTEMPTS: usize = 32;

/// Everything `populate` puts into a fresh engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioLayout {
    pub probes: Vec<ProbeSpawn>,
    pub obstacles: Vec<Obstacle>,
}

/// Base location for a scenario: configured, or the field center.
pub fn base_for(scenario: &ScenarioConfig) -> Point {
    match scenario.base {
        Some((x, y)) => Point::new(x, y),
        None => Point::new(scenario.field_width / 2.0, scenario.field_height / 2.0),
    }
}

/// Probe ids in spawn order: `RAT-01`, `RAT-02`, ...
pub fn probe_id(index: usize) -> String {
    format!("RAT-{:02}", index + 1)
}

/// Lay out the starting roster and obstacles.
pub fn layout(
    scenario: &ScenarioConfig,
    base: Point,
    rng: &mut ChaCha8Rng,
) -> Result<ScenarioLayout, EntityError> {
    let n = scenario.probe_count.max(1) as f64;
    let probes = (0..scenario.probe_count)
        .map(|i| {
            let angle = i as f64 * TAU / n;
            ProbeSpawn {
                id: probe_id(i),
                position: Point::new(
                    base.x + SPAWN_RING_RADIUS * angle.cos(),
                    base.y + SPAWN_RING_RADIUS * angle.sin(),
                ),
                speed: None,
                battery: None,
            }
        })
        .collect();

    let mut obstacles = Vec::with_capacity(scenario.obstacle_count.min(MAX_OBSTACLE_COUNT));
    for _ in 0..scenario.obstacle_count {
        if let Some(obstacle) = scatter_obstacle(scenario, base, rng)? {
            obstacles.push(obstacle);
        }
    }

    Ok(ScenarioLayout { probes, obstacles })
}

/// Random obstacle inside the field that leaves the base area clear.
fn scatter_obstacle(
    scenario: &ScenarioConfig,
    base: Point,
    rng: &mut ChaCha8Rng,
) -> Result<Option<Obstacle>, EntityError> {
    let (kind, (lo, hi)) = if rng.gen_bool(WALL_FRACTION) {
        (ObstacleKind::Wall, WALL_RADIUS_RANGE)
    } else {
        (ObstacleKind::Rubble, RUBBLE_RADIUS_RANGE)
    };
    let radius = rng.gen_range(lo..hi);

    for _ in 0..PLACEMENT_ATTEMPTS {
        let position = Point::new(
            rng.gen_range(0.0..scenario.field_width),
            rng.gen_range(0.0..scenario.field_height),
        );
        if position.distance_to(&base) >= BASE_KEEP_CLEAR + radius {
            return Obstacle::new(position, radius, kind).map(Some);
        }
    }
    Ok(None)
}
