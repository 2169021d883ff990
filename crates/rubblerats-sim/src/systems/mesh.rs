//! Mesh neighbor discovery: which probes are within radio range of each
//! other after this tick's movement.

use hecs::{Entity, World};

use rubblerats_core::types::Point;
use rubblerats_probe::Probe;

/// Recompute every probe's neighbor list (sorted ids, self excluded).
pub fn run(world: &mut World, roster: &[Entity], range: f64) {
    let fixes: Vec<(Entity, String, Point)> = roster
        .iter()
        .filter_map(|&entity| {
            let probe = world.get::<&Probe>(entity).ok()?;
            Some((entity, probe.id().to_string(), probe.position()))
        })
        .collect();

    for (entity, id, position) in &fixes {
        let mut neighbors: Vec<String> = fixes
            .iter()
            .filter(|(_, other, at)| other != id && position.distance_to(at) <= range)
            .map(|(_, other, _)| other.clone())
            .collect();
        neighbors.sort();
        if let Ok(mut probe) = world.get::<&mut Probe>(*entity) {
            probe.set_mesh_neighbors(neighbors);
        }
    }
}
