//! Static obstacle storage.

use hecs::World;

use rubblerats_core::components::Obstacle;

/// Insertion sequence number, so obstacles are visited in placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementOrder(pub u64);

/// All obstacles in placement order.
pub fn obstacles(world: &World) -> Vec<Obstacle> {
    let mut placed: Vec<(PlacementOrder, Obstacle)> = world
        .query::<(&PlacementOrder, &Obstacle)>()
        .iter()
        .map(|(_, (order, obstacle))| (*order, *obstacle))
        .collect();
    placed.sort_by_key(|(order, _)| *order);
    placed.into_iter().map(|(_, obstacle)| obstacle).collect()
}

/// Despawn every obstacle. Returns how many were removed.
pub fn clear(world: &mut World) -> usize {
    let doomed: Vec<hecs::Entity> = world
        .query::<&Obstacle>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for &entity in &doomed {
        let _ = world.despawn(entity);
    }
    doomed.len()
}
