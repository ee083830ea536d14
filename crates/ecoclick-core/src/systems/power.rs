//! Power system - recompute every machine's powered flag from adjacency

use crate::components::{Machine, Powered, Tile};
use ecoclick_logic::power::propagate;
use hecs::World;

/// Full stateless recompute from a snapshot of every machine, so the
/// write pass never reads flags it is writing.
pub fn power_system(world: &mut World) {
    let (entities, machines): (Vec<_>, Vec<_>) = world
        .query::<(&Machine, &Tile)>()
        .iter()
        .map(|(entity, (machine, tile))| (entity, (tile.0, machine.0.is_power_source())))
        .unzip();

    for (entity, flag) in entities.into_iter().zip(propagate(&machines)) {
        if let Ok(mut powered) = world.get::<&mut Powered>(entity) {
            powered.0 = flag;
        }
    }
}

/// Count machines currently powered.
pub fn powered_count(world: &World) -> usize {
    world
        .query::<&Powered>()
        .iter()
        .filter(|(_, powered)| powered.0)
        .count()
}
