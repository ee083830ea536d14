//! Crafting system - powered production machines turn time into output

use crate::components::{CraftTimer, Machine, Powered, Tile};
use ecoclick_logic::crafting::step_timer;
use ecoclick_logic::geometry::Position;
use ecoclick_logic::inventory::Inventory;
use ecoclick_logic::kinds::{Kind, MachineKind};
use hecs::World;

/// One unit produced this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Produced {
    pub machine: MachineKind,
    pub pos: Position,
    pub output: Kind,
}

/// Advance every production timer and credit output. Must run after
/// `power_system` in the same tick.
pub fn crafting_system(world: &mut World, inventory: &mut Inventory, dt: f32) -> Vec<Produced> {
    let mut produced = Vec::new();
    for (_, (machine, tile, powered, timer)) in
        world.query_mut::<(&Machine, &Tile, &Powered, &mut CraftTimer)>()
    {
        let Some((output, interval)) = machine.0.production() else {
            continue;
        };
        let (next, made) = step_timer(timer.0, powered.0, dt, interval);
        timer.0 = next;
        if made {
            produced.push(Produced { machine: machine.0, pos: tile.0, output });
        }
    }
    for p in &produced {
        inventory.credit(p.output, 1);
    }
    produced
}
