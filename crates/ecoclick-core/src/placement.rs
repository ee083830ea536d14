//! Placement field - machines on the grid, backed by a `hecs` world.
//!
//! A tile index keeps at most one machine per tile. Placing consumes one
//! matching inventory unit; removing returns it.

use std::collections::HashMap;

use ecoclick_logic::geometry::{BoundsTracker, Position};
use ecoclick_logic::inventory::Inventory;
use ecoclick_logic::kinds::{Kind, MachineKind};
use hecs::{Entity, World};

use crate::components::{CraftTimer, Machine, PlacedEntity, Powered, Tile};

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    OutOfBounds(Position),
    Occupied(Position),
    NotInInventory(Kind),
    NotPlaceable(Kind),
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceError::OutOfBounds(pos) => write!(f, "{} is outside the world", pos),
            PlaceError::Occupied(pos) => write!(f, "{} is already occupied", pos),
            PlaceError::NotInInventory(kind) => {
                write!(f, "no {} in inventory", kind.display_name())
            }
            PlaceError::NotPlaceable(kind) => write!(f, "{} cannot be placed", kind.display_name()),
        }
    }
}

impl std::error::Error for PlaceError {}

/// Placed machines.
pub struct PlacementField {
    world: World,
    index: HashMap<Position, Entity>,
}

impl Default for PlacementField {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementField {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    /// Validate and place one machine, debiting one unit of it.
    pub fn place(
        &mut self,
        kind: Kind,
        pos: Position,
        bounds: &BoundsTracker,
        inventory: &mut Inventory,
    ) -> Result<Entity, PlaceError> {
        let machine = kind.as_machine().ok_or(PlaceError::NotPlaceable(kind))?;
        if !bounds.contains(pos) {
            return Err(PlaceError::OutOfBounds(pos));
        }
        if self.is_occupied(pos) {
            return Err(PlaceError::Occupied(pos));
        }
        inventory
            .debit_one(kind, 1)
            .map_err(|_| PlaceError::NotInInventory(kind))?;
        Ok(self.spawn(machine, pos))
    }

    /// Spawn without inventory or bounds checks (save restore).
    /// Returns `None` if the tile is taken.
    pub fn insert_unchecked(&mut self, machine: MachineKind, pos: Position) -> Option<Entity> {
        if self.is_occupied(pos) {
            return None;
        }
        Some(self.spawn(machine, pos))
    }

    fn spawn(&mut self, machine: MachineKind, pos: Position) -> Entity {
        let entity = if machine.production().is_some() {
            self.world
                .spawn((Machine(machine), Tile(pos), Powered(false), CraftTimer(0.0)))
        } else {
            self.world.spawn((Machine(machine), Tile(pos), Powered(false)))
        };
        self.index.insert(pos, entity);
        entity
    }

    /// Remove the machine at `pos`, crediting one unit back.
    ///
    /// An index entry whose entity is already gone is dropped without a
    /// refund.
    pub fn remove(&mut self, pos: Position, inventory: &mut Inventory) -> Option<MachineKind> {
        let entity = *self.index.get(&pos)?;
        let machine = self.world.get::<&Machine>(entity).map(|m| m.0).ok();
        let despawned = self.world.despawn(entity);
        self.index.remove(&pos);
        if let Err(e) = despawned {
            log::warn!("Placement index at {} pointed at a missing entity: {}", pos, e);
            return None;
        }
        let machine = machine?;
        inventory.credit(machine.into(), 1);
        Some(machine)
    }

    pub fn get(&self, pos: Position) -> Option<PlacedEntity> {
        let entity = *self.index.get(&pos)?;
        self.snapshot_of(entity)
    }

    fn snapshot_of(&self, entity: Entity) -> Option<PlacedEntity> {
        let mut query = self
            .world
            .query_one::<(&Machine, &Tile, &Powered, Option<&CraftTimer>)>(entity)
            .ok()?;
        let (machine, tile, powered, timer) = query.get()?;
        Some(PlacedEntity {
            id: machine.0,
            pos: tile.0,
            powered: powered.0,
            craft_timer: timer.map(|t| t.0),
        })
    }

    /// All machines sorted by tile.
    pub fn placed(&self) -> Vec<PlacedEntity> {
        let mut all: Vec<PlacedEntity> = self
            .world
            .query::<(&Machine, &Tile, &Powered, Option<&CraftTimer>)>()
            .iter()
            .map(|(_, (machine, tile, powered, timer))| PlacedEntity {
                id: machine.0,
                pos: tile.0,
                powered: powered.0,
                craft_timer: timer.map(|t| t.0),
            })
            .collect();
        all.sort_by_key(|e| e.pos);
        all
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.index.clear();
    }
}
