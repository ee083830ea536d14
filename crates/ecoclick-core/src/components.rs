//! ECS components for placed machines.

use ecoclick_logic::geometry::Position;
use ecoclick_logic::kinds::MachineKind;
use serde::{Deserialize, Serialize};

/// Which machine an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine(pub MachineKind);

/// Grid tile the machine occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile(pub Position);

/// Recomputed every tick by the power system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powered(pub bool);

/// Seconds accumulated toward the next produced unit. Only production
/// machines carry one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CraftTimer(pub f32);

/// Read-only view of a placed machine, for renderers and saves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    pub id: MachineKind,
    pub pos: Position,
    pub powered: bool,
    pub craft_timer: Option<f32>,
}
