//! ecology.click Core - Simulation Engine
//!
//! Owns the live world of a single-player colony-building game: the
//! streamed resource field, the player's inventory and vitals, the build
//! queue, and the machines placed on the grid.
//!
//! # Architecture
//!
//! Pure rules live in `ecoclick-logic`. This crate wires them together:
//! - **Placement field**: machines are `hecs` entities indexed by tile
//! - **Systems**: power and crafting run over the placement field each tick
//! - **Engine**: fixed tick order (power, crafting, survival, build queue,
//!   movement) plus the player intents a front end sends
//! - **Persistence**: placed machines and inventory, as JSON or bincode
//!
//! # Example
//!
//! ```rust,no_run
//! use ecoclick_core::prelude::*;
//! use ecoclick_logic::geometry::Direction;
//!
//! let mut engine = GameEngine::default();
//! engine.step(Direction::Right);
//!
//! loop {
//!     engine.tick(1.0 / 60.0);
//! }
//! ```

pub mod components;
pub mod engine;
pub mod events;
pub mod persistence;
pub mod placement;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{GameEngine, InteractionMode, PointerResult};
    pub use crate::events::SimEvent;
}
