//! Systems - per-tick logic over the placement field

mod crafting;
mod power;

pub use crafting::*;
pub use power::*;
