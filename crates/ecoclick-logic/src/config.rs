//! Tunable simulation constants, grouped by subsystem.
//!
//! Every field has a default; a JSON file only needs the values it
//! overrides (`#[serde(default)]` throughout).

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::kinds::ResourceKind;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub generation: GenerationConfig,
    pub survival: SurvivalConfig,
    pub movement: MovementConfig,
    /// Units requested per collect action.
    pub collect_amount: u32,
    /// Rolling event log length.
    pub event_log_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            generation: GenerationConfig::default(),
            survival: SurvivalConfig::default(),
            movement: MovementConfig::default(),
            collect_amount: 5,
            event_log_capacity: 20,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config. The result is not
    /// validated; see [`SimConfig::validate`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Check the config, returning all errors found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let world = &self.world;

        if world.chunk_size <= 0 {
            errors.push(ConfigError::ChunkSizeNotPositive(world.chunk_size));
        }
        if world.view_radius < 0 {
            errors.push(ConfigError::NegativeViewRadius(world.view_radius));
        }
        if world.max_chunk_radius < 0 {
            errors.push(ConfigError::NegativeChunkRadius(world.max_chunk_radius));
        }
        if world.chunk_size > 0 && world.max_chunk_radius >= 0 {
            // The far edge of the outermost chunk, plus one step beyond it
            let edge = (i64::from(world.max_chunk_radius) + 1) * i64::from(world.chunk_size);
            if edge > i64::from(i32::MAX) {
                errors.push(ConfigError::WorldTooLarge {
                    chunk_size: world.chunk_size,
                    max_chunk_radius: world.max_chunk_radius,
                });
            } else {
                let limit = world.max_chunk_radius as u32;
                let home = world.spawn.chunk(world.chunk_size);
                if home.cx.unsigned_abs() > limit || home.cy.unsigned_abs() > limit {
                    errors.push(ConfigError::SpawnOutsideWorld(world.spawn));
                }
            }
        }
        if i64::from(world.max_chunk_radius.max(0)) + i64::from(world.view_radius.max(0)) > i64::from(i32::MAX) {
            errors.push(ConfigError::ViewRadiusTooLarge(world.view_radius));
        }

        let gen = &self.generation;
        let in_unit = |t: f32| (0.0..=1.0).contains(&t);
        if !in_unit(gen.primary_threshold)
            || !in_unit(gen.secondary_threshold)
            || gen.primary_threshold > gen.secondary_threshold
        {
            errors.push(ConfigError::ThresholdsInvalid {
                primary: gen.primary_threshold,
                secondary: gen.secondary_threshold,
            });
        }

        errors
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Chunks must hold at least one tile.
    ChunkSizeNotPositive(i32),
    /// View radius below zero.
    NegativeViewRadius(i32),
    /// World radius below zero.
    NegativeChunkRadius(i32),
    /// Tile coordinates of the outermost chunk do not fit in `i32`.
    WorldTooLarge { chunk_size: i32, max_chunk_radius: i32 },
    /// Chunk keys around the world edge do not fit in `i32`.
    ViewRadiusTooLarge(i32),
    /// Spawn tile lies in a chunk that can never be generated.
    SpawnOutsideWorld(Position),
    /// Generation thresholds outside 0..=1 or out of order.
    ThresholdsInvalid { primary: f32, secondary: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ChunkSizeNotPositive(n) => write!(f, "chunk_size must be positive, got {}", n),
            ConfigError::NegativeViewRadius(n) => write!(f, "view_radius must not be negative, got {}", n),
            ConfigError::NegativeChunkRadius(n) => {
                write!(f, "max_chunk_radius must not be negative, got {}", n)
            }
            ConfigError::WorldTooLarge { chunk_size, max_chunk_radius } => write!(
                f,
                "max_chunk_radius {} with chunk_size {} overflows tile coordinates",
                max_chunk_radius, chunk_size
            ),
            ConfigError::ViewRadiusTooLarge(n) => write!(f, "view_radius {} overflows chunk keys", n),
            ConfigError::SpawnOutsideWorld(pos) => write!(f, "spawn {} is outside the world", pos),
            ConfigError::ThresholdsInvalid { primary, secondary } => write!(
                f,
                "thresholds must satisfy 0 <= primary <= secondary <= 1, got {} and {}",
                primary, secondary
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// World layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of a chunk, in tiles.
    pub chunk_size: i32,
    /// Player start tile.
    pub spawn: Position,
    /// Chunks ensured around the player in each direction.
    pub view_radius: i32,
    /// Largest |cx| or |cy| that can be generated.
    pub max_chunk_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            spawn: Position::new(8, 8),
            view_radius: 1,
            max_chunk_radius: 4096,
        }
    }
}

/// Procedural resource placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Draws below this place a node from the weighted pool.
    pub primary_threshold: f32,
    /// Draws below this (and above primary) place a bonus soil node.
    pub secondary_threshold: f32,
    /// Inclusive richness range of primary nodes.
    pub primary_richness: (u32, u32),
    /// Inclusive richness range of bonus soil nodes.
    pub bonus_richness: (u32, u32),
    /// Substitute for a zero chunk seed.
    pub zero_seed: u32,
    /// Guaranteed nodes around spawn: offset from spawn, kind, amount.
    pub spawn_nodes: Vec<SpawnNode>,
}

/// One guaranteed starting node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnNode {
    pub dx: i32,
    pub dy: i32,
    pub kind: ResourceKind,
    pub amount: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            primary_threshold: 0.25,
            secondary_threshold: 0.32,
            primary_richness: (20, 60),
            bonus_richness: (10, 30),
            zero_seed: 0x9E37_79B9,
            spawn_nodes: vec![
                SpawnNode { dx: 2, dy: 0, kind: ResourceKind::Soil, amount: 40 },
                SpawnNode { dx: -2, dy: 0, kind: ResourceKind::Sand, amount: 40 },
                SpawnNode { dx: 0, dy: 2, kind: ResourceKind::Clay, amount: 40 },
                SpawnNode { dx: 0, dy: -2, kind: ResourceKind::Wood, amount: 40 },
                SpawnNode { dx: 2, dy: 2, kind: ResourceKind::ScrapMetal, amount: 30 },
                SpawnNode { dx: -2, dy: -2, kind: ResourceKind::Water, amount: 30 },
            ],
        }
    }
}

/// Player survival rates. Rates are per second of game time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalConfig {
    pub thirst_decay: f32,
    pub auto_drink_below: f32,
    pub drink_restore: f32,
    pub critical_thirst: f32,
    pub health_drain: f32,
    pub energy_decay: f32,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            thirst_decay: 0.5,
            auto_drink_below: 50.0,
            drink_restore: 25.0,
            critical_thirst: 20.0,
            health_drain: 5.0,
            energy_decay: 0.1,
        }
    }
}

/// Path-following cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub tiles_per_second: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { tiles_per_second: 4.0 }
    }
}

impl MovementConfig {
    pub fn step_duration(&self) -> f32 {
        if self.tiles_per_second > 0.0 {
            1.0 / self.tiles_per_second
        } else {
            f32::INFINITY
        }
    }
}
