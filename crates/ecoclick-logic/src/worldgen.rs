//! Deterministic chunk generation and on-demand chunk streaming.
//!
//! Each chunk is generated from a seed derived only from its coordinate,
//! so the world looks the same regardless of the order chunks are
//! discovered in. `ChunkStreamer` tracks which chunks exist, grows the
//! world bounds, and applies the one-time spawn override. Override nodes
//! that fall in a chunk not generated yet wait until that chunk is, so the
//! bounds always line up with chunk edges.

use std::collections::{HashMap, HashSet};

use rand::{Rng, RngCore};

use crate::config::{GenerationConfig, WorldConfig};
use crate::geometry::{Bounds, BoundsTracker, ChunkKey, Position};
use crate::kinds::ResourceKind;
use crate::resources::{InsertPolicy, ResourceField, ResourceNode};

/// Per-axis multipliers for seed mixing. Distinct so (a, b) and (b, a)
/// produce different seeds.
const SEED_MUL_X: u32 = 0x85EB_CA6B;
const SEED_MUL_Y: u32 = 0xC2B2_AE35;

/// Odd increment added to the generator state on every draw.
const GOLDEN_GAMMA: u32 = 0x9E37_79B9;

/// 32-bit seed for a chunk coordinate. Never zero.
pub fn chunk_seed(key: ChunkKey, zero_seed: u32) -> u32 {
    let seed = (key.cx as u32).wrapping_mul(SEED_MUL_X) ^ (key.cy as u32).wrapping_mul(SEED_MUL_Y);
    if seed == 0 {
        if zero_seed == 0 {
            GOLDEN_GAMMA
        } else {
            zero_seed
        }
    } else {
        seed
    }
}

/// Chunk-local splitmix-style generator.
#[derive(Debug, Clone)]
pub struct ChunkRng {
    state: u32,
}

impl ChunkRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn for_chunk(key: ChunkKey, zero_seed: u32) -> Self {
        Self::new(chunk_seed(key, zero_seed))
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // 24 mantissa bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Inclusive integer range, tolerant of a reversed pair.
    pub fn richness(&mut self, range: (u32, u32)) -> u32 {
        let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
        self.gen_range(lo..=hi)
    }
}

impl RngCore for ChunkRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
        z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
        z ^ (z >> 16)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Procedural nodes for one chunk, in raster order (rows of y, then x).
pub fn generate_chunk(key: ChunkKey, chunk_size: i32, cfg: &GenerationConfig) -> Vec<ResourceNode> {
    let mut rng = ChunkRng::for_chunk(key, cfg.zero_seed);
    let pool = ResourceKind::generation_pool();
    let origin = Position::new(key.cx * chunk_size, key.cy * chunk_size);
    let mut nodes = Vec::new();

    for ty in 0..chunk_size {
        for tx in 0..chunk_size {
            let pos = origin.offset(tx, ty);
            let roll = rng.next_f32();
            if roll < cfg.primary_threshold {
                let idx = ((rng.next_f32() * pool.len() as f32) as usize).min(pool.len() - 1);
                let amount = rng.richness(cfg.primary_richness);
                nodes.push(ResourceNode::new(pos, pool[idx], amount));
            } else if roll < cfg.secondary_threshold {
                let amount = rng.richness(cfg.bonus_richness);
                nodes.push(ResourceNode::new(pos, ResourceKind::Soil, amount));
            }
        }
    }
    nodes
}

/// The guaranteed starting nodes around a spawn tile.
pub fn spawn_nodes(spawn: Position, cfg: &GenerationConfig) -> Vec<ResourceNode> {
    cfg.spawn_nodes
        .iter()
        .filter_map(|n| {
            let x = spawn.x.checked_add(n.dx)?;
            let y = spawn.y.checked_add(n.dy)?;
            Some(ResourceNode::new(Position::new(x, y), n.kind, n.amount))
        })
        .collect()
}

/// Result of ensuring a chunk exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensure {
    /// Already generated earlier; nothing changed.
    Present,
    /// Generated now. `bounds_changed` tells callers whether to re-centre.
    Generated { nodes: usize, bounds_changed: bool },
    /// Outside the generatable world.
    OutOfWorld,
}

impl Ensure {
    pub fn is_available(self) -> bool {
        !matches!(self, Ensure::OutOfWorld)
    }
}

/// Tracks generated chunks and world bounds, and streams new chunks
/// into a `ResourceField` on demand.
#[derive(Debug, Clone, Default)]
pub struct ChunkStreamer {
    visited: HashSet<ChunkKey>,
    bounds: BoundsTracker,
    spawn_applied: bool,
    /// Spawn override nodes waiting for their chunk.
    deferred: HashMap<ChunkKey, Vec<ResourceNode>>,
}

impl ChunkStreamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generated(&self, key: ChunkKey) -> bool {
        self.visited.contains(&key)
    }

    pub fn chunk_count(&self) -> usize {
        self.visited.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.bounds()
    }

    pub fn tracker(&self) -> &BoundsTracker {
        &self.bounds
    }

    pub fn spawn_applied(&self) -> bool {
        self.spawn_applied
    }

    pub fn in_world(key: ChunkKey, world: &WorldConfig) -> bool {
        let limit = world.max_chunk_radius.max(0) as u32;
        key.cx.unsigned_abs() <= limit && key.cy.unsigned_abs() <= limit
    }

    /// Generate `key` if it has not been generated yet.
    pub fn ensure(
        &mut self,
        key: ChunkKey,
        field: &mut ResourceField,
        world: &WorldConfig,
        gen: &GenerationConfig,
    ) -> Ensure {
        if !Self::in_world(key, world) {
            return Ensure::OutOfWorld;
        }
        if !self.visited.insert(key) {
            return Ensure::Present;
        }

        let mut written = 0;
        for node in generate_chunk(key, world.chunk_size, gen) {
            if field.insert(node, InsertPolicy::Skip) {
                written += 1;
            }
        }
        let bounds_changed = self.bounds.expand_to(key.tile_rect(world.chunk_size));

        if !self.spawn_applied && world.spawn.chunk(world.chunk_size) == key {
            self.spawn_applied = true;
            for node in spawn_nodes(world.spawn, gen) {
                let home = node.pos.chunk(world.chunk_size);
                if self.visited.contains(&home) {
                    field.insert(node, InsertPolicy::Overwrite);
                    written += 1;
                } else if Self::in_world(home, world) {
                    self.deferred.entry(home).or_default().push(node);
                }
            }
        }
        for node in self.deferred.remove(&key).unwrap_or_default() {
            field.insert(node, InsertPolicy::Overwrite);
            written += 1;
        }

        Ensure::Generated { nodes: written, bounds_changed }
    }

    /// Ensure the chunk containing a tile.
    pub fn ensure_tile(
        &mut self,
        pos: Position,
        field: &mut ResourceField,
        world: &WorldConfig,
        gen: &GenerationConfig,
    ) -> Ensure {
        self.ensure(pos.chunk(world.chunk_size), field, world, gen)
    }

    /// Ensure every chunk within the view radius of a tile.
    /// Returns whether the bounds grew.
    pub fn ensure_around(
        &mut self,
        pos: Position,
        field: &mut ResourceField,
        world: &WorldConfig,
        gen: &GenerationConfig,
    ) -> bool {
        let centre = pos.chunk(world.chunk_size);
        let mut changed = false;
        for key in centre.neighborhood(world.view_radius.max(0)) {
            if let Ensure::Generated { bounds_changed: true, .. } = self.ensure(key, field, world, gen) {
                changed = true;
            }
        }
        changed
    }
}
