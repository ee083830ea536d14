//! Simulation engine - owns the world state and runs the tick pipeline

use ecoclick_logic::build::{self, BuildError, BuildQueue, BuildableDefinition, CancelError};
use ecoclick_logic::config::{ConfigError, SimConfig};
use ecoclick_logic::geometry::{Bounds, Direction, Position};
use ecoclick_logic::inventory::Inventory;
use ecoclick_logic::kinds::{Kind, MachineKind};
use ecoclick_logic::movement::{facing_for, plan_path, PathFollower};
use ecoclick_logic::resources::{Collection, ResourceField, ResourceNode};
use ecoclick_logic::survival::{self, Player};
use ecoclick_logic::worldgen::ChunkStreamer;

use crate::components::PlacedEntity;
use crate::events::{EventLog, SimEvent};
use crate::persistence::SaveState;
use crate::placement::{PlaceError, PlacementField};
use crate::systems::{crafting_system, power_system, powered_count};

/// What a primary pointer press means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Toggle a machine on the tile.
    #[default]
    Build,
    /// Walk to the tile.
    Move,
}

/// What a pointer press ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResult {
    Placed(MachineKind),
    Removed(MachineKind),
    Refused(PlaceError),
    /// A path of this many tiles was set.
    Walking(usize),
    /// The target is the current tile, or no tile toward it is reachable.
    NoPath,
}

/// Main simulation engine
pub struct GameEngine {
    config: SimConfig,
    player: Player,
    inventory: Inventory,
    resources: ResourceField,
    chunks: ChunkStreamer,
    placement: PlacementField,
    catalog: Vec<BuildableDefinition>,
    queue: BuildQueue,
    path: PathFollower,
    selected: MachineKind,
    log: EventLog,
    pending: Vec<SimEvent>,
    /// Simulation time in seconds since start
    sim_time: f64,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl GameEngine {
    /// Create a world from a checked config. An invalid config is logged
    /// and replaced by the defaults.
    pub fn new(config: SimConfig) -> Self {
        match Self::try_new(config) {
            Ok(engine) => engine,
            Err(errors) => {
                for e in &errors {
                    log::error!("Invalid config: {}", e);
                }
                log::warn!("Falling back to the default config");
                Self::with_config(SimConfig::default())
            }
        }
    }

    /// Create a world, refusing a config that fails validation.
    pub fn try_new(config: SimConfig) -> Result<Self, Vec<ConfigError>> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::with_config(config))
    }

    /// Player at spawn, spawn area generated.
    fn with_config(config: SimConfig) -> Self {
        let spawn = config.world.spawn;
        let log = EventLog::new(config.event_log_capacity);
        let mut engine = Self {
            player: Player::new(spawn),
            inventory: Inventory::new(),
            resources: ResourceField::new(),
            chunks: ChunkStreamer::new(),
            placement: PlacementField::new(),
            catalog: build::default_catalog(),
            queue: BuildQueue::new(),
            path: PathFollower::new(),
            selected: MachineKind::PowerCube,
            log,
            pending: Vec::new(),
            sim_time: 0.0,
            config,
        };
        engine.ensure_around_player();
        log::info!(
            "World created: spawn {}, {} chunks, {} resource nodes",
            spawn,
            engine.chunks.chunk_count(),
            engine.resources.len()
        );
        engine
    }

    /// Advance the simulation by `dt` seconds of game time.
    ///
    /// Order is fixed: power, crafting, survival, build queue, unlocks,
    /// movement.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.sim_time += dt as f64;

        power_system(self.placement.world_mut());

        for p in crafting_system(self.placement.world_mut(), &mut self.inventory, dt) {
            self.emit(SimEvent::Produced { output: p.output, pos: p.pos });
        }

        let report = survival::step(
            &mut self.player,
            &mut self.inventory,
            dt,
            &self.config.survival,
        );
        if report.auto_drank {
            self.emit(SimEvent::AutoDrank { thirst: self.player.thirst });
        }
        if report.died {
            self.emit(SimEvent::Died);
        }

        for done in self.queue.advance(dt, &mut self.inventory) {
            self.emit(SimEvent::BuildCompleted(done.id));
        }

        self.refresh_unlocks();

        self.advance_path(dt);
    }

    fn advance_path(&mut self, dt: f32) {
        let batch = self
            .path
            .advance(dt, self.config.movement.step_duration());
        for tile in batch.steps {
            self.move_player_to(tile);
        }
        if batch.arrived {
            self.collect();
        }
    }

    /// Re-evaluate unlock rules; emits once per newly unlocked entry.
    pub fn refresh_unlocks(&mut self) {
        for id in build::refresh_unlocks(&mut self.catalog, &self.inventory) {
            self.emit(SimEvent::Unlocked(id));
        }
    }

    // ── Player intents ──────────────────────────────────────────────

    /// Move one tile immediately, then try to collect at the destination.
    /// Returns whether the player moved.
    pub fn step(&mut self, dir: Direction) -> bool {
        let target = self.player.pos.step(dir);
        if !self.ensure_tile(target) {
            log::warn!("Step to {} refused: outside the world", target);
            return false;
        }
        self.path.clear();
        self.move_player_to(target);
        self.player.facing = dir;
        self.collect();
        true
    }

    /// Plan an L-shaped path to `target`, replacing any current path.
    /// Returns the number of tiles queued.
    pub fn move_to(&mut self, target: Position) -> usize {
        let chunks = &mut self.chunks;
        let resources = &mut self.resources;
        let world = &self.config.world;
        let gen = &self.config.generation;
        let path = plan_path(self.player.pos, target, |tile| {
            chunks.ensure_tile(tile, resources, world, gen).is_available()
        });
        let len = path.len();
        if (len as u64) < self.player.pos.manhattan(target) {
            log::debug!("Path to {} truncated to {} tiles", target, len);
        }
        self.path.set_path(path);
        len
    }

    /// Collect at the player's tile.
    pub fn collect(&mut self) -> Collection {
        let pos = self.player.pos;
        let result = self.resources.deplete(pos, self.config.collect_amount);
        match result {
            Collection::Nothing => self.emit(SimEvent::NothingToCollect(pos)),
            Collection::Partial { kind, collected, remaining } => {
                self.inventory.credit(kind.into(), collected);
                self.emit(SimEvent::Collected { kind, amount: collected, remaining });
            }
            Collection::Depleted { kind, collected } => {
                self.inventory.credit(kind.into(), collected);
                self.emit(SimEvent::Depleted { kind, amount: collected });
            }
        }
        result
    }

    /// Drink one water by hand.
    pub fn drink(&mut self) -> bool {
        let drank = survival::drink(&mut self.player, &mut self.inventory, &self.config.survival);
        if drank {
            self.emit(SimEvent::Drank { thirst: self.player.thirst });
        } else {
            self.emit(SimEvent::NoWater);
        }
        drank
    }

    /// Pointer press on a tile. The secondary button always means "walk".
    pub fn pointer(&mut self, tile: Position, mode: InteractionMode, secondary: bool) -> PointerResult {
        if secondary || mode == InteractionMode::Move {
            return match self.move_to(tile) {
                0 if tile == self.player.pos => {
                    self.collect();
                    PointerResult::NoPath
                }
                0 => PointerResult::NoPath,
                n => PointerResult::Walking(n),
            };
        }
        if self.placement.is_occupied(tile) {
            return match self.remove_at(tile) {
                Some(machine) => PointerResult::Removed(machine),
                None => PointerResult::NoPath,
            };
        }
        match self.place_at(self.selected.into(), tile) {
            Ok(()) => PointerResult::Placed(self.selected),
            Err(e) => PointerResult::Refused(e),
        }
    }

    /// Hotbar selection. Only machines can be selected.
    pub fn select(&mut self, kind: Kind) -> bool {
        match kind.as_machine() {
            Some(machine) => {
                self.selected = machine;
                true
            }
            None => false,
        }
    }

    pub fn place_at(&mut self, kind: Kind, tile: Position) -> Result<(), PlaceError> {
        match self
            .placement
            .place(kind, tile, self.chunks.tracker(), &mut self.inventory)
        {
            Ok(_) => {
                if let Some(machine) = kind.as_machine() {
                    self.emit(SimEvent::Placed { machine, pos: tile });
                }
                Ok(())
            }
            Err(e) => {
                self.emit(SimEvent::PlacementRefused(e));
                Err(e)
            }
        }
    }

    pub fn remove_at(&mut self, tile: Position) -> Option<MachineKind> {
        let machine = self.placement.remove(tile, &mut self.inventory)?;
        self.emit(SimEvent::Removed { machine, pos: tile });
        Some(machine)
    }

    /// Queue a build of catalog entry `id`, debiting its requirements.
    pub fn start_build(&mut self, id: Kind) -> Result<(), BuildError> {
        let Some(def) = self.catalog.iter().find(|d| d.id == id) else {
            let err = BuildError::UnknownItem(id);
            self.emit(SimEvent::BuildRefused(err.clone()));
            return Err(err);
        };
        let started = self.queue.start(def, &mut self.inventory).map(|_| ());
        match started {
            Ok(()) => {
                self.emit(SimEvent::BuildStarted(id));
                Ok(())
            }
            Err(e) => {
                self.emit(SimEvent::BuildRefused(e.clone()));
                Err(e)
            }
        }
    }

    /// Cancel the queue entry at `index`, refunding what it paid.
    pub fn cancel_build(&mut self, index: usize) -> Result<(), CancelError> {
        let entry = self.queue.cancel(index, &mut self.inventory)?;
        self.emit(SimEvent::BuildCancelled(entry.id));
        Ok(())
    }

    pub fn can_build(&self, id: Kind) -> bool {
        self.catalog
            .iter()
            .find(|d| d.id == id)
            .is_some_and(|d| build::can_build_item(d, &self.inventory))
    }

    // ── World streaming ─────────────────────────────────────────────

    fn ensure_tile(&mut self, tile: Position) -> bool {
        self.chunks
            .ensure_tile(tile, &mut self.resources, &self.config.world, &self.config.generation)
            .is_available()
    }

    fn ensure_around_player(&mut self) {
        let grew = self.chunks.ensure_around(
            self.player.pos,
            &mut self.resources,
            &self.config.world,
            &self.config.generation,
        );
        if grew {
            if let Some(b) = self.chunks.bounds() {
                log::debug!(
                    "World bounds now ({}, {})..=({}, {}), {}x{}",
                    b.min_x,
                    b.min_y,
                    b.max_x,
                    b.max_y,
                    b.width(),
                    b.height()
                );
            }
        }
    }

    fn move_player_to(&mut self, tile: Position) {
        if let Some(dir) = facing_for(self.player.pos, tile) {
            self.player.facing = dir;
        }
        self.player.pos = tile;
        self.ensure_around_player();
    }

    // ── Events ──────────────────────────────────────────────────────

    fn emit(&mut self, event: SimEvent) {
        match &event {
            SimEvent::BuildCompleted(_) | SimEvent::Unlocked(_) | SimEvent::Died => {
                log::info!("{}", event)
            }
            e if e.is_refusal() => log::warn!("{}", event),
            _ => log::debug!("{}", event),
        }
        self.log.push(event.to_string());
        self.pending.push(event);
    }

    /// Structured events since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    // ── Save / load ─────────────────────────────────────────────────

    pub fn save_state(&self) -> SaveState {
        SaveState::new(&self.placement.placed(), &self.inventory)
    }

    /// Replace placed machines and inventory from a save. Restored
    /// machines are not debited; their chunks are generated so they
    /// lie inside the world bounds.
    pub fn restore(&mut self, state: &SaveState) {
        self.placement.clear();
        self.inventory = state.inventory();
        for saved in &state.placed {
            let pos = saved.pos();
            if !self.ensure_tile(pos) {
                log::warn!("Dropping saved {} at {}: outside the world", saved.id, pos);
                continue;
            }
            if self.placement.insert_unchecked(saved.id, pos).is_none() {
                log::warn!("Dropping saved {} at {}: tile already taken", saved.id, pos);
            }
        }
        power_system(self.placement.world_mut());
        log::info!(
            "Restored {} machines and {} inventory kinds",
            self.placement.len(),
            self.inventory.iter().count()
        );
    }

    // ── Read access ─────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn resources(&self) -> &ResourceField {
        &self.resources
    }

    pub fn placement(&self) -> &PlacementField {
        &self.placement
    }

    pub fn placed(&self) -> Vec<PlacedEntity> {
        self.placement.placed()
    }

    /// Machines powered as of the last power pass.
    pub fn powered_count(&self) -> usize {
        powered_count(self.placement.world())
    }

    /// Resource nodes within `radius` tiles of the player on both axes.
    pub fn resources_near_player(&self, radius: i32) -> impl Iterator<Item = &ResourceNode> {
        let r = radius.max(0);
        let p = self.player.pos;
        self.resources.in_rect(
            Position::new(p.x.saturating_sub(r), p.y.saturating_sub(r)),
            Position::new(p.x.saturating_add(r), p.y.saturating_add(r)),
        )
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.chunks.bounds()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.chunk_count()
    }

    pub fn catalog(&self) -> &[BuildableDefinition] {
        &self.catalog
    }

    pub fn queue(&self) -> &BuildQueue {
        &self.queue
    }

    pub fn path(&self) -> &PathFollower {
        &self.path
    }

    pub fn selected(&self) -> MachineKind {
        self.selected
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}
