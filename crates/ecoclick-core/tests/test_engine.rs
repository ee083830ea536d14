//! Integration tests for the engine tick pipeline and player intents.
//!
//! Exercises: chunk streaming → collection → build queue → placement
//! → power → crafting → survival → save/restore

use ecoclick_core::events::SimEvent;
use ecoclick_core::persistence::{self, MemoryStore};
use ecoclick_core::placement::PlaceError;
use ecoclick_core::prelude::*;
use ecoclick_logic::build::BuildError;
use ecoclick_logic::config::{ConfigError, SimConfig};
use ecoclick_logic::geometry::{Bounds, Direction, Position};
use ecoclick_logic::kinds::{Kind, MachineKind, ResourceKind};

// ── Helpers ────────────────────────────────────────────────────────────

fn origin_config() -> SimConfig {
    let mut config = SimConfig::default();
    config.world.spawn = Position::new(0, 0);
    config
}

fn origin_engine() -> GameEngine {
    GameEngine::new(origin_config())
}

fn resource_total(engine: &GameEngine) -> u64 {
    engine.resources().iter().map(|n| n.amount as u64).sum()
}

fn held_resources(engine: &GameEngine) -> u64 {
    engine
        .inventory()
        .iter()
        .filter(|(k, _)| k.as_resource().is_some())
        .map(|(_, n)| n as u64)
        .sum()
}

fn machine_at(engine: &GameEngine, pos: Position) -> PlacedEntity {
    engine
        .placed()
        .into_iter()
        .find(|e| e.pos == pos)
        .expect("machine at tile")
}

// ── World streaming ────────────────────────────────────────────────────

#[test]
fn same_config_same_world() {
    let a = GameEngine::default();
    let b = GameEngine::default();
    let na: Vec<_> = a.resources().iter().copied().collect();
    let nb: Vec<_> = b.resources().iter().copied().collect();
    assert_eq!(na, nb);
    assert_eq!(a.bounds(), b.bounds());
}

#[test]
fn bounds_only_grow_while_walking() {
    let mut engine = GameEngine::default();
    let mut last = engine.bounds().unwrap();
    for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
        for _ in 0..24 {
            engine.step(dir);
            let now = engine.bounds().unwrap();
            assert!(now.min_x <= last.min_x && now.min_y <= last.min_y);
            assert!(now.max_x >= last.max_x && now.max_y >= last.max_y);
            assert!(now.contains(engine.player().pos));
            last = now;
        }
    }
}

#[test]
fn world_edge_refuses_steps_and_truncates_paths() {
    let mut config = SimConfig::default();
    config.world.max_chunk_radius = 0;
    let mut engine = GameEngine::new(config);
    assert_eq!(engine.chunk_count(), 1);

    for _ in 0..8 {
        assert!(engine.step(Direction::Left));
    }
    assert_eq!(engine.player().pos, Position::new(0, 8));
    assert!(!engine.step(Direction::Left));
    assert_eq!(engine.player().pos, Position::new(0, 8));

    assert_eq!(engine.move_to(Position::new(40, 8)), 15);
    engine.tick(10.0);
    assert_eq!(engine.player().pos, Position::new(15, 8));
}

#[test]
fn invalid_config_refused_before_any_world() {
    let config = SimConfig::from_json(r#"{ "world": { "chunk_size": 0 } }"#).unwrap();
    match GameEngine::try_new(config.clone()) {
        Err(errors) => assert_eq!(errors, vec![ConfigError::ChunkSizeNotPositive(0)]),
        Ok(_) => panic!("zero chunk size accepted"),
    }

    // `new` falls back to the defaults instead of dividing by zero
    let engine = GameEngine::new(config);
    assert_eq!(engine.config().world.chunk_size, 16);
    assert_eq!(engine.chunk_count(), 9);
}

#[test]
fn spawn_nodes_never_stretch_bounds_past_chunks() {
    let mut config = origin_config();
    config.world.view_radius = 0;
    let mut engine = GameEngine::new(config);
    assert_eq!(engine.chunk_count(), 1);
    assert_eq!(
        engine.bounds(),
        Some(Bounds { min_x: 0, min_y: 0, max_x: 15, max_y: 15 })
    );

    // Walking onto the sand tile generates its chunk and the node with it
    engine.step(Direction::Left);
    let sand = engine.inventory().get(Kind::Sand);
    engine.step(Direction::Left);
    assert_eq!(engine.player().pos, Position::new(-2, 0));
    assert_eq!(engine.inventory().get(Kind::Sand), sand + 5);
    assert_eq!(engine.resources().find_at(Position::new(-2, 0)).unwrap().amount, 35);
    assert_eq!(engine.bounds().unwrap().min_x, -16);
}

// ── Collection ─────────────────────────────────────────────────────────

#[test]
fn collection_conserves_units() {
    let mut engine = origin_engine();
    engine.step(Direction::Right);
    engine.step(Direction::Right);
    assert_eq!(engine.player().pos, Position::new(2, 0));

    let before = resource_total(&engine) + held_resources(&engine);
    for _ in 0..10 {
        engine.collect();
        assert_eq!(resource_total(&engine) + held_resources(&engine), before);
    }
    assert!(engine.resources().find_at(Position::new(2, 0)).is_none());
}

#[test]
fn spawn_soil_node_exhausts_after_eight_collects() {
    let mut engine = origin_engine();
    engine.step(Direction::Right);
    engine.step(Direction::Right);
    // first collect happened on arrival
    let soil = engine.inventory().get(Kind::Soil);
    for _ in 0..7 {
        engine.collect();
    }
    assert_eq!(engine.inventory().get(Kind::Soil), soil + 35);
    engine.drain_events();
    engine.collect();
    assert_eq!(
        engine.drain_events(),
        vec![SimEvent::NothingToCollect(Position::new(2, 0))]
    );
}

#[test]
fn every_spawn_resource_is_near_the_player() {
    let engine = origin_engine();
    let near: Vec<_> = engine.resources_near_player(2).collect();
    for kind in ResourceKind::ALL {
        assert!(near.iter().any(|n| n.kind == kind), "no {:?} near spawn", kind);
    }
    assert!(near
        .iter()
        .all(|n| n.pos.x.abs() <= 2 && n.pos.y.abs() <= 2));
}

// ── Movement ───────────────────────────────────────────────────────────

#[test]
fn path_goes_x_then_y() {
    let mut engine = origin_engine();
    assert_eq!(engine.move_to(Position::new(3, -2)), 5);
    let tiles: Vec<_> = engine.path().remaining().copied().collect();
    assert_eq!(
        tiles,
        vec![
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(3, 0),
            Position::new(3, -1),
            Position::new(3, -2),
        ]
    );

    engine.tick(0.25);
    assert_eq!(engine.player().pos, Position::new(1, 0));
    engine.tick(1.0);
    assert_eq!(engine.player().pos, Position::new(3, -2));
    assert_eq!(engine.player().facing, Direction::Up);
    assert!(!engine.path().is_moving());
}

#[test]
fn new_target_replaces_path() {
    let mut engine = origin_engine();
    engine.move_to(Position::new(10, 0));
    engine.tick(0.5);
    assert_eq!(engine.player().pos, Position::new(2, 0));
    engine.move_to(Position::new(2, 3));
    assert_eq!(engine.path().destination(), Some(Position::new(2, 3)));
    engine.tick(5.0);
    assert_eq!(engine.player().pos, Position::new(2, 3));
}

#[test]
fn extreme_targets_stop_at_world_edge() {
    let mut engine = GameEngine::default();
    // Spawn (8, 8); the leftmost tile of chunk -4096 is x = -65536
    assert_eq!(
        engine.pointer(Position::new(i32::MIN, i32::MIN), InteractionMode::Move, false),
        PointerResult::Walking(65_544)
    );
    assert_eq!(engine.path().destination(), Some(Position::new(-65_536, 8)));

    let mut config = SimConfig::default();
    config.world.max_chunk_radius = 2;
    let mut engine = GameEngine::new(config);
    assert_eq!(engine.move_to(Position::new(i32::MAX, i32::MAX)), 39);
    assert_eq!(engine.move_to(Position::new(i32::MAX, 8)), 39);
    engine.tick(100.0);
    assert_eq!(engine.player().pos, Position::new(47, 8));
    assert!(engine.bounds().unwrap().contains(engine.player().pos));
    assert_eq!(
        engine.pointer(Position::new(i32::MIN, 8), InteractionMode::Move, false),
        PointerResult::Walking(79)
    );
}

#[test]
fn secondary_pointer_walks_in_build_mode() {
    let mut engine = origin_engine();
    let result = engine.pointer(Position::new(0, 2), InteractionMode::Build, true);
    assert_eq!(result, PointerResult::Walking(2));
    assert!(engine.placed().is_empty());
}

// ── Build queue ────────────────────────────────────────────────────────

#[test]
fn power_cube_build_completes_after_thirty_seconds() {
    let mut engine = origin_engine();
    let inv = engine.inventory_mut();
    inv.credit(Kind::ScrapMetal, 10);
    inv.credit(Kind::Clay, 8);
    inv.credit(Kind::Wood, 6);

    engine.start_build(Kind::PowerCube).unwrap();
    assert_eq!(engine.inventory().get(Kind::ScrapMetal), 0);
    assert_eq!(engine.inventory().get(Kind::Clay), 0);
    assert_eq!(engine.inventory().get(Kind::Wood), 0);
    assert_eq!(engine.queue().len(), 1);
    assert_eq!(engine.queue().head().unwrap().time_remaining, 30.0);

    engine.tick(29.0);
    assert_eq!(engine.inventory().get(Kind::PowerCube), 0);
    engine.tick(1.0);
    assert_eq!(engine.inventory().get(Kind::PowerCube), 1);
    assert!(engine.queue().is_empty());
    assert!(engine
        .drain_events()
        .contains(&SimEvent::BuildCompleted(Kind::PowerCube)));
}

#[test]
fn refused_build_changes_nothing() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::ScrapMetal, 10);
    let err = engine.start_build(Kind::PowerCube).unwrap_err();
    assert!(matches!(err, BuildError::InsufficientResources { .. }));
    assert_eq!(engine.inventory().get(Kind::ScrapMetal), 10);
    assert!(engine.queue().is_empty());

    assert_eq!(
        engine.start_build(Kind::SeedHomeKit),
        Err(BuildError::Locked(Kind::SeedHomeKit))
    );
    assert_eq!(
        engine.start_build(Kind::Water),
        Err(BuildError::UnknownItem(Kind::Water))
    );
    assert!(engine.queue().is_empty());
}

#[test]
fn cancel_refunds_paid_resources() {
    let mut engine = origin_engine();
    let inv = engine.inventory_mut();
    inv.credit(Kind::ScrapMetal, 6);
    inv.credit(Kind::Wood, 4);
    inv.credit(Kind::Sand, 5);
    engine.start_build(Kind::CebPress).unwrap();
    engine.tick(5.0);

    engine.cancel_build(0).unwrap();
    assert_eq!(engine.inventory().get(Kind::ScrapMetal), 6);
    assert_eq!(engine.inventory().get(Kind::Wood), 4);
    assert_eq!(engine.inventory().get(Kind::Sand), 5);
    assert!(engine.cancel_build(0).is_err());
}

#[test]
fn seed_home_kit_unlocks_once_and_stays_unlocked() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::BrickCeb, 10);
    engine.tick(0.1);
    let unlocked: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SimEvent::Unlocked(_)))
        .collect();
    assert_eq!(unlocked, vec![SimEvent::Unlocked(Kind::SeedHomeKit)]);

    engine.inventory_mut().debit_one(Kind::BrickCeb, 10).unwrap();
    engine.tick(0.1);
    assert!(engine.catalog().iter().all(|d| d.unlocked));
    assert!(!engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, SimEvent::Unlocked(_))));
}

// ── Placement, power, crafting ─────────────────────────────────────────

#[test]
fn powered_press_makes_bricks() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    engine.inventory_mut().credit(Kind::CebPress, 1);
    let cube = Position::new(1, 1);
    let press = Position::new(2, 1);

    assert_eq!(
        engine.pointer(cube, InteractionMode::Build, false),
        PointerResult::Placed(MachineKind::PowerCube)
    );
    engine.select(Kind::CebPress);
    assert_eq!(
        engine.pointer(press, InteractionMode::Build, false),
        PointerResult::Placed(MachineKind::CebPress)
    );
    assert_eq!(engine.inventory().get(Kind::PowerCube), 0);
    assert_eq!(engine.inventory().get(Kind::CebPress), 0);

    engine.tick(1.0);
    assert!(machine_at(&engine, press).powered);
    assert!(!machine_at(&engine, cube).powered);
    assert_eq!(engine.powered_count(), 1);
    engine.tick(1.0);
    assert_eq!(engine.inventory().get(Kind::BrickCeb), 1);

    // Picking up the cube unpowers the press on the next tick
    assert_eq!(
        engine.pointer(cube, InteractionMode::Build, false),
        PointerResult::Removed(MachineKind::PowerCube)
    );
    assert_eq!(engine.inventory().get(Kind::PowerCube), 1);
    for _ in 0..10 {
        engine.tick(1.0);
    }
    assert!(!machine_at(&engine, press).powered);
    assert_eq!(engine.powered_count(), 0);
    assert_eq!(engine.inventory().get(Kind::BrickCeb), 1);
}

#[test]
fn diagonal_neighbour_is_not_powered() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    engine.inventory_mut().credit(Kind::CebPress, 1);
    engine.place_at(Kind::PowerCube, Position::new(0, 0)).unwrap();
    engine.place_at(Kind::CebPress, Position::new(1, 1)).unwrap();
    engine.tick(3.0);
    assert!(!machine_at(&engine, Position::new(1, 1)).powered);
    assert_eq!(engine.inventory().get(Kind::BrickCeb), 0);
}

#[test]
fn refused_placement_changes_nothing() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    let far = Position::new(500, 500);
    assert_eq!(
        engine.pointer(far, InteractionMode::Build, false),
        PointerResult::Refused(PlaceError::OutOfBounds(far))
    );
    assert_eq!(engine.inventory().get(Kind::PowerCube), 1);
    assert!(engine.placed().is_empty());

    engine.select(Kind::CebPress);
    assert_eq!(
        engine.pointer(Position::new(1, 0), InteractionMode::Build, false),
        PointerResult::Refused(PlaceError::NotInInventory(Kind::CebPress))
    );
}

// ── Survival ───────────────────────────────────────────────────────────

#[test]
fn critical_thirst_without_water_drains_health() {
    let mut engine = origin_engine();
    engine.player_mut().thirst = 15.0;
    engine.tick(1.0);
    assert!((engine.player().thirst - 14.5).abs() < 1e-4);
    assert!((engine.player().health - 95.0).abs() < 1e-4);
}

#[test]
fn thirsty_player_drinks_automatically() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::Water, 1);
    engine.player_mut().thirst = 40.0;
    engine.tick(1.0);
    assert_eq!(engine.inventory().get(Kind::Water), 0);
    assert!((engine.player().thirst - 64.5).abs() < 1e-4);
}

#[test]
fn death_is_reported_once() {
    let mut engine = origin_engine();
    engine.player_mut().thirst = 1.0;
    engine.player_mut().health = 3.0;
    engine.tick(1.0);
    engine.tick(1.0);
    let deaths = engine
        .drain_events()
        .into_iter()
        .filter(|e| *e == SimEvent::Died)
        .count();
    assert_eq!(deaths, 1);
    assert!(engine.player().is_dead());
}

// ── Event log ──────────────────────────────────────────────────────────

#[test]
fn event_log_keeps_latest_twenty() {
    let mut engine = origin_engine();
    for _ in 0..30 {
        engine.drink();
    }
    assert_eq!(engine.log().len(), 20);
    assert_eq!(engine.log().latest(), Some("You have no water"));
}

// ── Save / restore ─────────────────────────────────────────────────────

#[test]
fn save_and_restore_base() {
    let mut engine = origin_engine();
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    engine.inventory_mut().credit(Kind::CebPress, 1);
    engine.inventory_mut().credit(Kind::Clay, 12);
    engine.place_at(Kind::PowerCube, Position::new(3, 3)).unwrap();
    engine.place_at(Kind::CebPress, Position::new(3, 4)).unwrap();

    let mut store = MemoryStore::new();
    persistence::save(&mut store, &engine.save_state()).unwrap();

    let mut fresh = origin_engine();
    let state = persistence::load(&store).unwrap().unwrap();
    fresh.restore(&state);

    let placed: Vec<_> = fresh.placed().iter().map(|e| (e.id, e.pos)).collect();
    assert_eq!(
        placed,
        vec![
            (MachineKind::PowerCube, Position::new(3, 3)),
            (MachineKind::CebPress, Position::new(3, 4)),
        ]
    );
    assert_eq!(fresh.inventory().get(Kind::Clay), 12);
    assert_eq!(fresh.inventory().get(Kind::PowerCube), 0);
    assert!(machine_at(&fresh, Position::new(3, 4)).powered);
}

#[test]
fn restore_generates_chunks_for_far_machines() {
    let mut engine = origin_engine();
    let state = persistence::SaveState {
        placed: vec![persistence::SavedEntity { id: MachineKind::PowerCube, x: 100, y: -70 }],
        inventory: Default::default(),
    };
    engine.restore(&state);
    assert_eq!(engine.placed().len(), 1);
    assert!(engine.bounds().unwrap().contains(Position::new(100, -70)));
}
