//! ecology.click Headless Simulation Harness
//!
//! Drives the real engine through the core gameplay loop and checks the
//! rules hold. Runs entirely in-process, no rendering, no storage.
//!
//! Usage:
//!   cargo run -p ecoclick-simtest
//!   cargo run -p ecoclick-simtest -- --verbose
//!   cargo run -p ecoclick-simtest -- --config tuning.json --json

use ecoclick_core::persistence::{self, MemoryStore, SaveState};
use ecoclick_core::prelude::*;
use ecoclick_logic::build::BuildState;
use ecoclick_logic::config::SimConfig;
use ecoclick_logic::geometry::{ChunkKey, Direction, Position};
use ecoclick_logic::kinds::{Kind, MachineKind, ResourceKind};
use ecoclick_logic::resources::ResourceField;
use ecoclick_logic::tech_tree::TECH_TREE;
use ecoclick_logic::worldgen::{generate_chunk, ChunkStreamer};
use serde::Serialize;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let json = args.iter().any(|a| a == "--json");
    println!("=== ecology.click Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(detail) => {
            println!("  ✗ config_load: {}", detail);
            std::process::exit(1);
        }
    };
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            println!("  ✗ config_valid: {}", e);
        }
        std::process::exit(1);
    }
    results.extend(validate_config(&config, verbose));

    // 2. World generation & streaming
    results.extend(validate_worldgen(&config, verbose));

    // 3. Gathering & building
    results.extend(validate_economy(&config, verbose));

    // 4. Placement, power & crafting
    results.extend(validate_production(&config, verbose));

    // 5. Survival
    results.extend(validate_survival(&config, verbose));

    // 6. Movement
    results.extend(validate_movement(&config, verbose));

    // 7. Save / load
    results.extend(validate_persistence(&config, verbose));

    // 8. Tech tree content
    results.extend(validate_tech_tree(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(out) => println!("{}", out),
            Err(e) => println!("  ✗ could not encode results: {}", e),
        }
    } else {
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(args: &[String]) -> Result<SimConfig, String> {
    let Some(i) = args.iter().position(|a| a == "--config") else {
        return Ok(SimConfig::default());
    };
    let path = args.get(i + 1).ok_or("--config needs a path")?;
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    SimConfig::from_json(&raw).map_err(|e| format!("{}: {}", path, e))
}

/// Same config with the spawn moved to the origin, so scenarios can use
/// the fixed spawn offsets directly.
fn at_origin(config: &SimConfig) -> SimConfig {
    let mut c = config.clone();
    c.world.spawn = Position::new(0, 0);
    c
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let g = &config.generation;
    results.push(TestResult {
        name: "config_thresholds_ordered".into(),
        passed: 0.0 <= g.primary_threshold
            && g.primary_threshold <= g.secondary_threshold
            && g.secondary_threshold <= 1.0,
        detail: format!(
            "primary {:.2}, secondary {:.2}",
            g.primary_threshold, g.secondary_threshold
        ),
    });

    results.push(TestResult {
        name: "config_richness_ranges".into(),
        passed: g.primary_richness.0 >= 1
            && g.primary_richness.0 <= g.primary_richness.1
            && g.bonus_richness.0 >= 1
            && g.bonus_richness.0 <= g.bonus_richness.1,
        detail: format!("{:?} / {:?}", g.primary_richness, g.bonus_richness),
    });

    let spawn_kinds: Vec<ResourceKind> = g.spawn_nodes.iter().map(|n| n.kind).collect();
    let covers_all = ResourceKind::ALL.iter().all(|k| spawn_kinds.contains(k));
    results.push(TestResult {
        name: "config_spawn_covers_every_resource".into(),
        passed: covers_all,
        detail: format!("{} spawn nodes", g.spawn_nodes.len()),
    });

    let errors = config.validate();
    results.push(TestResult {
        name: "config_valid".into(),
        passed: errors.is_empty(),
        detail: format!(
            "chunk size {}, world radius {} chunks, {} errors",
            config.world.chunk_size,
            config.world.max_chunk_radius,
            errors.len()
        ),
    });

    if verbose {
        if let Ok(s) = serde_json::to_string(config) {
            println!("  config: {}", s);
        }
    }
    results
}

// ── 2. World generation ─────────────────────────────────────────────────

fn validate_worldgen(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- World Generation ---");
    let mut results = Vec::new();
    let size = config.world.chunk_size;
    let gen = &config.generation;

    // Same chunk, same nodes
    let mut deterministic = true;
    for cx in -8..8 {
        for cy in -8..8 {
            let key = ChunkKey::new(cx, cy);
            if generate_chunk(key, size, gen) != generate_chunk(key, size, gen) {
                deterministic = false;
            }
        }
    }
    results.push(TestResult {
        name: "worldgen_deterministic".into(),
        passed: deterministic,
        detail: "256 chunks generated twice".into(),
    });

    // Every node stays inside its chunk with a sane amount
    let mut total = 0usize;
    let mut misplaced = 0usize;
    let mut bad_amount = 0usize;
    for cx in -4..4 {
        for cy in -4..4 {
            let key = ChunkKey::new(cx, cy);
            let rect = key.tile_rect(size);
            for node in generate_chunk(key, size, gen) {
                total += 1;
                if !rect.contains(node.pos) {
                    misplaced += 1;
                }
                if node.amount == 0 || node.amount != node.max_amount {
                    bad_amount += 1;
                }
            }
        }
    }
    let density = total as f32 / (64.0 * (size * size) as f32);
    results.push(TestResult {
        name: "worldgen_nodes_in_chunk".into(),
        passed: misplaced == 0 && bad_amount == 0,
        detail: format!(
            "{} nodes, {} outside chunk, {} bad amounts",
            total, misplaced, bad_amount
        ),
    });
    results.push(TestResult {
        name: "worldgen_density".into(),
        passed: density > 0.0 && density <= gen.secondary_threshold + 0.05,
        detail: format!("{:.3} nodes per tile", density),
    });

    // Streaming around spawn
    let engine = GameEngine::new(config.clone());
    let bounds = engine.bounds();
    let expected = (2 * config.world.view_radius + 1) * size;
    results.push(TestResult {
        name: "worldgen_spawn_area".into(),
        passed: bounds.is_some_and(|b| b.width() >= expected && b.height() >= expected),
        detail: match bounds {
            Some(b) => format!("{} chunks, {}x{} tiles", engine.chunk_count(), b.width(), b.height()),
            None => "no bounds after spawn".into(),
        },
    });
    results.push(TestResult {
        name: "worldgen_bounds_on_chunk_edges".into(),
        passed: bounds.is_some_and(|b| {
            b.min_x.rem_euclid(size) == 0
                && b.min_y.rem_euclid(size) == 0
                && b.width() % size == 0
                && b.height() % size == 0
        }),
        detail: format!("{:?}", bounds),
    });

    let origin = at_origin(config);
    let mut streamer = ChunkStreamer::new();
    let mut field = ResourceField::new();
    streamer.ensure_around(origin.world.spawn, &mut field, &origin.world, &origin.generation);
    let kinds_near_spawn = ResourceKind::ALL
        .iter()
        .filter(|&&k| field.count_of(k) > 0)
        .count();
    results.push(TestResult {
        name: "worldgen_spawn_resources".into(),
        passed: kinds_near_spawn == ResourceKind::ALL.len(),
        detail: format!("{}/{} kinds near spawn", kinds_near_spawn, ResourceKind::ALL.len()),
    });

    // The guaranteed nodes sit within two tiles of the player
    let reach = origin
        .generation
        .spawn_nodes
        .iter()
        .map(|n| n.dx.unsigned_abs().max(n.dy.unsigned_abs()))
        .max()
        .unwrap_or(0);
    let engine = GameEngine::new(origin.clone());
    let within_reach: Vec<ResourceKind> = engine
        .resources_near_player(reach as i32)
        .map(|n| n.kind)
        .collect();
    let reachable = ResourceKind::ALL
        .iter()
        .filter(|k| within_reach.contains(k))
        .count();
    results.push(TestResult {
        name: "worldgen_spawn_resources_in_reach".into(),
        passed: reachable == ResourceKind::ALL.len(),
        detail: format!(
            "{}/{} kinds within {} tiles, {} nodes",
            reachable,
            ResourceKind::ALL.len(),
            reach,
            within_reach.len()
        ),
    });

    if verbose {
        for kind in ResourceKind::ALL {
            println!("  {:>12}: {} nodes", Kind::from(kind).display_name(), field.count_of(kind));
        }
    }
    results
}

// ── 3. Economy ──────────────────────────────────────────────────────────

fn validate_economy(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Economy ---");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(at_origin(config));

    // Gather from the guaranteed spawn deposits
    let mut gathered = 0u32;
    for target in [Position::new(2, 2), Position::new(0, 2), Position::new(0, -2)] {
        engine.move_to(target);
        while engine.path().is_moving() {
            engine.tick(0.1);
        }
        for _ in 0..20 {
            gathered += engine.collect().collected();
        }
    }
    results.push(TestResult {
        name: "economy_gather".into(),
        passed: engine.inventory().get(Kind::ScrapMetal) >= 10
            && engine.inventory().get(Kind::Clay) >= 8
            && engine.inventory().get(Kind::Wood) >= 6,
        detail: format!("{} units gathered", gathered),
    });

    let can = engine.can_build(Kind::PowerCube);
    let started = engine.start_build(Kind::PowerCube).is_ok();
    results.push(TestResult {
        name: "economy_build_start".into(),
        passed: can && started && engine.queue().state_of(0) == Some(BuildState::Building),
        detail: format!("queue length {}", engine.queue().len()),
    });

    let mut elapsed = 0.0;
    while !engine.queue().is_empty() && elapsed < 120.0 {
        engine.tick(0.5);
        elapsed += 0.5;
    }
    results.push(TestResult {
        name: "economy_build_complete".into(),
        passed: engine.inventory().get(Kind::PowerCube) == 1,
        detail: format!("power cube after {:.1}s", elapsed),
    });

    let scrap = engine.inventory().get(Kind::ScrapMetal);
    let refused = engine.start_build(Kind::SeedHomeKit).is_err();
    results.push(TestResult {
        name: "economy_locked_refused".into(),
        passed: refused && engine.inventory().get(Kind::ScrapMetal) == scrap,
        detail: "seed home kit locked until bricks".into(),
    });

    if verbose {
        for (kind, n) in engine.inventory().iter() {
            println!("  {:>14}: {}", kind.display_name(), n);
        }
    }
    results
}

// ── 4. Production ───────────────────────────────────────────────────────

fn validate_production(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Power & Crafting ---");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(at_origin(config));
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    engine.inventory_mut().credit(Kind::CebPress, 2);
    // Keep the player alive through the long run
    engine.inventory_mut().credit(Kind::Water, 50);

    let cube = Position::new(4, 4);
    let near = Position::new(5, 4);
    let far = Position::new(7, 4);
    let placed = engine.place_at(Kind::PowerCube, cube).is_ok()
        && engine.place_at(Kind::CebPress, near).is_ok()
        && engine.place_at(Kind::CebPress, far).is_ok();
    results.push(TestResult {
        name: "production_place".into(),
        passed: placed && engine.placed().len() == 3,
        detail: format!("{} machines placed", engine.placed().len()),
    });

    let dup = engine.place_at(Kind::PowerCube, cube);
    results.push(TestResult {
        name: "production_occupied_refused".into(),
        passed: dup.is_err() && engine.placed().len() == 3,
        detail: format!("{:?}", dup),
    });

    engine.tick(0.0);
    let powered: Vec<bool> = engine.placed().iter().map(|e| e.powered).collect();
    results.push(TestResult {
        name: "production_power_adjacency".into(),
        passed: powered == vec![false, true, false] && engine.powered_count() == 1,
        detail: format!("powered flags {:?}, {} powered", powered, engine.powered_count()),
    });

    for _ in 0..60 {
        engine.tick(1.0);
    }
    let bricks = engine.inventory().get(Kind::BrickCeb);
    results.push(TestResult {
        name: "production_bricks".into(),
        passed: (25..=35).contains(&bricks),
        detail: format!("{} bricks in 60s from one powered press", bricks),
    });

    let unlocked = engine
        .catalog()
        .iter()
        .find(|d| d.id == Kind::SeedHomeKit)
        .is_some_and(|d| d.unlocked);
    results.push(TestResult {
        name: "production_unlocks_home_kit".into(),
        passed: unlocked,
        detail: "seed home kit unlocked by bricks".into(),
    });

    let removed = engine.remove_at(cube);
    engine.tick(5.0);
    let after = engine.inventory().get(Kind::BrickCeb);
    results.push(TestResult {
        name: "production_stops_without_power".into(),
        passed: removed == Some(MachineKind::PowerCube) && after == bricks && engine.powered_count() == 0,
        detail: format!("{} bricks after removing the cube", after),
    });

    if verbose {
        for e in engine.placed() {
            println!("  {} at {} powered={} timer={:?}", e.id, e.pos, e.powered, e.craft_timer);
        }
    }
    results
}

// ── 5. Survival ─────────────────────────────────────────────────────────

fn validate_survival(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Survival ---");
    let mut results = Vec::new();
    let s = &config.survival;

    let mut engine = GameEngine::new(config.clone());
    engine.player_mut().thirst = s.critical_thirst - 5.0;
    let health = engine.player().health;
    engine.tick(1.0);
    let lost = health - engine.player().health;
    results.push(TestResult {
        name: "survival_critical_drain".into(),
        passed: (lost - s.health_drain).abs() < 1e-3,
        detail: format!("lost {:.2} health in 1s", lost),
    });

    let mut engine = GameEngine::new(config.clone());
    engine.inventory_mut().credit(Kind::Water, 1);
    engine.player_mut().thirst = s.auto_drink_below - 1.0;
    engine.tick(0.1);
    results.push(TestResult {
        name: "survival_auto_drink".into(),
        passed: engine.inventory().get(Kind::Water) == 0
            && engine.player().thirst > s.auto_drink_below,
        detail: format!("thirst {:.1}", engine.player().thirst),
    });

    let mut engine = GameEngine::new(config.clone());
    let mut seconds = 0;
    while !engine.player().is_dead() && seconds < 10_000 {
        engine.tick(1.0);
        seconds += 1;
    }
    let deaths = engine
        .drain_events()
        .iter()
        .filter(|e| **e == SimEvent::Died)
        .count();
    results.push(TestResult {
        name: "survival_dehydration".into(),
        passed: engine.player().is_dead() && deaths == 1,
        detail: format!("died after {}s without water", seconds),
    });

    let vitals_ok = [engine.player().health, engine.player().thirst, engine.player().energy]
        .iter()
        .all(|v| (0.0..=100.0).contains(v));
    results.push(TestResult {
        name: "survival_vitals_in_range".into(),
        passed: vitals_ok,
        detail: "health, thirst, energy within 0..=100".into(),
    });

    if verbose {
        let p = engine.player();
        println!("  final vitals: health {:.1} thirst {:.1} energy {:.1}", p.health, p.thirst, p.energy);
    }
    results
}

// ── 6. Movement ─────────────────────────────────────────────────────────

fn validate_movement(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Movement ---");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(at_origin(config));

    let planned = engine.move_to(Position::new(3, -2));
    let tiles: Vec<Position> = engine.path().remaining().copied().collect();
    results.push(TestResult {
        name: "movement_x_then_y".into(),
        passed: planned == 5 && tiles.first() == Some(&Position::new(1, 0)) && tiles[2] == Position::new(3, 0),
        detail: format!("{} tiles", planned),
    });

    let mut elapsed = 0.0f32;
    while engine.path().is_moving() && elapsed < 10.0 {
        engine.tick(0.05);
        elapsed += 0.05;
    }
    let expected = planned as f32 * config.movement.step_duration();
    results.push(TestResult {
        name: "movement_speed".into(),
        passed: engine.player().pos == Position::new(3, -2) && (elapsed - expected).abs() < 0.1,
        detail: format!("arrived after {:.2}s", elapsed),
    });

    let before = engine.chunk_count();
    for _ in 0..(config.world.chunk_size * 3) {
        engine.step(Direction::Left);
    }
    let grew = engine.chunk_count() > before
        && engine.bounds().is_some_and(|b| b.contains(engine.player().pos));
    results.push(TestResult {
        name: "movement_streams_chunks".into(),
        passed: grew,
        detail: format!("{} -> {} chunks", before, engine.chunk_count()),
    });

    if verbose {
        println!("  player at {} facing {:?}", engine.player().pos, engine.player().facing);
    }
    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Save / Load ---");
    let mut results = Vec::new();
    let mut engine = GameEngine::new(at_origin(config));
    engine.inventory_mut().credit(Kind::PowerCube, 1);
    engine.inventory_mut().credit(Kind::CebPress, 1);
    engine.inventory_mut().credit(Kind::Sand, 9);
    let _ = engine.place_at(Kind::PowerCube, Position::new(1, 1));
    let _ = engine.place_at(Kind::CebPress, Position::new(1, 2));

    let state = engine.save_state();
    let mut store = MemoryStore::new();
    let saved = persistence::save(&mut store, &state);
    let loaded = persistence::load(&store);
    results.push(TestResult {
        name: "persistence_json_store".into(),
        passed: saved.is_ok() && matches!(&loaded, Ok(Some(s)) if *s == state),
        detail: format!("{} machines, {} inventory kinds", state.placed.len(), state.inventory.len()),
    });

    let mut buf = Vec::new();
    let bin_ok = state.write_to(&mut buf).is_ok()
        && SaveState::read_from(&buf[..]).is_ok_and(|s| s == state);
    results.push(TestResult {
        name: "persistence_bincode".into(),
        passed: bin_ok,
        detail: format!("{} bytes", buf.len()),
    });

    let mut fresh = GameEngine::new(at_origin(config));
    fresh.restore(&state);
    let same_machines = fresh.save_state() == state;
    results.push(TestResult {
        name: "persistence_restore".into(),
        passed: same_machines && fresh.inventory().get(Kind::Sand) == 9,
        detail: format!("{} machines restored", fresh.placed().len()),
    });

    if verbose {
        if let Ok(json) = state.to_json() {
            println!("  save: {}", json);
        }
    }
    results
}

// ── 8. Tech tree ────────────────────────────────────────────────────────

fn validate_tech_tree(verbose: bool) -> Vec<TestResult> {
    println!("--- Tech Tree ---");
    let mut results = Vec::new();

    let ordered = TECH_TREE
        .iter()
        .enumerate()
        .all(|(i, t)| t.tier == format!("Tier {}", i));
    results.push(TestResult {
        name: "tech_tiers_ordered".into(),
        passed: ordered && !TECH_TREE.is_empty(),
        detail: format!("{} tiers", TECH_TREE.len()),
    });

    let filled = TECH_TREE.iter().all(|t| !t.name.is_empty() && !t.sections.is_empty());
    results.push(TestResult {
        name: "tech_tiers_have_content".into(),
        passed: filled,
        detail: "every tier has a name and sections".into(),
    });

    if verbose {
        for t in TECH_TREE {
            println!("  T{} {}", t.tier, t.name);
        }
    }
    results
}
