use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ecoclick_core::prelude::*;
use ecoclick_logic::config::SimConfig;
use ecoclick_logic::geometry::{ChunkKey, Position};
use ecoclick_logic::kinds::Kind;
use ecoclick_logic::worldgen::generate_chunk;

/// A base with a row of presses along a row of cubes.
fn busy_engine() -> GameEngine {
    let mut config = SimConfig::default();
    config.world.spawn = Position::new(0, 0);
    let mut engine = GameEngine::new(config);
    engine.inventory_mut().credit(Kind::PowerCube, 16);
    engine.inventory_mut().credit(Kind::CebPress, 16);
    for x in 0..16 {
        let _ = engine.place_at(Kind::PowerCube, Position::new(x, 4));
        let _ = engine.place_at(Kind::CebPress, Position::new(x, 5));
    }
    engine
}

fn bench_tick(c: &mut Criterion) {
    let mut engine = busy_engine();
    c.bench_function("tick_32_machines", |b| {
        b.iter(|| {
            engine.tick(black_box(1.0 / 60.0));
            engine.drain_events();
        })
    });
}

fn bench_generate_chunk(c: &mut Criterion) {
    let gen = SimConfig::default().generation;
    let mut cx = 0;
    c.bench_function("generate_chunk_16", |b| {
        b.iter(|| {
            cx += 1;
            black_box(generate_chunk(ChunkKey::new(cx, -cx), 16, &gen))
        })
    });
}

criterion_group!(benches, bench_tick, bench_generate_chunk);
criterion_main!(benches);
