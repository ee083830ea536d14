//! Pure simulation logic for ecology.click.
//!
//! This crate contains the game rules that are independent of any ECS,
//! renderer, or storage. Functions take plain data and return results,
//! making them unit-testable and reusable by the engine, the headless
//! harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`build`] | Build catalog, unlock rules, single-consumer build queue |
//! | [`config`] | Tunable constants grouped by subsystem (JSON-loadable) |
//! | [`crafting`] | Production timers for powered machines |
//! | [`geometry`] | Tile positions, chunk keys, world bounds tracker |
//! | [`inventory`] | Kind → count ledger with atomic debit |
//! | [`kinds`] | Resource, machine and inventory kind enumerations |
//! | [`movement`] | L-shaped path planning and fixed-cadence following |
//! | [`power`] | Hydraulic adjacency rule |
//! | [`resources`] | Resource nodes, collection and depletion |
//! | [`survival`] | Thirst, health and energy decay, auto-drinking |
//! | [`tech_tree`] | Static tech-tree tier data |
//! | [`worldgen`] | Deterministic per-chunk generation and chunk streaming |

pub mod build;
pub mod config;
pub mod crafting;
pub mod geometry;
pub mod inventory;
pub mod kinds;
pub mod movement;
pub mod power;
pub mod resources;
pub mod survival;
pub mod tech_tree;
pub mod worldgen;
