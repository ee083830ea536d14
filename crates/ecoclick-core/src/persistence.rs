//! Save/Load of the player's base: placed machines and the inventory.
//!
//! The resource field, build queue and survival stats are not saved.
//! Two encodings: JSON under a fixed key in any key-value store, and
//! bincode to any reader/writer.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use ecoclick_logic::geometry::Position;
use ecoclick_logic::inventory::Inventory;
use ecoclick_logic::kinds::{Kind, MachineKind};
use serde::{Deserialize, Serialize};

use crate::components::PlacedEntity;

/// Key the JSON save lives under.
pub const SAVE_KEY: &str = "ecology.click/save";

/// A placed machine as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEntity {
    pub id: MachineKind,
    pub x: i32,
    pub y: i32,
}

impl SavedEntity {
    pub fn pos(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl From<&PlacedEntity> for SavedEntity {
    fn from(e: &PlacedEntity) -> Self {
        Self { id: e.id, x: e.pos.x, y: e.pos.y }
    }
}

/// Everything that survives a reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub placed: Vec<SavedEntity>,
    pub inventory: BTreeMap<Kind, u32>,
}

impl SaveState {
    pub fn new(placed: &[PlacedEntity], inventory: &Inventory) -> Self {
        Self {
            placed: placed.iter().map(SavedEntity::from).collect(),
            inventory: inventory.snapshot(),
        }
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::from_counts(self.inventory.iter().map(|(&k, &v)| (k, v)))
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Binary save.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Binary load.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, SaveError> {
        Ok(bincode::deserialize_from(reader)?)
    }
}

/// Minimal durable string store (browser local storage, a file, ...).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SaveError>;
}

/// In-process store, for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Write `state` as JSON under [`SAVE_KEY`].
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, state: &SaveState) -> Result<(), SaveError> {
    store.set(SAVE_KEY, state.to_json()?)
}

/// Read the JSON save, if one exists.
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<SaveState>, SaveError> {
    store
        .get(SAVE_KEY)
        .map(|raw| SaveState::from_json(&raw))
        .transpose()
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Bincode(Box<bincode::ErrorKind>),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for SaveError {}
