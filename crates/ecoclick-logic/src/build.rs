//! Build catalog and the single-consumer build queue.
//!
//! Only the head of the queue is building; everything behind it waits.
//! Requirements are debited when a build is queued and the exact debited
//! lines are kept on the entry, so cancelling refunds what was paid even
//! if the catalog changes in between.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::inventory::{Inventory, Requirements};
use crate::kinds::Kind;

/// When a locked definition becomes available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockRule {
    /// Unlocked from the start.
    Always,
    /// Unlocks once the inventory holds at least `count` of `kind`.
    Holding { kind: Kind, count: u32 },
}

/// A buildable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildableDefinition {
    pub id: Kind,
    pub name: String,
    pub description: String,
    pub requirements: Requirements,
    /// Seconds of game time.
    pub build_time: f32,
    pub unlocked: bool,
    pub unlock: UnlockRule,
}

impl BuildableDefinition {
    fn new(
        id: Kind,
        description: &str,
        requirements: &[(Kind, u32)],
        build_time: f32,
        unlock: UnlockRule,
    ) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            description: description.to_string(),
            requirements: requirements.iter().copied().collect(),
            build_time,
            unlocked: unlock == UnlockRule::Always,
            unlock,
        }
    }
}

/// Whether `def` can be started right now.
pub fn can_build_item(def: &BuildableDefinition, inventory: &Inventory) -> bool {
    def.unlocked && inventory.can_afford(&def.requirements)
}

/// The static starting catalog.
pub fn default_catalog() -> Vec<BuildableDefinition> {
    vec![
        BuildableDefinition::new(
            Kind::PowerCube,
            "Hydraulic power hub. Energizes adjacent machines.",
            &[(Kind::ScrapMetal, 10), (Kind::Clay, 8), (Kind::Wood, 6)],
            30.0,
            UnlockRule::Always,
        ),
        BuildableDefinition::new(
            Kind::CebPress,
            "Presses compressed earth bricks while powered.",
            &[(Kind::ScrapMetal, 6), (Kind::Wood, 4), (Kind::Sand, 5)],
            20.0,
            UnlockRule::Always,
        ),
        BuildableDefinition::new(
            Kind::SeedHomeKit,
            "Starter house kit. Bricks + lumber.",
            &[(Kind::BrickCeb, 20), (Kind::Wood, 12)],
            60.0,
            UnlockRule::Holding { kind: Kind::BrickCeb, count: 10 },
        ),
    ]
}

/// Re-evaluate unlock rules. Returns the ids that flipped locked → unlocked
/// on this call; already-unlocked entries are never reported again.
pub fn refresh_unlocks(catalog: &mut [BuildableDefinition], inventory: &Inventory) -> Vec<Kind> {
    let mut newly = Vec::new();
    for def in catalog.iter_mut().filter(|d| !d.unlocked) {
        let ready = match def.unlock {
            UnlockRule::Always => true,
            UnlockRule::Holding { kind, count } => inventory.has(kind, count),
        };
        if ready {
            def.unlocked = true;
            newly.push(def.id);
        }
    }
    newly
}

/// Why a build could not be queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The kind has no entry in the catalog.
    UnknownItem(Kind),
    Locked(Kind),
    InsufficientResources { id: Kind, missing: Requirements },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownItem(id) => {
                write!(f, "{} is not in the build catalog", id.display_name())
            }
            BuildError::Locked(id) => write!(f, "{} is locked", id.display_name()),
            BuildError::InsufficientResources { id, missing } => {
                write!(f, "not enough resources for {}:", id.display_name())?;
                for (kind, amount) in missing {
                    write!(f, " {} {}", amount, kind.display_name())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Why a cancel request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelError {
    NoSuchEntry(usize),
}

impl std::fmt::Display for CancelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelError::NoSuchEntry(i) => write!(f, "no build queued at index {}", i),
        }
    }
}

impl std::error::Error for CancelError {}

/// Lifecycle of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Queued,
    Building,
}

/// An in-progress build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildQueueEntry {
    pub id: Kind,
    pub name: String,
    pub time_remaining: f32,
    pub total_time: f32,
    /// Exactly what was debited when queued.
    pub paid: Requirements,
}

impl BuildQueueEntry {
    /// Completed fraction in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.total_time <= 0.0 {
            1.0
        } else {
            (1.0 - self.time_remaining / self.total_time).clamp(0.0, 1.0)
        }
    }
}

/// FIFO build queue; only the head advances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildQueue {
    entries: VecDeque<BuildQueueEntry>,
}

impl BuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debit `def`'s requirements and enqueue it. Nothing is debited on error.
    pub fn start(
        &mut self,
        def: &BuildableDefinition,
        inventory: &mut Inventory,
    ) -> Result<&BuildQueueEntry, BuildError> {
        if !def.unlocked {
            return Err(BuildError::Locked(def.id));
        }
        if inventory.debit(&def.requirements).is_err() {
            return Err(BuildError::InsufficientResources {
                id: def.id,
                missing: inventory.missing(&def.requirements),
            });
        }
        self.entries.push_back(BuildQueueEntry {
            id: def.id,
            name: def.name.clone(),
            time_remaining: def.build_time,
            total_time: def.build_time,
            paid: def.requirements.clone(),
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Remove the entry at `index` and refund what it paid.
    pub fn cancel(
        &mut self,
        index: usize,
        inventory: &mut Inventory,
    ) -> Result<BuildQueueEntry, CancelError> {
        let entry = self.entries.remove(index).ok_or(CancelError::NoSuchEntry(index))?;
        inventory.credit_all(&entry.paid);
        Ok(entry)
    }

    /// Advance the head by `dt` seconds. A finished head is removed and
    /// credited; leftover time carries into the next entry, so several
    /// short builds can finish in one call.
    pub fn advance(&mut self, dt: f32, inventory: &mut Inventory) -> Vec<BuildQueueEntry> {
        let mut completed = Vec::new();
        let mut budget = dt.max(0.0);
        while let Some(head) = self.entries.front_mut() {
            if head.time_remaining > budget {
                head.time_remaining -= budget;
                break;
            }
            budget -= head.time_remaining.max(0.0);
            if let Some(mut done) = self.entries.pop_front() {
                done.time_remaining = 0.0;
                inventory.credit(done.id, 1);
                completed.push(done);
            }
        }
        completed
    }

    pub fn state_of(&self, index: usize) -> Option<BuildState> {
        match index {
            i if i >= self.entries.len() => None,
            0 => Some(BuildState::Building),
            _ => Some(BuildState::Queued),
        }
    }

    pub fn head(&self) -> Option<&BuildQueueEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&BuildQueueEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildQueueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
