//! Resource field - the collectible nodes on the map.
//!
//! At most one node per tile; nodes are removed the moment their amount
//! reaches zero, so every stored node satisfies `0 < amount <= max_amount`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::kinds::ResourceKind;

/// A collectible resource deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub pos: Position,
    pub kind: ResourceKind,
    pub amount: u32,
    pub max_amount: u32,
}

impl ResourceNode {
    /// A fresh node at full richness.
    pub fn new(pos: Position, kind: ResourceKind, amount: u32) -> Self {
        Self { pos, kind, amount, max_amount: amount }
    }
}

/// Outcome of one collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// No live node at the tile.
    Nothing,
    /// Collected some, node still has `remaining`.
    Partial { kind: ResourceKind, collected: u32, remaining: u32 },
    /// Collected the last of the node; it is gone from the field.
    Depleted { kind: ResourceKind, collected: u32 },
}

impl Collection {
    pub fn collected(&self) -> u32 {
        match self {
            Collection::Nothing => 0,
            Collection::Partial { collected, .. } | Collection::Depleted { collected, .. } => {
                *collected
            }
        }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Collection::Nothing => None,
            Collection::Partial { kind, .. } | Collection::Depleted { kind, .. } => Some(*kind),
        }
    }
}

/// How `insert` treats an occupied tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Keep the existing node.
    Skip,
    /// Replace the existing node.
    Overwrite,
}

/// All resource nodes, keyed by tile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceField {
    nodes: BTreeMap<Position, ResourceNode>,
}

impl ResourceField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under the given policy. Zero-amount nodes are
    /// never stored. Returns whether the node was written.
    pub fn insert(&mut self, node: ResourceNode, policy: InsertPolicy) -> bool {
        if node.amount == 0 {
            return false;
        }
        let node = ResourceNode { max_amount: node.max_amount.max(node.amount), ..node };
        if policy == InsertPolicy::Skip && self.nodes.contains_key(&node.pos) {
            return false;
        }
        self.nodes.insert(node.pos, node);
        true
    }

    /// Live node at a tile.
    pub fn find_at(&self, pos: Position) -> Option<&ResourceNode> {
        self.nodes.get(&pos).filter(|n| n.amount > 0)
    }

    /// Take up to `request` units from the node at `pos`.
    pub fn deplete(&mut self, pos: Position, request: u32) -> Collection {
        let Some(node) = self.nodes.get_mut(&pos) else {
            return Collection::Nothing;
        };
        if node.amount == 0 || request == 0 {
            return Collection::Nothing;
        }
        let collected = request.min(node.amount);
        node.amount -= collected;
        let kind = node.kind;
        if node.amount == 0 {
            self.nodes.remove(&pos);
            Collection::Depleted { kind, collected }
        } else {
            Collection::Partial { kind, collected, remaining: node.amount }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in position order (x, then y).
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.values()
    }

    /// Nodes whose tile falls inside an inclusive rectangle.
    pub fn in_rect(
        &self,
        min: Position,
        max: Position,
    ) -> impl Iterator<Item = &ResourceNode> {
        self.nodes
            .range(min..=max)
            .map(|(_, n)| n)
            .filter(move |n| n.pos.y >= min.y && n.pos.y <= max.y)
    }

    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }
}
