//! Inventory ledger: what the player holds.
//!
//! Counts are unsigned; `debit` is a checked subtract that touches nothing
//! unless every line of the request is covered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kinds::Kind;

/// A set of kind → amount lines (build requirements, refunds, snapshots).
pub type Requirements = BTreeMap<Kind, u32>;

/// Error from a debit the ledger cannot cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    Insufficient { kind: Kind, needed: u32, held: u32 },
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::Insufficient { kind, needed, held } => {
                write!(f, "insufficient {}: need {}, have {}", kind, needed, held)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Kind → count ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    counts: BTreeMap<Kind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts<I: IntoIterator<Item = (Kind, u32)>>(counts: I) -> Self {
        let mut inv = Self::new();
        for (kind, amount) in counts {
            inv.credit(kind, amount);
        }
        inv
    }

    /// Balance for a kind; unknown kinds hold zero.
    pub fn get(&self, kind: Kind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: Kind, amount: u32) -> bool {
        self.get(kind) >= amount
    }

    /// Whether every line of `req` is covered.
    pub fn can_afford(&self, req: &Requirements) -> bool {
        req.iter().all(|(&kind, &amount)| self.has(kind, amount))
    }

    /// Lines of `req` that are not covered, with the shortfall.
    pub fn missing(&self, req: &Requirements) -> Requirements {
        req.iter()
            .filter_map(|(&kind, &amount)| {
                let held = self.get(kind);
                (held < amount).then_some((kind, amount - held))
            })
            .collect()
    }

    /// Subtract all lines atomically. On error nothing is changed.
    pub fn debit(&mut self, req: &Requirements) -> Result<(), InventoryError> {
        if let Some((&kind, &needed)) = req.iter().find(|(&k, &a)| !self.has(k, a)) {
            return Err(InventoryError::Insufficient { kind, needed, held: self.get(kind) });
        }
        for (&kind, &amount) in req {
            if let Some(count) = self.counts.get_mut(&kind) {
                *count -= amount;
            }
        }
        Ok(())
    }

    /// Subtract a single kind.
    pub fn debit_one(&mut self, kind: Kind, amount: u32) -> Result<(), InventoryError> {
        self.debit(&Requirements::from([(kind, amount)]))
    }

    pub fn credit(&mut self, kind: Kind, amount: u32) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Add every line of `req` (refunds).
    pub fn credit_all(&mut self, req: &Requirements) {
        for (&kind, &amount) in req {
            self.credit(kind, amount);
        }
    }

    /// Non-zero balances in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (Kind, u32)> + '_ {
        self.counts.iter().filter(|(_, &c)| c > 0).map(|(&k, &c)| (k, c))
    }

    /// Every tracked balance including zeros, for snapshots.
    pub fn snapshot(&self) -> BTreeMap<Kind, u32> {
        self.counts.clone()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }
}
