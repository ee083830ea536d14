//! Simulation events and the bounded rolling message log shown by the UI.

use std::collections::VecDeque;

use ecoclick_logic::build::BuildError;
use ecoclick_logic::geometry::Position;
use ecoclick_logic::kinds::{Kind, MachineKind, ResourceKind};

use crate::placement::PlaceError;

/// Something the player should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Collected { kind: ResourceKind, amount: u32, remaining: u32 },
    Depleted { kind: ResourceKind, amount: u32 },
    NothingToCollect(Position),
    Placed { machine: MachineKind, pos: Position },
    Removed { machine: MachineKind, pos: Position },
    PlacementRefused(PlaceError),
    BuildStarted(Kind),
    BuildRefused(BuildError),
    BuildCompleted(Kind),
    BuildCancelled(Kind),
    Unlocked(Kind),
    Produced { output: Kind, pos: Position },
    AutoDrank { thirst: f32 },
    Drank { thirst: f32 },
    NoWater,
    Died,
}

impl SimEvent {
    /// Informational refusals, as opposed to things that happened.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            SimEvent::NothingToCollect(_)
                | SimEvent::PlacementRefused(_)
                | SimEvent::BuildRefused(_)
                | SimEvent::NoWater
        )
    }
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimEvent::Collected { kind, amount, remaining } => write!(
                f,
                "Collected {} {} ({} left)",
                amount,
                Kind::from(*kind).display_name(),
                remaining
            ),
            SimEvent::Depleted { kind, amount } => write!(
                f,
                "Collected {} {}; the deposit is exhausted",
                amount,
                Kind::from(*kind).display_name()
            ),
            SimEvent::NothingToCollect(pos) => write!(f, "Nothing to collect at {}", pos),
            SimEvent::Placed { machine, pos } => {
                write!(f, "Placed {} at {}", Kind::from(*machine).display_name(), pos)
            }
            SimEvent::Removed { machine, pos } => {
                write!(f, "Picked up {} from {}", Kind::from(*machine).display_name(), pos)
            }
            SimEvent::PlacementRefused(e) => write!(f, "Can't place: {}", e),
            SimEvent::BuildStarted(id) => write!(f, "Started building {}", id.display_name()),
            SimEvent::BuildRefused(e) => write!(f, "Can't build: {}", e),
            SimEvent::BuildCompleted(id) => write!(f, "{} finished", id.display_name()),
            SimEvent::BuildCancelled(id) => {
                write!(f, "Cancelled {}; resources refunded", id.display_name())
            }
            SimEvent::Unlocked(id) => write!(f, "Unlocked: {}", id.display_name()),
            SimEvent::Produced { output, pos } => {
                write!(f, "+1 {} at {}", output.display_name(), pos)
            }
            SimEvent::AutoDrank { thirst } => write!(f, "You drink some water (thirst {:.0})", thirst),
            SimEvent::Drank { thirst } => write!(f, "Refreshing (thirst {:.0})", thirst),
            SimEvent::NoWater => write!(f, "You have no water"),
            SimEvent::Died => write!(f, "You collapsed from dehydration"),
        }
    }
}

/// Newest-last rolling log of rendered event messages.
#[derive(Debug, Clone)]
pub struct EventLog {
    messages: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = EventLog::new(20);
        for i in 0..25 {
            log.push(format!("msg {}", i));
        }
        assert_eq!(log.len(), 20);
        assert_eq!(log.iter().next(), Some("msg 5"));
        assert_eq!(log.latest(), Some("msg 24"));
    }

    #[test]
    fn test_zero_capacity_log() {
        let mut log = EventLog::new(0);
        log.push("ignored");
        assert!(log.is_empty());
    }

    #[test]
    fn test_messages_render() {
        let e = SimEvent::Collected { kind: ResourceKind::ScrapMetal, amount: 5, remaining: 12 };
        assert_eq!(e.to_string(), "Collected 5 Scrap Metal (12 left)");
        let e = SimEvent::PlacementRefused(PlaceError::Occupied(Position::new(1, 2)));
        assert_eq!(e.to_string(), "Can't place: (1, 2) is already occupied");
        assert!(e.is_refusal());
        assert!(!SimEvent::Died.is_refusal());
    }
}
