//! Player survival: thirst decay, auto-drinking, dehydration damage,
//! energy decay, death detection.

use serde::{Deserialize, Serialize};

use crate::config::SurvivalConfig;
use crate::geometry::{Direction, Position};
use crate::inventory::Inventory;
use crate::kinds::Kind;

/// Upper bound of every vital.
pub const VITAL_MAX: f32 = 100.0;

/// The player. All vitals in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Position,
    /// Last movement direction, for the renderer.
    pub facing: Direction,
    pub health: f32,
    pub thirst: f32,
    pub energy: f32,
}

impl Player {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            facing: Direction::Down,
            health: VITAL_MAX,
            thirst: VITAL_MAX,
            energy: VITAL_MAX,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// What happened during one survival step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurvivalReport {
    /// Water was consumed automatically.
    pub auto_drank: bool,
    /// Health lost this step.
    pub health_lost: f32,
    /// Health reached zero on this step.
    pub died: bool,
}

fn clamp_vital(v: f32) -> f32 {
    v.clamp(0.0, VITAL_MAX)
}

/// Drink one water if any is held. Returns whether a drink happened.
pub fn drink(player: &mut Player, inventory: &mut Inventory, cfg: &SurvivalConfig) -> bool {
    if inventory.debit_one(Kind::Water, 1).is_err() {
        return false;
    }
    player.thirst = clamp_vital(player.thirst + cfg.drink_restore);
    true
}

/// Advance survival by `dt` seconds.
pub fn step(
    player: &mut Player,
    inventory: &mut Inventory,
    dt: f32,
    cfg: &SurvivalConfig,
) -> SurvivalReport {
    let mut report = SurvivalReport::default();
    let dt = dt.max(0.0);
    let was_alive = !player.is_dead();

    player.thirst = clamp_vital(player.thirst - dt * cfg.thirst_decay);

    if player.thirst < cfg.auto_drink_below && inventory.get(Kind::Water) > 0 {
        report.auto_drank = drink(player, inventory, cfg);
    }

    if player.thirst < cfg.critical_thirst {
        let before = player.health;
        player.health = clamp_vital(player.health - dt * cfg.health_drain);
        report.health_lost = before - player.health;
    }

    player.energy = clamp_vital(player.energy - dt * cfg.energy_decay);

    report.died = was_alive && player.is_dead();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(thirst: f32) -> Player {
        Player { thirst, ..Player::new(Position::new(0, 0)) }
    }

    #[test]
    fn test_critical_thirst_drains_health() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(15.0);
        let mut inv = Inventory::new();
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(!r.auto_drank);
        assert!((p.health - 95.0).abs() < 1e-4);
        assert!((r.health_lost - 5.0).abs() < 1e-4);
        assert!((p.thirst - (15.0 - cfg.thirst_decay)).abs() < 1e-4);
    }

    #[test]
    fn test_auto_drink_below_threshold() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(50.2);
        let mut inv = Inventory::from_counts([(Kind::Water, 2)]);
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(r.auto_drank);
        assert_eq!(inv.get(Kind::Water), 1);
        assert!((p.thirst - 74.7).abs() < 1e-3);
    }

    #[test]
    fn test_no_auto_drink_above_threshold() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(80.0);
        let mut inv = Inventory::from_counts([(Kind::Water, 2)]);
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(!r.auto_drank);
        assert_eq!(inv.get(Kind::Water), 2);
    }

    #[test]
    fn test_drink_clamps_to_max() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(90.0);
        let mut inv = Inventory::from_counts([(Kind::Water, 1)]);
        assert!(drink(&mut p, &mut inv, &cfg));
        assert_eq!(p.thirst, VITAL_MAX);
        assert!(!drink(&mut p, &mut inv, &cfg));
    }

    #[test]
    fn test_auto_drink_rescues_from_critical() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(10.0);
        let mut inv = Inventory::from_counts([(Kind::Water, 1)]);
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(r.auto_drank);
        assert!(p.thirst > cfg.critical_thirst);
        assert_eq!(p.health, VITAL_MAX);
    }

    #[test]
    fn test_energy_decays_unconditionally() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(100.0);
        let mut inv = Inventory::new();
        step(&mut p, &mut inv, 10.0, &cfg);
        assert!((p.energy - 99.0).abs() < 1e-4);
        step(&mut p, &mut inv, 10_000.0, &cfg);
        assert_eq!(p.energy, 0.0);
    }

    #[test]
    fn test_death_reported_once() {
        let cfg = SurvivalConfig::default();
        let mut p = Player { health: 3.0, ..player_with(0.0) };
        let mut inv = Inventory::new();
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(r.died);
        assert_eq!(p.health, 0.0);
        let r = step(&mut p, &mut inv, 1.0, &cfg);
        assert!(!r.died);
        assert_eq!(p.health, 0.0);
    }

    #[test]
    fn test_vitals_stay_in_range() {
        let cfg = SurvivalConfig::default();
        let mut p = player_with(100.0);
        let mut inv = Inventory::from_counts([(Kind::Water, 3)]);
        for _ in 0..500 {
            step(&mut p, &mut inv, 0.5, &cfg);
            for v in [p.health, p.thirst, p.energy] {
                assert!((0.0..=VITAL_MAX).contains(&v));
            }
        }
    }
}
