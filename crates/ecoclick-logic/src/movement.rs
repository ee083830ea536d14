//! Tile movement - L-shaped path planning and fixed-cadence path following.
//!
//! Paths close the full x distance first, then the full y distance, one
//! tile at a time. Every tile must be accepted by the caller's `ensure`
//! check before it is appended; the plan stops at the first tile that
//! cannot be ensured.

use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, Position};

/// Axis-aligned path from `from` (exclusive) to `to` (inclusive).
///
/// `ensure` is called for each tile in order; a `false` truncates the path
/// before that tile.
pub fn plan_path<F>(from: Position, to: Position, mut ensure: F) -> Vec<Position>
where
    F: FnMut(Position) -> bool,
{
    let mut path = Vec::new();
    let mut cur = from;
    let sx = unit_toward(from.x, to.x);
    let sy = unit_toward(from.y, to.y);

    while cur.x != to.x {
        let next = cur.offset(sx, 0);
        if !ensure(next) {
            return path;
        }
        path.push(next);
        cur = next;
    }
    while cur.y != to.y {
        let next = cur.offset(0, sy);
        if !ensure(next) {
            return path;
        }
        path.push(next);
        cur = next;
    }
    path
}

fn unit_toward(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Tiles stepped during one `PathFollower::advance`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepBatch {
    pub steps: Vec<Position>,
    /// The path ran out during this advance.
    pub arrived: bool,
}

/// Consumes a planned path at a fixed cadence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathFollower {
    path: VecDeque<Position>,
    accumulator: f32,
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any path in progress.
    pub fn set_path(&mut self, path: Vec<Position>) {
        self.path = path.into();
        self.accumulator = 0.0;
    }

    pub fn clear(&mut self) {
        self.path.clear();
        self.accumulator = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Position> {
        self.path.iter()
    }

    pub fn destination(&self) -> Option<Position> {
        self.path.back().copied()
    }

    /// Accumulate `dt` and pop one tile per elapsed `step_duration`.
    pub fn advance(&mut self, dt: f32, step_duration: f32) -> StepBatch {
        let mut batch = StepBatch::default();
        if self.path.is_empty() {
            self.accumulator = 0.0;
            return batch;
        }
        self.accumulator += dt.max(0.0);
        while self.accumulator >= step_duration {
            let Some(next) = self.path.pop_front() else {
                break;
            };
            self.accumulator -= step_duration;
            batch.steps.push(next);
        }
        if self.path.is_empty() {
            self.accumulator = 0.0;
            batch.arrived = !batch.steps.is_empty();
        }
        batch
    }
}

/// Facing after a one-tile move, if the move was one tile.
pub fn facing_for(from: Position, to: Position) -> Option<Direction> {
    Direction::from_delta(to.x - from.x, to.y - from.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_x_before_y() {
        let path = plan_path(p(0, 0), p(3, -2), |_| true);
        assert_eq!(path, vec![p(1, 0), p(2, 0), p(3, 0), p(3, -1), p(3, -2)]);
    }

    #[test]
    fn test_negative_x() {
        let path = plan_path(p(2, 2), p(0, 3), |_| true);
        assert_eq!(path, vec![p(1, 2), p(0, 2), p(0, 3)]);
    }

    #[test]
    fn test_same_tile_is_empty() {
        assert!(plan_path(p(4, 4), p(4, 4), |_| true).is_empty());
    }

    #[test]
    fn test_truncates_at_unensurable_tile() {
        let path = plan_path(p(0, 0), p(5, 0), |t| t.x < 3);
        assert_eq!(path, vec![p(1, 0), p(2, 0)]);
    }

    #[test]
    fn test_far_target_only_walks_ensured_tiles() {
        let path = plan_path(p(8, 8), p(i32::MAX, 8), |t| t.x < 100);
        assert_eq!(path.len(), 91);
        assert_eq!(path.last(), Some(&p(99, 8)));

        let path = plan_path(p(8, 8), p(i32::MIN, i32::MIN), |t| t.x > -3);
        assert_eq!(path.len(), 10);
        assert_eq!(path.last(), Some(&p(-2, 8)));
    }

    #[test]
    fn test_ensure_called_in_order() {
        let mut seen = Vec::new();
        plan_path(p(0, 0), p(1, 1), |t| {
            seen.push(t);
            true
        });
        assert_eq!(seen, vec![p(1, 0), p(1, 1)]);
    }

    #[test]
    fn test_cadence() {
        let mut f = PathFollower::new();
        f.set_path(vec![p(1, 0), p(2, 0), p(3, 0)]);
        let b = f.advance(0.2, 0.25);
        assert!(b.steps.is_empty());
        let b = f.advance(0.1, 0.25);
        assert_eq!(b.steps, vec![p(1, 0)]);
        assert!(!b.arrived);
        let b = f.advance(0.5, 0.25);
        assert_eq!(b.steps, vec![p(2, 0), p(3, 0)]);
        assert!(b.arrived);
        assert!(!f.is_moving());
    }

    #[test]
    fn test_idle_time_does_not_bank() {
        let mut f = PathFollower::new();
        f.advance(10.0, 0.25);
        f.set_path(vec![p(1, 0), p(2, 0)]);
        let b = f.advance(0.25, 0.25);
        assert_eq!(b.steps.len(), 1);
    }

    #[test]
    fn test_new_path_discards_old() {
        let mut f = PathFollower::new();
        f.set_path(vec![p(1, 0), p(2, 0), p(3, 0)]);
        f.advance(0.25, 0.25);
        f.set_path(vec![p(1, 1)]);
        assert_eq!(f.destination(), Some(p(1, 1)));
        assert_eq!(f.remaining().count(), 1);
    }

    #[test]
    fn test_facing() {
        assert_eq!(facing_for(p(0, 0), p(0, -1)), Some(Direction::Up));
        assert_eq!(facing_for(p(0, 0), p(2, 0)), None);
    }
}
