//! Hydraulic power rule.
//!
//! Stateless: a consumer is powered iff some power source sits on one of
//! its four neighbors. Recomputed from scratch every tick.

use crate::geometry::Position;

/// Whether a consumer at `pos` is adjacent to any of `sources`.
pub fn is_powered(pos: Position, sources: &[Position]) -> bool {
    sources.iter().any(|s| s.is_adjacent(pos))
}

/// Powered flags for a set of machines. Sources themselves are never
/// reported as powered.
///
/// - `machines`: (tile, is_power_source) for every placed machine
///
/// Returns one flag per input, in order.
pub fn propagate(machines: &[(Position, bool)]) -> Vec<bool> {
    let sources: Vec<Position> = machines
        .iter()
        .filter(|(_, is_source)| *is_source)
        .map(|(pos, _)| *pos)
        .collect();
    machines
        .iter()
        .map(|&(pos, is_source)| !is_source && is_powered(pos, &sources))
        .collect()
}
