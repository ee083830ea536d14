//! Production timers for powered machines.

/// Advance a production timer by `dt` seconds.
///
/// - `timer`: accumulated seconds since the last unit
/// - `powered`: unpowered machines keep their timer frozen
/// - `interval`: a unit is produced once the timer exceeds this
///
/// Returns the new timer and whether a unit was produced. At most one unit
/// per call; the timer resets to zero on production.
pub fn step_timer(timer: f32, powered: bool, dt: f32, interval: f32) -> (f32, bool) {
    if !powered {
        return (timer, false);
    }
    let next = timer + dt.max(0.0);
    if next > interval {
        (0.0, true)
    } else {
        (next, false)
    }
}
