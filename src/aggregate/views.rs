//! Sorted leaderboard views
//!
//! Three fully ordered views over the same entry set, each with a total
//! tie-break rule ending on run_id, so no ties are left unresolved and the
//! output is byte-for-byte deterministic:
//!
//! - quality:   passrate desc, duration asc, run_id asc
//! - speed:     duration asc, passrate desc, run_id asc
//! - composite: composite desc, run_id asc

use super::entry::LeaderboardEntry;

/// Entries ordered by quality: passrate descending, then duration
/// ascending, then run_id ascending.
pub fn sorted_by_quality(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut view = entries.to_vec();
    view.sort_by(|a, b| {
        b.passrate
            .total_cmp(&a.passrate)
            .then_with(|| a.duration_minutes.total_cmp(&b.duration_minutes))
            .then_with(|| a.run_id.cmp(&b.run_id))
    });
    view
}

/// Entries ordered by speed: duration ascending, then passrate descending,
/// then run_id ascending.
pub fn sorted_by_speed(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut view = entries.to_vec();
    view.sort_by(|a, b| {
        a.duration_minutes
            .total_cmp(&b.duration_minutes)
            .then_with(|| b.passrate.total_cmp(&a.passrate))
            .then_with(|| a.run_id.cmp(&b.run_id))
    });
    view
}

/// Entries ordered by composite score descending, then run_id ascending.
pub fn sorted_by_composite(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut view = entries.to_vec();
    view.sort_by(|a, b| {
        b.composite_score
            .total_cmp(&a.composite_score)
            .then_with(|| a.run_id.cmp(&b.run_id))
    });
    view
}
