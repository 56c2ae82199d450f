//! Statistics calculation engine.
//!
//! Pure, deterministic transformations from the match log to derived views:
//! - Per-player standings, streaks and recent form
//! - Overall and pool-league rankings with tie-breaks
//! - Round-robin pairing order for pool events
//! - Head-to-head records
//! - Attendance rates
//!
//! Every function here is total over well-formed input: division by zero is
//! a defined 0 result, and matches referencing players missing from the
//! roster are skipped rather than failing the whole view.

pub mod attendance;
pub mod head_to_head;
pub mod ranking;
pub mod schedule;
pub mod standings;

pub use attendance::attendance_stats;
pub use head_to_head::head_to_head;
pub use ranking::{rank_overall, rank_pool_league};
pub use schedule::round_robin_pairs;
pub use standings::compute_player_stats;

/// Win percentage (0-100). Defined as 0 when no matches were played.
pub fn win_rate(wins: u32, losses: u32) -> f64 {
    let total = wins + losses;
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Round a percentage for display. Comparisons must always use the
/// unrounded value; this is presentation only.
pub fn rounded_percent(rate: f64) -> u32 {
    rate.round() as u32
}
