//! Ranking policies and tie-breaks.
//!
//! Two orderings are in use by different views:
//! - the overall table ranks by win rate, breaking ties by activity
//! - a pool-league day ranks by wins, breaking ties by the direct result
//!   between the tied players, then by set differential
//!
//! Both are written as explicit comparators. The pool-league tie-break
//! cannot be a scalar sort key: it has to look at the pairwise matches of
//! the two players being compared.

use std::cmp::Ordering;

use crate::models::{MatchRecord, PlayerId, PlayerStats};

/// Order the overall standings: win rate descending, with more matches
/// played winning a tie (activity beats a small high-rate sample). Name is
/// the final key so repeated runs agree.
///
/// Comparisons use the unrounded rate; rounding is display-only.
pub fn rank_overall(stats: &mut [PlayerStats]) {
    stats.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| b.total_matches().cmp(&a.total_matches()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Order a single pool event: wins descending, then the head-to-head result
/// between the two tied players (a direct win ranks above, whatever the
/// other numbers say), then set differential.
///
/// `day_matches` must be the matches of the event being ranked; the direct
/// comparison deliberately never consults the wider season log.
pub fn rank_pool_league(stats: &mut [PlayerStats], day_matches: &[MatchRecord]) {
    stats.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| direct_result(a.player_id, b.player_id, day_matches))
            .then_with(|| b.set_diff().cmp(&a.set_diff()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Compare two players by their direct meetings within the given matches.
/// `Less` means `a` ranks above `b`. Players who never met (or split their
/// meetings) compare equal and fall through to the next key.
fn direct_result(a: PlayerId, b: PlayerId, matches: &[MatchRecord]) -> Ordering {
    let mut a_wins = 0u32;
    let mut b_wins = 0u32;
    for m in matches {
        if m.winner_id == a && m.loser_id == b {
            a_wins += 1;
        } else if m.winner_id == b && m.loser_id == a {
            b_wins += 1;
        }
    }
    b_wins.cmp(&a_wins)
}
