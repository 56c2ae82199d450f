//! Per-player aggregation over the match log.

use crate::models::{MatchOutcome, MatchRecord, Player, PlayerStats};

use super::win_rate;

/// How many recent results the form string keeps.
pub const RECENT_FORM_LEN: usize = 5;

/// Compute aggregate statistics for every player.
///
/// Players who have not played any of the given matches are included with
/// all-zero stats when `include_unplayed` is set, and dropped otherwise
/// (different views want different behavior). Matches whose participants are
/// not on the given roster simply never get attributed to anyone.
pub fn compute_player_stats(
    players: &[Player],
    matches: &[MatchRecord],
    include_unplayed: bool,
) -> Vec<PlayerStats> {
    players
        .iter()
        .filter_map(|player| {
            let stats = stats_for_player(player, matches);
            if stats.total_matches() == 0 && !include_unplayed {
                None
            } else {
                Some(stats)
            }
        })
        .collect()
}

/// Aggregate one player's record.
pub fn stats_for_player(player: &Player, matches: &[MatchRecord]) -> PlayerStats {
    // Newest first; ties on the timestamp fall back to insertion order so
    // repeated runs agree.
    let mut own: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(player.id)).collect();
    own.sort_by(|a, b| {
        b.match_date
            .cmp(&a.match_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let mut stats = PlayerStats::empty(player.id, player.name.clone(), player.level);

    for m in &own {
        if m.won_by(player.id) {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }
        stats.sets_won += m.sets_for(player.id);
        stats.sets_lost += m.sets_against(player.id);
    }
    stats.win_rate = win_rate(stats.wins, stats.losses);

    stats.recent_form = own
        .iter()
        .take(RECENT_FORM_LEN)
        .map(|m| outcome_for(m, player))
        .collect();

    stats.current_streak = current_streak(&own, player);

    // Best-ever streaks need the opposite chronological direction: walk
    // oldest first, resetting the counters on every result flip.
    let (max_win, max_lose) = max_streaks(&own, player);
    stats.max_win_streak = max_win;
    stats.max_lose_streak = max_lose;

    stats
}

fn outcome_for(m: &MatchRecord, player: &Player) -> MatchOutcome {
    if m.won_by(player.id) {
        MatchOutcome::Win
    } else {
        MatchOutcome::Loss
    }
}

/// Signed run of identical results ending at the newest match.
/// `newest_first` must be ordered by date descending.
fn current_streak(newest_first: &[&MatchRecord], player: &Player) -> i64 {
    let mut streak: i64 = 0;
    for m in newest_first {
        let won = m.won_by(player.id);
        if streak == 0 {
            streak = if won { 1 } else { -1 };
        } else if (streak > 0 && won) || (streak < 0 && !won) {
            streak += if won { 1 } else { -1 };
        } else {
            break;
        }
    }
    streak
}

/// Longest win and loss runs anywhere in the history, walking oldest first.
fn max_streaks(newest_first: &[&MatchRecord], player: &Player) -> (u32, u32) {
    let mut win_run = 0u32;
    let mut lose_run = 0u32;
    let mut max_win = 0u32;
    let mut max_lose = 0u32;

    for m in newest_first.iter().rev() {
        if m.won_by(player.id) {
            win_run += 1;
            lose_run = 0;
            max_win = max_win.max(win_run);
        } else {
            lose_run += 1;
            win_run = 0;
            max_lose = max_lose.max(lose_run);
        }
    }

    (max_win, max_lose)
}
