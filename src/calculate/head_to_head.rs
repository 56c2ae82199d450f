//! Head-to-head records: one player against everyone else.

use crate::models::{HeadToHeadRecord, MatchRecord, Player, PlayerId};

use super::win_rate;

/// Compute the selected player's record against every other roster member,
/// restricted to matches directly between the two. Sorted by win rate
/// descending for display; the order carries no ranking authority.
pub fn head_to_head(
    player: PlayerId,
    players: &[Player],
    matches: &[MatchRecord],
) -> Vec<HeadToHeadRecord> {
    let mut records: Vec<HeadToHeadRecord> = players
        .iter()
        .filter(|opponent| opponent.id != player)
        .map(|opponent| {
            let mut wins = 0u32;
            let mut losses = 0u32;
            for m in matches {
                if m.winner_id == player && m.loser_id == opponent.id {
                    wins += 1;
                } else if m.winner_id == opponent.id && m.loser_id == player {
                    losses += 1;
                }
            }
            HeadToHeadRecord {
                opponent_id: opponent.id,
                opponent_name: opponent.name.clone(),
                opponent_level: opponent.level,
                wins,
                losses,
                win_rate: win_rate(wins, losses),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| (b.wins + b.losses).cmp(&(a.wins + a.losses)))
            .then_with(|| a.opponent_name.cmp(&b.opponent_name))
    });
    records
}
