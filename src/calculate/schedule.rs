//! Round-robin pairing order for pool events (circle method).

use crate::models::PlayerId;

/// Generate the fixed pairing order for a single round robin over the
/// selected players: every unordered pair exactly once, in round order.
///
/// The selection is sorted (and deduplicated) before scheduling, so the
/// output only depends on the set of players, not on the order the UI
/// happened to add them in. Fewer than two players yields an empty
/// schedule.
///
/// Pairs that already have a recorded result are not filtered here; that is
/// the caller's concern at presentation time.
pub fn round_robin_pairs(selected: &[PlayerId]) -> Vec<(PlayerId, PlayerId)> {
    let mut entries: Vec<PlayerId> = selected.to_vec();
    entries.sort_unstable();
    entries.dedup();

    if entries.len() < 2 {
        return Vec::new();
    }

    // Circle method: pad odd fields with a bye, fix the first slot, rotate
    // the rest one position per round.
    let mut ring: Vec<Option<PlayerId>> = entries.into_iter().map(Some).collect();
    if ring.len() % 2 != 0 {
        ring.push(None);
    }

    let n = ring.len();
    let rounds = n - 1;
    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);

    for _ in 0..rounds {
        for i in 0..n / 2 {
            if let (Some(home), Some(away)) = (ring[i], ring[n - 1 - i]) {
                pairs.push((home, away));
            }
        }
        ring[1..].rotate_right(1);
    }

    pairs
}
