use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{compute_player_stats, rank_overall, rounded_percent};
use crate::models::PlayerStats;
use crate::storage::MatchFilter;

use super::PlayerRef;

// ── Overall standings ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StandingsParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Include roster members with no matches (all-zero rows)
    pub include_unplayed: Option<bool>,
}

/// One ranked row. The raw rate drives the order; the rounded percent is
/// for display only.
#[derive(Debug, Serialize)]
pub struct StandingEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub win_rate_percent: u32,
    pub total_matches: u32,
    pub set_diff: i64,
}

pub(crate) fn to_entries(stats: Vec<PlayerStats>) -> Vec<StandingEntry> {
    stats
        .into_iter()
        .enumerate()
        .map(|(i, stats)| StandingEntry {
            rank: i as u32 + 1,
            win_rate_percent: rounded_percent(stats.win_rate),
            total_matches: stats.total_matches(),
            set_diff: stats.set_diff(),
            stats,
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub standings: Vec<StandingEntry>,
}

/// `GET /api/standings` — the overall table: win rate descending, ties
/// broken by matches played.
pub async fn overall_standings(
    State(state): State<AppState>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let filter = MatchFilter {
        from: params.from,
        to: params.to,
        player: None,
    };

    let store = state.store.read().await;
    let players = store.list_players()?;
    let matches = store.list_matches(&filter)?;
    drop(store);

    let mut stats =
        compute_player_stats(&players, &matches, params.include_unplayed.unwrap_or(false));
    rank_overall(&mut stats);

    Ok(Json(StandingsResponse {
        standings: to_entries(stats),
    }))
}

// ── Dashboard ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RateHighlight {
    pub player: PlayerRef,
    pub rate: f64,
}

#[derive(Debug, Serialize)]
pub struct StreakHighlight {
    pub player: PlayerRef,
    pub streak: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_matches: u32,
    pub total_players: u32,
    pub first_match_day: Option<NaiveDate>,
    pub last_match_day: Option<NaiveDate>,
    pub highest_win_rate: Option<RateHighlight>,
    pub lowest_win_rate: Option<RateHighlight>,
    pub best_win_streak: Option<StreakHighlight>,
    pub worst_lose_streak: Option<StreakHighlight>,
    pub standings: Vec<StandingEntry>,
}

/// `GET /api/dashboard` — totals, highlight cards and the full table.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let store = state.store.read().await;
    let players = store.list_players()?;
    let matches = store.list_matches(&MatchFilter::all())?;
    let days = store.distinct_match_days()?;
    drop(store);

    let mut stats = compute_player_stats(&players, &matches, true);
    rank_overall(&mut stats);

    // Highlights only consider players who actually played
    let played: Vec<&PlayerStats> = stats.iter().filter(|s| s.total_matches() > 0).collect();

    let as_ref = |s: &PlayerStats| PlayerRef {
        id: s.player_id,
        name: s.name.clone(),
        level: s.level,
    };

    let highest_win_rate = played.first().map(|s| RateHighlight {
        player: as_ref(s),
        rate: s.win_rate,
    });
    let lowest_win_rate = played.last().map(|s| RateHighlight {
        player: as_ref(s),
        rate: s.win_rate,
    });

    let best_win_streak = played
        .iter()
        .filter(|s| s.current_streak > 0)
        .max_by_key(|s| s.current_streak)
        .map(|s| StreakHighlight {
            player: as_ref(s),
            streak: s.current_streak,
        });
    let worst_lose_streak = played
        .iter()
        .filter(|s| s.current_streak < 0)
        .min_by_key(|s| s.current_streak)
        .map(|s| StreakHighlight {
            player: as_ref(s),
            streak: s.current_streak,
        });

    Ok(Json(DashboardResponse {
        total_matches: matches.len() as u32,
        total_players: players.len() as u32,
        first_match_day: days.last().copied(),
        last_match_day: days.first().copied(),
        highest_win_rate,
        lowest_win_rate,
        best_win_streak,
        worst_lose_streak,
        standings: to_entries(stats),
    }))
}
