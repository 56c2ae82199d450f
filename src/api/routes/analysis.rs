use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{compute_player_stats, rank_overall};
use crate::commentary::{generate_commentary, ResultLine};
use crate::storage::MatchFilter;

use super::PlayerRef;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    /// Defaults to the most recent match day
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub date: NaiveDate,
    pub commentary: String,
}

/// `POST /api/analysis` — announcer-style commentary for one match day,
/// generated from that day's results and the current overall ranking.
pub async fn analyze_day(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let store = state.store.read().await;

    let date = match request.date {
        Some(date) => date,
        None => store
            .distinct_match_days()?
            .first()
            .copied()
            .ok_or_else(|| ApiError::BadRequest("no matches recorded yet".to_string()))?,
    };

    let players = store.list_players()?;
    let day_matches = store.list_matches(&MatchFilter::on_day(date))?;
    let all_matches = store.list_matches(&MatchFilter::all())?;
    drop(store);

    let results: Vec<ResultLine> = day_matches
        .iter()
        .map(|m| {
            let winner = PlayerRef::lookup(&players, m.winner_id);
            let loser = PlayerRef::lookup(&players, m.loser_id);
            ResultLine {
                winner: winner.name,
                winner_level: winner.level,
                loser: loser.name,
                loser_level: loser.level,
                winner_sets: m.winner_sets,
                loser_sets: m.loser_sets,
            }
        })
        .collect();

    let mut standings = compute_player_stats(&players, &all_matches, false);
    rank_overall(&mut standings);

    let commentary = generate_commentary(state.commentary.as_ref(), &results, &standings).await?;

    Ok(Json(AnalysisResponse { date, commentary }))
}
