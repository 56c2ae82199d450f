use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::auth::AdminSession;
use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::models::{EntityId, MatchRecord, MatchSubmission, Player};
use crate::storage::MatchFilter;

use super::{parse_player_id, PlayerRef};

// ── Listing ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListMatchesParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub player: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// A match joined with the roster for display.
#[derive(Debug, Serialize)]
pub struct MatchView {
    pub id: String,
    pub match_date: DateTime<Utc>,
    /// Club-local calendar day the match counts towards
    pub day: NaiveDate,
    pub winner: PlayerRef,
    pub loser: PlayerRef,
    pub winner_sets: u32,
    pub loser_sets: u32,
}

pub(crate) fn match_view(
    record: &MatchRecord,
    players: &[Player],
    tz: chrono_tz::Tz,
) -> MatchView {
    MatchView {
        id: record.id.as_str().to_string(),
        match_date: record.match_date,
        day: record.local_day(tz),
        winner: PlayerRef::lookup(players, record.winner_id),
        loser: PlayerRef::lookup(players, record.loser_id),
        winner_sets: record.winner_sets,
        loser_sets: record.loser_sets,
    }
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchView>,
    pub pagination: PaginationMeta,
}

/// `GET /api/matches` — newest first, optionally filtered by day range and
/// participant.
pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListMatchesParams>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let player = match &params.player {
        Some(raw) => Some(parse_player_id(raw)?),
        None => None,
    };
    let filter = MatchFilter {
        from: params.from,
        to: params.to,
        player,
    };

    let store = state.store.read().await;
    let players = store.list_players()?;
    let matches = store.list_matches(&filter)?;
    let tz = store.timezone();
    drop(store);

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, matches.len() as u32);

    let page: Vec<MatchView> = matches
        .iter()
        .skip(pagination.offset() as usize)
        .take(pagination.page_size as usize)
        .map(|m| match_view(m, &players, tz))
        .collect();

    Ok(Json(MatchesResponse {
        matches: page,
        pagination: meta,
    }))
}

// ── Date range ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DateRangeResponse {
    pub first_match_day: Option<NaiveDate>,
    pub last_match_day: Option<NaiveDate>,
}

/// `GET /api/matches/date-range` — oldest and newest club-local match days.
pub async fn date_range(
    State(state): State<AppState>,
) -> Result<Json<DateRangeResponse>, ApiError> {
    let store = state.store.read().await;
    let days = store.distinct_match_days()?;
    Ok(Json(DateRangeResponse {
        first_match_day: days.last().copied(),
        last_match_day: days.first().copied(),
    }))
}

// ── Recording / edit / removal (admin) ──────────────────────────

/// Order-agnostic submission body: the store relabels winner and loser from
/// the set counts.
#[derive(Debug, Deserialize)]
pub struct SubmitMatchRequest {
    /// Defaults to now when omitted
    pub match_date: Option<DateTime<Utc>>,
    pub player_a: String,
    pub sets_a: u32,
    pub player_b: String,
    pub sets_b: u32,
}

impl SubmitMatchRequest {
    fn into_submission(self) -> Result<MatchSubmission, ApiError> {
        Ok(MatchSubmission {
            match_date: self.match_date.unwrap_or_else(Utc::now),
            player_a: parse_player_id(&self.player_a)?,
            sets_a: self.sets_a,
            player_b: parse_player_id(&self.player_b)?,
            sets_b: self.sets_b,
        })
    }
}

pub async fn create_match(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<SubmitMatchRequest>,
) -> Result<(StatusCode, Json<MatchView>), ApiError> {
    let submission = request.into_submission()?;
    let mut store = state.store.write().await;
    let record = store.insert_match(&submission)?;
    let players = store.list_players()?;
    let view = match_view(&record, &players, store.timezone());
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_match(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitMatchRequest>,
) -> Result<Json<MatchView>, ApiError> {
    let submission = request.into_submission()?;
    let id = EntityId::from(id);
    let mut store = state.store.write().await;
    let record = store.update_match(&id, &submission)?;
    let players = store.list_players()?;
    let view = match_view(&record, &players, store.timezone());
    Ok(Json(view))
}

pub async fn delete_match(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = EntityId::from(id);
    let mut store = state.store.write().await;
    store.delete_match(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
