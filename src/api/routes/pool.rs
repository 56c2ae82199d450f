use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{compute_player_stats, rank_pool_league, round_robin_pairs};
use crate::models::PlayerId;
use crate::storage::MatchFilter;

use super::standings::{to_entries, StandingEntry};
use super::{parse_player_id, PlayerRef};

// ── Single-day pool standings ───────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PoolParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PoolStandingsResponse {
    pub date: NaiveDate,
    pub standings: Vec<StandingEntry>,
}

/// `GET /api/pool?date=YYYY-MM-DD` — ranking for one pool day: wins first,
/// ties broken by the direct result between the tied players, then set
/// differential.
pub async fn day_standings(
    State(state): State<AppState>,
    Query(params): Query<PoolParams>,
) -> Result<Json<PoolStandingsResponse>, ApiError> {
    let date = params.date.ok_or_else(|| {
        ApiError::BadRequest("date query parameter is required (YYYY-MM-DD)".to_string())
    })?;

    let store = state.store.read().await;
    let players = store.list_players()?;
    let day_matches = store.list_matches(&MatchFilter::on_day(date))?;
    drop(store);

    let mut stats = compute_player_stats(&players, &day_matches, false);
    rank_pool_league(&mut stats, &day_matches);

    Ok(Json(PoolStandingsResponse {
        date,
        standings: to_entries(stats),
    }))
}

// ── Round-robin schedule ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    /// Defaults to today in the club's timezone
    pub date: Option<NaiveDate>,
    pub player_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SchedulePair {
    pub home: PlayerRef,
    pub away: PlayerRef,
    /// Whether this pair already has a result on the given day. Skipping
    /// played pairs is left to the viewer; the schedule itself is complete.
    pub played: bool,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub date: NaiveDate,
    pub pairs: Vec<SchedulePair>,
}

/// `POST /api/pool/schedule` — the fixed round-robin pairing order for the
/// selected players. The selection is treated as a set; the order the UI
/// added players in does not change the output.
pub async fn schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let mut selected = Vec::with_capacity(request.player_ids.len());
    for raw in &request.player_ids {
        selected.push(parse_player_id(raw)?);
    }

    let store = state.store.read().await;
    let players = store.list_players()?;
    let tz = store.timezone();
    let date = request
        .date
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let day_matches = store.list_matches(&MatchFilter::on_day(date))?;
    drop(store);

    for id in &selected {
        if !players.iter().any(|p| p.id == *id) {
            return Err(ApiError::NotFound(format!("player {}", id)));
        }
    }

    let already_played = |a: PlayerId, b: PlayerId| {
        day_matches
            .iter()
            .any(|m| m.involves(a) && m.involves(b))
    };

    let pairs: Vec<SchedulePair> = round_robin_pairs(&selected)
        .into_iter()
        .map(|(home, away)| SchedulePair {
            home: PlayerRef::lookup(&players, home),
            away: PlayerRef::lookup(&players, away),
            played: already_played(home, away),
        })
        .collect();

    Ok(Json(ScheduleResponse { date, pairs }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::testing::{admin_cookie, get_json, send_json, test_state};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    async fn register(state: &crate::api::state::AppState, cookie: &str, name: &str) -> Value {
        let (_, p) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/players",
            &json!({"name": name, "level": 3}),
            Some(cookie),
        )
        .await;
        p
    }

    async fn record(
        state: &crate::api::state::AppState,
        cookie: &str,
        a: &Value,
        sets_a: u32,
        b: &Value,
        sets_b: u32,
        date: &str,
    ) {
        let (status, _) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            &json!({
                "match_date": format!("{}T10:00:00Z", date),
                "player_a": a["id"], "sets_a": sets_a,
                "player_b": b["id"], "sets_b": sets_b,
            }),
            Some(cookie),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_pool_requires_date() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, json) = get_json(build_router(state), "/api/pool").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_pool_day_standings_head_to_head_tie_break() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;
        let b = register(&state, &cookie, "B").await;
        let c = register(&state, &cookie, "C").await;
        let d = register(&state, &cookie, "D").await;

        // A and B both finish the day 2-1. B crushes on sets, but A beat B
        // directly, so A must rank above.
        record(&state, &cookie, &a, 3, &b, 2, "2026-03-14").await;
        record(&state, &cookie, &a, 3, &c, 0, "2026-03-14").await;
        record(&state, &cookie, &d, 3, &a, 0, "2026-03-14").await;
        record(&state, &cookie, &b, 3, &c, 0, "2026-03-14").await;
        record(&state, &cookie, &b, 3, &d, 0, "2026-03-14").await;
        record(&state, &cookie, &c, 3, &d, 2, "2026-03-14").await;

        let (status, json) = get_json(build_router(state), "/api/pool?date=2026-03-14").await;
        assert_eq!(status, StatusCode::OK);

        let standings = json["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 4);
        assert_eq!(standings[0]["name"], "A");
        assert_eq!(standings[1]["name"], "B");
    }

    #[tokio::test]
    async fn test_pool_ignores_other_days() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;
        let b = register(&state, &cookie, "B").await;
        record(&state, &cookie, &a, 3, &b, 0, "2026-03-13").await;

        let (_, json) = get_json(build_router(state), "/api/pool?date=2026-03-14").await;
        assert!(json["standings"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schedule_complete_round_robin() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let mut ids = Vec::new();
        for name in ["A", "B", "C", "D", "E"] {
            ids.push(register(&state, &cookie, name).await["id"].clone());
        }

        let (status, json) = send_json(
            build_router(state),
            "POST",
            "/api/pool/schedule",
            &json!({"date": "2026-03-14", "player_ids": ids}),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // 5 players: 10 pairs
        assert_eq!(json["pairs"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_schedule_selection_order_irrelevant() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await["id"].clone();
        let b = register(&state, &cookie, "B").await["id"].clone();
        let c = register(&state, &cookie, "C").await["id"].clone();

        let (_, first) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/pool/schedule",
            &json!({"date": "2026-03-14", "player_ids": [a, b, c]}),
            None,
        )
        .await;
        let (_, second) = send_json(
            build_router(state),
            "POST",
            "/api/pool/schedule",
            &json!({"date": "2026-03-14", "player_ids": [c, a, b]}),
            None,
        )
        .await;

        assert_eq!(first["pairs"], second["pairs"]);
    }

    #[tokio::test]
    async fn test_schedule_marks_played_pairs() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;
        let b = register(&state, &cookie, "B").await;
        let c = register(&state, &cookie, "C").await;
        record(&state, &cookie, &a, 3, &b, 1, "2026-03-14").await;

        let (_, json) = send_json(
            build_router(state),
            "POST",
            "/api/pool/schedule",
            &json!({"date": "2026-03-14", "player_ids": [a["id"], b["id"], c["id"]]}),
            None,
        )
        .await;

        let pairs = json["pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 3);
        let played: Vec<bool> = pairs
            .iter()
            .map(|p| p["played"].as_bool().unwrap())
            .collect();
        assert_eq!(played.iter().filter(|p| **p).count(), 1);
    }

    #[tokio::test]
    async fn test_schedule_unknown_player_404() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, _) = send_json(
            build_router(state),
            "POST",
            "/api/pool/schedule",
            &json!({"player_ids": [crate::models::PlayerId::random().to_string()]}),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_schedule_single_player_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;

        let (status, json) = send_json(
            build_router(state),
            "POST",
            "/api/pool/schedule",
            &json!({"date": "2026-03-14", "player_ids": [a["id"]]}),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["pairs"].as_array().unwrap().is_empty());
    }
}
