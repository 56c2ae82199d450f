use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::attendance_stats;
use crate::models::AttendanceStats;
use crate::storage::MatchFilter;

#[derive(Debug, Serialize)]
pub struct AttendanceResponse {
    pub total_match_days: u32,
    pub players: Vec<AttendanceStats>,
}

/// `GET /api/attendance` — roster attendance over all match days, ranked by
/// rate then count, with a recent-days window for sparklines.
pub async fn attendance(State(state): State<AppState>) -> Result<Json<AttendanceResponse>, ApiError> {
    let store = state.store.read().await;
    let players = store.list_players()?;
    let matches = store.list_matches(&MatchFilter::all())?;
    let tz = store.timezone();
    drop(store);

    let stats = attendance_stats(&players, &matches, tz, state.club.attendance_window);
    let total_match_days = stats.first().map(|s| s.total_match_days).unwrap_or(0);

    Ok(Json(AttendanceResponse {
        total_match_days,
        players: stats,
    }))
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
        b: &Value,
        date: &str,
    ) {
        let (status, _) = send_json(
            build_router(state.clone()),
            "POST",
            "/api/matches",
            &json!({
                "match_date": format!("{}T10:00:00Z", date),
                "player_a": a["id"], "sets_a": 3,
                "player_b": b["id"], "sets_b": 0,
            }),
            Some(cookie),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_attendance_empty_club() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, json) = get_json(build_router(state), "/api/attendance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_match_days"], 0);
        assert!(json["players"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attendance_rates_and_ranking() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;
        let b = register(&state, &cookie, "B").await;
        let c = register(&state, &cookie, "C").await;

        // Five distinct days; A plays on three of them
        record(&state, &cookie, &a, &b, "2026-03-01").await;
        record(&state, &cookie, &a, &c, "2026-03-02").await;
        record(&state, &cookie, &b, &c, "2026-03-03").await;
        record(&state, &cookie, &a, &b, "2026-03-04").await;
        record(&state, &cookie, &b, &c, "2026-03-05").await;

        let (status, json) = get_json(build_router(state), "/api/attendance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_match_days"], 5);

        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 3);

        // B played four of the five days and ranks first
        assert_eq!(players[0]["name"], "B");
        assert_eq!(players[0]["attendance_rate"], 80.0);
        assert_eq!(players[0]["attendance_count"], 4);

        let a_row = players.iter().find(|p| p["name"] == "A").unwrap();
        assert_eq!(a_row["attendance_count"], 3);
        assert_eq!(a_row["attendance_rate"], 60.0);
        assert_eq!(a_row["recent"].as_array().unwrap().len(), 5);
        // Newest first: absent on 03-05
        assert_eq!(a_row["recent"][0]["date"], "2026-03-05");
        assert_eq!(a_row["recent"][0]["attended"], false);
        assert_eq!(a_row["recent"][1]["attended"], true);
    }
}
