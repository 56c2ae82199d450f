use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::head_to_head;
use crate::models::HeadToHeadRecord;
use crate::storage::MatchFilter;

use super::{parse_player_id, PlayerRef};

#[derive(Debug, Serialize)]
pub struct HeadToHeadResponse {
    pub player: PlayerRef,
    pub records: Vec<HeadToHeadRecord>,
}

/// `GET /api/head-to-head/{id}` — the selected player's record against
/// every other roster member, sorted by win rate for display.
pub async fn head_to_head_for(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HeadToHeadResponse>, ApiError> {
    let id = parse_player_id(&id)?;

    let store = state.store.read().await;
    let player = store.get_player(id)?;
    let players = store.list_players()?;
    let matches = store.list_matches(&MatchFilter::all())?;
    drop(store);

    let records = head_to_head(id, &players, &matches);

    Ok(Json(HeadToHeadResponse {
        player: PlayerRef::of(&player),
        records,
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

    #[tokio::test]
    async fn test_head_to_head_unknown_player() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let (status, _) = get_json(
            build_router(state),
            &format!("/api/head-to-head/{}", crate::models::PlayerId::random()),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_to_head_records() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        let cookie = admin_cookie(build_router(state.clone())).await;

        let a = register(&state, &cookie, "A").await;
        let b = register(&state, &cookie, "B").await;
        let c = register(&state, &cookie, "C").await;

        for (pa, sa, pb, sb, date) in [
            (&a, 3, &b, 0, "2026-03-01"),
            (&a, 3, &b, 1, "2026-03-02"),
            (&b, 3, &a, 2, "2026-03-03"),
        ] {
            let (status, _) = send_json(
                build_router(state.clone()),
                "POST",
                "/api/matches",
                &json!({
                    "match_date": format!("{}T10:00:00Z", date),
                    "player_a": pa["id"], "sets_a": sa,
                    "player_b": pb["id"], "sets_b": sb,
                }),
                Some(&cookie),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = get_json(
            build_router(state),
            &format!("/api/head-to-head/{}", a["id"].as_str().unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["player"]["id"], a["id"]);

        let records = json["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);

        // Versus B: 2 wins 1 loss, sorted above the never-met C
        assert_eq!(records[0]["opponent_id"], b["id"]);
        assert_eq!(records[0]["wins"], 2);
        assert_eq!(records[0]["losses"], 1);
        assert_eq!(records[1]["opponent_id"], c["id"]);
        assert_eq!(records[1]["win_rate"], 0.0);
    }
}
