use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::auth::AdminSession;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Player;

use super::parse_player_id;

// ── Listing ─────────────────────────────────────────────────────

/// `GET /api/players` — the roster, division level ascending then name.
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_players()?))
}

// ── Registration / edit / removal (admin) ───────────────────────

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub level: u8,
}

pub async fn create_player(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let mut store = state.store.write().await;
    let player = store.add_player(&request.name, request.level)?;
    Ok((StatusCode::CREATED, Json(player)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: String,
    pub level: u8,
}

pub async fn update_player(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Result<Json<Player>, ApiError> {
    let id = parse_player_id(&id)?;
    let mut store = state.store.write().await;
    let player = store.update_player(id, &request.name, request.level)?;
    Ok(Json(player))
}

#[derive(Debug, Serialize)]
pub struct DeletePlayerResponse {
    pub removed_matches: usize,
}

/// Deleting a player hard-deletes every match they appear in.
pub async fn delete_player(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletePlayerResponse>, ApiError> {
    let id = parse_player_id(&id)?;
    let mut store = state.store.write().await;
    let removed_matches = store.delete_player(id)?;
    Ok(Json(DeletePlayerResponse { removed_matches }))
}
