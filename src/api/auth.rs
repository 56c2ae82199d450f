//! Shared-PIN admin sessions.
//!
//! The club runs on one shared PIN. A successful login sets an HttpOnly
//! cookie whose value is derived from the PIN by hashing; mutating routes
//! take an [`AdminSession`] extractor that checks the cookie. There is no
//! session store and no user accounts, on purpose.

use axum::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::state::AppState;
use super::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "club_session";

const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Derive the session cookie value from the configured PIN.
pub fn session_token(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"club-session|");
    hasher.update(pin.as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..32].to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if request.pin != state.club.pin {
        return Err(ApiError::Unauthorized("wrong PIN".to_string()));
    }

    info!("Admin session opened");
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        session_token(&state.club.pin),
        SESSION_MAX_AGE_SECS
    );
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { success: true }),
    )
        .into_response())
}

/// `POST /api/auth/logout`
pub async fn logout() -> Response {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse { success: true }),
    )
        .into_response()
}

/// Extractor that admits only requests carrying a valid session cookie.
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = session_token(&state.club.pin);
        let cookies = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && value == expected {
                    return Ok(AdminSession);
                }
            }
        }

        Err(ApiError::Unauthorized("admin session required".to_string()))
    }
}
