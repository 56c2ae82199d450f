//! REST API endpoints.
//!
//! Axum-based HTTP API over the club store: roster and match management,
//! standings, pool-league tools, head-to-head, attendance and match-day
//! commentary. Mutating routes are PIN-gated (see [`auth`]).

use axum::routing::{get, post, put};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::commentary::CommentaryError;
use crate::storage::StoreError;

pub mod auth;
pub mod routes;
pub mod state;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::BadRequest(msg),
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Storage(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CommentaryError> for ApiError {
    fn from(e: CommentaryError) -> Self {
        match e {
            CommentaryError::NoMaterial(msg) => ApiError::BadRequest(msg),
            CommentaryError::BackendUnavailable(msg) | CommentaryError::BadResponse(msg) => {
                ApiError::Upstream(msg)
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/players",
            get(routes::players::list_players).post(routes::players::create_player),
        )
        .route(
            "/api/players/:id",
            put(routes::players::update_player).delete(routes::players::delete_player),
        )
        .route(
            "/api/matches",
            get(routes::matches::list_matches).post(routes::matches::create_match),
        )
        .route("/api/matches/date-range", get(routes::matches::date_range))
        .route(
            "/api/matches/:id",
            put(routes::matches::update_match).delete(routes::matches::delete_match),
        )
        .route("/api/standings", get(routes::standings::overall_standings))
        .route("/api/dashboard", get(routes::standings::dashboard))
        .route("/api/pool", get(routes::pool::day_standings))
        .route("/api/pool/schedule", post(routes::pool::schedule))
        .route(
            "/api/head-to-head/:id",
            get(routes::head_to_head::head_to_head_for),
        )
        .route("/api/attendance", get(routes::attendance::attendance))
        .route("/api/analysis", post(routes::analysis::analyze_day))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_new() {
        let p = Pagination::new(Some(3), Some(25));
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_bounds() {
        // Page can't be 0
        let p = Pagination::new(Some(0), Some(50));
        assert_eq!(p.page, 1);

        // Page size max is 100
        let p = Pagination::new(Some(1), Some(200));
        assert_eq!(p.page_size, 100);
    }

    #[test]
    fn test_pagination_meta() {
        let p = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_items, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_store_error_mapping() {
        let api: ApiError = StoreError::Validation("bad".to_string()).into();
        assert!(matches!(api, ApiError::BadRequest(_)));

        let api: ApiError = StoreError::NotFound("gone".to_string()).into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }

    #[test]
    fn test_commentary_error_mapping() {
        let api: ApiError = CommentaryError::BackendUnavailable("down".to_string()).into();
        assert!(matches!(api, ApiError::Upstream(_)));

        let api: ApiError = CommentaryError::NoMaterial("quiet day".to_string()).into();
        assert!(matches!(api, ApiError::BadRequest(_)));
    }
}
