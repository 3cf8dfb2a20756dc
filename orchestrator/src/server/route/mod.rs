use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use chaos::chaos_router;
use public::local_route;

use super::types::AppState;

pub(super) mod chaos;
pub(super) mod public;

/// Fallback when no other route matches.
pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "The requested resource was not found")
}

pub(crate) fn server_router(state: AppState) -> Router {
    Router::new().merge(local_route()).nest("/chaos", chaos_router(state)).fallback(handler_404)
}
