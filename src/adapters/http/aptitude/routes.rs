//! HTTP routes for aptitude endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{complete_session, get_session, start_session, submit_response, AptitudeAppState};

/// Mounted under `/api/aptitude`.
pub fn aptitude_routes(state: AptitudeAppState) -> Router {
    Router::new()
        .route("/start", post(start_session))
        .route("/:id", get(get_session))
        .route("/:id/respond", post(submit_response))
        .route("/:id/complete", post(complete_session))
        .with_state(state)
}
