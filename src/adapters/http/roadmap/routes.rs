//! HTTP routes for roadmap endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{feedback_update, get_roadmap, RoadmapAppState};

/// Mounted under `/api/roadmaps`.
pub fn roadmap_routes(state: RoadmapAppState) -> Router {
    Router::new()
        .route("/:id", get(get_roadmap))
        .route("/:id/feedback-update", post(feedback_update))
        .with_state(state)
}
