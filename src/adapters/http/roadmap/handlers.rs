//! HTTP handlers for roadmap endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_roadmap_error, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    ApplyFeedbackCommand, GetRoadmapHandler, GetRoadmapQuery, RoadmapFeedbackApplier,
};
use crate::domain::foundation::RoadmapId;

use super::dto::{FeedbackUpdateRequest, RoadmapView};

#[derive(Clone)]
pub struct RoadmapAppState {
    get_handler: Arc<GetRoadmapHandler>,
    feedback: Arc<RoadmapFeedbackApplier>,
}

impl RoadmapAppState {
    pub fn new(get_handler: Arc<GetRoadmapHandler>, feedback: Arc<RoadmapFeedbackApplier>) -> Self {
        Self {
            get_handler,
            feedback,
        }
    }
}

fn parse_roadmap_id(raw: &str) -> Result<RoadmapId, Response> {
    raw.parse::<RoadmapId>().map_err(|_| {
        ErrorResponse::bad_request("Invalid roadmap ID").into_response_with(StatusCode::BAD_REQUEST)
    })
}

/// GET /api/roadmaps/:id
pub async fn get_roadmap(
    State(state): State<RoadmapAppState>,
    RequireAuth(user): RequireAuth,
    Path(roadmap_id): Path<String>,
) -> Response {
    let roadmap_id = match parse_roadmap_id(&roadmap_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetRoadmapQuery {
        user_id: user.id,
        roadmap_id,
    };
    match state.get_handler.handle(query).await {
        Ok(roadmap) => Json(RoadmapView::from(&roadmap)).into_response(),
        Err(e) => handle_roadmap_error(e),
    }
}

/// POST /api/roadmaps/:id/feedback-update
pub async fn feedback_update(
    State(state): State<RoadmapAppState>,
    RequireAuth(user): RequireAuth,
    Path(roadmap_id): Path<String>,
    Json(req): Json<FeedbackUpdateRequest>,
) -> Response {
    let roadmap_id = match parse_roadmap_id(&roadmap_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ApplyFeedbackCommand {
        user_id: user.id,
        roadmap_id,
        weaknesses: req.weaknesses,
        recommendations: req.recommendations,
    };
    match state.feedback.handle(cmd).await {
        Ok(roadmap) => Json(RoadmapView::from(&roadmap)).into_response(),
        Err(e) => handle_roadmap_error(e),
    }
}
