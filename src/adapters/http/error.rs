//! JSON error bodies and the mapping from domain errors to HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::aptitude::AptitudeError;
use crate::domain::foundation::ErrorCode;
use crate::domain::roadmap::RoadmapError;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

pub fn handle_aptitude_error(error: AptitudeError) -> Response {
    let status = match &error {
        AptitudeError::NotFound(_) | AptitudeError::QuestionNotFound(_) => StatusCode::NOT_FOUND,
        AptitudeError::InvalidState(_) | AptitudeError::ValidationFailed { .. } => {
            StatusCode::BAD_REQUEST
        }
        AptitudeError::Conflict(_) => StatusCode::CONFLICT,
        AptitudeError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "aptitude request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut body = ErrorResponse::new(error.code(), error.message());
    if let AptitudeError::ValidationFailed { field, .. } = &error {
        body = body.with_details(serde_json::json!({ "field": field }));
    }
    body.into_response_with(status)
}

pub fn handle_roadmap_error(error: RoadmapError) -> Response {
    let status = match &error {
        RoadmapError::NotFound(_) => StatusCode::NOT_FOUND,
        RoadmapError::InvalidState(_) | RoadmapError::ValidationFailed { .. } => {
            StatusCode::BAD_REQUEST
        }
        RoadmapError::Conflict(_) => StatusCode::CONFLICT,
        RoadmapError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "roadmap request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut body = ErrorResponse::new(error.code(), error.message());
    if let RoadmapError::ValidationFailed { field, .. } = &error {
        body = body.with_details(serde_json::json!({ "field": field }));
    }
    body.into_response_with(status)
}
