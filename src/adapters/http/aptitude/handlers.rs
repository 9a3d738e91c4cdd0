//! HTTP handlers for aptitude endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_aptitude_error, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{AptitudeEngine, SubmitResponseCommand};
use crate::domain::foundation::{QuestionId, SessionId};

use super::dto::{SessionView, StartSessionRequest, SubmitResponseRequest, SubmitResponseView};

#[derive(Clone)]
pub struct AptitudeAppState {
    pub engine: Arc<AptitudeEngine>,
}

impl AptitudeAppState {
    pub fn new(engine: Arc<AptitudeEngine>) -> Self {
        Self { engine }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        ErrorResponse::bad_request("Invalid session ID").into_response_with(StatusCode::BAD_REQUEST)
    })
}

/// POST /api/aptitude/start
pub async fn start_session(
    State(state): State<AptitudeAppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    match state.engine.start(user.id, req.target_role).await {
        Ok(session) => (StatusCode::CREATED, Json(SessionView::from(&session))).into_response(),
        Err(e) => handle_aptitude_error(e),
    }
}

/// GET /api/aptitude/:id
pub async fn get_session(
    State(state): State<AptitudeAppState>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.engine.get_session(user.id, session_id).await {
        Ok(session) => Json(SessionView::from(&session)).into_response(),
        Err(e) => handle_aptitude_error(e),
    }
}

/// POST /api/aptitude/:id/respond
pub async fn submit_response(
    State(state): State<AptitudeAppState>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let question_id = match QuestionId::new(req.question_id) {
        Ok(id) => id,
        Err(e) => return handle_aptitude_error(e.into()),
    };

    let cmd = SubmitResponseCommand {
        user_id: user.id,
        session_id,
        question_id,
        response: req.response,
        code: req.code,
    };

    match state.engine.submit_response(cmd).await {
        Ok(result) => Json(SubmitResponseView {
            evaluation: (&result.evaluation).into(),
            next_question: result.next_question.as_ref().map(Into::into),
        })
        .into_response(),
        Err(e) => handle_aptitude_error(e),
    }
}

/// POST /api/aptitude/:id/complete
pub async fn complete_session(
    State(state): State<AptitudeAppState>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.engine.complete(user.id, session_id).await {
        Ok(result) => Json(SessionView::from(&result.session)).into_response(),
        Err(e) => handle_aptitude_error(e),
    }
}
