//! WebSocket handler for live aptitude sessions.
//!
//! Connection lifecycle:
//! 1. Authenticate (middleware) and check the caller owns the session
//! 2. Upgrade and emit the currently open question, if any
//! 3. Process client frames strictly in arrival order
//! 4. A writer task drains outgoing events, flushing what is queued when
//!    the reader finishes
//!
//! Every client event goes through the same `AptitudeEngine` as the HTTP
//! routes. One `submit_response` yields `evaluation` then `question`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::adapters::http::error::{handle_aptitude_error, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{AptitudeEngine, SubmitResponseCommand};
use crate::domain::aptitude::AptitudeError;
use crate::domain::foundation::{QuestionId, SessionId, UserId};

use super::messages::{ClientMessage, ServerMessage};

/// Outgoing events buffered per connection.
const OUTBOUND_BUFFER: usize = 32;

/// How long queued events may take to flush after the client stops sending.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct LiveSessionState {
    pub engine: Arc<AptitudeEngine>,
}

impl LiveSessionState {
    pub fn new(engine: Arc<AptitudeEngine>) -> Self {
        Self { engine }
    }
}

/// GET /api/aptitude/:id/live
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(state): State<LiveSessionState>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let session_id: SessionId = match session_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return ErrorResponse::bad_request("Invalid session ID")
                .into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    if let Err(e) = state.engine.get_session(user.id.clone(), session_id).await {
        return handle_aptitude_error(e);
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state.engine, user.id, session_id))
}

async fn handle_socket(
    socket: WebSocket,
    engine: Arc<AptitudeEngine>,
    user_id: UserId,
    session_id: SessionId,
) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(OUTBOUND_BUFFER);

    tracing::info!(session_id = %session_id, user_id = %user_id, "live session connected");

    let mut send_task = tokio::spawn(forward_outbound(rx, sink));

    let recv_engine = engine.clone();
    let recv_user = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        if let Err(e) = greet(&recv_engine, &recv_user, session_id, &tx).await {
            tracing::debug!(session_id = %session_id, "failed to greet client: {}", e);
            return;
        }

        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let outcome = match ClientMessage::parse(&text) {
                        Ok(msg) => dispatch(&recv_engine, &recv_user, session_id, msg, &tx).await,
                        Err(error) => tx.send(error).await.map_err(|_| ChannelClosed),
                    };
                    if outcome.is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(session_id = %session_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    tracing::debug!(session_id = %session_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => {
            // The reader owned the last sender, so the writer stops once the queue is empty.
            if tokio::time::timeout(DRAIN_TIMEOUT, &mut send_task).await.is_err() {
                tracing::debug!(session_id = %session_id, "outbound drain timed out");
                send_task.abort();
            }
        }
    }

    tracing::info!(session_id = %session_id, "live session disconnected");
}

/// Writes queued events to the client until every sender is gone or the
/// client stops accepting frames.
pub async fn forward_outbound<S>(mut rx: mpsc::Receiver<ServerMessage>, mut sink: S)
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    while let Some(msg) = rx.recv().await {
        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode server message");
                continue;
            }
        };
        if let Err(e) = sink.send(Message::Text(json)).await {
            tracing::debug!("Send error, closing connection: {}", e);
            break;
        }
    }
}

/// The client hung up; stop processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

impl std::fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("outbound channel closed")
    }
}

/// Emits the open question so a reconnecting client can resume.
pub async fn greet(
    engine: &AptitudeEngine,
    user_id: &UserId,
    session_id: SessionId,
    out: &mpsc::Sender<ServerMessage>,
) -> Result<(), ChannelClosed> {
    match engine.get_session(user_id.clone(), session_id).await {
        Ok(session) => {
            if let Some(open) = session.open_attempt().filter(|_| session.status().is_mutable()) {
                emit(
                    out,
                    ServerMessage::Question {
                        question: open.question().into(),
                    },
                )
                .await?;
            }
            Ok(())
        }
        Err(e) => emit(out, (&e).into()).await,
    }
}

/// Handles one client event, emitting the resulting server events in order.
///
/// Engine failures become `error` events. Only a closed outbound channel
/// is returned as an error.
pub async fn dispatch(
    engine: &AptitudeEngine,
    user_id: &UserId,
    session_id: SessionId,
    message: ClientMessage,
    out: &mpsc::Sender<ServerMessage>,
) -> Result<(), ChannelClosed> {
    match message {
        ClientMessage::SubmitResponse {
            question_id,
            response,
            code,
        } => {
            let question_id = match QuestionId::new(question_id) {
                Ok(id) => id,
                Err(e) => return emit(out, (&AptitudeError::from(e)).into()).await,
            };
            let cmd = SubmitResponseCommand {
                user_id: user_id.clone(),
                session_id,
                question_id: question_id.clone(),
                response,
                code,
            };
            match engine.submit_response(cmd).await {
                Ok(result) => {
                    emit(
                        out,
                        ServerMessage::Evaluation {
                            question_id: question_id.to_string(),
                            evaluation: (&result.evaluation).into(),
                        },
                    )
                    .await?;
                    if let Some(next) = &result.next_question {
                        emit(out, ServerMessage::Question { question: next.into() }).await?;
                    }
                    Ok(())
                }
                Err(e) => emit(out, (&e).into()).await,
            }
        }

        ClientMessage::RequestHint { question_id } => {
            match engine.hint(user_id, &session_id).await {
                Ok(hint) => {
                    emit(
                        out,
                        ServerMessage::Hint {
                            question_id,
                            hint: hint.to_string(),
                        },
                    )
                    .await
                }
                Err(e) => emit(out, (&e).into()).await,
            }
        }

        ClientMessage::EndSession => match engine.complete(user_id.clone(), session_id).await {
            Ok(result) => match result.session.analysis() {
                Some(analysis) => {
                    emit(
                        out,
                        ServerMessage::Analysis {
                            analysis: analysis.into(),
                        },
                    )
                    .await
                }
                None => {
                    let err = AptitudeError::invalid_state("Completed session has no analysis");
                    emit(out, (&err).into()).await
                }
            },
            Err(e) => emit(out, (&e).into()).await,
        },

        ClientMessage::Ping => emit(out, ServerMessage::pong()).await,
    }
}

async fn emit(out: &mpsc::Sender<ServerMessage>, msg: ServerMessage) -> Result<(), ChannelClosed> {
    out.send(msg).await.map_err(|_| ChannelClosed)
}

pub fn websocket_router(state: LiveSessionState) -> Router {
    Router::new()
        .route("/api/aptitude/:id/live", get(ws_handler))
        .with_state(state)
}
