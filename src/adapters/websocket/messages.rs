//! Real-time channel protocol.
//!
//! Every frame is a JSON object with a `type` tag:
//!
//! - Client → Server: `submit_response`, `request_hint`, `end_session`, `ping`
//! - Server → Client: `question`, `evaluation`, `hint`, `analysis`, `error`, `pong`

use serde::{Deserialize, Serialize};

use crate::adapters::http::aptitude::{AnalysisView, EvaluationView, QuestionView};
use crate::domain::aptitude::AptitudeError;
use crate::domain::foundation::{ErrorCode, Timestamp};

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Question {
        question: QuestionView,
    },

    #[serde(rename_all = "camelCase")]
    Evaluation {
        question_id: String,
        evaluation: EvaluationView,
    },

    #[serde(rename_all = "camelCase")]
    Hint {
        #[serde(skip_serializing_if = "Option::is_none")]
        question_id: Option<String>,
        hint: String,
    },

    Analysis {
        analysis: AnalysisView,
    },

    Error {
        code: String,
        message: String,
    },

    Pong {
        timestamp: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn pong() -> Self {
        ServerMessage::Pong {
            timestamp: Timestamp::now().as_datetime().to_rfc3339(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error { .. })
    }
}

impl From<&AptitudeError> for ServerMessage {
    fn from(err: &AptitudeError) -> Self {
        ServerMessage::error(err.code(), err.message())
    }
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    SubmitResponse {
        question_id: String,
        #[serde(default)]
        response: String,
        #[serde(default)]
        code: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    RequestHint {
        #[serde(default)]
        question_id: Option<String>,
    },

    EndSession,

    Ping,
}

impl ClientMessage {
    /// Parses one text frame. Malformed frames become an `error` event.
    pub fn parse(text: &str) -> Result<Self, ServerMessage> {
        serde_json::from_str(text).map_err(|e| {
            ServerMessage::error(ErrorCode::InvalidFormat, format!("Malformed message: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submit_response_parses_camel_case_fields() {
        let msg = ClientMessage::parse(
            r#"{"type":"submit_response","questionId":"q-1","response":"hi","code":"fn x(){}"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SubmitResponse {
                question_id: "q-1".into(),
                response: "hi".into(),
                code: Some("fn x(){}".into()),
            }
        );
    }

    #[test]
    fn bare_events_parse() {
        assert_eq!(
            ClientMessage::parse(r#"{"type":"end_session"}"#).unwrap(),
            ClientMessage::EndSession
        );
        assert_eq!(
            ClientMessage::parse(r#"{"type":"request_hint"}"#).unwrap(),
            ClientMessage::RequestHint { question_id: None }
        );
        assert_eq!(ClientMessage::parse(r#"{"type":"ping"}"#).unwrap(), ClientMessage::Ping);
    }

    #[test]
    fn unknown_type_becomes_error_event() {
        let err = ClientMessage::parse(r#"{"type":"teleport"}"#).unwrap_err();
        assert!(err.is_error());
    }

    #[test]
    fn server_events_are_tagged() {
        let hint = ServerMessage::Hint {
            question_id: Some("q-1".into()),
            hint: "Think".into(),
        };
        assert_eq!(
            serde_json::to_value(hint).unwrap(),
            json!({"type": "hint", "questionId": "q-1", "hint": "Think"})
        );

        let error = ServerMessage::error(ErrorCode::SessionNotFound, "gone");
        assert_eq!(
            serde_json::to_value(error).unwrap(),
            json!({"type": "error", "code": "SESSION_NOT_FOUND", "message": "gone"})
        );
    }
}
