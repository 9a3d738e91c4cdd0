//! Aptitude-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, SessionId, ValidationError};

/// Errors surfaced by aptitude session operations.
///
/// Collaborator outages never appear here; they are absorbed by fallbacks
/// before reaching the session engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AptitudeError {
    /// Session absent or owned by someone else.
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// Submission did not address the currently open question.
    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// Optimistic version check failed at persistence time.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl AptitudeError {
    pub fn not_found(id: SessionId) -> Self {
        AptitudeError::NotFound(id)
    }

    pub fn question_not_found(id: QuestionId) -> Self {
        AptitudeError::QuestionNotFound(id)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        AptitudeError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AptitudeError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        AptitudeError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AptitudeError::NotFound(_) => ErrorCode::SessionNotFound,
            AptitudeError::QuestionNotFound(_) => ErrorCode::QuestionNotFound,
            AptitudeError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            AptitudeError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AptitudeError::Conflict(_) => ErrorCode::ConcurrentModification,
            AptitudeError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Caller mistakes, as opposed to server-side faults.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AptitudeError::Infrastructure(_))
    }
}

impl From<ValidationError> for AptitudeError {
    fn from(err: ValidationError) -> Self {
        AptitudeError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for AptitudeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrentModification => AptitudeError::Conflict(err.message),
            ErrorCode::InvalidStateTransition | ErrorCode::SessionCompleted => {
                AptitudeError::InvalidState(err.message)
            }
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => AptitudeError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => AptitudeError::Infrastructure(err.to_string()),
        }
    }
}
