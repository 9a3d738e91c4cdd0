//! Roadmap-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, RoadmapId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoadmapError {
    /// Roadmap absent or owned by someone else.
    #[error("Roadmap not found: {0}")]
    NotFound(RoadmapId),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl RoadmapError {
    pub fn not_found(id: RoadmapId) -> Self {
        RoadmapError::NotFound(id)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        RoadmapError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RoadmapError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        RoadmapError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RoadmapError::NotFound(_) => ErrorCode::RoadmapNotFound,
            RoadmapError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            RoadmapError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            RoadmapError::Conflict(_) => ErrorCode::ConcurrentModification,
            RoadmapError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for RoadmapError {
    fn from(err: ValidationError) -> Self {
        RoadmapError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for RoadmapError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrentModification => RoadmapError::Conflict(err.message),
            ErrorCode::InvalidStateTransition => RoadmapError::InvalidState(err.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => RoadmapError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => RoadmapError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_code() {
        assert_eq!(
            RoadmapError::not_found(RoadmapId::new()).code(),
            ErrorCode::RoadmapNotFound
        );
    }

    #[test]
    fn conflict_maps_from_domain_error() {
        let err: RoadmapError = DomainError::conflict("Roadmap", "r-1").into();
        assert_eq!(err.code(), ErrorCode::ConcurrentModification);
    }
}
