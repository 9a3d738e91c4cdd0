//! Errors shared by the four AI collaborator ports.

use thiserror::Error;

/// Why a collaborator call did not produce a usable result.
///
/// These never reach API callers: the fallback decorator converts every one
/// of them into a locally computed substitute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    #[error("agent call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("agent returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The call succeeded but the payload broke the contract.
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
}

impl AgentError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// A retry might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AgentError::Timeout { .. } | AgentError::Network(_) | AgentError::Unavailable(_) => {
                true
            }
            AgentError::Http { status, .. } => *status >= 500 || *status == 429,
            AgentError::InvalidResponse(_) => false,
        }
    }
}
