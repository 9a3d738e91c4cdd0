//! Session analysis port.

use async_trait::async_trait;

use super::AgentError;
use crate::domain::aptitude::{Analysis, QuestionAttempt};

/// Summarizes a finished run of attempts into an analysis.
#[async_trait]
pub trait SessionAnalyzer: Send + Sync {
    async fn analyze(&self, attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError>;
}
