//! Question generation port.

use async_trait::async_trait;

use super::AgentError;
use crate::domain::aptitude::{Difficulty, Question};

/// Produces the next interview question for a role at a difficulty.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        target_role: &str,
        difficulty: Difficulty,
    ) -> Result<Question, AgentError>;
}
