//! Response evaluation port.

use async_trait::async_trait;

use super::AgentError;
use crate::domain::aptitude::{Evaluation, Question};

/// Scores a candidate's response to a question on a 0..=10 scale.
#[async_trait]
pub trait ResponseEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
        code: Option<&str>,
    ) -> Result<Evaluation, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_evaluator_is_object_safe() {
        fn _accepts_dyn(_e: &dyn ResponseEvaluator) {}
    }
}
