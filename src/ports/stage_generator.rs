//! Roadmap stage generation port.

use async_trait::async_trait;

use super::AgentError;
use crate::domain::roadmap::StageDescriptor;

/// Proposes learning stages that address identified weaknesses.
#[async_trait]
pub trait StageGenerator: Send + Sync {
    async fn generate_stages(
        &self,
        weaknesses: &[String],
        recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, AgentError>;
}
