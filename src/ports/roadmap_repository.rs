//! Roadmap repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoadmapId, UserId};
use crate::domain::roadmap::Roadmap;

/// Persistence for roadmaps. Same optimistic write contract as sessions.
#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    async fn save(&self, roadmap: &Roadmap) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `RoadmapNotFound` if the roadmap doesn't exist
    /// - `ConcurrentModification` on a stale version
    async fn update(&self, roadmap: &Roadmap) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &RoadmapId) -> Result<Option<Roadmap>, DomainError>;

    /// The user's most recently created active roadmap.
    async fn find_latest_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Roadmap>, DomainError>;
}
