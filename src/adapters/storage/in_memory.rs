//! In-memory repositories.
//!
//! Documents live in `RwLock<HashMap>`s. Used in tests and for single-node
//! development runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::aptitude::AptitudeSession;
use crate::domain::foundation::{
    DomainError, ErrorCode, RoadmapId, SessionId, Timestamp, UserId,
};
use crate::domain::roadmap::Roadmap;
use crate::ports::{AptitudeSessionRepository, RoadmapRepository};

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, AptitudeSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl AptitudeSessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &AptitudeSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(session.id()) {
            return Err(DomainError::conflict("Session", session.id()));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &AptitudeSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(session.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;
        if stored.version() != session.version() {
            return Err(DomainError::conflict("Session", session.id()));
        }
        let mut next = session.clone();
        next.advance_version();
        *stored = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<AptitudeSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_stale(&self, cutoff: &Timestamp) -> Result<Vec<AptitudeSession>, DomainError> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.is_stale(cutoff))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRoadmapRepository {
    roadmaps: Arc<RwLock<HashMap<RoadmapId, Roadmap>>>,
}

impl InMemoryRoadmapRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.roadmaps.read().await.len()
    }
}

/// Most recently created active roadmap among `candidates`.
pub(super) fn latest_active<'a>(
    candidates: impl Iterator<Item = &'a Roadmap>,
    user_id: &UserId,
) -> Option<&'a Roadmap> {
    candidates
        .filter(|r| r.is_owner(user_id) && r.is_active())
        .max_by_key(|r| *r.created_at())
}

#[async_trait]
impl RoadmapRepository for InMemoryRoadmapRepository {
    async fn save(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
        let mut roadmaps = self.roadmaps.write().await;
        if roadmaps.contains_key(roadmap.id()) {
            return Err(DomainError::conflict("Roadmap", roadmap.id()));
        }
        roadmaps.insert(*roadmap.id(), roadmap.clone());
        Ok(())
    }

    async fn update(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
        let mut roadmaps = self.roadmaps.write().await;
        let stored = roadmaps.get_mut(roadmap.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::RoadmapNotFound,
                format!("Roadmap not found: {}", roadmap.id()),
            )
        })?;
        if stored.version() != roadmap.version() {
            return Err(DomainError::conflict("Roadmap", roadmap.id()));
        }
        let mut next = roadmap.clone();
        next.advance_version();
        *stored = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &RoadmapId) -> Result<Option<Roadmap>, DomainError> {
        Ok(self.roadmaps.read().await.get(id).cloned())
    }

    async fn find_latest_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Roadmap>, DomainError> {
        let roadmaps = self.roadmaps.read().await;
        Ok(latest_active(roadmaps.values(), user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aptitude::{Difficulty, Question, QuestionCategory};
    use crate::domain::foundation::QuestionId;

    fn session() -> AptitudeSession {
        let q = Question::new(
            QuestionId::generate(),
            "Explain ownership",
            QuestionCategory::Conceptual,
            Difficulty::STARTING,
            None,
        )
        .unwrap();
        AptitudeSession::start(SessionId::new(), UserId::new("u-1").unwrap(), "Rust dev", q)
            .unwrap()
    }

    fn roadmap(user: &str) -> Roadmap {
        let mut r = Roadmap::new(RoadmapId::new(), UserId::new(user).unwrap(), "Plan", vec![])
            .unwrap();
        r.activate().unwrap();
        r
    }

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemorySessionRepository::new();
        let s = session();
        repo.save(&s).await.unwrap();
        assert_eq!(repo.find_by_id(s.id()).await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn save_twice_conflicts() {
        let repo = InMemorySessionRepository::new();
        let s = session();
        repo.save(&s).await.unwrap();
        let err = repo.save(&s).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
    }

    #[tokio::test]
    async fn update_bumps_version_and_rejects_stale_copies() {
        let repo = InMemorySessionRepository::new();
        let s = session();
        repo.save(&s).await.unwrap();

        repo.update(&s).await.unwrap();
        let stored = repo.find_by_id(s.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 1);

        let err = repo.update(&s).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
    }

    #[tokio::test]
    async fn update_of_missing_session_is_not_found() {
        let repo = InMemorySessionRepository::new();
        let err = repo.update(&session()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn find_stale_uses_cutoff() {
        let repo = InMemorySessionRepository::new();
        repo.save(&session()).await.unwrap();

        let past = Timestamp::now().minus_minutes(60);
        assert!(repo.find_stale(&past).await.unwrap().is_empty());

        let future = Timestamp::now().plus_secs(60);
        assert_eq!(repo.find_stale(&future).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemorySessionRepository::new();
        let s = session();
        repo.save(&s).await.unwrap();
        repo.delete(s.id()).await.unwrap();
        repo.delete(s.id()).await.unwrap();
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn latest_active_roadmap_prefers_newest() {
        let repo = InMemoryRoadmapRepository::new();
        let older = roadmap("u-1");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = roadmap("u-1");
        let draft = Roadmap::new(RoadmapId::new(), UserId::new("u-1").unwrap(), "Draft", vec![])
            .unwrap();
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();
        repo.save(&draft).await.unwrap();
        repo.save(&roadmap("someone-else")).await.unwrap();

        let found = repo
            .find_latest_active_by_user(&UserId::new("u-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), newer.id());
    }

    #[tokio::test]
    async fn no_active_roadmap_is_none() {
        let repo = InMemoryRoadmapRepository::new();
        let found = repo
            .find_latest_active_by_user(&UserId::new("nobody").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
