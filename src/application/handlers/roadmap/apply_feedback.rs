//! RoadmapFeedbackApplier - appends stages derived from assessment gaps.
//!
//! Two entry points share one write path:
//!
//! - `apply_to_active_roadmap` runs after an aptitude session completes and
//!   targets the caller's most recent active roadmap, if any
//! - `handle` serves the standalone endpoint against a named roadmap
//!
//! Both only append. Existing stages are never reordered or removed.

use std::sync::Arc;

use crate::domain::foundation::{RoadmapId, StageId, UserId};
use crate::domain::roadmap::{AppendedStages, Roadmap, RoadmapError, StageDescriptor};
use crate::ports::{RoadmapRepository, StageGenerator};

/// Version conflicts are retried against a fresh copy this many times.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Command for the standalone "update my roadmap from these gaps" endpoint.
#[derive(Debug, Clone)]
pub struct ApplyFeedbackCommand {
    pub user_id: UserId,
    pub roadmap_id: RoadmapId,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// What the post-completion feedback loop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// The user has no active roadmap. Nothing was created.
    NoActiveRoadmap,

    /// The generator produced no stages.
    NothingToApply { roadmap_id: RoadmapId },

    Applied {
        roadmap_id: RoadmapId,
        stage_ids: Vec<StageId>,
        hours_added: u32,
    },
}

impl FeedbackOutcome {
    pub fn stages_added(&self) -> usize {
        match self {
            FeedbackOutcome::Applied { stage_ids, .. } => stage_ids.len(),
            _ => 0,
        }
    }
}

pub struct RoadmapFeedbackApplier {
    roadmaps: Arc<dyn RoadmapRepository>,
    stage_generator: Arc<dyn StageGenerator>,
}

impl RoadmapFeedbackApplier {
    pub fn new(
        roadmaps: Arc<dyn RoadmapRepository>,
        stage_generator: Arc<dyn StageGenerator>,
    ) -> Self {
        Self {
            roadmaps,
            stage_generator,
        }
    }

    /// Appends stages to the user's most recently created active roadmap.
    ///
    /// A user without one is a no-op, not an error.
    pub async fn apply_to_active_roadmap(
        &self,
        user_id: &UserId,
        weaknesses: &[String],
        recommendations: &[String],
    ) -> Result<FeedbackOutcome, RoadmapError> {
        let Some(roadmap) = self.roadmaps.find_latest_active_by_user(user_id).await? else {
            tracing::debug!(user_id = %user_id, "no active roadmap, skipping feedback");
            return Ok(FeedbackOutcome::NoActiveRoadmap);
        };
        let roadmap_id = *roadmap.id();

        let descriptors = self.generate(weaknesses, recommendations).await?;
        if descriptors.is_empty() {
            tracing::info!(roadmap_id = %roadmap_id, "stage generator returned nothing");
            return Ok(FeedbackOutcome::NothingToApply { roadmap_id });
        }

        let target = WriteTarget::LatestActive(user_id);
        let Some((roadmap, appended)) = self.append_and_store(roadmap, descriptors, target).await?
        else {
            tracing::debug!(user_id = %user_id, "active roadmap went away during feedback");
            return Ok(FeedbackOutcome::NoActiveRoadmap);
        };
        let roadmap_id = *roadmap.id();
        tracing::info!(
            roadmap_id = %roadmap_id,
            stages = appended.count(),
            hours = appended.hours_added,
            "roadmap feedback applied"
        );
        Ok(FeedbackOutcome::Applied {
            roadmap_id,
            stage_ids: appended.stage_ids,
            hours_added: appended.hours_added,
        })
    }

    /// Standalone entry point: append stages to a roadmap the caller owns.
    pub async fn handle(&self, cmd: ApplyFeedbackCommand) -> Result<Roadmap, RoadmapError> {
        let weaknesses = non_blank(cmd.weaknesses);
        if weaknesses.is_empty() {
            return Err(RoadmapError::validation(
                "weaknesses",
                "at least one weakness is required",
            ));
        }
        let recommendations = non_blank(cmd.recommendations);

        let roadmap = self.load_owned(&cmd.user_id, &cmd.roadmap_id).await?;
        let descriptors = self.generate(&weaknesses, &recommendations).await?;
        if descriptors.is_empty() {
            return Ok(roadmap);
        }

        let (roadmap, appended) = self
            .append_and_store(roadmap, descriptors, WriteTarget::Named)
            .await?
            .ok_or(RoadmapError::NotFound(cmd.roadmap_id))?;
        tracing::info!(
            roadmap_id = %cmd.roadmap_id,
            stages = appended.count(),
            "roadmap updated from submitted gaps"
        );
        Ok(roadmap)
    }

    async fn generate(
        &self,
        weaknesses: &[String],
        recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, RoadmapError> {
        self.stage_generator
            .generate_stages(weaknesses, recommendations)
            .await
            .map_err(|e| RoadmapError::infrastructure(format!("Stage generation failed: {}", e)))
    }

    async fn load_owned(
        &self,
        user_id: &UserId,
        roadmap_id: &RoadmapId,
    ) -> Result<Roadmap, RoadmapError> {
        let roadmap = self
            .roadmaps
            .find_by_id(roadmap_id)
            .await?
            .ok_or(RoadmapError::NotFound(*roadmap_id))?;
        roadmap.authorize(user_id)?;
        Ok(roadmap)
    }

    /// Appends and persists, reloading on version conflicts. Progress is
    /// recomputed explicitly before every write.
    ///
    /// Returns `None` when the reload finds nothing left to write to.
    async fn append_and_store(
        &self,
        mut roadmap: Roadmap,
        descriptors: Vec<StageDescriptor>,
        target: WriteTarget<'_>,
    ) -> Result<Option<(Roadmap, AppendedStages)>, RoadmapError> {
        let mut attempt = 1;
        loop {
            let mut updated = roadmap.clone();
            let appended = updated.append_stages(descriptors.clone())?;
            updated.recalculate_progress();

            match self.roadmaps.update(&updated).await.map_err(RoadmapError::from) {
                Ok(()) => {
                    updated.advance_version();
                    return Ok(Some((updated, appended)));
                }
                Err(RoadmapError::Conflict(message)) if attempt < MAX_WRITE_ATTEMPTS => {
                    tracing::debug!(
                        roadmap_id = %roadmap.id(),
                        attempt,
                        %message,
                        "retrying roadmap write"
                    );
                    attempt += 1;
                    let reloaded = match target {
                        WriteTarget::LatestActive(user_id) => {
                            self.roadmaps.find_latest_active_by_user(user_id).await?
                        }
                        WriteTarget::Named => self.roadmaps.find_by_id(roadmap.id()).await?,
                    };
                    let Some(reloaded) = reloaded else {
                        return Ok(None);
                    };
                    roadmap = reloaded;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Which roadmap a retried write should reload.
#[derive(Debug, Clone, Copy)]
enum WriteTarget<'a> {
    /// Whatever is the user's latest active roadmap at reload time.
    LatestActive(&'a UserId),
    /// The roadmap originally loaded, whatever its status.
    Named,
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::{MockAgents, MOCK_STAGE_HOURS};
    use crate::adapters::storage::InMemoryRoadmapRepository;
    use crate::domain::foundation::DomainError;
    use crate::domain::roadmap::{
        LearningStage, RoadmapStatus, StageStatus, FEEDBACK_POSITION_BASE,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Lets another writer land a copy of the roadmap just before the first
    /// update goes through, so that update hits a version conflict.
    struct InterleavingRepository {
        inner: InMemoryRoadmapRepository,
        pending: Mutex<Option<Roadmap>>,
    }

    #[async_trait]
    impl RoadmapRepository for InterleavingRepository {
        async fn save(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
            self.inner.save(roadmap).await
        }

        async fn update(&self, roadmap: &Roadmap) -> Result<(), DomainError> {
            let pending = self.pending.lock().unwrap().take();
            if let Some(other) = pending {
                self.inner.update(&other).await?;
            }
            self.inner.update(roadmap).await
        }

        async fn find_by_id(&self, id: &RoadmapId) -> Result<Option<Roadmap>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn find_latest_active_by_user(
            &self,
            user_id: &UserId,
        ) -> Result<Option<Roadmap>, DomainError> {
            self.inner.find_latest_active_by_user(user_id).await
        }
    }

    fn completed(roadmap: &Roadmap) -> Roadmap {
        let mut value = serde_json::to_value(roadmap).unwrap();
        value["status"] = serde_json::json!("completed");
        serde_json::from_value(value).unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn stage(position: u32, hours: u32, status: StageStatus) -> LearningStage {
        LearningStage::from_descriptor(
            StageId::new(format!("stage-{}", position)).unwrap(),
            position,
            StageDescriptor::new(format!("Skill {}", position), hours, vec![], vec![], 100)
                .unwrap(),
        )
        .with_status(status)
    }

    async fn seeded_roadmap(repo: &InMemoryRoadmapRepository, owner: &UserId) -> Roadmap {
        let mut roadmap = Roadmap::new(
            RoadmapId::new(),
            owner.clone(),
            "Backend path",
            vec![
                stage(1, 10, StageStatus::Completed),
                stage(2, 20, StageStatus::Available),
            ],
        )
        .unwrap();
        roadmap.activate().unwrap();
        repo.save(&roadmap).await.unwrap();
        roadmap
    }

    fn applier(repo: &InMemoryRoadmapRepository, agents: &MockAgents) -> RoadmapFeedbackApplier {
        RoadmapFeedbackApplier::new(Arc::new(repo.clone()), Arc::new(agents.clone()))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn appends_one_locked_stage_per_weakness() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &user()).await;

        let outcome = applier(&repo, &agents)
            .apply_to_active_roadmap(&user(), &strings(&["SQL", "Caching"]), &[])
            .await
            .unwrap();

        assert_eq!(outcome.stages_added(), 2);
        let stored = repo.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.stages().len(), 4);
        assert_eq!(&stored.stages()[..2], original.stages());
        assert_eq!(
            stored.total_estimated_hours(),
            original.total_estimated_hours() + 2 * MOCK_STAGE_HOURS
        );
        let appended = &stored.stages()[2..];
        assert!(appended.iter().all(|s| s.status() == StageStatus::Locked));
        assert_eq!(appended[0].position(), FEEDBACK_POSITION_BASE);
        assert_eq!(appended[1].position(), FEEDBACK_POSITION_BASE + 1);
    }

    #[tokio::test]
    async fn progress_is_recomputed_against_new_stage_count() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &user()).await;
        assert_eq!(original.progress(), 50);

        applier(&repo, &agents)
            .apply_to_active_roadmap(&user(), &strings(&["SQL", "Caching"]), &[])
            .await
            .unwrap();

        let stored = repo.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.progress(), 25);
    }

    #[tokio::test]
    async fn conflict_retry_appends_to_reloaded_roadmap() {
        let inner = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&inner, &user()).await;
        let repo = InterleavingRepository {
            inner: inner.clone(),
            pending: Mutex::new(Some(original.clone())),
        };

        let outcome = RoadmapFeedbackApplier::new(Arc::new(repo), Arc::new(agents.clone()))
            .apply_to_active_roadmap(&user(), &strings(&["SQL"]), &[])
            .await
            .unwrap();

        assert_eq!(outcome.stages_added(), 1);
        let stored = inner.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.stages().len(), 3);
        assert_eq!(stored.version(), original.version() + 2);
    }

    #[tokio::test]
    async fn roadmap_completed_during_retry_is_left_alone() {
        let inner = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&inner, &user()).await;
        let repo = InterleavingRepository {
            inner: inner.clone(),
            pending: Mutex::new(Some(completed(&original))),
        };

        let outcome = RoadmapFeedbackApplier::new(Arc::new(repo), Arc::new(agents.clone()))
            .apply_to_active_roadmap(&user(), &strings(&["SQL"]), &[])
            .await
            .unwrap();

        assert_eq!(outcome, FeedbackOutcome::NoActiveRoadmap);
        let stored = inner.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), RoadmapStatus::Completed);
        assert_eq!(stored.stages(), original.stages());
    }

    #[tokio::test]
    async fn missing_active_roadmap_is_a_no_op() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();

        let outcome = applier(&repo, &agents)
            .apply_to_active_roadmap(&user(), &strings(&["SQL"]), &[])
            .await
            .unwrap();

        assert_eq!(outcome, FeedbackOutcome::NoActiveRoadmap);
        assert_eq!(repo.count().await, 0);
        assert_eq!(agents.stage_calls(), 0);
    }

    #[tokio::test]
    async fn empty_generation_leaves_roadmap_alone() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &user()).await;

        let outcome = applier(&repo, &agents)
            .apply_to_active_roadmap(&user(), &[], &[])
            .await
            .unwrap();

        assert_eq!(
            outcome,
            FeedbackOutcome::NothingToApply {
                roadmap_id: *original.id()
            }
        );
        let stored = repo.find_by_id(original.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), original.version());
    }

    #[tokio::test]
    async fn generator_failure_is_reported() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new().failing_stage_generation();
        seeded_roadmap(&repo, &user()).await;

        let err = applier(&repo, &agents)
            .apply_to_active_roadmap(&user(), &strings(&["SQL"]), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, RoadmapError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn standalone_update_returns_updated_roadmap() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &user()).await;

        let updated = applier(&repo, &agents)
            .handle(ApplyFeedbackCommand {
                user_id: user(),
                roadmap_id: *original.id(),
                weaknesses: strings(&["Concurrency", "  "]),
                recommendations: strings(&["Read about async"]),
            })
            .await
            .unwrap();

        assert_eq!(updated.stages().len(), 3);
        assert_eq!(updated.stages()[2].skill(), "Practice: Concurrency");
        assert_eq!(updated.version(), original.version() + 1);
    }

    #[tokio::test]
    async fn standalone_update_requires_weaknesses() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &user()).await;

        let err = applier(&repo, &agents)
            .handle(ApplyFeedbackCommand {
                user_id: user(),
                roadmap_id: *original.id(),
                weaknesses: strings(&[" "]),
                recommendations: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RoadmapError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn standalone_update_hides_foreign_roadmaps() {
        let repo = InMemoryRoadmapRepository::new();
        let agents = MockAgents::new();
        let original = seeded_roadmap(&repo, &UserId::new("someone-else").unwrap()).await;

        let err = applier(&repo, &agents)
            .handle(ApplyFeedbackCommand {
                user_id: user(),
                roadmap_id: *original.id(),
                weaknesses: strings(&["SQL"]),
                recommendations: vec![],
            })
            .await
            .unwrap_err();

        assert_eq!(err, RoadmapError::NotFound(*original.id()));
    }
}
