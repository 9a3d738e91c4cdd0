//! CompleteSessionHandler - closes a session and feeds its gaps back into
//! the user's roadmap.
//!
//! The roadmap step runs only after the completed session is persisted. Its
//! failure is logged and never undoes or fails the completion.

use std::sync::Arc;

use super::{load_owned, upstream_failure, SessionLocks};
use crate::application::handlers::roadmap::{FeedbackOutcome, RoadmapFeedbackApplier};
use crate::domain::aptitude::{AptitudeError, AptitudeSession, QuestionAttempt};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{AptitudeSessionRepository, SessionAnalyzer};

#[derive(Debug, Clone)]
pub struct CompleteSessionCommand {
    pub user_id: UserId,
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct CompleteSessionResult {
    pub session: AptitudeSession,
    /// `None` when the roadmap step failed.
    pub feedback: Option<FeedbackOutcome>,
}

pub struct CompleteSessionHandler {
    sessions: Arc<dyn AptitudeSessionRepository>,
    analyzer: Arc<dyn SessionAnalyzer>,
    feedback: Arc<RoadmapFeedbackApplier>,
    locks: Arc<SessionLocks>,
}

impl CompleteSessionHandler {
    pub fn new(
        sessions: Arc<dyn AptitudeSessionRepository>,
        analyzer: Arc<dyn SessionAnalyzer>,
        feedback: Arc<RoadmapFeedbackApplier>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            sessions,
            analyzer,
            feedback,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompleteSessionCommand,
    ) -> Result<CompleteSessionResult, AptitudeError> {
        let guard = self.locks.acquire(&cmd.session_id).await;
        let mut session = load_owned(self.sessions.as_ref(), &cmd.user_id, &cmd.session_id).await?;
        if !session.status().is_mutable() {
            return Err(AptitudeError::invalid_state(format!(
                "Session {} is already completed",
                cmd.session_id
            )));
        }

        let answered: Vec<QuestionAttempt> = session
            .attempts()
            .iter()
            .filter(|a| a.is_answered())
            .cloned()
            .collect();
        let analysis = self
            .analyzer
            .analyze(&answered)
            .await
            .map_err(|e| upstream_failure("session analysis", e))?;

        session.complete(analysis)?;
        self.sessions.update(&session).await?;
        session.advance_version();
        drop(guard);

        let Some(analysis) = session.analysis() else {
            return Err(AptitudeError::invalid_state("Completed session has no analysis"));
        };
        tracing::info!(
            session_id = %cmd.session_id,
            overall_score = analysis.overall_score(),
            answered = answered.len(),
            "aptitude session completed"
        );

        let feedback = match self
            .feedback
            .apply_to_active_roadmap(&cmd.user_id, analysis.weaknesses(), analysis.recommendations())
            .await
        {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::error!(
                    session_id = %cmd.session_id,
                    user_id = %cmd.user_id,
                    error = %err,
                    "roadmap feedback failed; session completion stands"
                );
                None
            }
        };

        Ok(CompleteSessionResult { session, feedback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::MockAgents;
    use crate::adapters::storage::{InMemoryRoadmapRepository, InMemorySessionRepository};
    use crate::application::handlers::aptitude::{
        StartSessionCommand, StartSessionHandler, SubmitResponseCommand, SubmitResponseHandler,
    };
    use crate::domain::foundation::{RoadmapId, SessionStatus};
    use crate::domain::roadmap::Roadmap;
    use crate::ports::RoadmapRepository;

    struct Fixture {
        sessions: InMemorySessionRepository,
        roadmaps: InMemoryRoadmapRepository,
        agents: MockAgents,
        locks: Arc<SessionLocks>,
    }

    impl Fixture {
        fn new(agents: MockAgents) -> Self {
            Self {
                sessions: InMemorySessionRepository::new(),
                roadmaps: InMemoryRoadmapRepository::new(),
                agents,
                locks: Arc::new(SessionLocks::new()),
            }
        }

        fn handler(&self) -> CompleteSessionHandler {
            let applier = RoadmapFeedbackApplier::new(
                Arc::new(self.roadmaps.clone()),
                Arc::new(self.agents.clone()),
            );
            CompleteSessionHandler::new(
                Arc::new(self.sessions.clone()),
                Arc::new(self.agents.clone()),
                Arc::new(applier),
                self.locks.clone(),
            )
        }

        async fn started_and_answered(&self, answers: usize) -> AptitudeSession {
            let mut session =
                StartSessionHandler::new(Arc::new(self.sessions.clone()), Arc::new(self.agents.clone()))
                    .handle(StartSessionCommand {
                        user_id: user(),
                        target_role: "Backend Engineer".to_string(),
                    })
                    .await
                    .unwrap();
            let submitter = SubmitResponseHandler::new(
                Arc::new(self.sessions.clone()),
                Arc::new(self.agents.clone()),
                Arc::new(self.agents.clone()),
                self.locks.clone(),
            );
            for _ in 0..answers {
                let qid = session.open_attempt().unwrap().question().id().clone();
                session = submitter
                    .handle(SubmitResponseCommand {
                        user_id: user(),
                        session_id: *session.id(),
                        question_id: qid,
                        response: "answer".to_string(),
                        code: None,
                    })
                    .await
                    .unwrap()
                    .session;
            }
            session
        }

        async fn active_roadmap(&self) -> Roadmap {
            let mut roadmap = Roadmap::new(RoadmapId::new(), user(), "Plan", vec![]).unwrap();
            roadmap.activate().unwrap();
            self.roadmaps.save(&roadmap).await.unwrap();
            roadmap
        }
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn cmd(session: &AptitudeSession) -> CompleteSessionCommand {
        CompleteSessionCommand {
            user_id: user(),
            session_id: *session.id(),
        }
    }

    #[tokio::test]
    async fn completion_stores_analysis_and_drops_open_question() {
        let f = Fixture::new(MockAgents::new().with_scores([8, 6]));
        let session = f.started_and_answered(2).await;
        assert_eq!(session.attempts().len(), 3);

        let result = f.handler().handle(cmd(&session)).await.unwrap();

        assert_eq!(result.session.status(), SessionStatus::Completed);
        assert_eq!(result.session.attempts().len(), 2);
        assert_eq!(result.session.analysis().unwrap().overall_score(), 70);
        assert!(result.session.completed_at().is_some());
        let stored = f.sessions.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored, result.session);
    }

    #[tokio::test]
    async fn second_completion_is_invalid_state_without_reanalysis() {
        let f = Fixture::new(MockAgents::new());
        let session = f.started_and_answered(1).await;
        let handler = f.handler();

        handler.handle(cmd(&session)).await.unwrap();
        let err = handler.handle(cmd(&session)).await.unwrap_err();

        assert!(matches!(err, AptitudeError::InvalidState(_)));
        assert_eq!(f.agents.analyze_calls(), 1);
    }

    #[tokio::test]
    async fn completion_feeds_weaknesses_into_active_roadmap() {
        let f = Fixture::new(
            MockAgents::new().with_weaknesses(vec!["SQL".to_string(), "Caching".to_string()]),
        );
        let roadmap = f.active_roadmap().await;
        let session = f.started_and_answered(1).await;

        let result = f.handler().handle(cmd(&session)).await.unwrap();

        assert_eq!(result.feedback.unwrap().stages_added(), 2);
        let stored = f.roadmaps.find_by_id(roadmap.id()).await.unwrap().unwrap();
        assert_eq!(stored.stages().len(), 2);
    }

    #[tokio::test]
    async fn no_active_roadmap_is_silent() {
        let f = Fixture::new(MockAgents::new());
        let session = f.started_and_answered(1).await;

        let result = f.handler().handle(cmd(&session)).await.unwrap();

        assert_eq!(result.feedback, Some(FeedbackOutcome::NoActiveRoadmap));
        assert_eq!(f.roadmaps.count().await, 0);
    }

    #[tokio::test]
    async fn stage_generation_failure_does_not_fail_completion() {
        let f = Fixture::new(MockAgents::new().failing_stage_generation());
        let roadmap = f.active_roadmap().await;
        let session = f.started_and_answered(1).await;

        let result = f.handler().handle(cmd(&session)).await.unwrap();

        assert!(result.feedback.is_none());
        assert_eq!(result.session.status(), SessionStatus::Completed);
        let stored = f.roadmaps.find_by_id(roadmap.id()).await.unwrap().unwrap();
        assert!(stored.stages().is_empty());
    }

    #[tokio::test]
    async fn session_without_answers_completes_with_zero_score() {
        let f = Fixture::new(MockAgents::new());
        let session = f.started_and_answered(0).await;

        let result = f.handler().handle(cmd(&session)).await.unwrap();

        assert!(result.session.attempts().is_empty());
        assert_eq!(result.session.analysis().unwrap().overall_score(), 0);
    }
}
