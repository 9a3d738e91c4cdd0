//! StartSessionHandler - opens a session with its first question.

use std::sync::Arc;

use super::upstream_failure;
use crate::domain::aptitude::{AptitudeError, AptitudeSession, Difficulty};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{AptitudeSessionRepository, QuestionGenerator};

#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub user_id: UserId,
    pub target_role: String,
}

pub struct StartSessionHandler {
    sessions: Arc<dyn AptitudeSessionRepository>,
    generator: Arc<dyn QuestionGenerator>,
}

impl StartSessionHandler {
    pub fn new(
        sessions: Arc<dyn AptitudeSessionRepository>,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            sessions,
            generator,
        }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<AptitudeSession, AptitudeError> {
        let target_role = AptitudeSession::validate_target_role(cmd.target_role)?;

        let question = self
            .generator
            .generate(&target_role, Difficulty::STARTING)
            .await
            .map_err(|e| upstream_failure("question generation", e))?
            .with_difficulty(Difficulty::STARTING);

        let session = AptitudeSession::start(SessionId::new(), cmd.user_id, target_role, question)?;
        self.sessions.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            user_id = %session.user_id(),
            target_role = session.target_role(),
            "aptitude session started"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::MockAgents;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::foundation::SessionStatus;

    fn handler(repo: &InMemorySessionRepository, agents: &MockAgents) -> StartSessionHandler {
        StartSessionHandler::new(Arc::new(repo.clone()), Arc::new(agents.clone()))
    }

    #[tokio::test]
    async fn opens_session_with_one_question_at_starting_difficulty() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();

        let session = handler(&repo, &agents)
            .handle(StartSessionCommand {
                user_id: UserId::new("user-1").unwrap(),
                target_role: "  Backend Engineer ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(session.target_role(), "Backend Engineer");
        assert_eq!(session.attempts().len(), 1);
        let open = session.open_attempt().unwrap();
        assert_eq!(open.question().difficulty(), Difficulty::STARTING);
        assert!(repo.find_by_id(session.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blank_role_is_rejected_before_generation() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();

        let err = handler(&repo, &agents)
            .handle(StartSessionCommand {
                user_id: UserId::new("user-1").unwrap(),
                target_role: "   ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AptitudeError::ValidationFailed { .. }));
        assert_eq!(agents.generate_calls(), 0);
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn bare_generator_failure_surfaces_as_infrastructure() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new().failing();

        let err = handler(&repo, &agents)
            .handle(StartSessionCommand {
                user_id: UserId::new("user-1").unwrap(),
                target_role: "SRE".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AptitudeError::Infrastructure(_)));
    }
}
