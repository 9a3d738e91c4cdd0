//! AptitudeEngine - the single session engine behind both transports.
//!
//! HTTP handlers and the real-time channel call the same methods, so a given
//! sequence of requests yields the same sequence of results on either.

use std::sync::Arc;

use super::{
    load_owned, CompleteSessionCommand, CompleteSessionHandler, CompleteSessionResult,
    ExpireStaleSessionsHandler, GetSessionHandler, GetSessionQuery, SessionLocks,
    StartSessionCommand, StartSessionHandler, SubmitResponseCommand, SubmitResponseHandler,
    SubmitResponseResult,
};
use crate::application::handlers::roadmap::RoadmapFeedbackApplier;
use crate::domain::aptitude::{hint_for, AptitudeError, AptitudeSession};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{
    AptitudeSessionRepository, QuestionGenerator, ResponseEvaluator, RoadmapRepository,
    SessionAnalyzer, StageGenerator,
};

/// Everything the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn AptitudeSessionRepository>,
    pub roadmaps: Arc<dyn RoadmapRepository>,
    pub generator: Arc<dyn QuestionGenerator>,
    pub evaluator: Arc<dyn ResponseEvaluator>,
    pub analyzer: Arc<dyn SessionAnalyzer>,
    pub stage_generator: Arc<dyn StageGenerator>,
}

pub struct AptitudeEngine {
    sessions: Arc<dyn AptitudeSessionRepository>,
    start: StartSessionHandler,
    submit: SubmitResponseHandler,
    complete: CompleteSessionHandler,
    get: GetSessionHandler,
    sweeper: Arc<ExpireStaleSessionsHandler>,
    feedback: Arc<RoadmapFeedbackApplier>,
}

impl AptitudeEngine {
    /// `session_ttl_mins` is the inactivity threshold used by the sweeper.
    pub fn new(collaborators: Collaborators, session_ttl_mins: i64) -> Self {
        let Collaborators {
            sessions,
            roadmaps,
            generator,
            evaluator,
            analyzer,
            stage_generator,
        } = collaborators;

        let locks = Arc::new(SessionLocks::new());
        let feedback = Arc::new(RoadmapFeedbackApplier::new(roadmaps, stage_generator));

        Self {
            start: StartSessionHandler::new(sessions.clone(), generator.clone()),
            submit: SubmitResponseHandler::new(
                sessions.clone(),
                generator,
                evaluator,
                locks.clone(),
            ),
            complete: CompleteSessionHandler::new(
                sessions.clone(),
                analyzer.clone(),
                feedback.clone(),
                locks.clone(),
            ),
            get: GetSessionHandler::new(sessions.clone()),
            sweeper: Arc::new(ExpireStaleSessionsHandler::new(
                sessions.clone(),
                analyzer,
                locks,
                session_ttl_mins,
            )),
            feedback,
            sessions,
        }
    }

    pub async fn start(
        &self,
        user_id: UserId,
        target_role: impl Into<String>,
    ) -> Result<AptitudeSession, AptitudeError> {
        self.start
            .handle(StartSessionCommand {
                user_id,
                target_role: target_role.into(),
            })
            .await
    }

    pub async fn submit_response(
        &self,
        cmd: SubmitResponseCommand,
    ) -> Result<SubmitResponseResult, AptitudeError> {
        self.submit.handle(cmd).await
    }

    pub async fn complete(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<CompleteSessionResult, AptitudeError> {
        self.complete
            .handle(CompleteSessionCommand {
                user_id,
                session_id,
            })
            .await
    }

    pub async fn get_session(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<AptitudeSession, AptitudeError> {
        self.get
            .handle(GetSessionQuery {
                user_id,
                session_id,
            })
            .await
    }

    /// Static guidance for the open question. Reads, never writes.
    pub async fn hint(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<&'static str, AptitudeError> {
        let session = load_owned(self.sessions.as_ref(), user_id, session_id).await?;
        let category = session
            .open_attempt()
            .filter(|_| session.status().is_mutable())
            .map(|a| a.question().category());
        Ok(hint_for(category))
    }

    pub fn sweeper(&self) -> Arc<ExpireStaleSessionsHandler> {
        self.sweeper.clone()
    }

    pub fn feedback_applier(&self) -> Arc<RoadmapFeedbackApplier> {
        self.feedback.clone()
    }
}
