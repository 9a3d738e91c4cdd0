//! SubmitResponseHandler - one question/response/evaluation cycle.
//!
//! Under the session lock: load, check the open question, evaluate, record,
//! adapt difficulty, ask the next question while under the cap, persist.

use std::sync::Arc;

use super::{load_owned, upstream_failure, SessionLocks};
use crate::domain::aptitude::{AptitudeError, AptitudeSession, Evaluation, Question, Response};
use crate::domain::foundation::{QuestionId, SessionId, Timestamp, UserId};
use crate::ports::{AptitudeSessionRepository, QuestionGenerator, ResponseEvaluator};

#[derive(Debug, Clone)]
pub struct SubmitResponseCommand {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub response: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitResponseResult {
    pub evaluation: Evaluation,
    /// Absent once the session holds its maximum number of questions.
    pub next_question: Option<Question>,
    pub session: AptitudeSession,
}

pub struct SubmitResponseHandler {
    sessions: Arc<dyn AptitudeSessionRepository>,
    generator: Arc<dyn QuestionGenerator>,
    evaluator: Arc<dyn ResponseEvaluator>,
    locks: Arc<SessionLocks>,
}

impl SubmitResponseHandler {
    pub fn new(
        sessions: Arc<dyn AptitudeSessionRepository>,
        generator: Arc<dyn QuestionGenerator>,
        evaluator: Arc<dyn ResponseEvaluator>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            sessions,
            generator,
            evaluator,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitResponseCommand,
    ) -> Result<SubmitResponseResult, AptitudeError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;
        let mut session = load_owned(self.sessions.as_ref(), &cmd.user_id, &cmd.session_id).await?;

        let (question, asked_at) = {
            let open = session.attempt_for_submission(&cmd.question_id)?;
            (open.question().clone(), *open.asked_at())
        };
        let response = Response::new(cmd.response, cmd.code, asked_at, Timestamp::now())?;

        let evaluation = self
            .evaluator
            .evaluate(&question, response.text(), response.code())
            .await
            .map_err(|e| upstream_failure("response evaluation", e))?;

        let next_difficulty =
            session.record_answer(&cmd.question_id, response, evaluation.clone())?;

        let next_question = if session.has_capacity() {
            let generated = self
                .generator
                .generate(session.target_role(), next_difficulty)
                .await
                .map_err(|e| upstream_failure("question generation", e))?
                .with_difficulty(next_difficulty);
            session.ask(generated)?;
            session.open_attempt().map(|a| a.question().clone())
        } else {
            None
        };

        self.sessions.update(&session).await?;
        session.advance_version();

        tracing::info!(
            session_id = %cmd.session_id,
            question_id = %cmd.question_id,
            score = evaluation.score().value(),
            next_difficulty = next_difficulty.value(),
            answered = session.answered_count(),
            "response evaluated"
        );

        Ok(SubmitResponseResult {
            evaluation,
            next_question,
            session,
        })
    }
}
