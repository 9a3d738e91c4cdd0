//! Aptitude session aggregate.
//!
//! A session is one run of the adaptive interview for one user and target
//! role. It holds an ordered list of attempts, at most one of which is open
//! (asked but not yet answered) while the session is active.

use serde::{Deserialize, Serialize};

use super::{Analysis, AptitudeError, Difficulty, Evaluation, Question, QuestionAttempt, Response};
use crate::domain::foundation::{
    QuestionId, SessionId, SessionStatus, StateMachine, Timestamp, UserId, ValidationError,
};

/// Hard cap on attempts per session.
pub const MAX_ATTEMPTS: usize = 10;

/// Maximum length for the free-text target role.
pub const MAX_TARGET_ROLE_LENGTH: usize = 120;

/// Aptitude session aggregate.
///
/// # Invariants
///
/// - `attempts` is ordered by creation and never longer than `MAX_ATTEMPTS`
/// - while active, only the last attempt may be unanswered
/// - once completed, every attempt is answered and `analysis` is set
/// - completed sessions are never mutated again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AptitudeSession {
    id: SessionId,
    user_id: UserId,
    target_role: String,
    attempts: Vec<QuestionAttempt>,
    status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<Timestamp>,
    /// Bumped by repositories on every successful write.
    #[serde(default)]
    version: u64,
}

impl AptitudeSession {
    /// Start a session with its first question already open.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the target role is blank or too long
    pub fn start(
        id: SessionId,
        user_id: UserId,
        target_role: impl Into<String>,
        first_question: Question,
    ) -> Result<Self, AptitudeError> {
        let target_role = Self::validate_target_role(target_role)?;
        let now = Timestamp::now();
        Ok(Self {
            id,
            user_id,
            target_role,
            attempts: vec![QuestionAttempt::open(first_question, now)],
            status: SessionStatus::Active,
            analysis: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            version: 0,
        })
    }

    /// Trimmed target role, or why it is unacceptable.
    pub fn validate_target_role(raw: impl Into<String>) -> Result<String, ValidationError> {
        let role = raw.into().trim().to_string();
        if role.is_empty() {
            return Err(ValidationError::empty_field("target_role"));
        }
        let len = role.chars().count();
        if len > MAX_TARGET_ROLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "target_role",
                1,
                MAX_TARGET_ROLE_LENGTH as i64,
                len as i64,
            ));
        }
        Ok(role)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn target_role(&self) -> &str {
        &self.target_role
    }

    pub fn attempts(&self) -> &[QuestionAttempt] {
        &self.attempts
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The attempt awaiting a response, if any.
    pub fn open_attempt(&self) -> Option<&QuestionAttempt> {
        if !self.status.is_mutable() {
            return None;
        }
        self.attempts.last().filter(|a| !a.is_answered())
    }

    pub fn answered_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_answered()).count()
    }

    /// Another question may still be asked.
    pub fn has_capacity(&self) -> bool {
        self.attempts.len() < MAX_ATTEMPTS
    }

    /// Active with no activity since `cutoff`.
    pub fn is_stale(&self, cutoff: &Timestamp) -> bool {
        self.status.is_mutable() && self.updated_at.is_before(cutoff)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Sessions owned by someone else are reported as missing.
    pub fn authorize(&self, user_id: &UserId) -> Result<(), AptitudeError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(AptitudeError::not_found(self.id))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// The open attempt addressed by a submission.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session is completed or nothing is open
    /// - `QuestionNotFound` if `question_id` is not the open question
    pub fn attempt_for_submission(
        &self,
        question_id: &QuestionId,
    ) -> Result<&QuestionAttempt, AptitudeError> {
        self.ensure_active()?;
        let open = self.open_attempt().ok_or_else(|| {
            AptitudeError::invalid_state(
                "No open question; the session has reached its question limit and must be completed",
            )
        })?;
        if open.question().id() != question_id {
            return Err(AptitudeError::question_not_found(question_id.clone()));
        }
        Ok(open)
    }

    /// Record the answer to the open question.
    ///
    /// Returns the difficulty the next question should have.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        response: Response,
        evaluation: Evaluation,
    ) -> Result<Difficulty, AptitudeError> {
        let current = self.attempt_for_submission(question_id)?.question().difficulty();
        let next = current.next(evaluation.score());

        let attempt = self
            .attempts
            .last_mut()
            .ok_or_else(|| AptitudeError::invalid_state("Session has no attempts"))?;
        attempt.answer(response, evaluation);
        self.touch();
        Ok(next)
    }

    /// Append a new open question.
    ///
    /// A question whose id repeats one already asked gets a fresh id.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if completed, a question is already open, or the cap is reached
    pub fn ask(&mut self, question: Question) -> Result<(), AptitudeError> {
        self.ensure_active()?;
        if self.open_attempt().is_some() {
            return Err(AptitudeError::invalid_state(
                "A question is already awaiting a response",
            ));
        }
        if !self.has_capacity() {
            return Err(AptitudeError::invalid_state(format!(
                "Session already holds {} questions",
                MAX_ATTEMPTS
            )));
        }

        let question = if self.attempts.iter().any(|a| a.question().id() == question.id()) {
            question.with_id(QuestionId::generate())
        } else {
            question
        };
        self.attempts.push(QuestionAttempt::open(question, Timestamp::now()));
        self.touch();
        Ok(())
    }

    /// Close the session with its analysis.
    ///
    /// A trailing unanswered question is discarded so that every remaining
    /// attempt is answered.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already completed
    pub fn complete(&mut self, analysis: Analysis) -> Result<(), AptitudeError> {
        self.ensure_active()?;
        self.status = self
            .status
            .transition_to(SessionStatus::Completed)
            .map_err(|e| AptitudeError::invalid_state(e.to_string()))?;

        if self.attempts.last().is_some_and(|a| !a.is_answered()) {
            self.attempts.pop();
        }
        let now = Timestamp::now();
        self.analysis = Some(analysis);
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Called by repositories once a write has been accepted.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }

    fn ensure_active(&self) -> Result<(), AptitudeError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(AptitudeError::invalid_state(format!(
                "Session {} is already completed",
                self.id
            )))
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aptitude::{QuestionCategory, Score};

    fn question(id: &str, difficulty: i64) -> Question {
        Question::new(
            QuestionId::new(id).unwrap(),
            format!("Prompt for {}", id),
            QuestionCategory::Conceptual,
            Difficulty::new(difficulty).unwrap(),
            None,
        )
        .unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn new_session() -> AptitudeSession {
        AptitudeSession::start(SessionId::new(), user(), "Backend Engineer", question("q-1", 5))
            .unwrap()
    }

    fn answer(session: &mut AptitudeSession, score: i64) -> Difficulty {
        let open = session.open_attempt().unwrap();
        let qid = open.question().id().clone();
        let asked = *open.asked_at();
        let response = Response::new("my answer", None, asked, Timestamp::now()).unwrap();
        let evaluation = Evaluation::new(Score::new(score).unwrap(), "feedback", None);
        session.record_answer(&qid, response, evaluation).unwrap()
    }

    fn analysis() -> Analysis {
        Analysis::new(70, vec![], vec!["Recursion".into()], vec![], vec![]).unwrap()
    }

    #[test]
    fn start_opens_exactly_one_question() {
        let session = new_session();
        assert_eq!(session.attempts().len(), 1);
        assert_eq!(session.status(), SessionStatus::Active);
        assert!(session.open_attempt().is_some());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn start_rejects_blank_role() {
        let result = AptitudeSession::start(SessionId::new(), user(), "   ", question("q-1", 5));
        assert!(matches!(result, Err(AptitudeError::ValidationFailed { .. })));
    }

    #[test]
    fn start_trims_role() {
        let session =
            AptitudeSession::start(SessionId::new(), user(), "  SRE ", question("q-1", 5)).unwrap();
        assert_eq!(session.target_role(), "SRE");
    }

    #[test]
    fn record_answer_returns_adapted_difficulty() {
        let mut session = new_session();
        assert_eq!(answer(&mut session, 9).value(), 6);
        assert!(session.open_attempt().is_none());
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn submission_against_other_question_is_not_found_and_changes_nothing() {
        let mut session = new_session();
        let before = session.clone();
        let now = Timestamp::now();
        let result = session.record_answer(
            &QuestionId::new("q-other").unwrap(),
            Response::new("x", None, now, now).unwrap(),
            Evaluation::new(Score::new(5).unwrap(), "", None),
        );
        assert!(matches!(result, Err(AptitudeError::QuestionNotFound(_))));
        assert_eq!(session, before);
    }

    #[test]
    fn answered_question_cannot_be_resubmitted() {
        let mut session = new_session();
        answer(&mut session, 6);
        session.ask(question("q-2", 5)).unwrap();

        let now = Timestamp::now();
        let result = session.record_answer(
            &QuestionId::new("q-1").unwrap(),
            Response::new("again", None, now, now).unwrap(),
            Evaluation::new(Score::new(5).unwrap(), "", None),
        );
        assert!(matches!(result, Err(AptitudeError::QuestionNotFound(_))));
    }

    #[test]
    fn ask_refuses_while_a_question_is_open() {
        let mut session = new_session();
        assert!(matches!(
            session.ask(question("q-2", 5)),
            Err(AptitudeError::InvalidState(_))
        ));
    }

    #[test]
    fn ask_renames_duplicate_question_ids() {
        let mut session = new_session();
        answer(&mut session, 6);
        session.ask(question("q-1", 5)).unwrap();
        let ids: Vec<_> = session.attempts().iter().map(|a| a.question().id().clone()).collect();
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn session_never_exceeds_cap() {
        let mut session = new_session();
        for i in 2..=MAX_ATTEMPTS {
            answer(&mut session, 6);
            session.ask(question(&format!("q-{}", i), 5)).unwrap();
        }
        answer(&mut session, 6);
        assert_eq!(session.attempts().len(), MAX_ATTEMPTS);
        assert!(!session.has_capacity());
        assert!(session.ask(question("q-11", 5)).is_err());
        assert_eq!(session.attempts().len(), MAX_ATTEMPTS);
    }

    #[test]
    fn submit_with_nothing_open_is_invalid_state() {
        let mut session = new_session();
        answer(&mut session, 6);
        let now = Timestamp::now();
        let result = session.record_answer(
            &QuestionId::new("q-1").unwrap(),
            Response::new("x", None, now, now).unwrap(),
            Evaluation::new(Score::new(5).unwrap(), "", None),
        );
        assert!(matches!(result, Err(AptitudeError::InvalidState(_))));
    }

    #[test]
    fn complete_discards_trailing_open_question() {
        let mut session = new_session();
        answer(&mut session, 8);
        session.ask(question("q-2", 6)).unwrap();

        session.complete(analysis()).unwrap();

        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.attempts().len(), 1);
        assert!(session.attempts().iter().all(|a| a.is_answered()));
        assert!(session.analysis().is_some());
        assert!(session.completed_at().is_some());
    }

    #[test]
    fn complete_twice_is_invalid_state_and_keeps_first_analysis() {
        let mut session = new_session();
        answer(&mut session, 8);
        session.complete(analysis()).unwrap();

        let other = Analysis::new(10, vec![], vec![], vec![], vec![]).unwrap();
        assert!(matches!(
            session.complete(other),
            Err(AptitudeError::InvalidState(_))
        ));
        assert_eq!(session.analysis().unwrap().overall_score(), 70);
    }

    #[test]
    fn completed_session_rejects_submissions() {
        let mut session = new_session();
        let qid = session.open_attempt().unwrap().question().id().clone();
        session.complete(analysis()).unwrap();

        let now = Timestamp::now();
        let result = session.record_answer(
            &qid,
            Response::new("late", None, now, now).unwrap(),
            Evaluation::new(Score::new(5).unwrap(), "", None),
        );
        assert!(matches!(result, Err(AptitudeError::InvalidState(_))));
    }

    #[test]
    fn non_owner_sees_not_found() {
        let session = new_session();
        let stranger = UserId::new("someone-else").unwrap();
        assert!(matches!(
            session.authorize(&stranger),
            Err(AptitudeError::NotFound(_))
        ));
        assert!(session.authorize(&user()).is_ok());
    }

    #[test]
    fn staleness_only_applies_to_active_sessions() {
        let mut session = new_session();
        let future = Timestamp::now().plus_secs(60);
        assert!(session.is_stale(&future));
        session.complete(analysis()).unwrap();
        assert!(!session.is_stale(&future));
    }

    #[test]
    fn json_round_trip_preserves_attempts() {
        let mut session = new_session();
        answer(&mut session, 9);
        session.ask(question("q-2", 6)).unwrap();
        answer(&mut session, 3);
        session.ask(question("q-3", 5)).unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let restored: AptitudeSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);

        session.complete(analysis()).unwrap();
        let json = serde_json::to_string(&session).unwrap();
        let restored: AptitudeSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
        assert_eq!(restored.attempts()[1].question().id().as_str(), "q-2");
    }
}
