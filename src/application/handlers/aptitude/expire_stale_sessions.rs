//! ExpireStaleSessionsHandler - policy for abandoned sessions.
//!
//! An active session untouched for longer than the TTL is closed:
//!
//! - with at least one answer: analyzed and marked completed (no roadmap feedback)
//! - with no answers: deleted
//!
//! Completed sessions are never touched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use super::SessionLocks;
use crate::domain::aptitude::{AptitudeError, QuestionAttempt};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{AptitudeSessionRepository, SessionAnalyzer};

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    pub completed: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl ExpiryReport {
    pub fn is_empty(&self) -> bool {
        self.completed == 0 && self.deleted == 0 && self.failed == 0
    }
}

enum Expired {
    Completed,
    Deleted,
    /// Touched again between the scan and taking the lock.
    Skipped,
}

pub struct ExpireStaleSessionsHandler {
    sessions: Arc<dyn AptitudeSessionRepository>,
    analyzer: Arc<dyn SessionAnalyzer>,
    locks: Arc<SessionLocks>,
    ttl_mins: i64,
}

impl ExpireStaleSessionsHandler {
    pub fn new(
        sessions: Arc<dyn AptitudeSessionRepository>,
        analyzer: Arc<dyn SessionAnalyzer>,
        locks: Arc<SessionLocks>,
        ttl_mins: i64,
    ) -> Self {
        Self {
            sessions,
            analyzer,
            locks,
            ttl_mins,
        }
    }

    /// Sweeps sessions whose last update is older than `now - ttl`.
    pub async fn handle(&self, now: Timestamp) -> Result<ExpiryReport, AptitudeError> {
        let cutoff = now.minus_minutes(self.ttl_mins);
        let stale = self.sessions.find_stale(&cutoff).await?;

        let mut report = ExpiryReport::default();
        for session in stale {
            let id = *session.id();
            match self.expire(&id, &cutoff).await {
                Ok(Expired::Completed) => report.completed += 1,
                Ok(Expired::Deleted) => report.deleted += 1,
                Ok(Expired::Skipped) => {}
                Err(err) => {
                    tracing::warn!(session_id = %id, error = %err, "failed to expire session");
                    report.failed += 1;
                }
            }
        }

        if !report.is_empty() {
            tracing::info!(
                completed = report.completed,
                deleted = report.deleted,
                failed = report.failed,
                "stale session sweep finished"
            );
        }
        Ok(report)
    }

    /// Sweeps every `period` until `shutdown` flips to true.
    pub async fn run(&self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("session sweeper stopping");
                        return;
                    }
                }
                _ = interval.tick() => {
                    if let Err(err) = self.handle(Timestamp::now()).await {
                        tracing::warn!(error = %err, "stale session sweep failed");
                    }
                }
            }
        }
    }

    async fn expire(&self, id: &SessionId, cutoff: &Timestamp) -> Result<Expired, AptitudeError> {
        let _guard = self.locks.acquire(id).await;
        let Some(mut session) = self.sessions.find_by_id(id).await? else {
            return Ok(Expired::Skipped);
        };
        if !session.is_stale(cutoff) {
            return Ok(Expired::Skipped);
        }

        if session.answered_count() == 0 {
            self.sessions.delete(id).await?;
            tracing::debug!(session_id = %id, "deleted abandoned session without answers");
            return Ok(Expired::Deleted);
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
            .map_err(|e| super::upstream_failure("session analysis", e))?;
        session.complete(analysis)?;
        self.sessions.update(&session).await?;
        tracing::debug!(session_id = %id, "auto-completed abandoned session");
        Ok(Expired::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::agents::MockAgents;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::aptitude::{
        Analysis, AptitudeSession, Difficulty, Evaluation, Question, QuestionCategory, Response,
        Score,
    };
    use crate::domain::foundation::{QuestionId, SessionStatus, UserId};

    fn question(id: &str) -> Question {
        Question::new(
            QuestionId::new(id).unwrap(),
            "Explain borrowing",
            QuestionCategory::Conceptual,
            Difficulty::STARTING,
            None,
        )
        .unwrap()
    }

    fn fresh() -> AptitudeSession {
        AptitudeSession::start(SessionId::new(), UserId::new("u").unwrap(), "Dev", question("q-1"))
            .unwrap()
    }

    fn answered() -> AptitudeSession {
        let mut s = fresh();
        let asked = *s.open_attempt().unwrap().asked_at();
        s.record_answer(
            &QuestionId::new("q-1").unwrap(),
            Response::new("text", None, asked, asked).unwrap(),
            Evaluation::new(Score::new(6).unwrap(), "ok", None),
        )
        .unwrap();
        s
    }

    fn handler(repo: &InMemorySessionRepository, agents: &MockAgents) -> ExpireStaleSessionsHandler {
        ExpireStaleSessionsHandler::new(
            Arc::new(repo.clone()),
            Arc::new(agents.clone()),
            Arc::new(SessionLocks::new()),
            30,
        )
    }

    fn later() -> Timestamp {
        Timestamp::now().plus_secs(31 * 60)
    }

    #[tokio::test]
    async fn answered_sessions_complete_and_empty_ones_are_deleted() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();
        let with_answers = answered();
        let without = fresh();
        repo.save(&with_answers).await.unwrap();
        repo.save(&without).await.unwrap();

        let report = handler(&repo, &agents).handle(later()).await.unwrap();

        assert_eq!(
            report,
            ExpiryReport {
                completed: 1,
                deleted: 1,
                failed: 0
            }
        );
        let closed = repo.find_by_id(with_answers.id()).await.unwrap().unwrap();
        assert_eq!(closed.status(), SessionStatus::Completed);
        assert!(closed.analysis().is_some());
        assert!(repo.find_by_id(without.id()).await.unwrap().is_none());
        assert_eq!(agents.stage_calls(), 0);
    }

    #[tokio::test]
    async fn recent_sessions_are_left_alone() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();
        repo.save(&fresh()).await.unwrap();

        let report = handler(&repo, &agents).handle(Timestamp::now()).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn completed_sessions_are_never_touched() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();
        let mut done = answered();
        done.complete(Analysis::new(60, vec![], vec![], vec![], vec![]).unwrap())
            .unwrap();
        repo.save(&done).await.unwrap();

        let report = handler(&repo, &agents).handle(later()).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(repo.find_by_id(done.id()).await.unwrap().unwrap(), done);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let repo = InMemorySessionRepository::new();
        let agents = MockAgents::new();
        let sweeper = Arc::new(handler(&repo, &agents));
        let (tx, rx) = watch::channel(false);

        let task = {
            let sweeper = sweeper.clone();
            tokio::spawn(async move { sweeper.run(Duration::from_millis(10), rx).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
