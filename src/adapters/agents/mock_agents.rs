//! Scriptable agent double for tests.
//!
//! Implements all four collaborator ports with predictable output:
//! queued scores, configurable weaknesses, optional delay and failure
//! injection, and per-port call counts.
//!
//! # Example
//!
//! ```ignore
//! let agents = MockAgents::new().with_scores([9, 3]);
//! let eval = agents.evaluate(&question, "answer", None).await?;
//! assert_eq!(eval.score().value(), 9);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::domain::aptitude::{
    overall_score, Analysis, Difficulty, Evaluation, Question, QuestionAttempt, QuestionCategory,
    Score,
};
use crate::domain::foundation::QuestionId;
use crate::domain::roadmap::StageDescriptor;
use crate::ports::{
    AgentError, QuestionGenerator, ResponseEvaluator, SessionAnalyzer, StageGenerator,
};

/// Score used once the queue is empty.
pub const MOCK_DEFAULT_SCORE: u8 = 7;

/// Hours assigned to each mock stage.
pub const MOCK_STAGE_HOURS: u32 = 12;

#[derive(Debug, Default)]
struct MockState {
    scores: Mutex<VecDeque<u8>>,
    weaknesses: Mutex<Vec<String>>,
    fail_all: AtomicBool,
    fail_stages: AtomicBool,
    generate_calls: AtomicU32,
    evaluate_calls: AtomicU32,
    analyze_calls: AtomicU32,
    stage_calls: AtomicU32,
}

#[derive(Debug, Clone, Default)]
pub struct MockAgents {
    state: Arc<MockState>,
    delay: Duration,
}

impl MockAgents {
    pub fn new() -> Self {
        let agents = Self::default();
        agents.set_weaknesses(vec!["Data structures".to_string()]);
        agents
    }

    /// Scores handed out by `evaluate`, in order.
    pub fn with_scores(self, scores: impl IntoIterator<Item = u8>) -> Self {
        self.queue_scores(scores);
        self
    }

    pub fn with_weaknesses(self, weaknesses: Vec<String>) -> Self {
        self.set_weaknesses(weaknesses);
        self
    }

    /// Every port fails with `Unavailable`.
    pub fn failing(self) -> Self {
        self.state.fail_all.store(true, Ordering::SeqCst);
        self
    }

    /// Only stage generation fails.
    pub fn failing_stage_generation(self) -> Self {
        self.state.fail_stages.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn queue_scores(&self, scores: impl IntoIterator<Item = u8>) {
        self.state
            .scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(scores);
    }

    pub fn set_weaknesses(&self, weaknesses: Vec<String>) {
        *self
            .state
            .weaknesses
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = weaknesses;
    }

    pub fn generate_calls(&self) -> u32 {
        self.state.generate_calls.load(Ordering::SeqCst)
    }

    pub fn evaluate_calls(&self) -> u32 {
        self.state.evaluate_calls.load(Ordering::SeqCst)
    }

    pub fn analyze_calls(&self) -> u32 {
        self.state.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn stage_calls(&self) -> u32 {
        self.state.stage_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn check_failure(&self) -> Result<(), AgentError> {
        if self.state.fail_all.load(Ordering::SeqCst) {
            return Err(AgentError::unavailable("mock agents configured to fail"));
        }
        Ok(())
    }

    fn next_score(&self) -> u8 {
        self.state
            .scores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(MOCK_DEFAULT_SCORE)
    }

    fn weaknesses(&self) -> Vec<String> {
        self.state
            .weaknesses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn invalid(err: impl std::fmt::Display) -> AgentError {
    AgentError::invalid_response(err.to_string())
}

#[async_trait]
impl QuestionGenerator for MockAgents {
    async fn generate(
        &self,
        target_role: &str,
        difficulty: Difficulty,
    ) -> Result<Question, AgentError> {
        let n = self.state.generate_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pause().await;
        self.check_failure()?;
        Question::new(
            QuestionId::new(format!("q-mock-{}", n)).map_err(invalid)?,
            format!("Mock question {} for {}", n, target_role),
            QuestionCategory::Conceptual,
            difficulty,
            None,
        )
        .map_err(invalid)
    }
}

#[async_trait]
impl ResponseEvaluator for MockAgents {
    async fn evaluate(
        &self,
        _question: &Question,
        _response_text: &str,
        _code: Option<&str>,
    ) -> Result<Evaluation, AgentError> {
        self.state.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_failure()?;
        let score = Score::new(self.next_score() as i64).map_err(invalid)?;
        Ok(Evaluation::new(
            score,
            format!("Mock feedback for a {}", score),
            Some("Mock reference answer".to_string()),
        ))
    }
}

#[async_trait]
impl SessionAnalyzer for MockAgents {
    async fn analyze(&self, attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError> {
        self.state.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_failure()?;
        let weaknesses = self.weaknesses();
        let recommendations = weaknesses
            .iter()
            .map(|w| format!("Practice {}", w))
            .collect();
        Analysis::new(
            overall_score(attempts) as i64,
            vec!["Communication".to_string()],
            weaknesses.clone(),
            recommendations,
            weaknesses,
        )
        .map_err(invalid)
    }
}

#[async_trait]
impl StageGenerator for MockAgents {
    async fn generate_stages(
        &self,
        weaknesses: &[String],
        _recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, AgentError> {
        self.state.stage_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.check_failure()?;
        if self.state.fail_stages.load(Ordering::SeqCst) {
            return Err(AgentError::Http {
                status: 502,
                message: "mock stage generation failure".to_string(),
            });
        }
        weaknesses
            .iter()
            .map(|w| {
                StageDescriptor::new(
                    format!("Practice: {}", w),
                    MOCK_STAGE_HOURS,
                    vec![],
                    vec![format!("Finish {} drills", w)],
                    300,
                )
                .map_err(invalid)
            })
            .collect()
    }
}
