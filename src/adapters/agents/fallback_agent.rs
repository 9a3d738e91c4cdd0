//! Timeout + fallback decorator for the collaborator ports.
//!
//! `FallbackAgent` wraps a primary implementation (normally the remote agent
//! service) and a local one. Every call goes through `with_fallback`: the
//! primary gets a bounded amount of time, and any failure is logged and
//! answered by the local implementation instead. Callers cannot tell which
//! one produced the result.
//!
//! # Example
//!
//! ```ignore
//! let remote = AiServiceClient::new(config)?;
//! let agents = FallbackAgent::new(remote, LocalAgents::new(), Duration::from_secs(10));
//! let generator: Arc<dyn QuestionGenerator> = Arc::new(agents);
//! ```

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::aptitude::{Analysis, Difficulty, Evaluation, Question, QuestionAttempt};
use crate::domain::roadmap::StageDescriptor;
use crate::ports::{
    AgentError, QuestionGenerator, ResponseEvaluator, SessionAnalyzer, StageGenerator,
};

/// Run `primary` under `timeout`; on any error run `fallback` instead.
///
/// Only an error from the fallback itself is returned.
pub async fn with_fallback<T, P, F, FF>(
    operation: &'static str,
    timeout: Duration,
    primary: P,
    fallback: F,
) -> Result<T, AgentError>
where
    P: Future<Output = Result<T, AgentError>>,
    F: FnOnce() -> FF,
    FF: Future<Output = Result<T, AgentError>>,
{
    let outcome = match tokio::time::timeout(timeout, primary).await {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };

    match outcome {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(
                operation,
                error = %err,
                transient = err.is_transient(),
                "agent call failed, using local fallback"
            );
            fallback().await
        }
    }
}

/// Decorates a primary agent with a timeout and a local fallback.
pub struct FallbackAgent<P, F> {
    primary: Option<P>,
    fallback: F,
    timeout: Duration,
    fallbacks_used: AtomicU64,
}

impl<P, F> FallbackAgent<P, F> {
    pub fn new(primary: P, fallback: F, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            timeout,
            fallbacks_used: AtomicU64::new(0),
        }
    }

    /// No remote agent configured; every call is answered locally.
    pub fn local_only(fallback: F) -> Self {
        Self {
            primary: None,
            fallback,
            timeout: Duration::ZERO,
            fallbacks_used: AtomicU64::new(0),
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// How many calls were answered by the fallback since startup.
    pub fn fallbacks_used(&self) -> u64 {
        self.fallbacks_used.load(Ordering::Relaxed)
    }

    fn record_fallback(&self) {
        self.fallbacks_used.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl<P, F> QuestionGenerator for FallbackAgent<P, F>
where
    P: QuestionGenerator,
    F: QuestionGenerator,
{
    async fn generate(
        &self,
        target_role: &str,
        difficulty: Difficulty,
    ) -> Result<Question, AgentError> {
        let Some(primary) = &self.primary else {
            return self.fallback.generate(target_role, difficulty).await;
        };
        with_fallback(
            "generate_question",
            self.timeout,
            primary.generate(target_role, difficulty),
            || {
                self.record_fallback();
                self.fallback.generate(target_role, difficulty)
            },
        )
        .await
    }
}

#[async_trait]
impl<P, F> ResponseEvaluator for FallbackAgent<P, F>
where
    P: ResponseEvaluator,
    F: ResponseEvaluator,
{
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
        code: Option<&str>,
    ) -> Result<Evaluation, AgentError> {
        let Some(primary) = &self.primary else {
            return self.fallback.evaluate(question, response_text, code).await;
        };
        with_fallback(
            "evaluate_response",
            self.timeout,
            primary.evaluate(question, response_text, code),
            || {
                self.record_fallback();
                self.fallback.evaluate(question, response_text, code)
            },
        )
        .await
    }
}

#[async_trait]
impl<P, F> SessionAnalyzer for FallbackAgent<P, F>
where
    P: SessionAnalyzer,
    F: SessionAnalyzer,
{
    async fn analyze(&self, attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError> {
        let Some(primary) = &self.primary else {
            return self.fallback.analyze(attempts).await;
        };
        with_fallback(
            "analyze_session",
            self.timeout,
            primary.analyze(attempts),
            || {
                self.record_fallback();
                self.fallback.analyze(attempts)
            },
        )
        .await
    }
}

#[async_trait]
impl<P, F> StageGenerator for FallbackAgent<P, F>
where
    P: StageGenerator,
    F: StageGenerator,
{
    async fn generate_stages(
        &self,
        weaknesses: &[String],
        recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, AgentError> {
        let Some(primary) = &self.primary else {
            return self.fallback.generate_stages(weaknesses, recommendations).await;
        };
        with_fallback(
            "generate_stages",
            self.timeout,
            primary.generate_stages(weaknesses, recommendations),
            || {
                self.record_fallback();
                self.fallback.generate_stages(weaknesses, recommendations)
            },
        )
        .await
    }
}
