//! HTTP client for the external AI agent service.
//!
//! One client implements all four collaborator ports. Payloads are
//! snake_case JSON. Every response is validated before it becomes a domain
//! value; anything out of contract is reported as `InvalidResponse` so the
//! fallback decorator takes over.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::domain::aptitude::{
    Analysis, Difficulty, Evaluation, Question, QuestionAttempt, QuestionCategory, Score,
};
use crate::domain::foundation::QuestionId;
use crate::domain::roadmap::{ResourceKind, StageDescriptor, StageResource};
use crate::ports::{
    AgentError, QuestionGenerator, ResponseEvaluator, SessionAnalyzer, StageGenerator,
};

/// Connection settings for the agent service.
#[derive(Debug, Clone)]
pub struct AiServiceConfig {
    pub base_url: String,
    api_key: Option<Secret<String>>,
    pub timeout: Duration,
}

impl AiServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct AiServiceClient {
    config: AiServiceConfig,
    client: Client,
}

impl AiServiceClient {
    pub fn new(config: AiServiceConfig) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/agents/{}", self.config.base_url, path)
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, AgentError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AgentError::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else if e.is_connect() {
                AgentError::network(format!("Connection failed: {}", e))
            } else {
                AgentError::network(e.to_string())
            }
        })?;

        let response = Self::handle_response_status(response).await?;
        response
            .json::<Resp>()
            .await
            .map_err(|e| AgentError::invalid_response(format!("{}: {}", path, e)))
    }

    async fn handle_response_status(response: Response) -> Result<Response, AgentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(AgentError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateQuestionRequest<'a> {
    target_role: &'a str,
    difficulty: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireQuestion {
    #[serde(default)]
    id: Option<String>,
    question: String,
    question_type: String,
    #[serde(default)]
    difficulty: Option<i64>,
    #[serde(default)]
    code_template: Option<String>,
}

impl From<&Question> for WireQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: Some(q.id().to_string()),
            question: q.prompt().to_string(),
            question_type: q.category().as_str().to_string(),
            difficulty: Some(q.difficulty().value() as i64),
            code_template: q.starter_code().map(String::from),
        }
    }
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    question: WireQuestion,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct WireEvaluation {
    score: i64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    correct_answer: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireResponse<'a> {
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    time_spent: u32,
}

#[derive(Debug, Serialize)]
struct WireEvaluationOut<'a> {
    score: u8,
    feedback: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_answer: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct WireAttempt<'a> {
    question: WireQuestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<WireResponse<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluation: Option<WireEvaluationOut<'a>>,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    questions: Vec<WireAttempt<'a>>,
}

#[derive(Debug, Deserialize)]
struct WireAnalysis {
    overall_score: i64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    suggested_roadmap_updates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateStagesRequest<'a> {
    weaknesses: &'a [String],
    recommendations: &'a [String],
}

#[derive(Debug, Deserialize)]
struct WireResource {
    title: String,
    url: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStage {
    skill: String,
    #[serde(default)]
    estimated_hours: u32,
    #[serde(default)]
    resources: Vec<WireResource>,
    #[serde(default)]
    milestones: Vec<String>,
    #[serde(default)]
    xp_reward: u32,
}

fn invalid(err: impl std::fmt::Display) -> AgentError {
    AgentError::invalid_response(err.to_string())
}

impl WireQuestion {
    /// The service may drift from the requested level; the engine's
    /// adaptation rule is authoritative, so the requested level wins.
    fn into_question(self, requested: Difficulty) -> Result<Question, AgentError> {
        let id = match self.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => QuestionId::new(id).map_err(invalid)?,
            None => QuestionId::generate(),
        };
        let category = QuestionCategory::parse(&self.question_type).map_err(invalid)?;
        Question::new(id, self.question, category, requested, self.code_template).map_err(invalid)
    }
}

impl WireEvaluation {
    fn into_evaluation(self) -> Result<Evaluation, AgentError> {
        let score = Score::new(self.score).map_err(invalid)?;
        Ok(Evaluation::new(score, self.feedback, self.correct_answer))
    }
}

impl WireAnalysis {
    fn into_analysis(self) -> Result<Analysis, AgentError> {
        Analysis::new(
            self.overall_score,
            self.strengths,
            self.weaknesses,
            self.recommendations,
            self.suggested_roadmap_updates,
        )
        .map_err(invalid)
    }
}

impl WireStage {
    fn into_descriptor(self) -> Result<StageDescriptor, AgentError> {
        let resources = self
            .resources
            .into_iter()
            .map(|r| StageResource {
                title: r.title,
                url: r.url,
                kind: ResourceKind::parse_lenient(&r.kind),
                duration: r.duration,
            })
            .collect();
        StageDescriptor::new(
            self.skill,
            self.estimated_hours,
            resources,
            self.milestones,
            self.xp_reward,
        )
        .map_err(invalid)
    }
}

fn wire_attempt(attempt: &QuestionAttempt) -> WireAttempt<'_> {
    WireAttempt {
        question: WireQuestion::from(attempt.question()),
        response: attempt.response().map(|r| WireResponse {
            response: r.text(),
            code: r.code(),
            time_spent: r.time_spent_secs(),
        }),
        evaluation: attempt.evaluation().map(|e| WireEvaluationOut {
            score: e.score().value(),
            feedback: e.feedback(),
            correct_answer: e.reference_answer(),
        }),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Port implementations
// ════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl QuestionGenerator for AiServiceClient {
    async fn generate(
        &self,
        target_role: &str,
        difficulty: Difficulty,
    ) -> Result<Question, AgentError> {
        let body = GenerateQuestionRequest {
            target_role,
            difficulty: difficulty.value(),
        };
        let wire: WireQuestion = self.post("aptitude/generate-question", &body).await?;
        wire.into_question(difficulty)
    }
}

#[async_trait]
impl ResponseEvaluator for AiServiceClient {
    async fn evaluate(
        &self,
        question: &Question,
        response_text: &str,
        code: Option<&str>,
    ) -> Result<Evaluation, AgentError> {
        let body = EvaluateRequest {
            question: WireQuestion::from(question),
            response: response_text,
            code,
        };
        let wire: WireEvaluation = self.post("aptitude/evaluate", &body).await?;
        wire.into_evaluation()
    }
}

#[async_trait]
impl SessionAnalyzer for AiServiceClient {
    async fn analyze(&self, attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError> {
        let body = AnalyzeRequest {
            questions: attempts.iter().map(wire_attempt).collect(),
        };
        let wire: WireAnalysis = self.post("aptitude/analyze", &body).await?;
        wire.into_analysis()
    }
}

#[async_trait]
impl StageGenerator for AiServiceClient {
    async fn generate_stages(
        &self,
        weaknesses: &[String],
        recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, AgentError> {
        let body = GenerateStagesRequest {
            weaknesses,
            recommendations,
        };
        let wire: Vec<WireStage> = self.post("skill-gap/generate-stages", &body).await?;
        wire.into_iter().map(WireStage::into_descriptor).collect()
    }
}
