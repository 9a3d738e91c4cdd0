//! HTTP DTOs for aptitude endpoints.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::aptitude::{
    Analysis, AptitudeSession, Evaluation, Question, QuestionAttempt, QuestionCategory, Response,
};
use crate::domain::foundation::SessionStatus;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub target_role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub question_id: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub code: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Public fields of a question. Never carries an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub category: QuestionCategory,
    pub difficulty: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id().to_string(),
            prompt: q.prompt().to_string(),
            category: q.category(),
            difficulty: q.difficulty().value(),
            starter_code: q.starter_code().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationView {
    pub score: u8,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
}

impl From<&Evaluation> for EvaluationView {
    fn from(e: &Evaluation) -> Self {
        Self {
            score: e.score().value(),
            feedback: e.feedback().to_string(),
            reference_answer: e.reference_answer().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseView {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub time_spent_secs: u32,
    pub submitted_at: String,
}

impl From<&Response> for ResponseView {
    fn from(r: &Response) -> Self {
        Self {
            text: r.text().to_string(),
            code: r.code().map(String::from),
            time_spent_secs: r.time_spent_secs(),
            submitted_at: r.submitted_at().as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub question: QuestionView,
    pub asked_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationView>,
}

impl From<&QuestionAttempt> for AttemptView {
    fn from(a: &QuestionAttempt) -> Self {
        Self {
            question: a.question().into(),
            asked_at: a.asked_at().as_datetime().to_rfc3339(),
            response: a.response().map(Into::into),
            evaluation: a.evaluation().map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub suggested_roadmap_updates: Vec<String>,
}

impl From<&Analysis> for AnalysisView {
    fn from(a: &Analysis) -> Self {
        Self {
            overall_score: a.overall_score(),
            strengths: a.strengths().to_vec(),
            weaknesses: a.weaknesses().to_vec(),
            recommendations: a.recommendations().to_vec(),
            suggested_roadmap_updates: a.suggested_roadmap_updates().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub user_id: String,
    pub target_role: String,
    pub status: SessionStatus,
    pub attempts: Vec<AttemptView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisView>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<&AptitudeSession> for SessionView {
    fn from(s: &AptitudeSession) -> Self {
        Self {
            id: s.id().to_string(),
            user_id: s.user_id().to_string(),
            target_role: s.target_role().to_string(),
            status: s.status(),
            attempts: s.attempts().iter().map(Into::into).collect(),
            current_question: s.open_attempt().map(|a| a.question().into()),
            analysis: s.analysis().map(Into::into),
            created_at: s.created_at().as_datetime().to_rfc3339(),
            updated_at: s.updated_at().as_datetime().to_rfc3339(),
            completed_at: s.completed_at().map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Result of one submission. `nextQuestion` is `null` once the cap is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseView {
    pub evaluation: EvaluationView,
    pub next_question: Option<QuestionView>,
}
