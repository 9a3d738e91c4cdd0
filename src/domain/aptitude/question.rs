//! Questions posed during an aptitude session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Difficulty;
use crate::domain::foundation::{QuestionId, ValidationError};

/// What kind of thinking a question exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Conceptual,
    Coding,
    Scenario,
}

impl QuestionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Conceptual => "conceptual",
            QuestionCategory::Coding => "coding",
            QuestionCategory::Scenario => "scenario",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conceptual" => Ok(QuestionCategory::Conceptual),
            "coding" => Ok(QuestionCategory::Coding),
            "scenario" => Ok(QuestionCategory::Scenario),
            other => Err(ValidationError::invalid_format(
                "question_type",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    category: QuestionCategory,
    difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starter_code: Option<String>,
}

impl Question {
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        category: QuestionCategory,
        difficulty: Difficulty,
        starter_code: Option<String>,
    ) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ValidationError::empty_field("prompt"));
        }
        Ok(Self {
            id,
            prompt,
            category,
            difficulty,
            starter_code: starter_code.filter(|code| !code.trim().is_empty()),
        })
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn category(&self) -> QuestionCategory {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn starter_code(&self) -> Option<&str> {
        self.starter_code.as_deref()
    }

    /// Same question under a different id.
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = id;
        self
    }

    /// Same question pinned to a difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}
