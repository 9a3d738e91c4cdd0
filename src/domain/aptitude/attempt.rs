//! One question together with its eventual response and evaluation.

use serde::{Deserialize, Serialize};

use super::{Question, Score};
use crate::domain::foundation::{Timestamp, ValidationError};

/// What the candidate submitted for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    time_spent_secs: u32,
    submitted_at: Timestamp,
}

impl Response {
    /// Builds a response, measuring time spent from when the question was asked.
    ///
    /// Either the text or the code must carry something.
    pub fn new(
        text: impl Into<String>,
        code: Option<String>,
        asked_at: Timestamp,
        submitted_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        let code = code.filter(|c| !c.trim().is_empty());
        if text.trim().is_empty() && code.is_none() {
            return Err(ValidationError::empty_field("response"));
        }
        Ok(Self {
            text,
            code,
            time_spent_secs: submitted_at.secs_since(&asked_at),
            submitted_at,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }
}

/// Score and feedback for a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    score: Score,
    feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_answer: Option<String>,
}

impl Evaluation {
    pub fn new(score: Score, feedback: impl Into<String>, reference_answer: Option<String>) -> Self {
        Self {
            score,
            feedback: feedback.into(),
            reference_answer: reference_answer.filter(|a| !a.trim().is_empty()),
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn reference_answer(&self) -> Option<&str> {
        self.reference_answer.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAttempt {
    question: Question,
    asked_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<Response>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    evaluation: Option<Evaluation>,
}

impl QuestionAttempt {
    /// An attempt awaiting its response.
    pub fn open(question: Question, asked_at: Timestamp) -> Self {
        Self {
            question,
            asked_at,
            response: None,
            evaluation: None,
        }
    }

    /// Rebuild an attempt from stored parts, without validation.
    pub fn reconstitute(
        question: Question,
        asked_at: Timestamp,
        response: Option<Response>,
        evaluation: Option<Evaluation>,
    ) -> Self {
        Self {
            question,
            asked_at,
            response,
            evaluation,
        }
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn asked_at(&self) -> &Timestamp {
        &self.asked_at
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    pub fn is_answered(&self) -> bool {
        self.response.is_some() && self.evaluation.is_some()
    }

    pub fn score(&self) -> Option<Score> {
        self.evaluation.as_ref().map(Evaluation::score)
    }

    pub(super) fn answer(&mut self, response: Response, evaluation: Evaluation) {
        self.response = Some(response);
        self.evaluation = Some(evaluation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aptitude::{Difficulty, QuestionCategory};
    use crate::domain::foundation::QuestionId;

    fn open_attempt() -> QuestionAttempt {
        let q = Question::new(
            QuestionId::new("q-1").unwrap(),
            "Explain closures",
            QuestionCategory::Conceptual,
            Difficulty::STARTING,
            None,
        )
        .unwrap();
        QuestionAttempt::open(q, Timestamp::now())
    }

    #[test]
    fn response_measures_time_spent() {
        let asked = Timestamp::now();
        let r = Response::new("answer", None, asked, asked.plus_secs(75)).unwrap();
        assert_eq!(r.time_spent_secs(), 75);
    }

    #[test]
    fn response_requires_text_or_code() {
        let now = Timestamp::now();
        assert!(Response::new(" ", None, now, now).is_err());
        assert!(Response::new("", Some("fn main() {}".into()), now, now).is_ok());
    }

    #[test]
    fn open_attempt_is_not_answered_until_both_parts_exist() {
        let mut attempt = open_attempt();
        assert!(!attempt.is_answered());
        assert_eq!(attempt.score(), None);

        let now = Timestamp::now();
        attempt.answer(
            Response::new("a closure captures its scope", None, now, now).unwrap(),
            Evaluation::new(Score::new(7).unwrap(), "Solid", None),
        );
        assert!(attempt.is_answered());
        assert_eq!(attempt.score().map(|s| s.value()), Some(7));
    }
}
