//! Session-level summary produced once, at completion.

use serde::{Deserialize, Serialize};

use super::QuestionAttempt;
use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    overall_score: u8,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    recommendations: Vec<String>,
    suggested_roadmap_updates: Vec<String>,
}

impl Analysis {
    pub const MAX_OVERALL: u8 = 100;

    pub fn new(
        overall_score: i64,
        strengths: Vec<String>,
        weaknesses: Vec<String>,
        recommendations: Vec<String>,
        suggested_roadmap_updates: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if !(0..=Self::MAX_OVERALL as i64).contains(&overall_score) {
            return Err(ValidationError::out_of_range(
                "overall_score",
                0,
                Self::MAX_OVERALL as i64,
                overall_score,
            ));
        }
        Ok(Self {
            overall_score: overall_score as u8,
            strengths: tidy(strengths),
            weaknesses: tidy(weaknesses),
            recommendations: tidy(recommendations),
            suggested_roadmap_updates: tidy(suggested_roadmap_updates),
        })
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn weaknesses(&self) -> &[String] {
        &self.weaknesses
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    pub fn suggested_roadmap_updates(&self) -> &[String] {
        &self.suggested_roadmap_updates
    }
}

/// Mean of the answered attempt scores scaled to 0..=100.
///
/// Unanswered attempts are ignored; no answers at all yields 0.
pub fn overall_score(attempts: &[QuestionAttempt]) -> u8 {
    let scores: Vec<u32> = attempts
        .iter()
        .filter_map(|a| a.score())
        .map(|s| s.value() as u32)
        .collect();
    if scores.is_empty() {
        return 0;
    }
    let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
    (mean * 10.0).round().clamp(0.0, Analysis::MAX_OVERALL as f64) as u8
}

// Trims entries, drops blanks and repeats, keeps first-seen order.
fn tidy(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aptitude::{
        Difficulty, Evaluation, Question, QuestionCategory, Response, Score,
    };
    use crate::domain::foundation::{QuestionId, Timestamp};
    use proptest::prelude::*;

    fn answered(score: i64) -> QuestionAttempt {
        let q = Question::new(
            QuestionId::generate(),
            "Explain the event loop",
            QuestionCategory::Conceptual,
            Difficulty::STARTING,
            None,
        )
        .unwrap();
        let now = Timestamp::now();
        let mut attempt = QuestionAttempt::open(q, now);
        attempt.answer(
            Response::new("answer", None, now, now).unwrap(),
            Evaluation::new(Score::new(score).unwrap(), "ok", None),
        );
        attempt
    }

    #[test]
    fn rejects_overall_above_hundred() {
        assert!(Analysis::new(101, vec![], vec![], vec![], vec![]).is_err());
        assert!(Analysis::new(-1, vec![], vec![], vec![], vec![]).is_err());
    }

    #[test]
    fn tidies_tag_lists() {
        let a = Analysis::new(
            50,
            vec![" Recursion ".into(), "Recursion".into(), "".into()],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(a.strengths(), &["Recursion".to_string()]);
    }

    #[test]
    fn overall_score_is_mean_times_ten() {
        let attempts = vec![answered(9), answered(6), answered(7)];
        assert_eq!(overall_score(&attempts), 73);
    }

    #[test]
    fn overall_score_of_nothing_is_zero() {
        assert_eq!(overall_score(&[]), 0);
    }

    proptest! {
        #[test]
        fn overall_score_stays_within_bounds(scores in proptest::collection::vec(0i64..=10, 0..10)) {
            let attempts: Vec<_> = scores.iter().map(|s| answered(*s)).collect();
            let overall = overall_score(&attempts);
            prop_assert!(overall <= 100);
        }
    }
}
