//! Deterministic local stand-ins for the AI agents.
//!
//! Used whenever the agent service is unreachable, slow or off-contract, and
//! as the only implementation when no service is configured. Output has the
//! same shape as the real service's.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::aptitude::{
    overall_score, Analysis, Difficulty, Evaluation, Question, QuestionAttempt, QuestionCategory,
    Score,
};
use crate::domain::foundation::QuestionId;
use crate::domain::roadmap::{ResourceKind, StageDescriptor, StageResource};
use crate::ports::{
    AgentError, QuestionGenerator, ResponseEvaluator, SessionAnalyzer, StageGenerator,
};

const CODE_TEMPLATE: &str = "// Write your solution here\nfunction solution() {\n  \n}";

static QUESTION_BANK: Lazy<HashMap<QuestionCategory, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        (
            QuestionCategory::Conceptual,
            vec![
                "Explain closures and give a practical example of where you would use one.",
                "Explain how the JavaScript event loop works and why it's important.",
                "What is the difference between SQL and NoSQL databases?",
                "Describe the lifecycle of an HTTP request in a web application you have built.",
            ],
        ),
        (
            QuestionCategory::Coding,
            vec![
                "Write a function that implements debouncing.",
                "Create a simple Promise-based sleep function.",
                "Implement a function to deep clone an object.",
            ],
        ),
        (
            QuestionCategory::Scenario,
            vec![
                "How would you design a URL shortener service?",
                "How would you design a real-time chat application?",
                "How would you optimize a slow database query?",
            ],
        ),
    ])
});

/// Strength tag earned per category when a score is 7 or higher.
fn strength_tag(category: QuestionCategory) -> &'static str {
    match category {
        QuestionCategory::Conceptual => "Strong theoretical understanding",
        QuestionCategory::Coding => "Good coding skills",
        QuestionCategory::Scenario => "Strong system design thinking",
    }
}

/// Weakness tag recorded per category when a score is 5 or lower.
fn weakness_tag(category: QuestionCategory) -> &'static str {
    match category {
        QuestionCategory::Conceptual => "Conceptual foundations need work",
        QuestionCategory::Coding => "Coding practice recommended",
        QuestionCategory::Scenario => "System design knowledge gaps",
    }
}

fn feedback_for(score: u8) -> &'static str {
    match score {
        9.. => "Excellent response! You demonstrated deep understanding and clear communication.",
        8 => "Very good! Your explanation was accurate with minor areas for improvement.",
        7 => "Good response. You understood the core concepts but could elaborate more.",
        _ => "Adequate response. Consider exploring the topic deeper.",
    }
}

/// Local implementation of all four collaborator ports.
#[derive(Debug, Default)]
pub struct LocalAgents {
    rotation: AtomicUsize,
}

impl LocalAgents {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_turn(&self) -> usize {
        self.rotation.fetch_add(1, Ordering::Relaxed)
    }

    /// Easy levels stay conceptual; harder ones alternate towards coding and design.
    fn category_for(difficulty: Difficulty, turn: usize) -> QuestionCategory {
        match difficulty.value() {
            ..=4 => QuestionCategory::Conceptual,
            5..=7 if turn % 2 == 0 => QuestionCategory::Conceptual,
            5..=7 => QuestionCategory::Coding,
            _ if turn % 2 == 0 => QuestionCategory::Coding,
            _ => QuestionCategory::Scenario,
        }
    }

    /// Placeholder score in 6..=9 that grows with the effort visible in the answer.
    fn heuristic_score(response_text: &str, code: Option<&str>) -> u8 {
        let words = response_text.split_whitespace().count();
        let code_lines = code.map_or(0, |c| c.lines().filter(|l| !l.trim().is_empty()).count());
        let effort = words / 25 + code_lines / 5;
        6 + effort.min(3) as u8
    }

    /// Heuristic analysis over answered attempts.
    pub fn analyze_attempts(attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError> {
        let mut strengths: Vec<String> = Vec::new();
        let mut weaknesses: Vec<String> = Vec::new();

        for attempt in attempts {
            let Some(score) = attempt.score() else { continue };
            let category = attempt.question().category();
            if score.value() >= 7 {
                strengths.push(strength_tag(category).to_string());
            } else if score.value() <= 5 {
                weaknesses.push(weakness_tag(category).to_string());
            }
        }
        if strengths.is_empty() {
            strengths.push("Problem-solving approach".to_string());
        }
        if weaknesses.is_empty() {
            weaknesses.push("Advanced topics".to_string());
        }

        let recommendations: Vec<String> = weaknesses
            .iter()
            .take(3)
            .map(|w| format!("Focus on improving: {}", w))
            .collect();
        let suggested = weaknesses.clone();

        Analysis::new(
            overall_score(attempts) as i64,
            strengths,
            weaknesses,
            recommendations,
            suggested,
        )
        .map_err(|e| AgentError::invalid_response(e.to_string()))
    }

    /// One remediation stage per weakness.
    pub fn stages_for(weaknesses: &[String]) -> Vec<StageDescriptor> {
        weaknesses
            .iter()
            .filter_map(|weakness| {
                let weakness = weakness.trim();
                StageDescriptor::new(
                    format!("Improve: {}", weakness),
                    15,
                    vec![StageResource {
                        title: format!("{} Deep Dive", weakness),
                        url: "https://example.com".to_string(),
                        kind: ResourceKind::Course,
                        duration: None,
                    }],
                    vec![
                        format!("Master {} concepts", weakness),
                        "Apply in real project".to_string(),
                    ],
                    400,
                )
                .ok()
            })
            .collect()
    }
}

#[async_trait]
impl QuestionGenerator for LocalAgents {
    async fn generate(
        &self,
        _target_role: &str,
        difficulty: Difficulty,
    ) -> Result<Question, AgentError> {
        let turn = self.next_turn();
        let category = Self::category_for(difficulty, turn);
        let bank = QUESTION_BANK
            .get(&category)
            .ok_or_else(|| AgentError::unavailable("empty local question bank"))?;
        let prompt = bank[(turn / 2) % bank.len()];
        let starter_code = (category == QuestionCategory::Coding).then(|| CODE_TEMPLATE.to_string());

        Question::new(QuestionId::generate(), prompt, category, difficulty, starter_code)
            .map_err(|e| AgentError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl ResponseEvaluator for LocalAgents {
    async fn evaluate(
        &self,
        _question: &Question,
        response_text: &str,
        code: Option<&str>,
    ) -> Result<Evaluation, AgentError> {
        let raw = Self::heuristic_score(response_text, code);
        let score = Score::new(raw as i64).map_err(|e| AgentError::invalid_response(e.to_string()))?;
        Ok(Evaluation::new(score, feedback_for(raw), None))
    }
}

#[async_trait]
impl SessionAnalyzer for LocalAgents {
    async fn analyze(&self, attempts: &[QuestionAttempt]) -> Result<Analysis, AgentError> {
        Self::analyze_attempts(attempts)
    }
}

#[async_trait]
impl StageGenerator for LocalAgents {
    async fn generate_stages(
        &self,
        weaknesses: &[String],
        _recommendations: &[String],
    ) -> Result<Vec<StageDescriptor>, AgentError> {
        Ok(Self::stages_for(weaknesses))
    }
}
