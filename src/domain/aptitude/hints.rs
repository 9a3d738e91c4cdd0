//! Static guidance returned on hint requests. Never touches session state.

use super::QuestionCategory;

const GENERAL_HINT: &str =
    "Think about the core concepts and break down the problem step by step.";

/// Hint text for the open question's category, or general guidance when
/// nothing is open.
pub fn hint_for(category: Option<QuestionCategory>) -> &'static str {
    match category {
        Some(QuestionCategory::Conceptual) => {
            "Start from a precise definition, then illustrate it with a small example."
        }
        Some(QuestionCategory::Coding) => {
            "Think about the core concepts and break down the problem step by step. \
             Sketch the inputs, outputs and edge cases before writing code."
        }
        Some(QuestionCategory::Scenario) => {
            "Clarify the requirements and constraints first, then walk through the main \
             components and the trade-offs between them."
        }
        None => GENERAL_HINT,
    }
}
