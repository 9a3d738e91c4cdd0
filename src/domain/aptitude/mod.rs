//! Aptitude domain - the adaptive interview.
//!
//! A session asks up to ten questions, adapting difficulty to each score,
//! and closes with an analysis that feeds the learner's roadmap.

mod analysis;
mod attempt;
mod difficulty;
mod errors;
mod hints;
mod question;
mod session;

pub use analysis::{overall_score, Analysis};
pub use attempt::{Evaluation, QuestionAttempt, Response};
pub use difficulty::{next_difficulty, Difficulty, Score};
pub use errors::AptitudeError;
pub use hints::hint_for;
pub use question::{Question, QuestionCategory};
pub use session::{AptitudeSession, MAX_ATTEMPTS, MAX_TARGET_ROLE_LENGTH};
