//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, statuses and error types used across the
//! aptitude and roadmap domains.

mod auth;
mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{QuestionId, RoadmapId, SessionId, StageId, UserId};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
