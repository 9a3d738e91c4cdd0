//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `QuestionGenerator`, `ResponseEvaluator`, `SessionAnalyzer`, `StageGenerator`
//!   share `AgentError` and are always wrapped with a local fallback
//!
//! ## Persistence Ports
//!
//! - `AptitudeSessionRepository` - session documents, optimistic writes
//! - `RoadmapRepository` - roadmap documents, optimistic writes
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - bearer token validation

mod agent_error;
mod aptitude_session_repository;
mod question_generator;
mod response_evaluator;
mod roadmap_repository;
mod session_analyzer;
mod session_validator;
mod stage_generator;

pub use agent_error::AgentError;
pub use aptitude_session_repository::AptitudeSessionRepository;
pub use question_generator::QuestionGenerator;
pub use response_evaluator::ResponseEvaluator;
pub use roadmap_repository::RoadmapRepository;
pub use session_analyzer::SessionAnalyzer;
pub use session_validator::SessionValidator;
pub use stage_generator::StageGenerator;
