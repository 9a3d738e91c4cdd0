//! HTTP adapter for aptitude session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AnalysisView, AttemptView, EvaluationView, QuestionView, SessionView, StartSessionRequest,
    SubmitResponseRequest, SubmitResponseView,
};
pub use handlers::AptitudeAppState;
pub use routes::aptitude_routes;
