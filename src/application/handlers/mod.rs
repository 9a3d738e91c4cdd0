//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over ports.

pub mod aptitude;
pub mod roadmap;

pub use aptitude::{
    AptitudeEngine, Collaborators, CompleteSessionCommand, CompleteSessionResult,
    ExpireStaleSessionsHandler, ExpiryReport, SessionLocks, SubmitResponseCommand,
    SubmitResponseResult,
};
pub use roadmap::{
    ApplyFeedbackCommand, FeedbackOutcome, GetRoadmapHandler, GetRoadmapQuery,
    RoadmapFeedbackApplier,
};
