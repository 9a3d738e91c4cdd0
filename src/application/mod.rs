//! Application layer - command and query handlers.
//!
//! Orchestrates domain operations and coordinates between ports. Both
//! delivery adapters go through `AptitudeEngine`.

pub mod handlers;

pub use handlers::{
    AptitudeEngine, ApplyFeedbackCommand, Collaborators, CompleteSessionResult, ExpiryReport,
    FeedbackOutcome, GetRoadmapHandler, GetRoadmapQuery, RoadmapFeedbackApplier,
    SubmitResponseCommand, SubmitResponseResult,
};
