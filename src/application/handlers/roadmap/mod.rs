//! Roadmap command and query handlers.

mod apply_feedback;
mod get_roadmap;

pub use apply_feedback::{ApplyFeedbackCommand, FeedbackOutcome, RoadmapFeedbackApplier};
pub use get_roadmap::{GetRoadmapHandler, GetRoadmapQuery};
