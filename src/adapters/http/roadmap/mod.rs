//! HTTP adapter for roadmap endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{FeedbackUpdateRequest, RoadmapView, StageView};
pub use handlers::RoadmapAppState;
pub use routes::roadmap_routes;
