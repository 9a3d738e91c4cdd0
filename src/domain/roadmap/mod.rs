//! Roadmap domain - learning plans that aptitude feedback extends.

mod errors;
pub mod progress;
mod roadmap;
mod stage;

pub use errors::RoadmapError;
pub use roadmap::{AppendedStages, Roadmap, RoadmapStatus, FEEDBACK_POSITION_BASE};
pub use stage::{
    LearningStage, ResourceKind, StageDescriptor, StageResource, StageStatus, MAX_STAGE_HOURS,
};
