//! GetRoadmapHandler - owner-scoped roadmap read.

use std::sync::Arc;

use crate::domain::foundation::{RoadmapId, UserId};
use crate::domain::roadmap::{Roadmap, RoadmapError};
use crate::ports::RoadmapRepository;

#[derive(Debug, Clone)]
pub struct GetRoadmapQuery {
    pub user_id: UserId,
    pub roadmap_id: RoadmapId,
}

pub struct GetRoadmapHandler {
    roadmaps: Arc<dyn RoadmapRepository>,
}

impl GetRoadmapHandler {
    pub fn new(roadmaps: Arc<dyn RoadmapRepository>) -> Self {
        Self { roadmaps }
    }

    pub async fn handle(&self, query: GetRoadmapQuery) -> Result<Roadmap, RoadmapError> {
        let roadmap = self
            .roadmaps
            .find_by_id(&query.roadmap_id)
            .await?
            .ok_or(RoadmapError::NotFound(query.roadmap_id))?;
        roadmap.authorize(&query.user_id)?;
        Ok(roadmap)
    }
}
