//! HTTP DTOs for roadmap endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::roadmap::{LearningStage, Roadmap, RoadmapStatus, StageResource, StageStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackUpdateRequest {
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    pub id: String,
    pub position: u32,
    pub skill: String,
    pub estimated_hours: u32,
    pub status: StageStatus,
    pub xp_reward: u32,
    pub resources: Vec<StageResource>,
    pub milestones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<&LearningStage> for StageView {
    fn from(s: &LearningStage) -> Self {
        Self {
            id: s.id().to_string(),
            position: s.position(),
            skill: s.skill().to_string(),
            estimated_hours: s.estimated_hours(),
            status: s.status(),
            xp_reward: s.xp_reward(),
            resources: s.resources().to_vec(),
            milestones: s.milestones().to_vec(),
            completed_at: s.completed_at().map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapView {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: RoadmapStatus,
    pub progress: u8,
    pub total_estimated_hours: u32,
    pub stages: Vec<StageView>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Roadmap> for RoadmapView {
    fn from(r: &Roadmap) -> Self {
        Self {
            id: r.id().to_string(),
            user_id: r.user_id().to_string(),
            title: r.title().to_string(),
            status: r.status(),
            progress: r.progress(),
            total_estimated_hours: r.total_estimated_hours(),
            stages: r.stages().iter().map(Into::into).collect(),
            created_at: r.created_at().as_datetime().to_rfc3339(),
            updated_at: r.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_request_defaults_missing_lists() {
        let req: FeedbackUpdateRequest = serde_json::from_str(r#"{"weaknesses":["SQL"]}"#).unwrap();
        assert_eq!(req.weaknesses, vec!["SQL"]);
        assert!(req.recommendations.is_empty());
    }
}
