//! Learning stages and the descriptors used to create them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StageId, Timestamp, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Locked,
    Available,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Course,
    Tutorial,
    Article,
    Video,
    Documentation,
}

impl ResourceKind {
    /// Unknown kinds are read as articles.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "course" => ResourceKind::Course,
            "tutorial" => ResourceKind::Tutorial,
            "video" => ResourceKind::Video,
            "documentation" | "docs" => ResourceKind::Documentation,
            _ => ResourceKind::Article,
        }
    }
}

/// External learning material attached to a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResource {
    pub title: String,
    pub url: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Upper bound on the hours a single stage may estimate.
pub const MAX_STAGE_HOURS: u32 = 1000;

/// A stage as proposed by a stage generator, before it has a place in a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    skill: String,
    estimated_hours: u32,
    resources: Vec<StageResource>,
    milestones: Vec<String>,
    xp_reward: u32,
}

impl StageDescriptor {
    pub fn new(
        skill: impl Into<String>,
        estimated_hours: u32,
        resources: Vec<StageResource>,
        milestones: Vec<String>,
        xp_reward: u32,
    ) -> Result<Self, ValidationError> {
        let skill = skill.into().trim().to_string();
        if skill.is_empty() {
            return Err(ValidationError::empty_field("skill"));
        }
        if !(1..=MAX_STAGE_HOURS).contains(&estimated_hours) {
            return Err(ValidationError::out_of_range(
                "estimated_hours",
                1,
                i64::from(MAX_STAGE_HOURS),
                i64::from(estimated_hours),
            ));
        }
        Ok(Self {
            skill,
            estimated_hours,
            resources,
            milestones,
            xp_reward,
        })
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn estimated_hours(&self) -> u32 {
        self.estimated_hours
    }

    pub fn resources(&self) -> &[StageResource] {
        &self.resources
    }

    pub fn milestones(&self) -> &[String] {
        &self.milestones
    }

    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }
}

/// A stage placed in a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStage {
    id: StageId,
    position: u32,
    skill: String,
    estimated_hours: u32,
    resources: Vec<StageResource>,
    milestones: Vec<String>,
    xp_reward: u32,
    status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<Timestamp>,
}

impl LearningStage {
    /// Place a descriptor at `position`, locked.
    pub fn from_descriptor(id: StageId, position: u32, descriptor: StageDescriptor) -> Self {
        Self {
            id,
            position,
            skill: descriptor.skill,
            estimated_hours: descriptor.estimated_hours,
            resources: descriptor.resources,
            milestones: descriptor.milestones,
            xp_reward: descriptor.xp_reward,
            status: StageStatus::Locked,
            completed_at: None,
        }
    }

    /// Same stage with a different status. Completion time is stamped when
    /// moving to `Completed`.
    pub fn with_status(mut self, status: StageStatus) -> Self {
        self.completed_at = match status {
            StageStatus::Completed => Some(self.completed_at.unwrap_or_else(Timestamp::now)),
            _ => None,
        };
        self.status = status;
        self
    }

    pub fn id(&self) -> &StageId {
        &self.id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn estimated_hours(&self) -> u32 {
        self.estimated_hours
    }

    pub fn resources(&self) -> &[StageResource] {
        &self.resources
    }

    pub fn milestones(&self) -> &[String] {
        &self.milestones
    }

    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.status == StageStatus::Completed
    }
}
