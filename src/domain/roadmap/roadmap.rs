//! Roadmap aggregate.
//!
//! A roadmap is a learner's ordered plan of stages. Stage progression is
//! handled elsewhere; aptitude feedback only ever appends.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{progress, LearningStage, RoadmapError, StageDescriptor};
use crate::domain::foundation::{
    RoadmapId, StageId, StateMachine, Timestamp, UserId, ValidationError,
};

/// Feedback stages are numbered from here so they sort after generated ones.
pub const FEEDBACK_POSITION_BASE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoadmapStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl StateMachine for RoadmapStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RoadmapStatus::*;
        matches!((self, target), (Draft, Active) | (Active, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            RoadmapStatus::Draft => vec![RoadmapStatus::Active],
            RoadmapStatus::Active => vec![RoadmapStatus::Completed],
            RoadmapStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for RoadmapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoadmapStatus::Draft => "draft",
            RoadmapStatus::Active => "active",
            RoadmapStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// What an append changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedStages {
    pub stage_ids: Vec<StageId>,
    pub hours_added: u32,
}

impl AppendedStages {
    pub fn count(&self) -> usize {
        self.stage_ids.len()
    }
}

/// Roadmap aggregate.
///
/// # Invariants
///
/// - stage order is only ever extended at the end by feedback
/// - `progress` reflects `stages` as of the last `recalculate_progress`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    id: RoadmapId,
    user_id: UserId,
    title: String,
    stages: Vec<LearningStage>,
    total_estimated_hours: u32,
    status: RoadmapStatus,
    progress: u8,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(default)]
    version: u64,
}

impl Roadmap {
    /// New draft roadmap with the given stages.
    pub fn new(
        id: RoadmapId,
        user_id: UserId,
        title: impl Into<String>,
        stages: Vec<LearningStage>,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let now = Timestamp::now();
        let mut roadmap = Self {
            id,
            user_id,
            title,
            total_estimated_hours: progress::total_hours(&stages),
            stages,
            status: RoadmapStatus::Draft,
            progress: 0,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        roadmap.recalculate_progress();
        Ok(roadmap)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &RoadmapId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn stages(&self) -> &[LearningStage] {
        &self.stages
    }

    pub fn total_estimated_hours(&self) -> u32 {
        self.total_estimated_hours
    }

    pub fn status(&self) -> RoadmapStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_active(&self) -> bool {
        self.status == RoadmapStatus::Active
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn authorize(&self, user_id: &UserId) -> Result<(), RoadmapError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(RoadmapError::not_found(self.id))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn activate(&mut self) -> Result<(), RoadmapError> {
        self.status = self
            .status
            .transition_to(RoadmapStatus::Active)
            .map_err(|e| RoadmapError::invalid_state(e.to_string()))?;
        self.touch();
        Ok(())
    }

    /// Append stages after everything already present.
    ///
    /// Existing stages are left exactly as they were. New stages are locked
    /// and numbered from `max(last position + 1, FEEDBACK_POSITION_BASE)`.
    /// Nothing is changed when the hour total would overflow.
    pub fn append_stages(
        &mut self,
        descriptors: Vec<StageDescriptor>,
    ) -> Result<AppendedStages, RoadmapError> {
        let hours_added = descriptors
            .iter()
            .try_fold(0u32, |sum, d| sum.checked_add(d.estimated_hours()))
            .ok_or_else(hours_overflow)?;
        let total = self
            .total_estimated_hours
            .checked_add(hours_added)
            .ok_or_else(hours_overflow)?;

        let first = self
            .stages
            .iter()
            .map(|s| s.position().saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(FEEDBACK_POSITION_BASE);

        let mut appended = AppendedStages {
            stage_ids: Vec::with_capacity(descriptors.len()),
            hours_added,
        };
        for (offset, descriptor) in descriptors.into_iter().enumerate() {
            let id = StageId::feedback();
            appended.stage_ids.push(id.clone());
            let position = first.saturating_add(offset as u32);
            self.stages
                .push(LearningStage::from_descriptor(id, position, descriptor));
        }
        self.total_estimated_hours = total;
        if appended.count() > 0 {
            self.touch();
        }
        Ok(appended)
    }

    /// Recompute derived progress from the current stages.
    pub fn recalculate_progress(&mut self) {
        self.progress = progress::percent_complete(&self.stages);
    }

    /// Called by repositories once a write has been accepted.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

fn hours_overflow() -> RoadmapError {
    RoadmapError::validation("total_estimated_hours", "estimated hours exceed the supported total")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roadmap::StageStatus;

    fn descriptor(skill: &str, hours: u32) -> StageDescriptor {
        StageDescriptor::new(skill, hours, vec![], vec![], 400).unwrap()
    }

    fn seeded(n: u32) -> Roadmap {
        let stages = (1..=n)
            .map(|i| {
                LearningStage::from_descriptor(
                    StageId::new(format!("s-{}", i)).unwrap(),
                    i,
                    descriptor(&format!("Skill {}", i), 10),
                )
            })
            .collect();
        Roadmap::new(RoadmapId::new(), UserId::new("user-1").unwrap(), "Backend path", stages)
            .unwrap()
    }

    #[test]
    fn new_roadmap_is_draft_with_summed_hours() {
        let roadmap = seeded(3);
        assert_eq!(roadmap.status(), RoadmapStatus::Draft);
        assert_eq!(roadmap.total_estimated_hours(), 30);
        assert_eq!(roadmap.progress(), 0);
    }

    #[test]
    fn activate_only_from_draft() {
        let mut roadmap = seeded(1);
        roadmap.activate().unwrap();
        assert!(roadmap.is_active());
        assert!(matches!(
            roadmap.activate(),
            Err(RoadmapError::InvalidState(_))
        ));
    }

    #[test]
    fn append_keeps_existing_stages_and_adds_hours() {
        let mut roadmap = seeded(3);
        let before: Vec<_> = roadmap.stages().to_vec();

        let appended = roadmap
            .append_stages(vec![descriptor("Improve: A", 15), descriptor("Improve: B", 15)])
            .unwrap();

        assert_eq!(appended.count(), 2);
        assert_eq!(appended.hours_added, 30);
        assert_eq!(roadmap.stages().len(), 5);
        assert_eq!(&roadmap.stages()[..3], &before[..]);
        assert_eq!(roadmap.total_estimated_hours(), 60);
    }

    #[test]
    fn appended_stages_are_locked_and_numbered_after_base() {
        let mut roadmap = seeded(3);
        roadmap
            .append_stages(vec![descriptor("A", 1), descriptor("B", 1)])
            .unwrap();
        let positions: Vec<_> = roadmap.stages()[3..].iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![100, 101]);
        assert!(roadmap.stages()[3..]
            .iter()
            .all(|s| s.status() == StageStatus::Locked));
    }

    #[test]
    fn repeated_appends_continue_numbering() {
        let mut roadmap = seeded(1);
        roadmap.append_stages(vec![descriptor("A", 1)]).unwrap();
        roadmap.append_stages(vec![descriptor("B", 1)]).unwrap();
        let positions: Vec<_> = roadmap.stages().iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![1, 100, 101]);
    }

    #[test]
    fn empty_append_changes_nothing() {
        let mut roadmap = seeded(2);
        let before = roadmap.clone();
        let appended = roadmap.append_stages(vec![]).unwrap();
        assert_eq!(appended.count(), 0);
        assert_eq!(roadmap, before);
    }

    #[test]
    fn append_rejects_hour_overflow_and_leaves_roadmap_untouched() {
        let mut roadmap = seeded(1);
        roadmap.total_estimated_hours = u32::MAX - 5;
        let before = roadmap.clone();

        let result = roadmap.append_stages(vec![descriptor("A", 1000), descriptor("B", 1000)]);

        match result {
            Err(RoadmapError::ValidationFailed { field, .. }) => {
                assert_eq!(field, "total_estimated_hours")
            }
            other => panic!("expected overflow to be rejected, got {:?}", other),
        }
        assert_eq!(roadmap, before);
    }

    #[test]
    fn progress_drops_after_appending_locked_stages() {
        let stages = vec![LearningStage::from_descriptor(
            StageId::new("s-1").unwrap(),
            1,
            descriptor("Done", 5),
        )
        .with_status(StageStatus::Completed)];
        let mut roadmap =
            Roadmap::new(RoadmapId::new(), UserId::new("u").unwrap(), "Plan", stages).unwrap();
        assert_eq!(roadmap.progress(), 100);

        roadmap.append_stages(vec![descriptor("New", 5)]).unwrap();
        roadmap.recalculate_progress();
        assert_eq!(roadmap.progress(), 50);
    }

    #[test]
    fn non_owner_sees_not_found() {
        let roadmap = seeded(1);
        assert!(matches!(
            roadmap.authorize(&UserId::new("intruder").unwrap()),
            Err(RoadmapError::NotFound(_))
        ));
    }
}
