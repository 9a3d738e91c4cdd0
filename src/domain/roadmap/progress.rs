//! Roadmap progress recomputation.
//!
//! Called explicitly on every roadmap write path before persistence.

use super::LearningStage;

/// Share of completed stages as a rounded percentage. Empty roadmaps are at 0.
pub fn percent_complete(stages: &[LearningStage]) -> u8 {
    if stages.is_empty() {
        return 0;
    }
    let completed = stages.iter().filter(|s| s.is_completed()).count();
    ((completed as f64 / stages.len() as f64) * 100.0).round() as u8
}

/// Sum of stage estimates.
pub fn total_hours(stages: &[LearningStage]) -> u32 {
    stages.iter().map(|s| s.estimated_hours()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StageId;
    use crate::domain::roadmap::{StageDescriptor, StageStatus};

    fn stage(hours: u32, status: StageStatus) -> LearningStage {
        let d = StageDescriptor::new("Skill", hours, vec![], vec![], 100).unwrap();
        LearningStage::from_descriptor(StageId::feedback(), 1, d).with_status(status)
    }

    #[test]
    fn empty_roadmap_is_zero_percent() {
        assert_eq!(percent_complete(&[]), 0);
    }

    #[test]
    fn rounds_to_nearest_percent() {
        let stages = vec![
            stage(1, StageStatus::Completed),
            stage(1, StageStatus::Locked),
            stage(1, StageStatus::InProgress),
        ];
        assert_eq!(percent_complete(&stages), 33);

        let stages = vec![
            stage(1, StageStatus::Completed),
            stage(1, StageStatus::Completed),
            stage(1, StageStatus::Available),
        ];
        assert_eq!(percent_complete(&stages), 67);
    }

    #[test]
    fn all_completed_is_hundred() {
        let stages = vec![stage(1, StageStatus::Completed); 4];
        assert_eq!(percent_complete(&stages), 100);
    }

    #[test]
    fn total_hours_sums_estimates() {
        let stages = vec![stage(10, StageStatus::Locked), stage(15, StageStatus::Locked)];
        assert_eq!(total_hours(&stages), 25);
    }
}
