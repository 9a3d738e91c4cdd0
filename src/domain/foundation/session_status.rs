//! Lifecycle status of an aptitude session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// `Active` accepts responses; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl SessionStatus {
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::Active)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Active, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::Active => vec![SessionStatus::Completed],
            SessionStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn only_active_is_mutable() {
        assert!(SessionStatus::Active.is_mutable());
        assert!(!SessionStatus::Completed.is_mutable());
    }

    #[test]
    fn active_transitions_to_completed() {
        assert_eq!(
            SessionStatus::Active.transition_to(SessionStatus::Completed),
            Ok(SessionStatus::Completed)
        );
    }

    #[test]
    fn completed_is_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Completed
            .transition_to(SessionStatus::Active)
            .is_err());
        assert!(SessionStatus::Completed
            .transition_to(SessionStatus::Completed)
            .is_err());
    }

    #[test]
    fn can_transition_to_agrees_with_valid_transitions() {
        for status in [SessionStatus::Active, SessionStatus::Completed] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
        let status: SessionStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, SessionStatus::Active);
    }
}
