//! Difficulty and score value objects, and the adaptation rule between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Question difficulty on a 1..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Every session opens at this level.
    pub const STARTING: Difficulty = Difficulty(5);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            return Err(ValidationError::out_of_range(
                "difficulty",
                Self::MIN as i64,
                Self::MAX as i64,
                value,
            ));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Difficulty of the question that follows one scored `score`.
    pub fn next(self, score: Score) -> Difficulty {
        next_difficulty(self, score)
    }
}

/// Strong answers step up, weak answers step down, the rest hold.
///
/// Only the just-scored question is consulted.
pub fn next_difficulty(current: Difficulty, score: Score) -> Difficulty {
    if score.is_strong() {
        Difficulty(current.0.saturating_add(1).min(Difficulty::MAX))
    } else if score.is_weak() {
        Difficulty(current.0.saturating_sub(1).max(Difficulty::MIN))
    } else {
        current
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Difficulty::new(value as i64)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Evaluation score on a 0..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 10;
    const STRONG_AT: u8 = 8;
    const WEAK_AT: u8 = 4;

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=Self::MAX as i64).contains(&value) {
            return Err(ValidationError::out_of_range("score", 0, Self::MAX as i64, value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_strong(&self) -> bool {
        self.0 >= Self::STRONG_AT
    }

    pub fn is_weak(&self) -> bool {
        self.0 <= Self::WEAK_AT
    }
}

impl TryFrom<u8> for Score {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value as i64)
    }
}

impl From<Score> for u8 {
    fn from(s: Score) -> Self {
        s.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
