//! Clarity score value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Integer 0-100 rating of how well-reasoned a decision is.
///
/// Assigned by the reasoning provider at analysis time and revised once
/// in hindsight when an outcome is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ClarityScore(u8);

impl ClarityScore {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Creates a score, rejecting anything outside 0-100.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            return Err(ValidationError::out_of_range(
                "clarity_score",
                i32::from(Self::MIN),
                i32::from(Self::MAX),
                value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            ));
        }
        Ok(Self(value as u8))
    }

    /// Returns the score as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ClarityScore {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ClarityScore> for u8 {
    fn from(score: ClarityScore) -> Self {
        score.0
    }
}

impl fmt::Display for ClarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
