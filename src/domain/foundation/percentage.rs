//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive.
///
/// Used for estimated bias likelihoods and for share-of-total figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// Share of `part` in `total`, rounded to the nearest whole percent.
    ///
    /// A zero total yields zero.
    pub fn share_of(part: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let ratio = part as f64 / total as f64 * 100.0;
        Self::new(ratio.round().clamp(0.0, 100.0) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(50).value(), 50);
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn percentage_try_new_rejects_over_100() {
        assert!(Percentage::try_new(100).is_ok());
        assert!(Percentage::try_new(101).is_err());
    }

    #[test]
    fn share_of_rounds_to_nearest() {
        assert_eq!(Percentage::share_of(1, 3).value(), 33);
        assert_eq!(Percentage::share_of(2, 3).value(), 67);
        assert_eq!(Percentage::share_of(3, 3).value(), 100);
        assert_eq!(Percentage::share_of(0, 0).value(), 0);
    }

    #[test]
    fn deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<Percentage>("42").is_ok());
        assert!(serde_json::from_str::<Percentage>("142").is_err());
    }

    #[test]
    fn displays_with_percent_sign() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
    }
}
