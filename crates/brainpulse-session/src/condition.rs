use serde::{Deserialize, Serialize};

/// Self-reported rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("rating must be between 1 and 5, got {value}")]
pub struct RatingError {
    value: u8,
}

impl Rating {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);

    pub const fn new(value: u8) -> Result<Self, RatingError> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(RatingError { value })
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// How the player feels before a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub sleep_quality: Rating,
    pub energy_level: Rating,
    /// 1 is low stress.
    pub stress_level: Rating,
}
