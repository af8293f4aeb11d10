use serde::{Deserialize, Serialize};

/// Difficulty level of a mini-game, always within `1..=5`.
///
/// Every constructor clamps its input, so an out-of-range value is silently
/// corrected instead of rejected. Serialized as a plain integer; deserializing
/// an out-of-range integer clamps as well.
///
/// # Example
///
/// ```
/// use brainpulse_engine::DifficultyLevel;
///
/// assert_eq!(DifficultyLevel::new(9), DifficultyLevel::MAX);
/// assert_eq!(DifficultyLevel::new(-3), DifficultyLevel::MIN);
/// assert_eq!(DifficultyLevel::DEFAULT.get(), 2);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(from = "i64", into = "u8")]
#[display("{_0}")]
pub struct DifficultyLevel(u8);

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl DifficultyLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(5);
    /// Level used for a game that has no stored level yet.
    pub const DEFAULT: Self = Self(2);
    /// Number of distinct levels.
    pub const COUNT: usize = 5;

    /// Creates a level, clamping `level` into `1..=5`.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub const fn new(level: i64) -> Self {
        if level < 1 {
            Self::MIN
        } else if level > 5 {
            Self::MAX
        } else {
            Self(level as u8)
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into a per-level configuration table.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - Self::MIN.0) as usize
    }

    /// One level harder, saturating at [`Self::MAX`].
    #[must_use]
    pub const fn raised(self) -> Self {
        if self.0 < Self::MAX.0 {
            Self(self.0 + 1)
        } else {
            self
        }
    }

    /// One level easier, saturating at [`Self::MIN`].
    #[must_use]
    pub const fn lowered(self) -> Self {
        if self.0 > Self::MIN.0 {
            Self(self.0 - 1)
        } else {
            self
        }
    }

    /// Iterates over all levels from easiest to hardest.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Easy",
            2 => "Easy",
            3 => "Normal",
            4 => "Hard",
            _ => "Very Hard",
        }
    }
}

impl From<i64> for DifficultyLevel {
    fn from(level: i64) -> Self {
        Self::new(level)
    }
}

impl From<DifficultyLevel> for u8 {
    fn from(level: DifficultyLevel) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_into_range() {
        assert_eq!(DifficultyLevel::new(0).get(), 1);
        assert_eq!(DifficultyLevel::new(3).get(), 3);
        assert_eq!(DifficultyLevel::new(6).get(), 5);
        assert_eq!(DifficultyLevel::new(i64::MIN).get(), 1);
    }

    #[test]
    fn test_raise_and_lower_saturate() {
        assert_eq!(DifficultyLevel::MAX.raised(), DifficultyLevel::MAX);
        assert_eq!(DifficultyLevel::MIN.lowered(), DifficultyLevel::MIN);
        assert_eq!(DifficultyLevel::new(3).raised().get(), 4);
        assert_eq!(DifficultyLevel::new(3).lowered().get(), 2);
    }

    #[test]
    fn test_index_covers_table_rows() {
        let indices: Vec<_> = DifficultyLevel::all().map(DifficultyLevel::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_serde_clamps_out_of_range_values() {
        let level: DifficultyLevel = serde_json::from_str("9").unwrap();
        assert_eq!(level, DifficultyLevel::MAX);
        let level: DifficultyLevel = serde_json::from_str("-1").unwrap();
        assert_eq!(level, DifficultyLevel::MIN);
        assert_eq!(serde_json::to_string(&DifficultyLevel::new(4)).unwrap(), "4");
    }
}
