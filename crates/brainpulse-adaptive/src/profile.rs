use std::{collections::BTreeMap, io};

use brainpulse_engine::DifficultyLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-game difficulty levels of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub game_levels: BTreeMap<String, DifficultyLevel>,
    pub updated_at: DateTime<Utc>,
}

impl DifficultyProfile {
    /// A profile with no stored levels.
    #[must_use]
    pub const fn empty(now: DateTime<Utc>) -> Self {
        Self {
            game_levels: BTreeMap::new(),
            updated_at: now,
        }
    }

    /// Stored level of `game_id`, or [`DifficultyLevel::DEFAULT`].
    #[must_use]
    pub fn level_for(&self, game_id: &str) -> DifficultyLevel {
        self.game_levels
            .get(game_id)
            .copied()
            .unwrap_or(DifficultyLevel::DEFAULT)
    }

    pub fn set_level(&mut self, game_id: &str, level: DifficultyLevel, now: DateTime<Utc>) {
        self.game_levels.insert(game_id.to_owned(), level);
        self.updated_at = now;
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ProfileStoreError {
    #[display("failed to access difficulty profile")]
    Io { source: io::Error },
    #[display("failed to decode difficulty profile")]
    Decode { source: serde_json::Error },
    #[display("unsupported difficulty profile version {found}")]
    UnsupportedVersion { found: u32 },
}

/// Persistence boundary for the difficulty profile.
pub trait ProfileStore {
    /// Returns the stored profile, `None` if nothing was stored yet.
    fn load(&self) -> Result<Option<DifficultyProfile>, ProfileStoreError>;

    fn save(&mut self, profile: &DifficultyProfile) -> Result<(), ProfileStoreError>;

    /// Returns the stored profile, or an empty one stamped `now`.
    fn load_or_default(&self, now: DateTime<Utc>) -> Result<DifficultyProfile, ProfileStoreError> {
        Ok(self
            .load()?
            .unwrap_or_else(|| DifficultyProfile::empty(now)))
    }
}

/// In-memory [`ProfileStore`] that counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profile: Option<DifficultyProfile>,
    saves: usize,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_profile(profile: DifficultyProfile) -> Self {
        Self {
            profile: Some(profile),
            saves: 0,
        }
    }

    /// Number of [`ProfileStore::save`] calls so far.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<DifficultyProfile>, ProfileStoreError> {
        Ok(self.profile.clone())
    }

    fn save(&mut self, profile: &DifficultyProfile) -> Result<(), ProfileStoreError> {
        self.profile = Some(profile.clone());
        self.saves += 1;
        Ok(())
    }
}
