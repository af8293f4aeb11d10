use brainpulse_engine::{DifficultyLevel, GameResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{DifficultyProfile, ProfileStore, ProfileStoreError};

/// Score and accuracy bounds that move a level.
///
/// A level goes up when both `score >= increase_score` and
/// `accuracy >= increase_accuracy`; otherwise it goes down when either
/// `score <= decrease_score` or `accuracy <= decrease_accuracy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub increase_score: u8,
    pub increase_accuracy: f64,
    pub decrease_score: u8,
    pub decrease_accuracy: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            increase_score: 85,
            increase_accuracy: 0.90,
            decrease_score: 40,
            decrease_accuracy: 0.50,
        }
    }
}

/// Level transition produced by one [`DifficultyController::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyChange {
    pub game_id: String,
    pub previous: DifficultyLevel,
    pub current: DifficultyLevel,
}

impl DifficultyChange {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Rule-based per-game difficulty adjustment.
///
/// # Example
///
/// ```
/// use brainpulse_adaptive::DifficultyController;
/// use brainpulse_engine::DifficultyLevel;
///
/// let controller = DifficultyController::default();
/// let level = DifficultyLevel::new(3);
///
/// assert_eq!(controller.next_level(level, 90, 0.95).get(), 4);
/// assert_eq!(controller.next_level(level, 60, 0.70), level);
/// assert_eq!(controller.next_level(level, 40, 0.95).get(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    thresholds: Thresholds,
}

impl DifficultyController {
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Next level for a game currently at `current`.
    ///
    /// The increase rule is evaluated first, so it wins if thresholds are
    /// configured to overlap.
    #[must_use]
    pub fn next_level(&self, current: DifficultyLevel, score: u8, accuracy: f64) -> DifficultyLevel {
        let t = &self.thresholds;
        if score >= t.increase_score && accuracy >= t.increase_accuracy {
            current.raised()
        } else if score <= t.decrease_score || accuracy <= t.decrease_accuracy {
            current.lowered()
        } else {
            current
        }
    }

    /// Stored level of `game_id`, [`DifficultyLevel::DEFAULT`] if none.
    pub fn level_for<S>(&self, store: &S, game_id: &str) -> Result<DifficultyLevel, ProfileStoreError>
    where
        S: ProfileStore + ?Sized,
    {
        Ok(store
            .load()?
            .map_or(DifficultyLevel::DEFAULT, |profile| profile.level_for(game_id)))
    }

    /// Applies `result` to the stored level of its game.
    ///
    /// The profile is written only when the level actually changed.
    pub fn update<S>(
        &self,
        store: &mut S,
        result: &GameResult,
        now: DateTime<Utc>,
    ) -> Result<DifficultyChange, ProfileStoreError>
    where
        S: ProfileStore + ?Sized,
    {
        let mut profile = store.load_or_default(now)?;
        let previous = profile.level_for(&result.game_id);
        let current = self.next_level(previous, result.score, result.accuracy);

        if current != previous {
            profile.set_level(&result.game_id, current, now);
            store.save(&profile)?;
            info!(
                event = "difficulty.changed",
                game_id = %result.game_id,
                from = previous.get(),
                to = current.get()
            );
        }

        Ok(DifficultyChange {
            game_id: result.game_id.clone(),
            previous,
            current,
        })
    }

    /// Forgets every stored level.
    pub fn reset<S>(&self, store: &mut S, now: DateTime<Utc>) -> Result<(), ProfileStoreError>
    where
        S: ProfileStore + ?Sized,
    {
        store.save(&DifficultyProfile::empty(now))?;
        info!(event = "difficulty.reset");
        Ok(())
    }
}
