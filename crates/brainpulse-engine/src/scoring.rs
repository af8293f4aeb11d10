//! Game and session scoring.
//!
//! A game score blends three components into `0..=100`:
//!
//! | component  | weight | value                                    |
//! |------------|--------|------------------------------------------|
//! | accuracy   | 60     | `correct / total`, 0 when nothing counted |
//! | speed      | 25     | `1 - duration / MAX_GAME_DURATION`, floored at 0 |
//! | difficulty | 15     | `(level - 1) / 4`                         |
//!
//! The session composite is the mean game score plus a completion bonus of one
//! point per extra game (at most five), capped at 100.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::GameResult;

/// Duration at which the speed component reaches zero.
pub const MAX_GAME_DURATION: Duration = Duration::from_secs(30);

const ACCURACY_WEIGHT: f64 = 60.0;
const SPEED_WEIGHT: f64 = 25.0;
const DIFFICULTY_WEIGHT: f64 = 15.0;
const MAX_COMPLETION_BONUS: usize = 5;

/// `correct / total`, or 0 when `total` is 0.
#[must_use]
pub fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(total)
}

/// Computes the `0..=100` score of a game from its counters.
///
/// The stored [`GameResult::score`] is ignored; this is the function that
/// produces it.
///
/// # Example
///
/// ```
/// use brainpulse_engine::{DifficultyLevel, GameResult, scoring};
///
/// let result = GameResult {
///     game_id: "speed-match".to_owned(),
///     score: 0,
///     duration_ms: 0,
///     accuracy: 1.0,
///     reaction_time_ms: None,
///     difficulty: DifficultyLevel::MAX,
///     correct_count: 20,
///     total_count: 20,
///     raw_metrics: Default::default(),
/// };
/// assert_eq!(scoring::game_score(&result), 100);
/// ```
#[must_use]
pub fn game_score(result: &GameResult) -> u8 {
    let accuracy = accuracy(result.correct_count, result.total_count).clamp(0.0, 1.0);

    #[expect(clippy::cast_precision_loss)]
    let duration_ms = result.duration_ms as f64;
    let max_ms = MAX_GAME_DURATION.as_secs_f64() * 1000.0;
    let speed = (1.0 - duration_ms / max_ms).clamp(0.0, 1.0);

    let difficulty = f64::from(result.difficulty.get() - 1) / 4.0;

    let score = accuracy.mul_add(
        ACCURACY_WEIGHT,
        speed.mul_add(SPEED_WEIGHT, difficulty * DIFFICULTY_WEIGHT),
    );
    round_score(score)
}

/// Combines the games of a session into one `0..=100` score.
///
/// Each game is rescored with [`game_score`]. Returns 0 for an empty session.
#[must_use]
pub fn composite_score(results: &[GameResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    #[expect(clippy::cast_precision_loss)]
    let count = results.len() as f64;
    let mean = results
        .iter()
        .map(|r| f64::from(game_score(r)))
        .sum::<f64>()
        / count;

    #[expect(clippy::cast_precision_loss)]
    let bonus = (results.len() - 1).min(MAX_COMPLETION_BONUS) as f64;
    round_score(mean + bonus)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_score(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round() as u8
}

/// Qualitative reading of a composite score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreBand {
    #[display("On Fire")]
    OnFire,
    #[display("Strong")]
    Strong,
    #[display("Normal")]
    Normal,
    #[display("Need Rest")]
    NeedRest,
}

impl ScoreBand {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::OnFire,
            70..=89 => Self::Strong,
            50..=69 => Self::Normal,
            _ => Self::NeedRest,
        }
    }
}
