use std::{collections::BTreeMap, time::Duration};

use crate::{DifficultyLevel, GameKind, GameResult, scoring};

/// Running counters of a game.
///
/// Tracks the simulated clock alongside the attempt counters, since the
/// rendering layer paces trials by display time rather than by wall clock.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use brainpulse_engine::{DifficultyLevel, GameKind, game::TrialStats};
///
/// let mut stats = TrialStats::new();
/// stats.record_answer(true, Duration::from_millis(400));
/// stats.record_answer(false, Duration::from_millis(600));
/// stats.record_timeout(Duration::from_millis(1500));
///
/// let result = stats.into_result(GameKind::Arithmetic, DifficultyLevel::DEFAULT, Default::default());
/// assert_eq!((result.correct_count, result.total_count), (1, 3));
/// assert_eq!(result.reaction_time_ms, Some(500));
/// assert_eq!(result.duration_ms, 2500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrialStats {
    correct: u32,
    total: u32,
    answered: u32,
    reaction_total: Duration,
    elapsed: Duration,
}

impl TrialStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            correct: 0,
            total: 0,
            answered: 0,
            reaction_total: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Records an answered attempt; the reaction time counts towards the mean.
    pub fn record_answer(&mut self, correct: bool, reaction: Duration) {
        self.record_attempt(correct);
        self.answered += 1;
        self.reaction_total += reaction;
        self.elapsed += reaction;
    }

    /// Records an attempt whose answer window closed without a response.
    pub fn record_timeout(&mut self, window: Duration) {
        self.record_attempt(false);
        self.elapsed += window;
    }

    /// Records an attempt without touching the clock or reaction times.
    pub const fn record_attempt(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn advance_clock(&mut self, time: Duration) {
        self.elapsed += time;
    }

    /// Mean reaction time in whole milliseconds, if anything was answered.
    #[must_use]
    pub fn mean_reaction_ms(&self) -> Option<u32> {
        if self.answered == 0 {
            return None;
        }
        let mean = self.reaction_total / self.answered;
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let millis = (mean.as_secs_f64() * 1000.0).round() as u32;
        Some(millis)
    }

    /// Builds the scored result, capping the duration at [`super::TIME_LIMIT`].
    #[must_use]
    pub fn into_result(
        self,
        kind: GameKind,
        difficulty: DifficultyLevel,
        raw_metrics: BTreeMap<String, f64>,
    ) -> GameResult {
        let duration = self.elapsed.min(super::TIME_LIMIT);
        let mut result = GameResult {
            game_id: kind.id().to_owned(),
            score: 0,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            accuracy: scoring::accuracy(self.correct, self.total),
            reaction_time_ms: self.mean_reaction_ms(),
            difficulty,
            correct_count: self.correct,
            total_count: self.total,
            raw_metrics,
        };
        result.score = scoring::game_score(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_give_zero_accuracy() {
        let result = TrialStats::new().into_result(
            GameKind::ShapeMatch,
            DifficultyLevel::MIN,
            BTreeMap::new(),
        );
        assert_eq!(result.total_count, 0);
        assert!(result.accuracy.abs() < f64::EPSILON);
        assert_eq!(result.reaction_time_ms, None);
        assert!(result.score <= 100);
    }

    #[test]
    fn test_duration_is_capped_at_time_limit() {
        let mut stats = TrialStats::new();
        stats.advance_clock(Duration::from_secs(60));
        let result = stats.into_result(GameKind::ColorWord, DifficultyLevel::MIN, BTreeMap::new());
        assert_eq!(result.duration_ms, 45_000);
    }

    #[test]
    fn test_mean_reaction_rounds_to_nearest_millisecond() {
        let mut stats = TrialStats::new();
        stats.record_answer(true, Duration::from_micros(400_400));
        stats.record_answer(true, Duration::from_micros(400_700));
        assert_eq!(stats.mean_reaction_ms(), Some(401));
    }
}
