use std::{collections::BTreeMap, time::Duration};

use crate::{
    DifficultyLevel, GameKind, GameResult, RandomSource,
    trial::sequence_recall::{self, SequenceConfig, SequenceRound},
};

use super::{GameRun, TIME_LIMIT, TrialStats, Verdict};

/// Wrong replays tolerated before the game ends.
pub const MAX_STRIKES: u32 = 3;

/// Sequence memory game.
///
/// Each round flashes a sequence, then accepts taps one cell at a time. A fully
/// replayed round is a correct attempt and the next round is one cell longer
/// (up to the level's maximum). A wrong tap or a timeout is a strike and the
/// same length is replayed with a fresh sequence. The game ends after
/// [`MAX_STRIKES`] strikes or when the clock reaches [`TIME_LIMIT`].
///
/// The run owns its random source since every round is generated on demand.
#[derive(Debug, Clone)]
pub struct SequenceRecallRun<R> {
    difficulty: DifficultyLevel,
    config: &'static SequenceConfig,
    rng: R,
    round: SequenceRound,
    input: Vec<u8>,
    length: usize,
    strikes: u32,
    stats: TrialStats,
}

impl<R> SequenceRecallRun<R>
where
    R: RandomSource,
{
    pub fn new(difficulty: DifficultyLevel, mut rng: R) -> Self {
        let config = SequenceConfig::for_level(difficulty);
        let length = config.start_length;
        let round = sequence_recall::generate_round(config.grid_size, length, &mut rng);
        let mut stats = TrialStats::new();
        stats.advance_clock(config.showing_time(length));
        Self {
            difficulty,
            config,
            rng,
            round,
            input: Vec::with_capacity(config.max_length),
            length,
            strikes: 0,
            stats,
        }
    }

    /// The sequence currently being replayed.
    #[must_use]
    pub const fn round(&self) -> &SequenceRound {
        &self.round
    }

    /// Cells tapped so far in the current round.
    #[must_use]
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Current sequence length.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub const fn strikes(&self) -> u32 {
        self.strikes
    }

    fn start_round(&mut self) {
        self.round =
            sequence_recall::generate_round(self.config.grid_size, self.length, &mut self.rng);
        self.input.clear();
        self.stats
            .advance_clock(self.config.showing_time(self.length));
    }

    fn strike(&mut self) -> Verdict {
        self.strikes += 1;
        self.stats.record_attempt(false);
        if self.strikes < MAX_STRIKES {
            self.start_round();
        }
        Verdict::Incorrect
    }
}

impl<R> GameRun for SequenceRecallRun<R>
where
    R: RandomSource,
{
    /// One tapped cell.
    type Response = u8;

    fn kind(&self) -> GameKind {
        GameKind::SequenceRecall
    }

    fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    fn elapsed(&self) -> Duration {
        self.stats.elapsed()
    }

    fn is_over(&self) -> bool {
        self.strikes >= MAX_STRIKES || self.stats.elapsed() >= TIME_LIMIT
    }

    fn answer(&mut self, cell: u8, reaction: Duration) -> Verdict {
        if self.is_over() {
            return Verdict::Ignored;
        }
        self.stats.advance_clock(reaction);
        self.input.push(cell);

        let check = sequence_recall::check_sequence(&self.round.cells, &self.input);
        if !check.correct {
            return self.strike();
        }
        if self.input.len() < self.round.cells.len() {
            return Verdict::Pending;
        }

        self.stats.record_attempt(true);
        self.length = (self.length + 1).min(self.config.max_length);
        self.start_round();
        Verdict::Correct
    }

    /// Gives up on the current round; the clock advances by as long as the
    /// sequence took to show.
    fn time_out(&mut self) -> Verdict {
        if self.is_over() {
            return Verdict::Ignored;
        }
        self.stats
            .advance_clock(self.config.showing_time(self.length));
        self.strike()
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish(self) -> GameResult {
        let raw_metrics = BTreeMap::from([
            ("max_sequence_length".to_owned(), self.length as f64),
            ("strikes".to_owned(), f64::from(self.strikes)),
        ]);
        self.stats
            .into_result(GameKind::SequenceRecall, self.difficulty, raw_metrics)
    }
}

#[cfg(test)]
mod tests {
    use crate::{GameOutcome, PlayerInput, TrialSeed};

    use super::*;

    fn new_run(level: DifficultyLevel) -> SequenceRecallRun<rand_pcg::Pcg32> {
        SequenceRecallRun::new(level, TrialSeed::from_bytes([55; 16]).rng())
    }

    fn replay(run: &mut SequenceRecallRun<rand_pcg::Pcg32>) -> Verdict {
        let cells = run.round().cells.clone();
        let mut verdict = Verdict::Ignored;
        for cell in cells {
            verdict = run.answer(cell, Duration::from_millis(100));
        }
        verdict
    }

    #[test]
    fn test_correct_round_grows_sequence() {
        let mut run = new_run(DifficultyLevel::MIN);
        assert_eq!(run.length(), 3);
        assert_eq!(replay(&mut run), Verdict::Correct);
        assert_eq!(run.length(), 4);
        assert_eq!(run.round().cells.len(), 4);
        assert!(run.input().is_empty());
    }

    #[test]
    fn test_partial_input_is_pending() {
        let mut run = new_run(DifficultyLevel::MIN);
        let first = run.round().cells[0];
        assert_eq!(run.answer(first, Duration::ZERO), Verdict::Pending);
        assert_eq!(run.input(), [first]);
    }

    #[test]
    fn test_length_is_capped_at_max() {
        let mut run = new_run(DifficultyLevel::MAX);
        let max = SequenceConfig::for_level(DifficultyLevel::MAX).max_length;
        while run.length() < max {
            assert_eq!(replay(&mut run), Verdict::Correct);
        }
        assert_eq!(replay(&mut run), Verdict::Correct);
        assert_eq!(run.length(), max);
    }

    #[test]
    fn test_three_strikes_end_the_game() {
        let mut run = new_run(DifficultyLevel::DEFAULT);
        for _ in 0..MAX_STRIKES {
            let wrong = (run.round().cells[0] + 1) % 9;
            assert_eq!(run.answer(wrong, Duration::ZERO), Verdict::Incorrect);
        }
        assert!(run.is_over());
        assert_eq!(run.answer(0, Duration::ZERO), Verdict::Ignored);

        let result = run.finish();
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.reaction_time_ms, None);
        assert_eq!(result.raw_metrics["strikes"], 3.0);
        assert_eq!(result.raw_metrics["max_sequence_length"], 3.0);
    }

    #[test]
    fn test_timeout_is_a_strike() {
        let mut run = new_run(DifficultyLevel::DEFAULT);
        assert_eq!(run.time_out(), Verdict::Incorrect);
        assert_eq!(run.strikes(), 1);
        assert!(!run.is_over());
    }

    #[test]
    fn test_play_completes_after_strikes() {
        let run = new_run(DifficultyLevel::DEFAULT);
        let inputs = std::iter::repeat_n(PlayerInput::TimeOut, 5);
        let outcome = run.play(inputs);
        let GameOutcome::Completed(result) = outcome else {
            panic!("run should complete");
        };
        assert_eq!(result.game_id, "sequence-memory");
        assert_eq!(result.total_count, 3);
    }
}
