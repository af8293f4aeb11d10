use std::{collections::BTreeMap, time::Duration};

use crate::{
    DifficultyLevel, GameKind, GameResult, RandomSource,
    trial::{
        Trial,
        arithmetic::{self, ArithmeticConfig, ArithmeticTrial},
        color_word::{self, ColorWordConfig, ColorWordTrial},
        shape_match::{self, ShapeMatchConfig, ShapeMatchTrial},
        spatial_nback::{self, NBackConfig, NBackTrial},
    },
};

use super::{GameRun, TIME_LIMIT, TrialStats, Verdict};

const SHAPE_MATCH_POOL: usize = 60;
const COLOR_WORD_POOL: usize = 40;
const ARITHMETIC_POOL: usize = 30;

pub type ShapeMatchRun = TrialRun<ShapeMatchTrial>;
pub type ColorWordRun = TrialRun<ColorWordTrial>;
pub type NBackRun = TrialRun<NBackTrial>;
pub type ArithmeticRun = TrialRun<ArithmeticTrial>;

/// A game answered one trial at a time from a pre-generated pool.
///
/// Unscored trials are shown for one answer window and skipped without
/// counting. The run is over once the pool is exhausted or the simulated clock
/// reaches [`TIME_LIMIT`].
#[derive(Debug, Clone)]
pub struct TrialRun<T> {
    kind: GameKind,
    difficulty: DifficultyLevel,
    trials: Vec<T>,
    cursor: usize,
    answer_window: Duration,
    stats: TrialStats,
    raw_metrics: BTreeMap<String, f64>,
}

impl<T> TrialRun<T>
where
    T: Trial,
{
    fn from_trials(
        kind: GameKind,
        difficulty: DifficultyLevel,
        trials: Vec<T>,
        answer_window: Duration,
        raw_metrics: BTreeMap<String, f64>,
    ) -> Self {
        let mut run = Self {
            kind,
            difficulty,
            trials,
            cursor: 0,
            answer_window,
            stats: TrialStats::new(),
            raw_metrics,
        };
        run.skip_unscored();
        run
    }

    /// The trial awaiting an answer, `None` once the run is over.
    #[must_use]
    pub fn current_trial(&self) -> Option<&T> {
        if self.is_over() {
            return None;
        }
        self.trials.get(self.cursor)
    }

    /// All trials of the pool, including unscored and not yet shown ones.
    #[must_use]
    pub fn trials(&self) -> &[T] {
        &self.trials
    }

    #[must_use]
    pub const fn answer_window(&self) -> Duration {
        self.answer_window
    }

    #[must_use]
    pub const fn stats(&self) -> &TrialStats {
        &self.stats
    }

    fn skip_unscored(&mut self) {
        while self
            .trials
            .get(self.cursor)
            .is_some_and(|trial| !trial.is_scored())
        {
            self.cursor += 1;
            self.stats.advance_clock(self.answer_window);
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        self.skip_unscored();
    }
}

impl TrialRun<ShapeMatchTrial> {
    pub fn new<R>(difficulty: DifficultyLevel, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let config = ShapeMatchConfig::for_level(difficulty);
        let trials = shape_match::generate(difficulty, SHAPE_MATCH_POOL, rng);
        Self::from_trials(
            GameKind::ShapeMatch,
            difficulty,
            trials,
            config.display_time,
            BTreeMap::new(),
        )
    }
}

impl TrialRun<ColorWordTrial> {
    pub fn new<R>(difficulty: DifficultyLevel, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let config = ColorWordConfig::for_level(difficulty);
        let trials = color_word::generate(difficulty, COLOR_WORD_POOL, rng);
        Self::from_trials(
            GameKind::ColorWord,
            difficulty,
            trials,
            config.display_time,
            BTreeMap::new(),
        )
    }
}

impl TrialRun<NBackTrial> {
    #[expect(clippy::cast_precision_loss)]
    pub fn new<R>(difficulty: DifficultyLevel, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let config = NBackConfig::for_level(difficulty);
        let trials = spatial_nback::generate(difficulty, None, rng);
        let raw_metrics = BTreeMap::from([
            ("n_value".to_owned(), config.n as f64),
            ("total_rounds".to_owned(), trials.len() as f64),
        ]);
        Self::from_trials(
            GameKind::SpatialNBack,
            difficulty,
            trials,
            config.trial_period(),
            raw_metrics,
        )
    }
}

impl TrialRun<ArithmeticTrial> {
    pub fn new<R>(difficulty: DifficultyLevel, rng: &mut R) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let config = ArithmeticConfig::for_level(difficulty);
        let trials = arithmetic::generate(difficulty, ARITHMETIC_POOL, rng);
        Self::from_trials(
            GameKind::Arithmetic,
            difficulty,
            trials,
            config.time_per_problem,
            BTreeMap::new(),
        )
    }
}

impl<T> GameRun for TrialRun<T>
where
    T: Trial,
{
    type Response = T::Response;

    fn kind(&self) -> GameKind {
        self.kind
    }

    fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    fn elapsed(&self) -> Duration {
        self.stats.elapsed()
    }

    fn is_over(&self) -> bool {
        self.cursor >= self.trials.len() || self.stats.elapsed() >= TIME_LIMIT
    }

    fn answer(&mut self, response: T::Response, reaction: Duration) -> Verdict {
        let Some(trial) = self.current_trial() else {
            return Verdict::Ignored;
        };
        let correct = trial.is_correct(&response);
        self.stats
            .record_answer(correct, reaction.min(self.answer_window));
        self.advance();
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn time_out(&mut self) -> Verdict {
        if self.is_over() {
            return Verdict::Ignored;
        }
        self.stats.record_timeout(self.answer_window);
        self.advance();
        Verdict::Incorrect
    }

    fn finish(self) -> GameResult {
        self.stats
            .into_result(self.kind, self.difficulty, self.raw_metrics)
    }
}
