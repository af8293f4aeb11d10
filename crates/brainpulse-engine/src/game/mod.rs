//! Game runs: the trial loop between a generator and a [`GameResult`].
//!
//! A run owns its generated trials and running counters. The rendering layer
//! feeds it player answers (with their reaction time) and answer-window
//! timeouts until the run reports [`GameRun::is_over`], then consumes it with
//! [`GameRun::finish`]. Exiting consumes the run with [`GameRun::exit`] and
//! yields [`GameOutcome::Aborted`]; both methods take `self`, so a run resolves
//! exactly once.
//!
//! - [`TrialRun`] - Fixed trial pool answered one trial at a time (shape match,
//!   color word, spatial N-back, arithmetic)
//! - [`SequenceRecallRun`] - Rounds of growing sequences with a strike limit

use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::DifficultyLevel;

pub use self::{
    recall_run::{MAX_STRIKES, SequenceRecallRun},
    stats::TrialStats,
    trial_run::{ArithmeticRun, ColorWordRun, NBackRun, ShapeMatchRun, TrialRun},
};

mod recall_run;
mod stats;
mod trial_run;

/// Wall-clock budget of a single game.
pub const TIME_LIMIT: Duration = Duration::from_secs(45);

/// The five mini-games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "speed-match")]
    ShapeMatch,
    #[serde(rename = "color-stroop")]
    ColorWord,
    #[serde(rename = "n-back")]
    SpatialNBack,
    #[serde(rename = "quick-math")]
    Arithmetic,
    #[serde(rename = "sequence-memory")]
    SequenceRecall,
}

impl GameKind {
    pub const ALL: [Self; 5] = [
        Self::ShapeMatch,
        Self::ColorWord,
        Self::SpatialNBack,
        Self::Arithmetic,
        Self::SequenceRecall,
    ];

    /// Stable identifier used by profiles, results and submissions.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ShapeMatch => "speed-match",
            Self::ColorWord => "color-stroop",
            Self::SpatialNBack => "n-back",
            Self::Arithmetic => "quick-math",
            Self::SequenceRecall => "sequence-memory",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShapeMatch => "Speed Match",
            Self::ColorWord => "Color Stroop",
            Self::SpatialNBack => "N-Back",
            Self::Arithmetic => "Quick Math",
            Self::SequenceRecall => "Sequence Memory",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown game id {id:?}")]
pub struct ParseGameKindError {
    id: String,
}

impl FromStr for GameKind {
    type Err = ParseGameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| ParseGameKindError { id: s.to_owned() })
    }
}

/// Performance record of one completed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game_id: String,
    /// Game score in `0..=100`, see [`crate::scoring::game_score`].
    pub score: u8,
    pub duration_ms: u64,
    /// `correct_count / total_count`, 0 when nothing was attempted.
    pub accuracy: f64,
    /// Mean reaction time over answered trials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_time_ms: Option<u32>,
    pub difficulty: DifficultyLevel,
    pub correct_count: u32,
    pub total_count: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_metrics: BTreeMap<String, f64>,
}

/// How a game run resolved.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum GameOutcome {
    Completed(GameResult),
    /// The player left; nothing is recorded.
    Aborted,
}

impl GameOutcome {
    #[must_use]
    pub fn into_result(self) -> Option<GameResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Aborted => None,
        }
    }
}

/// One event delivered to a running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput<A> {
    Answer { response: A, reaction: Duration },
    /// The answer window closed without a response.
    TimeOut,
    Exit,
}

/// Immediate feedback for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Accepted, but the attempt is not finished yet (a partial sequence).
    Pending,
    /// The run is already over; the input had no effect.
    Ignored,
}

/// A running game.
pub trait GameRun: Sized {
    type Response;

    fn kind(&self) -> GameKind;

    fn difficulty(&self) -> DifficultyLevel;

    /// Simulated time spent so far.
    fn elapsed(&self) -> Duration;

    /// No further input will be accepted; [`Self::finish`] should be called.
    fn is_over(&self) -> bool;

    fn answer(&mut self, response: Self::Response, reaction: Duration) -> Verdict;

    /// Scores the pending attempt as attempted-and-incorrect.
    fn time_out(&mut self) -> Verdict;

    /// Ends the game and produces its result.
    ///
    /// May be called before [`Self::is_over`], e.g. when the wall-clock timer
    /// of the rendering layer expires first.
    fn finish(self) -> GameResult;

    /// Ends the game without a result, discarding all counters.
    fn exit(self) -> GameOutcome {
        GameOutcome::Aborted
    }

    /// Drives the run from an input stream until it resolves.
    ///
    /// Stops at the first of: the run is over ([`GameOutcome::Completed`]), an
    /// [`PlayerInput::Exit`], or the end of `inputs` (both [`GameOutcome::Aborted`]).
    fn play<I>(mut self, inputs: I) -> GameOutcome
    where
        I: IntoIterator<Item = PlayerInput<Self::Response>>,
    {
        let mut inputs = inputs.into_iter();
        while !self.is_over() {
            match inputs.next() {
                Some(PlayerInput::Answer { response, reaction }) => {
                    self.answer(response, reaction);
                }
                Some(PlayerInput::TimeOut) => {
                    self.time_out();
                }
                Some(PlayerInput::Exit) | None => return self.exit(),
            }
        }
        GameOutcome::Completed(self.finish())
    }
}
