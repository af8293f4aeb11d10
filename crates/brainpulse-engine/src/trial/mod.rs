//! Trial generators, one per mini-game.
//!
//! Each generator maps a [`DifficultyLevel`](crate::DifficultyLevel) and a
//! count to an ordered sequence of trials, consuming only the supplied
//! [`RandomSource`](crate::RandomSource). A per-level configuration table
//! drives every generator; each table row makes the task strictly harder than
//! the previous one (lower match/congruent ratio, shorter display time, larger
//! pool, longer sequence).
//!
//! - [`shape_match`] - Is this shape the same as the previous one?
//! - [`color_word`] - Name the ink color, not the word (Stroop)
//! - [`spatial_nback`] - Does this grid position match the one N trials back?
//! - [`arithmetic`] - Pick the answer to a small arithmetic problem
//! - [`sequence_recall`] - Replay a sequence of flashed grid cells
//!
//! Trials never store a separate answer key: the ground truth is encoded in
//! their own fields (`is_match`, `ink`, `answer`, ...) and exposed through
//! [`Trial::is_correct`].

use serde::{Deserialize, Serialize};

pub mod arithmetic;
pub mod color_word;
pub mod sequence_recall;
pub mod shape_match;
pub mod spatial_nback;

/// A single stimulus/response unit of a mini-game.
pub trait Trial {
    /// What the player answers for this trial.
    type Response;

    /// Whether a response to this trial counts towards the score.
    ///
    /// Unscored trials (the first shape-match trial, N-back filler) are shown
    /// but never answered.
    fn is_scored(&self) -> bool {
        true
    }

    /// Whether `response` is the right answer for this trial.
    fn is_correct(&self, response: &Self::Response) -> bool;
}

/// Display tint for stimuli whose color carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tint {
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Fire,
}

impl Tint {
    pub const ALL: [Self; 6] = [
        Self::Primary,
        Self::Secondary,
        Self::Success,
        Self::Info,
        Self::Warning,
        Self::Fire,
    ];
}
