//! Cognitive assessment engine.
//!
//! This crate holds the algorithmic core of the mini-game battery:
//!
//! - [`RandomSource`] - The single source of uniform randomness used by every generator
//! - [`DifficultyLevel`] - Clamped 1-5 level selecting each generator's configuration row
//! - [`trial`] - The five trial generators (shape match, color word, spatial N-back,
//!   arithmetic, sequence recall)
//! - [`game`] - Trial loops that turn player answers into a [`GameResult`]
//! - [`scoring`] - Game score and session composite score
//!
//! # Example
//!
//! ```
//! use brainpulse_engine::{DifficultyLevel, TrialSeed, trial::shape_match};
//!
//! let mut rng = TrialSeed::from_bytes([7; 16]).rng();
//! let trials = shape_match::generate(DifficultyLevel::DEFAULT, 20, &mut rng);
//!
//! assert_eq!(trials.len(), 20);
//! assert!(trials[0].is_first);
//! ```

pub use self::{
    difficulty::DifficultyLevel,
    game::{GameKind, GameOutcome, GameResult, GameRun, PlayerInput, Verdict},
    random::{RandomSource, RandomSourceExt, TrialSeed},
};

pub mod difficulty;
pub mod game;
pub mod random;
pub mod scoring;
pub mod trial;
