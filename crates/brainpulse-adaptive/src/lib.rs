//! Adaptive difficulty.
//!
//! Keeps one [`DifficultyLevel`](brainpulse_engine::DifficultyLevel) per game in
//! a [`DifficultyProfile`], persisted through a [`ProfileStore`], and moves it
//! one step at a time with a [`DifficultyController`] after every game.

pub use self::{
    controller::{DifficultyChange, DifficultyController, Thresholds},
    profile::{DifficultyProfile, MemoryProfileStore, ProfileStore, ProfileStoreError},
};

mod controller;
mod profile;
