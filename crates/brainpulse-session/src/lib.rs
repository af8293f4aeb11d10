//! Session orchestration.
//!
//! Wraps the engine's games into daily sessions:
//!
//! - [`GameRegistry`] - Static catalogue of mini-games and the modes they belong to
//! - [`SessionOrchestrator`] - State machine from condition report to finalized session
//! - [`History`] - Finished sessions, day streak and daily summaries
//! - [`ScoreSubmission`] - Leaderboard payload for every finished game
//!
//! Persistence and delivery sit behind [`SessionStore`] and [`ScoreSubmitter`];
//! [`fakes`] provides in-memory implementations.

pub use self::{
    condition::{ConditionReport, Rating, RatingError},
    history::{DailySummary, History, SessionStore, SessionStoreError, Streak},
    mode::{CognitiveDomain, GameMode, ModeConfig, ParseGameModeError},
    orchestrator::{FinalizedSession, SessionError, SessionOrchestrator, SessionState},
    record::{SessionData, generate_session_id},
    registry::{GameRegistry, MiniGameDefinition, RegistryError},
    submission::{ScoreSubmission, ScoreSubmitter, SubmissionError, submit_all},
};

mod condition;
pub mod fakes;
mod history;
mod mode;
mod orchestrator;
mod record;
mod registry;
mod submission;
