//! Session state machine.
//!
//! A session walks `Idle -> AwaitingCondition -> InGame(0) -> Transition(1) ->
//! InGame(1) -> ... -> Finalizing -> Idle`. Games themselves are run by the
//! caller (see [`brainpulse_engine::GameRun`]); the orchestrator only receives
//! their outcomes. Nothing is persisted before [`SessionOrchestrator::finalize`],
//! so an exit at any point leaves every store untouched.

use brainpulse_adaptive::{DifficultyChange, DifficultyController, ProfileStore, ProfileStoreError};
use brainpulse_engine::{
    DifficultyLevel, GameKind, GameOutcome, GameResult, RandomSource, scoring,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    ConditionReport, DailySummary, GameMode, GameRegistry, ScoreSubmitter, SessionData,
    SessionStore, SessionStoreError, Streak, record, submission,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Idle,
    AwaitingCondition,
    /// Playing the game at this index of the session's game list.
    InGame(usize),
    /// Between games; the index is the next game to play.
    Transition(usize),
    /// All games played, waiting for [`SessionOrchestrator::finalize`].
    Finalizing,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("cannot {action} while the session is {state:?}")]
    InvalidState {
        state: SessionState,
        action: &'static str,
    },
    #[display("game mode {mode} is not available")]
    ModeDisabled { mode: GameMode },
    #[display("no games are registered for mode {mode}")]
    NoGames { mode: GameMode },
    #[display("expected a result for {expected}, got {found:?}")]
    WrongGame { expected: GameKind, found: String },
    #[display("failed to read difficulty profile")]
    Profile { source: ProfileStoreError },
    #[display("failed to persist session history")]
    History { source: SessionStoreError },
}

/// What [`SessionOrchestrator::finalize`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSession {
    pub data: SessionData,
    /// Summary of the session's day, including this session.
    pub summary: DailySummary,
    pub streak: Streak,
    /// One entry per game result, in play order.
    pub difficulty_changes: Vec<DifficultyChange>,
    /// Score submissions accepted by the submitter.
    pub submitted: usize,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    id: String,
    mode: GameMode,
    started_at: DateTime<Utc>,
    games: Vec<GameKind>,
    condition: Option<ConditionReport>,
    results: Vec<GameResult>,
}

/// Runs one session at a time over the injected stores.
#[derive(Debug)]
pub struct SessionOrchestrator<P, S, U> {
    registry: GameRegistry,
    controller: DifficultyController,
    profiles: P,
    sessions: S,
    submitter: U,
    device_id: String,
    state: SessionState,
    active: Option<ActiveSession>,
}

impl<P, S, U> SessionOrchestrator<P, S, U>
where
    P: ProfileStore,
    S: SessionStore,
    U: ScoreSubmitter,
{
    pub fn new(
        registry: GameRegistry,
        controller: DifficultyController,
        profiles: P,
        sessions: S,
        submitter: U,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            controller,
            profiles,
            sessions,
            submitter,
            device_id: device_id.into(),
            state: SessionState::Idle,
            active: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn profiles(&self) -> &P {
        &self.profiles
    }

    #[must_use]
    pub const fn sessions(&self) -> &S {
        &self.sessions
    }

    #[must_use]
    pub const fn submitter(&self) -> &U {
        &self.submitter
    }

    /// Games of the running session, in play order.
    #[must_use]
    pub fn games(&self) -> &[GameKind] {
        self.active
            .as_ref()
            .map(|active| active.games.as_slice())
            .unwrap_or_default()
    }

    /// Results recorded so far in the running session.
    #[must_use]
    pub fn results(&self) -> &[GameResult] {
        self.active
            .as_ref()
            .map(|active| active.results.as_slice())
            .unwrap_or_default()
    }

    /// Starts a session for `mode` and waits for the condition report.
    pub fn begin<R>(&mut self, mode: GameMode, now: DateTime<Utc>, rng: &mut R) -> Result<&str, SessionError>
    where
        R: RandomSource + ?Sized,
    {
        self.expect_state(SessionState::Idle, "start a session")?;
        if !mode.config().enabled {
            return Err(SessionError::ModeDisabled { mode });
        }
        let games: Vec<GameKind> = self
            .registry
            .select_session_games(mode)
            .into_iter()
            .map(|game| game.kind)
            .collect();
        if games.is_empty() {
            return Err(SessionError::NoGames { mode });
        }

        let id = record::generate_session_id(now, rng);
        info!(
            event = "session.started",
            session_id = %id,
            %mode,
            games = games.len()
        );
        self.state = SessionState::AwaitingCondition;
        let active = self.active.insert(ActiveSession {
            id,
            mode,
            started_at: now,
            games,
            condition: None,
            results: Vec::new(),
        });
        Ok(&active.id)
    }

    /// Records how the player feels and moves to the first game.
    pub fn submit_condition(&mut self, report: ConditionReport) -> Result<GameKind, SessionError> {
        self.expect_state(SessionState::AwaitingCondition, "submit a condition report")?;
        let active = active_mut(&mut self.active, self.state, "submit a condition report")?;
        active.condition = Some(report);
        let first = active.games[0];
        self.state = SessionState::InGame(0);
        Ok(first)
    }

    /// The game being played or about to be played.
    #[must_use]
    pub fn current_game(&self) -> Option<GameKind> {
        let index = match self.state {
            SessionState::InGame(i) | SessionState::Transition(i) => i,
            SessionState::Idle | SessionState::AwaitingCondition | SessionState::Finalizing => {
                return None;
            }
        };
        self.active.as_ref()?.games.get(index).copied()
    }

    /// Stored difficulty of [`Self::current_game`].
    pub fn difficulty_for_current(&self) -> Result<DifficultyLevel, SessionError> {
        let Some(game) = self.current_game() else {
            return Err(self.invalid_state("look up the current difficulty"));
        };
        self.controller
            .level_for(&self.profiles, game.id())
            .map_err(|source| SessionError::Profile { source })
    }

    /// Appends the result of the running game.
    pub fn complete_game(&mut self, result: GameResult) -> Result<SessionState, SessionError> {
        let SessionState::InGame(index) = self.state else {
            return Err(self.invalid_state("complete a game"));
        };
        let active = active_mut(&mut self.active, self.state, "complete a game")?;
        let expected = active.games[index];
        if result.game_id != expected.id() {
            return Err(SessionError::WrongGame {
                expected,
                found: result.game_id,
            });
        }

        info!(
            event = "game.completed",
            session_id = %active.id,
            game_id = %result.game_id,
            index,
            score = result.score,
            accuracy = result.accuracy
        );
        active.results.push(result);
        let next = index + 1;
        self.state = if next < active.games.len() {
            SessionState::Transition(next)
        } else {
            SessionState::Finalizing
        };
        Ok(self.state)
    }

    /// Applies the outcome of a game run: a result is recorded, an abort ends
    /// the session.
    pub fn record_outcome(&mut self, outcome: GameOutcome) -> Result<SessionState, SessionError> {
        match outcome {
            GameOutcome::Completed(result) => self.complete_game(result),
            GameOutcome::Aborted => {
                self.exit();
                Ok(self.state)
            }
        }
    }

    /// Leaves the transition screen and starts the next game.
    pub fn advance(&mut self) -> Result<GameKind, SessionError> {
        let SessionState::Transition(index) = self.state else {
            return Err(self.invalid_state("advance to the next game"));
        };
        let game = active_mut(&mut self.active, self.state, "advance to the next game")?.games[index];
        self.state = SessionState::InGame(index);
        Ok(game)
    }

    /// Abandons the running session without persisting anything.
    pub fn exit(&mut self) {
        if let Some(active) = self.active.take() {
            info!(
                event = "session.aborted",
                session_id = %active.id,
                state = ?self.state,
                games_played = active.results.len()
            );
        }
        self.state = SessionState::Idle;
    }

    /// Scores, persists and reports the finished session.
    ///
    /// The session history is written first. If that fails the session stays
    /// in [`SessionState::Finalizing`] and `finalize` may be retried. Difficulty
    /// profile failures and score submission failures are logged and do not
    /// fail the session.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<FinalizedSession, SessionError> {
        self.expect_state(SessionState::Finalizing, "finalize")?;
        let Some(active) = self.active.as_ref() else {
            return Err(self.invalid_state("finalize"));
        };
        let Some(condition_before) = active.condition else {
            return Err(self.invalid_state("finalize"));
        };

        let data = SessionData {
            id: active.id.clone(),
            started_at: active.started_at,
            ended_at: now,
            mode: active.mode,
            composite_score: scoring::composite_score(&active.results),
            game_results: active.results.clone(),
            condition_before,
        };

        let mut history = self
            .sessions
            .load_or_default()
            .map_err(|source| SessionError::History { source })?;
        let summary = history.record_session(data.clone()).clone();
        self.sessions
            .save(&history)
            .map_err(|source| SessionError::History { source })?;

        let mut difficulty_changes = Vec::with_capacity(data.game_results.len());
        for result in &data.game_results {
            match self.controller.update(&mut self.profiles, result, now) {
                Ok(change) => difficulty_changes.push(change),
                Err(error) => warn!(
                    event = "difficulty.update_failed",
                    game_id = %result.game_id,
                    %error
                ),
            }
        }

        let submitted =
            submission::submit_all(&mut self.submitter, &self.device_id, data.mode, &data.game_results);

        info!(
            event = "session.finalized",
            session_id = %data.id,
            composite_score = data.composite_score,
            streak = history.streak.count,
            submitted
        );
        self.active = None;
        self.state = SessionState::Idle;

        Ok(FinalizedSession {
            data,
            summary,
            streak: history.streak,
            difficulty_changes,
            submitted,
        })
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid_state(action))
        }
    }

    fn invalid_state(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            state: self.state,
            action,
        }
    }
}

fn active_mut<'a>(
    active: &'a mut Option<ActiveSession>,
    state: SessionState,
    action: &'static str,
) -> Result<&'a mut ActiveSession, SessionError> {
    active
        .as_mut()
        .ok_or(SessionError::InvalidState { state, action })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use brainpulse_adaptive::MemoryProfileStore;
    use brainpulse_engine::TrialSeed;
    use chrono::TimeZone as _;

    use crate::{
        History, Rating,
        fakes::{MemorySessionStore, RecordingSubmitter},
    };

    use super::*;

    type Orchestrator<S = MemorySessionStore> =
        SessionOrchestrator<MemoryProfileStore, S, RecordingSubmitter>;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 7, 30, 0).unwrap()
    }

    fn orchestrator<S: SessionStore>(sessions: S) -> Orchestrator<S> {
        SessionOrchestrator::new(
            GameRegistry::builtin(),
            DifficultyController::default(),
            MemoryProfileStore::new(),
            sessions,
            RecordingSubmitter::new(),
            "device-1",
        )
    }

    fn condition() -> ConditionReport {
        let rating = Rating::new(4).unwrap();
        ConditionReport {
            sleep_quality: rating,
            energy_level: rating,
            stress_level: Rating::MIN,
        }
    }

    fn perfect(kind: GameKind) -> GameResult {
        let mut result = GameResult {
            game_id: kind.id().to_owned(),
            score: 0,
            duration_ms: 0,
            accuracy: 1.0,
            reaction_time_ms: Some(500),
            difficulty: DifficultyLevel::MAX,
            correct_count: 20,
            total_count: 20,
            raw_metrics: BTreeMap::new(),
        };
        result.score = scoring::game_score(&result);
        result
    }

    fn start(orch: &mut Orchestrator<impl SessionStore>, mode: GameMode) {
        let mut rng = TrialSeed::from_bytes([9; 16]).rng();
        orch.begin(mode, now(), &mut rng).unwrap();
        orch.submit_condition(condition()).unwrap();
    }

    #[test]
    fn test_disabled_mode_cannot_start() {
        let mut orch = orchestrator(MemorySessionStore::new());
        let mut rng = TrialSeed::from_bytes([9; 16]).rng();
        let err = orch.begin(GameMode::Rest, now(), &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::ModeDisabled { mode: GameMode::Rest }));
        assert!(orch.state().is_idle());
    }

    #[test]
    fn test_games_require_condition_report() {
        let mut orch = orchestrator(MemorySessionStore::new());
        let mut rng = TrialSeed::from_bytes([9; 16]).rng();
        let id = orch.begin(GameMode::Activation, now(), &mut rng).unwrap();
        assert!(id.starts_with("bp_"));
        assert!(orch.state().is_awaiting_condition());
        assert_eq!(orch.current_game(), None);

        let err = orch
            .complete_game(perfect(GameKind::ShapeMatch))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { .. }));

        assert_eq!(orch.submit_condition(condition()).unwrap(), GameKind::ShapeMatch);
        assert_eq!(orch.state(), SessionState::InGame(0));
    }

    #[test]
    fn test_result_for_wrong_game_is_rejected() {
        let mut orch = orchestrator(MemorySessionStore::new());
        start(&mut orch, GameMode::Activation);
        let err = orch.complete_game(perfect(GameKind::Arithmetic)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::WrongGame {
                expected: GameKind::ShapeMatch,
                ..
            }
        ));
        assert_eq!(orch.state(), SessionState::InGame(0));
    }

    #[test]
    fn test_games_advance_through_transitions() {
        let mut orch = orchestrator(MemorySessionStore::new());
        start(&mut orch, GameMode::Activation);

        let games = orch.games().to_vec();
        for (index, kind) in games.iter().enumerate() {
            assert_eq!(orch.current_game(), Some(*kind));
            assert_eq!(
                orch.difficulty_for_current().unwrap(),
                DifficultyLevel::DEFAULT
            );
            let state = orch.complete_game(perfect(*kind)).unwrap();
            if index + 1 < games.len() {
                assert_eq!(state, SessionState::Transition(index + 1));
                assert_eq!(orch.advance().unwrap(), games[index + 1]);
            } else {
                assert!(state.is_finalizing());
            }
        }
        assert_eq!(orch.results().len(), 4);
    }

    #[test]
    fn test_finalize_persists_and_adapts() {
        let mut orch = orchestrator(MemorySessionStore::new());
        start(&mut orch, GameMode::Development);
        orch.complete_game(perfect(GameKind::SpatialNBack)).unwrap();

        let finalized = orch.finalize(now()).unwrap();
        assert_eq!(finalized.data.composite_score, 100);
        assert_eq!(finalized.streak.count, 1);
        assert_eq!(finalized.summary.session_count, 1);
        assert_eq!(finalized.submitted, 1);
        assert_eq!(finalized.difficulty_changes.len(), 1);
        assert!(orch.state().is_idle());

        let history = orch.sessions().history().unwrap();
        assert_eq!(history.sessions.len(), 1);
        assert_eq!(orch.submitter().submissions()[0].game_id, "n-back");
        assert_eq!(orch.profiles().saves(), 1);
        assert_eq!(
            orch.controller
                .level_for(orch.profiles(), "n-back")
                .unwrap()
                .get(),
            3
        );
    }

    #[test]
    fn test_exit_discards_session() {
        let mut orch = orchestrator(MemorySessionStore::new());
        start(&mut orch, GameMode::Activation);
        orch.complete_game(perfect(GameKind::ShapeMatch)).unwrap();
        orch.advance().unwrap();

        let state = orch.record_outcome(GameOutcome::Aborted).unwrap();
        assert!(state.is_idle());
        assert!(orch.results().is_empty());
        assert!(orch.sessions().history().is_none());
        assert_eq!(orch.profiles().saves(), 0);
        assert!(orch.submitter().submissions().is_empty());
        assert!(orch.finalize(now()).is_err());
    }

    #[derive(Debug, Default)]
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self) -> Result<Option<History>, SessionStoreError> {
            Ok(None)
        }

        fn save(&mut self, _history: &History) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::UnsupportedVersion { found: 0 })
        }
    }

    #[test]
    fn test_history_failure_keeps_session_finalizing() {
        let mut orch = orchestrator(BrokenStore);
        start(&mut orch, GameMode::Development);
        orch.complete_game(perfect(GameKind::SpatialNBack)).unwrap();

        let err = orch.finalize(now()).unwrap_err();
        assert!(matches!(err, SessionError::History { .. }));
        assert!(orch.state().is_finalizing());
        assert_eq!(orch.profiles().saves(), 0);
        assert!(orch.submitter().submissions().is_empty());
    }
}
