use brainpulse_adaptive::DifficultyController;
use brainpulse_engine::{TrialSeed, scoring::ScoreBand};
use brainpulse_session::{
    ConditionReport, GameMode, GameRegistry, Rating, SessionOrchestrator, SessionState,
};
use chrono::Utc;
use tracing::info;

use crate::{
    bot::SimulatedPlayer,
    command::GlobalArg,
    store::{JsonHistoryStore, JsonProfileStore, OutboxSubmitter},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Session mode (activation, development)
    #[arg(long, default_value = "activation")]
    mode: GameMode,
    /// Simulated player skill between 0 and 1
    #[arg(long, default_value_t = 0.8)]
    skill: f64,
    /// 32 hex character seed; random when omitted
    #[arg(long)]
    seed: Option<TrialSeed>,
    /// Sleep quality before the session (1-5)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    sleep: u8,
    /// Energy level before the session (1-5)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    energy: u8,
    /// Stress level before the session (1-5, 1 is low)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    stress: u8,
}

pub(crate) fn run(global: &GlobalArg, arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        mode,
        skill,
        seed,
        sleep,
        energy,
        stress,
    } = arg;

    let condition = ConditionReport {
        sleep_quality: Rating::new(*sleep)?,
        energy_level: Rating::new(*energy)?,
        stress_level: Rating::new(*stress)?,
    };
    let player = SimulatedPlayer::new(*skill)?;
    let seed = seed.unwrap_or_else(TrialSeed::random);
    let mut rng = seed.rng();

    let mut orchestrator = SessionOrchestrator::new(
        GameRegistry::builtin(),
        DifficultyController::default(),
        JsonProfileStore::in_dir(&global.data_dir),
        JsonHistoryStore::in_dir(&global.data_dir),
        OutboxSubmitter::in_dir(&global.data_dir),
        global.device_id.clone(),
    );

    let session_id = orchestrator.begin(*mode, Utc::now(), &mut rng)?.to_owned();
    info!(%session_id, %seed, "auto-play started");

    let mut game = orchestrator.submit_condition(condition)?;
    loop {
        let level = orchestrator.difficulty_for_current()?;
        let outcome = player.play(game, level, &mut rng);
        match orchestrator.record_outcome(outcome)? {
            SessionState::Transition(_) => game = orchestrator.advance()?,
            SessionState::Finalizing => break,
            state => anyhow::bail!("session ended unexpectedly in state {state:?}"),
        }
    }

    let finalized = orchestrator.finalize(Utc::now())?;
    for change in finalized.difficulty_changes.iter().filter(|c| c.is_changed()) {
        info!(
            game_id = %change.game_id,
            "difficulty {} -> {}",
            change.previous.label(),
            change.current.label()
        );
    }
    info!(
        composite_score = finalized.data.composite_score,
        band = %ScoreBand::from_score(finalized.data.composite_score),
        streak = finalized.streak.count,
        "session complete"
    );

    Output::save_json(&finalized.data, None)
}
