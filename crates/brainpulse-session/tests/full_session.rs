use std::time::Duration;

use brainpulse_adaptive::{DifficultyController, MemoryProfileStore};
use brainpulse_engine::{
    DifficultyLevel, GameKind, GameOutcome, GameRun, PlayerInput, TrialSeed,
    game::{ArithmeticRun, ColorWordRun, NBackRun, SequenceRecallRun, ShapeMatchRun, TrialRun},
    scoring,
    trial::Trial,
};
use brainpulse_session::{
    ConditionReport, GameMode, GameRegistry, Rating, SessionOrchestrator, SessionState,
    fakes::{MemorySessionStore, RecordingSubmitter},
};
use chrono::{DateTime, TimeZone as _, Utc};
use rand_pcg::Pcg32;

const REACTION: Duration = Duration::from_millis(450);

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, hour, 0, 0).unwrap()
}

fn condition() -> ConditionReport {
    ConditionReport {
        sleep_quality: Rating::new(4).unwrap(),
        energy_level: Rating::new(3).unwrap(),
        stress_level: Rating::new(2).unwrap(),
    }
}

fn answer_all<T, F>(run: TrialRun<T>, respond: F) -> GameOutcome
where
    T: Trial,
    F: Fn(&T) -> T::Response,
{
    let inputs: Vec<_> = run
        .trials()
        .iter()
        .filter(|trial| trial.is_scored())
        .map(|trial| PlayerInput::Answer {
            response: respond(trial),
            reaction: REACTION,
        })
        .collect();
    run.play(inputs)
}

fn play_perfectly(kind: GameKind, level: DifficultyLevel, rng: &mut Pcg32) -> GameOutcome {
    match kind {
        GameKind::ShapeMatch => answer_all(ShapeMatchRun::new(level, rng), |t| t.is_match),
        GameKind::ColorWord => answer_all(ColorWordRun::new(level, rng), |t| t.ink),
        GameKind::SpatialNBack => answer_all(NBackRun::new(level, rng), |t| t.is_match),
        GameKind::Arithmetic => answer_all(ArithmeticRun::new(level, rng), |t| t.answer),
        GameKind::SequenceRecall => {
            let mut run = SequenceRecallRun::new(level, rng.clone());
            while !run.is_over() {
                for cell in run.round().cells.clone() {
                    run.answer(cell, REACTION);
                }
            }
            GameOutcome::Completed(run.finish())
        }
    }
}

#[test]
fn test_activation_session_end_to_end() {
    let mut rng = TrialSeed::from_bytes([21; 16]).rng();
    let mut orch = SessionOrchestrator::new(
        GameRegistry::builtin(),
        DifficultyController::default(),
        MemoryProfileStore::new(),
        MemorySessionStore::new(),
        RecordingSubmitter::new(),
        "device-under-test",
    );

    orch.begin(GameMode::Activation, at(8), &mut rng).unwrap();
    let mut game = orch.submit_condition(condition()).unwrap();
    loop {
        let level = orch.difficulty_for_current().unwrap();
        assert_eq!(level, DifficultyLevel::DEFAULT);
        let outcome = play_perfectly(game, level, &mut rng);
        assert!(outcome.is_completed());
        match orch.record_outcome(outcome).unwrap() {
            SessionState::Transition(_) => game = orch.advance().unwrap(),
            SessionState::Finalizing => break,
            state => panic!("unexpected state {state:?}"),
        }
    }

    let finalized = orch.finalize(at(8)).unwrap();
    let results = &finalized.data.game_results;
    let ids: Vec<_> = results.iter().map(|r| r.game_id.as_str()).collect();
    assert_eq!(
        ids,
        ["speed-match", "color-stroop", "sequence-memory", "quick-math"]
    );
    assert!(results.iter().all(|r| (r.accuracy - 1.0).abs() < f64::EPSILON));
    assert_eq!(
        finalized.data.composite_score,
        scoring::composite_score(results)
    );
    assert_eq!(finalized.data.condition_before, condition());
    assert_eq!(finalized.streak.count, 1);
    assert_eq!(finalized.summary.best_score, finalized.data.composite_score);
    assert_eq!(finalized.submitted, 4);
    assert_eq!(finalized.difficulty_changes.len(), 4);
    for change in &finalized.difficulty_changes {
        assert_eq!(change.previous, DifficultyLevel::DEFAULT);
        assert!(change.current >= change.previous);
    }
    assert!(orch.state().is_idle());

    // An abandoned second session leaves the stores as they were.
    orch.begin(GameMode::Activation, at(20), &mut rng).unwrap();
    orch.submit_condition(condition()).unwrap();
    orch.record_outcome(GameOutcome::Aborted).unwrap();
    let history = orch.sessions().history().unwrap();
    assert_eq!(history.sessions.len(), 1);
    assert_eq!(orch.submitter().submissions().len(), 4);
}
