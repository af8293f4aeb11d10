//! Simulated player used by `auto-play`.

use std::time::Duration;

use anyhow::Context as _;
use brainpulse_engine::{
    DifficultyLevel, GameKind, GameOutcome, GameRun, PlayerInput, RandomSourceExt as _, TrialSeed,
    game::{ArithmeticRun, ColorWordRun, NBackRun, SequenceRecallRun, ShapeMatchRun, TrialRun},
    trial::{
        Trial, arithmetic::ArithmeticTrial, color_word::ColorWordTrial,
        shape_match::ShapeMatchTrial, spatial_nback::NBackTrial,
    },
};
use rand::{Rng as _, distr::Distribution as _};
use rand_distr::Normal;
use rand_pcg::Pcg32;

const SLOWEST_MEAN_MS: f64 = 1400.0;
const FASTEST_MEAN_MS: f64 = 500.0;
const MIN_REACTION_MS: f64 = 150.0;

/// Trials the bot knows how to answer right and wrong.
trait Answerable: Trial {
    fn right(&self) -> Self::Response;
    fn wrong(&self) -> Self::Response;
}

impl Answerable for ShapeMatchTrial {
    fn right(&self) -> bool {
        self.is_match
    }

    fn wrong(&self) -> bool {
        !self.is_match
    }
}

impl Answerable for NBackTrial {
    fn right(&self) -> bool {
        self.is_match
    }

    fn wrong(&self) -> bool {
        !self.is_match
    }
}

impl Answerable for ColorWordTrial {
    fn right(&self) -> Self::Response {
        self.ink
    }

    fn wrong(&self) -> Self::Response {
        // the options always hold three colors besides the ink
        self.options
            .into_iter()
            .find(|&color| color != self.ink)
            .unwrap_or(self.word)
    }
}

impl Answerable for ArithmeticTrial {
    fn right(&self) -> u32 {
        self.answer
    }

    fn wrong(&self) -> u32 {
        self.choices
            .into_iter()
            .find(|&choice| choice != self.answer)
            .unwrap_or(self.answer + 1)
    }
}

/// A player with a fixed skill in `0..=1`.
///
/// Skill sets both the chance of a right answer and the mean reaction time;
/// reaction times are normally distributed around that mean. A reaction slower
/// than the answer window is a timeout.
#[derive(Debug, Clone)]
pub(crate) struct SimulatedPlayer {
    skill: f64,
    reaction: Normal<f64>,
}

impl SimulatedPlayer {
    pub(crate) fn new(skill: f64) -> anyhow::Result<Self> {
        let skill = skill.clamp(0.0, 1.0);
        let mean = (FASTEST_MEAN_MS - SLOWEST_MEAN_MS).mul_add(skill, SLOWEST_MEAN_MS);
        let reaction = Normal::new(mean, mean * 0.2)
            .with_context(|| format!("Invalid reaction time distribution for skill {skill}"))?;
        Ok(Self { skill, reaction })
    }

    fn reaction(&self, rng: &mut Pcg32) -> Duration {
        let ms = self.reaction.sample(rng).max(MIN_REACTION_MS);
        Duration::from_secs_f64(ms / 1000.0)
    }

    fn input_for<T>(&self, trial: &T, window: Duration, rng: &mut Pcg32) -> PlayerInput<T::Response>
    where
        T: Answerable,
    {
        let reaction = self.reaction(rng);
        if reaction >= window {
            return PlayerInput::TimeOut;
        }
        let response = if rng.chance(self.skill) {
            trial.right()
        } else {
            trial.wrong()
        };
        PlayerInput::Answer { response, reaction }
    }

    /// Plays one game to the end.
    pub(crate) fn play(&self, kind: GameKind, level: DifficultyLevel, rng: &mut Pcg32) -> GameOutcome {
        match kind {
            GameKind::ShapeMatch => self.play_trials(ShapeMatchRun::new(level, rng), rng),
            GameKind::ColorWord => self.play_trials(ColorWordRun::new(level, rng), rng),
            GameKind::SpatialNBack => self.play_trials(NBackRun::new(level, rng), rng),
            GameKind::Arithmetic => self.play_trials(ArithmeticRun::new(level, rng), rng),
            GameKind::SequenceRecall => self.play_sequence(level, rng),
        }
    }

    fn play_trials<T>(&self, run: TrialRun<T>, rng: &mut Pcg32) -> GameOutcome
    where
        T: Answerable,
    {
        let window = run.answer_window();
        let inputs: Vec<_> = run
            .trials()
            .iter()
            .filter(|trial| trial.is_scored())
            .map(|trial| self.input_for(trial, window, rng))
            .collect();
        run.play(inputs)
    }

    fn play_sequence(&self, level: DifficultyLevel, rng: &mut Pcg32) -> GameOutcome {
        let tap_accuracy = 0.15f64.mul_add(self.skill, 0.85);
        let round_rng = TrialSeed::from_bytes(rng.random()).rng();
        let mut run = SequenceRecallRun::new(level, round_rng);
        let cell_count = run.round().grid_size.pow(2);

        while !run.is_over() {
            for cell in run.round().cells.clone() {
                let tap = if rng.chance(tap_accuracy) {
                    cell
                } else {
                    u8::try_from((usize::from(cell) + 1) % cell_count).unwrap_or_default()
                };
                let reaction = self.reaction(rng);
                if !run.answer(tap, reaction).is_pending() {
                    break;
                }
            }
        }
        GameOutcome::Completed(run.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_player_answers_everything_right() {
        let player = SimulatedPlayer::new(1.0).unwrap();
        for kind in GameKind::ALL {
            let mut rng = TrialSeed::from_bytes([3; 16]).rng();
            let result = player
                .play(kind, DifficultyLevel::DEFAULT, &mut rng)
                .into_result()
                .unwrap();
            assert_eq!(result.game_id, kind.id());
            assert_eq!(result.correct_count, result.total_count, "{kind}");
            assert!(result.total_count > 0, "{kind}");
        }
    }

    #[test]
    fn test_weak_player_makes_mistakes() {
        let player = SimulatedPlayer::new(0.2).unwrap();
        let mut rng = TrialSeed::from_bytes([4; 16]).rng();
        let result = player
            .play(GameKind::ColorWord, DifficultyLevel::DEFAULT, &mut rng)
            .into_result()
            .unwrap();
        assert!(result.accuracy < 0.6);
        assert!(result.reaction_time_ms.unwrap() > 800);
    }
}
