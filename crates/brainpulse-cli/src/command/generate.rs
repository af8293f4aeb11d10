use std::path::{Path, PathBuf};

use brainpulse_engine::{
    DifficultyLevel, GameKind, TrialSeed,
    trial::{
        arithmetic, color_word,
        sequence_recall::{self, SequenceConfig},
        shape_match, spatial_nback,
    },
};
use serde::Serialize;

use crate::util::Output;

const DEFAULT_COUNT: usize = 20;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateArg {
    /// Game id (speed-match, color-stroop, n-back, quick-math, sequence-memory)
    #[arg(long)]
    game: GameKind,
    /// Difficulty level
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(i64).range(1..=5))]
    difficulty: i64,
    /// Number of trials; sequence length for sequence-memory. Defaults to the
    /// level's round count for n-back and start length for sequence-memory
    #[arg(long)]
    count: Option<usize>,
    /// 32 hex character seed; random when omitted
    #[arg(long)]
    seed: Option<TrialSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GeneratedTrials<T> {
    game: GameKind,
    difficulty: DifficultyLevel,
    seed: TrialSeed,
    trials: T,
}

pub(crate) fn run(arg: &GenerateArg) -> anyhow::Result<()> {
    let GenerateArg {
        game,
        difficulty,
        count,
        seed,
        output,
    } = arg;

    let difficulty = DifficultyLevel::new(*difficulty);
    let seed = seed.unwrap_or_else(TrialSeed::random);
    let rng = &mut seed.rng();
    let output = output.as_deref();

    match game {
        GameKind::ShapeMatch => {
            let trials = shape_match::generate(difficulty, count.unwrap_or(DEFAULT_COUNT), rng);
            save(*game, difficulty, seed, &trials, output)
        }
        GameKind::ColorWord => {
            let trials = color_word::generate(difficulty, count.unwrap_or(DEFAULT_COUNT), rng);
            save(*game, difficulty, seed, &trials, output)
        }
        GameKind::SpatialNBack => {
            let trials = spatial_nback::generate(difficulty, *count, rng);
            save(*game, difficulty, seed, &trials, output)
        }
        GameKind::Arithmetic => {
            let trials = arithmetic::generate(difficulty, count.unwrap_or(DEFAULT_COUNT), rng);
            save(*game, difficulty, seed, &trials, output)
        }
        GameKind::SequenceRecall => {
            let length = count.unwrap_or(SequenceConfig::for_level(difficulty).start_length);
            let round = sequence_recall::generate(difficulty, length, rng);
            save(*game, difficulty, seed, &round, output)
        }
    }
}

fn save<T>(
    game: GameKind,
    difficulty: DifficultyLevel,
    seed: TrialSeed,
    trials: T,
    output: Option<&Path>,
) -> anyhow::Result<()>
where
    T: Serialize,
{
    let report = GeneratedTrials {
        game,
        difficulty,
        seed,
        trials,
    };
    Output::save_json(&report, output)
}
