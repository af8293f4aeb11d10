use std::path::PathBuf;

use brainpulse_engine::{
    GameResult,
    scoring::{self, ScoreBand},
};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// JSON file holding a list of game results
    results_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct GameScore {
    game_id: String,
    /// Score recomputed from the result's counters.
    score: u8,
    /// Score stored in the result.
    reported_score: u8,
}

#[derive(Debug, Serialize)]
struct ScoreReport {
    games: Vec<GameScore>,
    composite_score: u8,
    band: ScoreBand,
}

impl ScoreReport {
    fn new(results: &[GameResult]) -> Self {
        let games = results
            .iter()
            .map(|result| GameScore {
                game_id: result.game_id.clone(),
                score: scoring::game_score(result),
                reported_score: result.score,
            })
            .collect();
        let composite_score = scoring::composite_score(results);
        Self {
            games,
            composite_score,
            band: ScoreBand::from_score(composite_score),
        }
    }
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg { results_path } = arg;

    let results = util::read_game_results(results_path)?;
    Output::save_json(&ScoreReport::new(&results), None)
}
