use brainpulse_adaptive::{DifficultyController, ProfileStore as _};
use brainpulse_engine::{DifficultyLevel, GameKind};
use chrono::Utc;
use serde::Serialize;

use crate::{command::GlobalArg, store::JsonProfileStore, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ProfileArg {
    #[command(subcommand)]
    action: ProfileAction,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum ProfileAction {
    /// Print the level of every game
    Show,
    /// Forget all stored levels
    Reset,
}

#[derive(Debug, Serialize)]
struct LevelEntry {
    game_id: &'static str,
    level: DifficultyLevel,
    label: &'static str,
}

pub(crate) fn run(global: &GlobalArg, arg: &ProfileArg) -> anyhow::Result<()> {
    let mut store = JsonProfileStore::in_dir(&global.data_dir);
    let now = Utc::now();

    match arg.action {
        ProfileAction::Show => {
            let profile = store.load_or_default(now)?;
            let levels: Vec<_> = GameKind::ALL
                .into_iter()
                .map(|kind| {
                    let level = profile.level_for(kind.id());
                    LevelEntry {
                        game_id: kind.id(),
                        level,
                        label: level.label(),
                    }
                })
                .collect();
            Output::save_json(&levels, None)
        }
        ProfileAction::Reset => {
            DifficultyController::default().reset(&mut store, now)?;
            Ok(())
        }
    }
}
