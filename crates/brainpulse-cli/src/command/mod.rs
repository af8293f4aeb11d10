use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{
    auto_play::AutoPlayArg, generate::GenerateArg, history::HistoryArg, profile::ProfileArg,
    score::ScoreArg,
};

mod auto_play;
mod generate;
mod history;
mod profile;
mod score;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArg,
    /// What to do
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GlobalArg {
    /// Directory holding the profile, history and submission outbox
    #[arg(long, global = true, default_value = "./data/brainpulse/")]
    data_dir: PathBuf,
    /// Device id attached to score submissions
    #[arg(long, global = true, default_value = "local-device")]
    device_id: String,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print generated trials as JSON
    Generate(#[clap(flatten)] GenerateArg),
    /// Play a whole session with a simulated player
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Score a list of game results
    Score(#[clap(flatten)] ScoreArg),
    /// Show or reset the difficulty profile
    Profile(#[clap(flatten)] ProfileArg),
    /// Show recent daily summaries and the current streak
    History(#[clap(flatten)] HistoryArg),
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { global, mode } = CommandArgs::parse();
    match mode {
        Mode::Generate(arg) => generate::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&global, &arg)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Profile(arg) => profile::run(&global, &arg)?,
        Mode::History(arg) => history::run(&global, &arg)?,
    }
    Ok(())
}
