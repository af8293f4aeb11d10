use brainpulse_session::{DailySummary, Streak};
use serde::Serialize;

use crate::{command::GlobalArg, store, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HistoryArg {
    /// Number of most recent days to show
    #[arg(long, default_value_t = 7)]
    days: usize,
}

#[derive(Debug, Serialize)]
struct HistoryReport<'a> {
    streak: Streak,
    total_sessions: usize,
    days: Vec<&'a DailySummary>,
}

pub(crate) fn run(global: &GlobalArg, arg: &HistoryArg) -> anyhow::Result<()> {
    let HistoryArg { days } = arg;

    let history = store::read_history(&global.data_dir)?;
    let report = HistoryReport {
        streak: history.streak,
        total_sessions: history.sessions.len(),
        days: history.recent_summaries(*days).collect(),
    };
    Output::save_json(&report, None)
}
