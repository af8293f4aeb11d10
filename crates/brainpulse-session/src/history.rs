use std::{collections::BTreeMap, io};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::SessionData;

/// Consecutive days with at least one finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    pub last_date: Option<NaiveDate>,
}

impl Streak {
    /// Registers a session played on `today` and returns the new count.
    ///
    /// The same day or an earlier one leaves the streak untouched, the next day
    /// extends it, and any gap restarts it at 1.
    pub fn record(&mut self, today: NaiveDate) -> u32 {
        match self.last_date {
            Some(last) if today <= last => return self.count,
            Some(last) if last.succ_opt() == Some(today) => self.count += 1,
            _ => self.count = 1,
        }
        self.last_date = Some(today);
        self.count
    }
}

/// Aggregate of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Mean composite score of the day's sessions, rounded.
    pub avg_score: u8,
    pub session_count: u32,
    /// Best composite score of the day.
    pub best_score: u8,
    /// Streak as of this day.
    pub streak_count: u32,
}

/// Everything the player has finished so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub sessions: Vec<SessionData>,
    pub streak: Streak,
    pub summaries: BTreeMap<NaiveDate, DailySummary>,
}

impl History {
    /// Appends a finalized session and refreshes the streak and its day's summary.
    pub fn record_session(&mut self, session: SessionData) -> &DailySummary {
        let date = session.date();
        self.sessions.push(session);
        let streak_count = self.streak.record(date);
        let summary = self.summarize(date, streak_count);
        self.summaries.entry(date).insert_entry(summary).into_mut()
    }

    fn summarize(&self, date: NaiveDate, streak_count: u32) -> DailySummary {
        let scores: Vec<u8> = self
            .sessions
            .iter()
            .filter(|s| s.date() == date)
            .map(|s| s.composite_score)
            .collect();
        let sum: u32 = scores.iter().copied().map(u32::from).sum();
        let count = u32::try_from(scores.len()).unwrap_or(u32::MAX);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let avg_score = (f64::from(sum) / f64::from(count.max(1))).round() as u8;
        DailySummary {
            date,
            avg_score,
            session_count: count,
            best_score: scores.iter().copied().max().unwrap_or_default(),
            streak_count,
        }
    }

    /// The latest `days` summaries, newest first.
    pub fn recent_summaries(&self, days: usize) -> impl Iterator<Item = &DailySummary> {
        self.summaries.values().rev().take(days)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionStoreError {
    #[display("failed to access session history")]
    Io { source: io::Error },
    #[display("failed to decode session history")]
    Decode { source: serde_json::Error },
    #[display("unsupported session history version {found}")]
    UnsupportedVersion { found: u32 },
}

/// Persistence boundary for finished sessions.
pub trait SessionStore {
    /// Returns the stored history, `None` if nothing was stored yet.
    fn load(&self) -> Result<Option<History>, SessionStoreError>;

    fn save(&mut self, history: &History) -> Result<(), SessionStoreError>;

    fn load_or_default(&self) -> Result<History, SessionStoreError> {
        Ok(self.load()?.unwrap_or_default())
    }
}
