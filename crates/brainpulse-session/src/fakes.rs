//! In-memory implementations of the session boundaries.

use crate::{
    History, ScoreSubmission, ScoreSubmitter, SessionStore, SessionStoreError, SubmissionError,
};

/// [`SessionStore`] backed by a single in-memory [`History`].
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    history: Option<History>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<History>, SessionStoreError> {
        Ok(self.history.clone())
    }

    fn save(&mut self, history: &History) -> Result<(), SessionStoreError> {
        self.history = Some(history.clone());
        Ok(())
    }
}

/// [`ScoreSubmitter`] that keeps accepted submissions in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubmitter {
    submissions: Vec<ScoreSubmission>,
    capacity: Option<usize>,
}

impl RecordingSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `capacity` submissions and rejects every later one.
    #[must_use]
    pub fn failing_after(capacity: usize) -> Self {
        Self {
            submissions: Vec::new(),
            capacity: Some(capacity),
        }
    }

    #[must_use]
    pub fn submissions(&self) -> &[ScoreSubmission] {
        &self.submissions
    }
}

impl ScoreSubmitter for RecordingSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        if self.capacity.is_some_and(|cap| self.submissions.len() >= cap) {
            return Err(SubmissionError::Rejected {
                reason: "rate limited".to_owned(),
            });
        }
        self.submissions.push(submission.clone());
        Ok(())
    }
}
