use std::io;

use brainpulse_engine::GameResult;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::GameMode;

const MAX_DEVICE_ID_LEN: usize = 128;
const MAX_GAME_ID_LEN: usize = 64;
const MAX_SCORE: u32 = 10_000;
const MAX_LEVEL: u32 = 100;

/// Payload sent to the leaderboard backend for one finished game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub device_id: String,
    pub game_id: String,
    pub mode: GameMode,
    pub score: u32,
    pub level: u32,
    pub accuracy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_response_time: Option<f64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SubmissionError {
    #[display("device id must be 1 to {MAX_DEVICE_ID_LEN} characters")]
    InvalidDeviceId,
    #[display("game id must be 1 to {MAX_GAME_ID_LEN} characters")]
    InvalidGameId,
    #[display("score {score} is out of range 0..={MAX_SCORE}")]
    InvalidScore { score: u32 },
    #[display("level {level} is out of range 1..={MAX_LEVEL}")]
    InvalidLevel { level: u32 },
    #[display("accuracy {accuracy} is out of range 0..=1")]
    InvalidAccuracy { accuracy: f64 },
    #[display("average response time {value} is negative")]
    InvalidResponseTime { value: f64 },
    #[display("failed to deliver score submission")]
    Io { source: io::Error },
    #[display("score submission rejected: {reason}")]
    Rejected { reason: String },
}

impl ScoreSubmission {
    #[must_use]
    pub fn from_result(device_id: &str, mode: GameMode, result: &GameResult) -> Self {
        Self {
            device_id: device_id.to_owned(),
            game_id: result.game_id.clone(),
            mode,
            score: u32::from(result.score),
            level: u32::from(result.difficulty.get()),
            accuracy: result.accuracy,
            avg_response_time: result.reaction_time_ms.map(f64::from),
        }
    }

    /// Checks the payload against the backend's field limits.
    pub fn validate(&self) -> Result<(), SubmissionError> {
        let device_len = self.device_id.chars().count();
        if !(1..=MAX_DEVICE_ID_LEN).contains(&device_len) {
            return Err(SubmissionError::InvalidDeviceId);
        }
        let game_len = self.game_id.chars().count();
        if !(1..=MAX_GAME_ID_LEN).contains(&game_len) {
            return Err(SubmissionError::InvalidGameId);
        }
        if self.score > MAX_SCORE {
            return Err(SubmissionError::InvalidScore { score: self.score });
        }
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(SubmissionError::InvalidLevel { level: self.level });
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(SubmissionError::InvalidAccuracy {
                accuracy: self.accuracy,
            });
        }
        if let Some(value) = self.avg_response_time
            && !(value >= 0.0 && value.is_finite())
        {
            return Err(SubmissionError::InvalidResponseTime { value });
        }
        Ok(())
    }
}

/// Delivery boundary for score submissions.
pub trait ScoreSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError>;
}

/// Submits every result, logging and dropping failures.
///
/// Returns the number of accepted submissions.
pub fn submit_all<U>(submitter: &mut U, device_id: &str, mode: GameMode, results: &[GameResult]) -> usize
where
    U: ScoreSubmitter + ?Sized,
{
    let mut accepted = 0;
    for result in results {
        let submission = ScoreSubmission::from_result(device_id, mode, result);
        match submission.validate().and_then(|()| submitter.submit(&submission)) {
            Ok(()) => accepted += 1,
            Err(error) => warn!(
                event = "submission.failed",
                game_id = %submission.game_id,
                %error
            ),
        }
    }
    accepted
}
