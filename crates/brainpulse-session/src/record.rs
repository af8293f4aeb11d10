use brainpulse_engine::{GameResult, RandomSource, RandomSourceExt as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConditionReport, GameMode};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 6;

/// A finished session, immutable once finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub mode: GameMode,
    pub game_results: Vec<GameResult>,
    pub composite_score: u8,
    pub condition_before: ConditionReport,
}

impl SessionData {
    /// Calendar day (UTC) the session counts towards.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.ended_at.date_naive()
    }
}

/// Creates an id of the form `bp_<base36 millis>_<6 random base36 chars>`.
pub fn generate_session_id<R>(now: DateTime<Utc>, rng: &mut R) -> String
where
    R: RandomSource + ?Sized,
{
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(*rng.pick(BASE36)))
        .collect();
    format!("bp_{}_{suffix}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    let mut digits = Vec::new();
    loop {
        #[expect(clippy::cast_possible_truncation)]
        let digit = (value % 36) as usize;
        digits.push(BASE36[digit]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().map(|b| char::from(*b)).collect()
}

#[cfg(test)]
mod tests {
    use brainpulse_engine::TrialSeed;
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_session_id_format() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut rng = TrialSeed::from_bytes([1; 16]).rng();
        let id = generate_session_id(now, &mut rng);
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "bp");
        assert_eq!(parts[1], "loyw3v28");
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }
}
