//! File-backed implementations of the persistence boundaries.
//!
//! Profile and history are stored as pretty JSON wrapped in a
//! `{"version": 1, "data": ...}` envelope and replaced atomically on save.
//! Score submissions are appended to a JSON-lines outbox.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use brainpulse_adaptive::{DifficultyProfile, ProfileStore, ProfileStoreError};
use brainpulse_session::{
    History, ScoreSubmission, ScoreSubmitter, SessionStore, SessionStoreError, SubmissionError,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

const FORMAT_VERSION: u32 = 1;

const PROFILE_FILE: &str = "profile.json";
const HISTORY_FILE: &str = "history.json";
const OUTBOX_FILE: &str = "outbox.jsonl";

#[derive(Debug, Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Debug, Deserialize)]
struct VersionHeader {
    version: u32,
}

#[derive(Debug, Deserialize)]
struct OwnedEnvelope<T> {
    data: T,
}

#[derive(Debug)]
enum EnvelopeError {
    Io(io::Error),
    Decode(serde_json::Error),
    Version(u32),
}

impl From<EnvelopeError> for ProfileStoreError {
    fn from(error: EnvelopeError) -> Self {
        match error {
            EnvelopeError::Io(source) => Self::Io { source },
            EnvelopeError::Decode(source) => Self::Decode { source },
            EnvelopeError::Version(found) => Self::UnsupportedVersion { found },
        }
    }
}

impl From<EnvelopeError> for SessionStoreError {
    fn from(error: EnvelopeError) -> Self {
        match error {
            EnvelopeError::Io(source) => Self::Io { source },
            EnvelopeError::Decode(source) => Self::Decode { source },
            EnvelopeError::Version(found) => Self::UnsupportedVersion { found },
        }
    }
}

fn load_versioned<T>(path: &Path) -> Result<Option<T>, EnvelopeError>
where
    T: DeserializeOwned,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(EnvelopeError::Io(e)),
    };
    let header: VersionHeader = serde_json::from_slice(&bytes).map_err(EnvelopeError::Decode)?;
    if header.version != FORMAT_VERSION {
        return Err(EnvelopeError::Version(header.version));
    }
    let envelope: OwnedEnvelope<T> =
        serde_json::from_slice(&bytes).map_err(EnvelopeError::Decode)?;
    Ok(Some(envelope.data))
}

fn save_versioned<T>(path: &Path, data: &T) -> Result<(), EnvelopeError>
where
    T: Serialize,
{
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(EnvelopeError::Io)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let file = File::create(&tmp_path).map_err(EnvelopeError::Io)?;
    let mut writer = BufWriter::new(file);
    let envelope = Envelope {
        version: FORMAT_VERSION,
        data,
    };
    serde_json::to_writer_pretty(&mut writer, &envelope).map_err(EnvelopeError::Decode)?;
    writer.flush().map_err(EnvelopeError::Io)?;
    drop(writer);
    fs::rename(&tmp_path, path).map_err(EnvelopeError::Io)
}

#[derive(Debug, Clone)]
pub(crate) struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub(crate) fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PROFILE_FILE),
        }
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self) -> Result<Option<DifficultyProfile>, ProfileStoreError> {
        Ok(load_versioned(&self.path)?)
    }

    fn save(&mut self, profile: &DifficultyProfile) -> Result<(), ProfileStoreError> {
        Ok(save_versioned(&self.path, profile)?)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub(crate) fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HISTORY_FILE),
        }
    }
}

impl SessionStore for JsonHistoryStore {
    fn load(&self) -> Result<Option<History>, SessionStoreError> {
        Ok(load_versioned(&self.path)?)
    }

    fn save(&mut self, history: &History) -> Result<(), SessionStoreError> {
        Ok(save_versioned(&self.path, history)?)
    }
}

/// Appends every submission as one JSON line; delivery happens elsewhere.
#[derive(Debug, Clone)]
pub(crate) struct OutboxSubmitter {
    path: PathBuf,
}

impl OutboxSubmitter {
    pub(crate) fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(OUTBOX_FILE),
        }
    }

    #[cfg(test)]
    fn read_all(&self) -> Vec<ScoreSubmission> {
        use std::io::{BufRead as _, BufReader};

        let file = File::open(&self.path).unwrap();
        BufReader::new(file)
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect()
    }
}

impl ScoreSubmitter for OutboxSubmitter {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), SubmissionError> {
        let mut line = serde_json::to_vec(submission).map_err(|e| SubmissionError::Rejected {
            reason: e.to_string(),
        })?;
        line.push(b'\n');
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| SubmissionError::Io { source })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(&line))
            .map_err(|source| SubmissionError::Io { source })
    }
}

/// Reads a whole history file, for commands that only inspect it.
pub(crate) fn read_history(data_dir: &Path) -> anyhow::Result<History> {
    let store = JsonHistoryStore::in_dir(data_dir);
    store
        .load_or_default()
        .with_context(|| format!("Failed to read {}", store.path.display()))
}

#[cfg(test)]
mod tests {
    use brainpulse_engine::DifficultyLevel;
    use brainpulse_session::GameMode;
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn profile() -> DifficultyProfile {
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let mut profile = DifficultyProfile::empty(now);
        profile.set_level("quick-math", DifficultyLevel::new(4), now);
        profile
    }

    #[test]
    fn test_missing_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonProfileStore::in_dir(dir.path()).load().unwrap().is_none());
        assert!(JsonHistoryStore::in_dir(dir.path()).load().unwrap().is_none());
    }

    #[test]
    fn test_profile_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let mut store = JsonProfileStore::in_dir(&nested);
        store.save(&profile()).unwrap();

        let reloaded = JsonProfileStore::in_dir(&nested).load().unwrap().unwrap();
        assert_eq!(reloaded, profile());

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(nested.join(PROFILE_FILE)).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["data"]["game_levels"]["quick-math"], 4);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(HISTORY_FILE),
            r#"{"version":2,"data":{}}"#,
        )
        .unwrap();
        let err = JsonHistoryStore::in_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, SessionStoreError::UnsupportedVersion { found: 2 }));
    }

    #[test]
    fn test_corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROFILE_FILE), "not json").unwrap();
        let err = JsonProfileStore::in_dir(dir.path()).load().unwrap_err();
        assert!(matches!(err, ProfileStoreError::Decode { .. }));
    }

    #[test]
    fn test_outbox_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut outbox = OutboxSubmitter::in_dir(dir.path());
        let submission = ScoreSubmission {
            device_id: "device-1".to_owned(),
            game_id: "n-back".to_owned(),
            mode: GameMode::Development,
            score: 64,
            level: 2,
            accuracy: 0.75,
            avg_response_time: None,
        };
        outbox.submit(&submission).unwrap();
        outbox.submit(&submission).unwrap();
        assert_eq!(outbox.read_all(), [submission.clone(), submission]);
    }
}
