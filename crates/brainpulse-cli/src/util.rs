use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use brainpulse_engine::GameResult;
use serde::{Serialize, de::DeserializeOwned};

/// Destination of a command's JSON report.
#[derive(Debug)]
pub(crate) enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `report` as pretty JSON to `path`, or to stdout when `None`.
    pub(crate) fn save_json<T>(report: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let mut output = match path {
            Some(path) => Self::create(path)?,
            None => Self::Stdout(io::stdout().lock()),
        };
        output.write_report(report)
    }

    /// Opens a report file, creating missing parent directories.
    fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn destination(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_owned(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    fn write_report<T>(&mut self, report: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let destination = self.destination();
        let writer = self.writer();
        serde_json::to_writer_pretty(&mut *writer, report)
            .with_context(|| format!("Failed to write report to {destination}"))?;
        writeln!(writer)
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to finish report on {destination}"))
    }
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} file: {}", path.display()))
}

/// Reads a JSON array of game results, as printed in a session record.
pub(crate) fn read_game_results<P>(path: P) -> anyhow::Result<Vec<GameResult>>
where
    P: AsRef<Path>,
{
    read_json_file("game results", path)
}
