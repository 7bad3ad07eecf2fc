use std::{
    fmt,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use movelore_store::SqliteStore;
use movelore_training::{GameTranscript, LearnerConfig};
use serde::{Serialize, de::DeserializeOwned};

use crate::schema::query::RankQuery;

/// Destination of a command's JSON result.
#[derive(Debug)]
pub enum Output {
    Stdout(io::Stdout),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout(_) => f.write_str("stdout"),
            Output::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

impl Output {
    pub fn stdout() -> Self {
        Output::Stdout(io::stdout())
    }

    /// Creates `path` (and its parent directories), or falls back to stdout.
    pub fn create(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Output::stdout());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            path: path.to_owned(),
            writer: BufWriter::new(file),
        })
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write_json<T>(mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize + ?Sized,
    {
        let result = match &mut self {
            Output::Stdout(stdout) => write_json_to(&mut stdout.lock(), value),
            Output::File { writer, .. } => write_json_to(writer, value),
        };
        result.with_context(|| format!("Failed to write JSON to {self}"))
    }
}

fn write_json_to<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let reader: Box<dyn Read> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
        Box::new(file)
    };
    serde_json::from_reader(BufReader::new(reader))
        .with_context(|| format!("Failed to parse {file_kind} JSON: {}", path.display()))
}

/// Reads the learner configuration, or the defaults when no file is given.
pub fn read_config(path: Option<&Path>) -> anyhow::Result<LearnerConfig> {
    match path {
        Some(path) => read_json_file("config", path),
        None => Ok(LearnerConfig::default()),
    }
}

pub fn read_transcripts(path: &Path) -> anyhow::Result<Vec<GameTranscript>> {
    read_json_file("transcripts", path)
}

pub fn read_query(path: &Path) -> anyhow::Result<RankQuery> {
    read_json_file("rank query", path)
}

/// Opens (creating if needed) the statistics database.
pub fn open_store(path: &Path, config: &LearnerConfig) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(path, config.aggregate)
        .with_context(|| format!("Failed to open store: {}", path.display()))
}
