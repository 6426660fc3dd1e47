//! Score log and settings persistence
//!
//! Features:
//! - Append-only, line-oriented score log on disk
//! - In-memory sink for tests and headless runs
//! - Malformed lines are skipped on read, never fatal

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::highscores::{HighScores, ScoreRecord};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid json in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where finished runs are recorded
pub trait PersistenceSink {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError>;

    fn load_all(&self) -> Result<Vec<ScoreRecord>, PersistenceError>;

    /// Best `n` records in leaderboard order
    fn top(&self, n: usize) -> Result<HighScores, PersistenceError> {
        Ok(HighScores::from_records(self.load_all()?, n))
    }
}

/// Score log backed by a text file, one record per line
#[derive(Debug, Clone)]
pub struct FileScoreLog {
    path: PathBuf,
}

impl FileScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for FileScoreLog {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::io(&self.path, e))?;
        writeln!(file, "{}", record.to_line()).map_err(|e| PersistenceError::io(&self.path, e))?;
        log::debug!("Appended score {} to {}", record.score, self.path.display());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(&self.path, e)),
        };
        Ok(parse_log(&text))
    }
}

/// Parse a whole score log, skipping blank and malformed lines
pub fn parse_log(text: &str) -> Vec<ScoreRecord> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| {
            let record = ScoreRecord::parse_line(line);
            if record.is_none() {
                log::warn!("Skipping malformed score line {}", i + 1);
            }
            record
        })
        .collect()
}

/// Score log kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreLog {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }
}

impl PersistenceSink for MemoryScoreLog {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ScoreRecord>, PersistenceError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "gesture-invaders-{}-{}.log",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let log = FileScoreLog::new(scratch_path("missing"));
        assert!(log.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_file_append_and_reload() {
        let path = scratch_path("append");
        let mut log = FileScoreLog::new(&path);
        log.append(&ScoreRecord::new(10, "amy", 40, 2, 31)).unwrap();
        log.append(&ScoreRecord::new(20, "bo", 90, 3, 55)).unwrap();

        let top = log.top(5).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top.entries[0].player_name, "bo");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let records = parse_log("1|a|10|1|5\ngarbage\n\n2|b|x|1|y\n3|c|1|1\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].score, 0);
        assert_eq!(records[1].played_seconds, crate::highscores::PLAYED_SENTINEL);
    }

    #[test]
    fn test_memory_log() {
        let mut log = MemoryScoreLog::new();
        log.append(&ScoreRecord::new(1, "x", 5, 1, 9)).unwrap();
        assert_eq!(log.records().len(), 1);
        assert_eq!(log.top(5).unwrap().top_score(), Some(5));
    }

    #[test]
    fn test_error_display_names_path() {
        let err = PersistenceError::io(
            Path::new("/nope/scores.log"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/nope/scores.log"));
    }
}
