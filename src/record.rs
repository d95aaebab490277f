use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("results i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("results csv failed: {0}")]
    Csv(#[from] csv::Error),
}

/// One finished game from the point of view of the recorded seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub session_id: String,
    pub player_id: String,
    pub placement: usize,
    pub duration_secs: u64,
}

pub trait ResultRecorder {
    fn record(&mut self, result: &GameResult) -> Result<(), RecordError>;
}

/// Appends results to a CSV file, writing the header only for a new file.
#[derive(Debug, Clone)]
pub struct CsvRecorder {
    path: PathBuf,
}

impl CsvRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_all(&self) -> Result<Vec<GameResult>, RecordError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut results = Vec::new();
        for row in reader.deserialize() {
            results.push(row?);
        }
        Ok(results)
    }
}

impl ResultRecorder for CsvRecorder {
    fn record(&mut self, result: &GameResult) -> Result<(), RecordError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let is_new = !self.path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = csv::WriterBuilder::new().has_headers(is_new).from_writer(file);
        writer.serialize(result)?;
        writer.flush()?;

        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub results: Vec<GameResult>,
}

impl ResultRecorder for MemoryRecorder {
    fn record(&mut self, result: &GameResult) -> Result<(), RecordError> {
        self.results.push(result.clone());
        Ok(())
    }
}
