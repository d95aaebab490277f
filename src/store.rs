use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game::Game;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session id '{0}' is not usable as a key")]
    InvalidSessionId(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored document is not a game: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Somewhere a game can be kept between calls, one JSON document per session.
pub trait GameStore {
    fn load(&self, session_id: &str) -> Result<Option<Game>, StoreError>;
    fn save(&mut self, session_id: &str, game: &Game) -> Result<(), StoreError>;
}

fn check_session_id(session_id: &str) -> Result<(), StoreError> {
    let usable = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if usable {
        Ok(())
    } else {
        Err(StoreError::InvalidSessionId(session_id.to_string()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn load(&self, session_id: &str) -> Result<Option<Game>, StoreError> {
        check_session_id(session_id)?;
        match self.documents.get(session_id) {
            Some(document) => Ok(Some(serde_json::from_str(document)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, session_id: &str, game: &Game) -> Result<(), StoreError> {
        check_session_id(session_id)?;
        let document = serde_json::to_string(game)?;
        self.documents.insert(session_id.to_string(), document);
        Ok(())
    }
}

/// Keeps each session as `<dir>/<session id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        check_session_id(session_id)?;
        Ok(self.dir.join(format!("{session_id}.json")))
    }
}

impl GameStore for JsonFileStore {
    fn load(&self, session_id: &str) -> Result<Option<Game>, StoreError> {
        let path = self.path_for(session_id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&mut self, session_id: &str, game: &Game) -> Result<(), StoreError> {
        let path = self.path_for(session_id)?;
        fs::create_dir_all(&self.dir)?;

        // write aside and rename, a crash mid-write leaves the old document intact
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_string_pretty(game)?)?;
        fs::rename(&staging, &path)?;

        tracing::debug!(session_id, path = %path.display(), "game saved");
        Ok(())
    }
}
