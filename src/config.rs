use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{MAX_SEATS, MIN_SEATS, STARTING_COINS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub automated: bool,
}

/// Engine settings persisted as TOML.
///
/// Fields:
/// - starting_coins: coins every seat starts with
/// - log_window: how many trailing log entries a decision provider gets to see
/// - seed: fixed RNG seed, entropy when absent
/// - data_dir: where saved sessions and the results CSV live
/// - seats: turn order, one entry per seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u8,
    #[serde(default = "default_log_window")]
    pub log_window: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    pub seats: Vec<SeatConfig>,
}

fn default_starting_coins() -> u8 {
    STARTING_COINS
}

fn default_log_window() -> usize {
    6
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("coup-data")
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            starting_coins: default_starting_coins(),
            log_window: default_log_window(),
            seed: None,
            data_dir: default_data_dir(),
            seats: vec![
                SeatConfig {
                    id: "human".to_string(),
                    name: "You".to_string(),
                    automated: false,
                },
                SeatConfig {
                    id: "ai1".to_string(),
                    name: "Alpha".to_string(),
                    automated: true,
                },
                SeatConfig {
                    id: "ai2".to_string(),
                    name: "Beta".to_string(),
                    automated: true,
                },
            ],
        }
    }
}

impl EngineConfig {
    /// Load configuration from `path`. If the file does not exist, create it
    /// with the default three-seat table and return that.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config file '{}'", path.display()))?;
            let cfg: EngineConfig = toml::from_str(&s)
                .with_context(|| format!("parsing TOML config '{}'", path.display()))?;
            cfg.validate()?;
            Ok(cfg)
        } else {
            let cfg = EngineConfig::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Save the config back to `path` (overwrites).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory '{}'", parent.display()))?;
            }
        }
        let toml_text = toml::to_string_pretty(&self).with_context(|| "serializing config to TOML")?;
        fs::write(path, toml_text).with_context(|| format!("writing config to '{}'", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats.len()) {
            bail!(
                "config has {} seats, a game needs between {MIN_SEATS} and {MAX_SEATS}",
                self.seats.len()
            );
        }
        for (idx, seat) in self.seats.iter().enumerate() {
            if self.seats[..idx].iter().any(|other| other.id == seat.id) {
                bail!("seat id '{}' is used more than once", seat.id);
            }
        }
        Ok(())
    }

    /// First seat played by a person, the one whose result gets recorded.
    pub fn human_seat(&self) -> Option<usize> {
        self.seats.iter().position(|seat| !seat.automated)
    }
}
