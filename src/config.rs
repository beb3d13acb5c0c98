//! Runtime configuration: environment settings plus an optional TOML file
//! carrying weekly goal targets and extra catalog exercises.
//!
//! Example TOML:
//! ```toml
//! [goals]
//! xp = 700
//! lessons = 6
//! minutes = 150
//!
//! [[speaking]]
//! id = "es-sp-100"
//! language = "es"
//! text = "¿Dónde está la estación?"
//! category = "travel"
//! difficulty = "intermediate"
//! ```

use std::path::PathBuf;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{ListeningExercise, SpeakingExercise};
use crate::ledger::GoalTargets;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FileConfig {
  #[serde(default)]
  pub goals: GoalTargets,
  #[serde(default)]
  pub speaking: Vec<SpeakingExercise>,
  #[serde(default)]
  pub listening: Vec<ListeningExercise>,
}

/// Everything the app needs at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
  pub port: u16,
  pub data_dir: Option<PathBuf>,
  /// Offset used to truncate "now" to the learner's calendar day.
  pub utc_offset: FixedOffset,
  pub file: FileConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: 3000,
      data_dir: None,
      utc_offset: utc(),
      file: FileConfig::default(),
    }
  }
}

fn utc() -> FixedOffset {
  Utc.fix()
}

impl AppConfig {
  /// PORT, DATA_DIR, UTC_OFFSET_MINUTES and APP_CONFIG_PATH. Bad values are
  /// logged and replaced by defaults.
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(3000);

    let data_dir = std::env::var("DATA_DIR")
      .ok()
      .filter(|s| !s.trim().is_empty())
      .map(PathBuf::from);

    let utc_offset = match std::env::var("UTC_OFFSET_MINUTES") {
      Ok(raw) => parse_offset_minutes(&raw).unwrap_or_else(|| {
        warn!(target: "lingo_backend", %raw, "Invalid UTC_OFFSET_MINUTES; using UTC");
        utc()
      }),
      Err(_) => utc(),
    };

    let file = load_file_config_from_env().unwrap_or_default();
    Self { port, data_dir, utc_offset, file }
  }
}

pub fn parse_offset_minutes(raw: &str) -> Option<FixedOffset> {
  let minutes: i32 = raw.trim().parse().ok()?;
  FixedOffset::east_opt(minutes.checked_mul(60)?)
}

/// Attempt to load `FileConfig` from APP_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_file_config_from_env() -> Option<FileConfig> {
  let path = std::env::var("APP_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_file_config(&s) {
      Ok(cfg) => {
        info!(target: "lingo_backend", %path, speaking = cfg.speaking.len(), listening = cfg.listening.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lingo_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lingo_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_file_config(s: &str) -> Result<FileConfig, toml::de::Error> {
  toml::from_str::<FileConfig>(s)
}
