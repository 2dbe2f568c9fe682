//! Configuration loading and parsing.
//!
//! Reads `quest-editor.toml` (or an override path provided by the binary).
//! Every section is optional and unknown fields are ignored, so a missing
//! or partial file yields defaults. A file that fails to parse is reported
//! under the `config` target and replaced by defaults as well.
//!
//! ```toml
//! [history]
//! limit = 100          # 0 keeps every action
//!
//! [quest]
//! directory = "quests/zsdx"
//!
//! [log]
//! file = "quest-editor.log"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const FILE_NAME: &str = "quest-editor.toml";

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of undoable actions per resource, 0 for unbounded.
    #[serde(default)]
    pub limit: usize,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct QuestConfig {
    /// Quest opened when the command line names none.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file")]
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

impl LogConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("quest-editor.log")
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub quest: QuestConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string when one was read
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path: `./quest-editor.toml` first, then the platform
/// config directory (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quest-editor").join(FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                history_limit = file.history.limit,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// History limit in the form the document model expects.
    pub fn effective_history_limit(&self) -> Option<usize> {
        match self.file.history.limit {
            0 => None,
            limit => Some(limit),
        }
    }

    pub fn quest_directory(&self) -> Option<&PathBuf> {
        self.file.quest.directory.as_ref()
    }

    pub fn log_file(&self) -> &PathBuf {
        &self.file.log.file
    }
}
