//! Engine settings read from `dark_engine.toml`.
//!
//! Every key is optional. A missing file, or one that can't be parsed, gives
//! the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data_paths::data_path;
use crate::tree::UndoManager;

pub const CONFIG_FILE: &str = "dark_engine.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Honour cheat commands (`kill`, `add`, `player tgm`, ...).
    pub allow_cheats: bool,
    /// Map loaded at start-up. Without one the built-in demo map is used.
    pub map_path: Option<PathBuf>,
    /// Undoable commands kept in history.
    pub undo_limit: usize,
    /// REPL history file. Without one a file under the user data directory is used.
    pub history_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_cheats: false,
            map_path: None,
            undo_limit: UndoManager::DEFAULT_MAX_TRANSACTIONS,
            history_file: None,
        }
    }
}

impl EngineConfig {
    /// Path of the config file in the data directory.
    pub fn default_path() -> PathBuf {
        data_path(CONFIG_FILE)
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    /// - on malformed TOML or a key with the wrong type
    pub fn from_toml(text: &str) -> Result<EngineConfig> {
        toml::from_str(text).context("parsing engine config")
    }
}

/// Load settings, falling back to defaults (with a warning if the file exists
/// but is broken).
pub fn load_config(toml_path: &Path) -> EngineConfig {
    if !toml_path.exists() {
        info!("no config at '{}', using defaults", toml_path.display());
        return EngineConfig::default();
    }
    match try_load_config(toml_path) {
        Ok(config) => {
            info!("engine config loaded from '{}'", toml_path.display());
            config
        },
        Err(e) => {
            warn!(
                "Could not load engine config from '{}': {e:#}. Using defaults.",
                toml_path.display()
            );
            EngineConfig::default()
        },
    }
}

fn try_load_config(toml_path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(toml_path)
        .with_context(|| format!("reading engine config from '{}'", toml_path.display()))?;
    EngineConfig::from_toml(&text).with_context(|| format!("in '{}'", toml_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = EngineConfig::from_toml("allow_cheats = true\nmap_path = \"maps/crypt.json\"").expect("parse");
        assert!(config.allow_cheats);
        assert_eq!(config.map_path, Some(PathBuf::from("maps/crypt.json")));
        assert_eq!(config.undo_limit, UndoManager::DEFAULT_MAX_TRANSACTIONS);
        assert!(config.history_file.is_none());
    }

    #[test]
    fn wrong_types_are_errors() {
        assert!(EngineConfig::from_toml("undo_limit = \"lots\"").is_err());
    }

    #[test]
    fn missing_or_broken_files_give_defaults() {
        let dir = tempdir().expect("tempdir");
        assert_eq!(load_config(&dir.path().join("nope.toml")), EngineConfig::default());
        let broken = dir.path().join(CONFIG_FILE);
        fs::write(&broken, "allow_cheats = [").expect("write");
        assert_eq!(load_config(&broken), EngineConfig::default());
        fs::write(&broken, "undo_limit = 5").expect("write");
        assert_eq!(load_config(&broken).undo_limit, 5);
    }
}
