//! This module handles the application's configuration: the collection root,
//! the excluded subdirectories, the viewing-history location and the external
//! file-manager command, loaded from and saved to a `settings.toml` file.
//!
//! Configuration is a plain struct with one named field per recognized
//! option. Loading validates every top-level key against the fixed recognized
//! set and fails with [`Error::UnknownConfigKey`] otherwise; "deleting" a key
//! means resetting its field to the default value.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod defaults;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the photo collection.
    #[serde(default)]
    pub photo_root: PathBuf,
    /// Immediate subdirectories of the root to exclude from the index.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Where the viewing-history log lives; `None` disables persistence.
    #[serde(default = "defaults::default_history_path")]
    pub history_path: Option<PathBuf>,
    /// Command template for the external file-manager collaborator, with
    /// `{image}` and `{image_dir}` substitutions. The value is owned here;
    /// the behavior is not.
    #[serde(default)]
    pub file_manager_cmd: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photo_root: PathBuf::new(),
            exclude: Vec::new(),
            history_path: defaults::default_history_path(),
            file_manager_cmd: None,
        }
    }
}

/// One recognized configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    PhotoRoot,
    Exclude,
    HistoryPath,
    FileManagerCmd,
}

impl ConfigKey {
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::PhotoRoot => "photo_root",
            ConfigKey::Exclude => "exclude",
            ConfigKey::HistoryPath => "history_path",
            ConfigKey::FileManagerCmd => "file_manager_cmd",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "photo_root" => Ok(ConfigKey::PhotoRoot),
            "exclude" => Ok(ConfigKey::Exclude),
            "history_path" => Ok(ConfigKey::HistoryPath),
            "file_manager_cmd" => Ok(ConfigKey::FileManagerCmd),
            other => Err(Error::UnknownConfigKey(other.to_string())),
        }
    }
}

impl Config {
    /// Reverts one option to its default value.
    pub fn reset(&mut self, key: ConfigKey) {
        let defaults = Config::default();
        match key {
            ConfigKey::PhotoRoot => self.photo_root = defaults.photo_root,
            ConfigKey::Exclude => self.exclude = defaults.exclude,
            ConfigKey::HistoryPath => self.history_path = defaults.history_path,
            ConfigKey::FileManagerCmd => self.file_manager_cmd = defaults.file_manager_cmd,
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(defaults::APP_NAME);
        path.push(defaults::CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Loads a settings file, rejecting any key outside the recognized set.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    if let Some(table) = value.as_table() {
        for key in table.keys() {
            if !defaults::RECOGNIZED_KEYS.contains(&key.as_str()) {
                return Err(Error::UnknownConfigKey(key.clone()));
            }
        }
    }
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
