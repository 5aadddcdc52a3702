//! Configuration loader
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::code::{CodeBook, CODES_SECTION};
use crate::core::types::MemoryError;
use crate::process::AccessOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Code book error: {0}")]
    CodeBook(#[from] MemoryError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub codes: CodesConfig,
}

/// Pointer walking and string reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default = "default_pointer_width")]
    pub pointer_width: usize,
    #[serde(default = "default_string_window")]
    pub string_window: usize,
    #[serde(default = "default_strict")]
    pub strict: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Code aliases, from an INI file and/or inline entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        let defaults = default_config().access;
        AccessConfig {
            pointer_width: defaults.pointer_width,
            string_window: defaults.string_window,
            strict: defaults.strict,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl AccessConfig {
    /// Session options carrying these settings
    pub fn options(&self) -> AccessOptions {
        AccessOptions {
            pointer_width: self.pointer_width,
            string_window: self.string_window,
            strict: self.strict,
        }
    }
}

impl Config {
    /// Builds the code book described by `[codes]`.
    ///
    /// Inline entries override entries of the same name from the file. A
    /// relative file path is taken relative to `base_dir`. Returns `None` when
    /// neither a file nor entries are configured.
    pub fn code_book(&self, base_dir: &Path) -> Result<Option<CodeBook>, ConfigError> {
        let mut book = match &self.codes.file {
            Some(file) => CodeBook::load(base_dir.join(file))?,
            None if self.codes.entries.is_empty() => return Ok(None),
            None => CodeBook::new(),
        };

        for (name, code) in &self.codes.entries {
            book.insert(CODES_SECTION, name, code);
        }
        Ok(Some(book))
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is
    /// missing. A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

fn default_pointer_width() -> usize {
    default_config().access.pointer_width
}

fn default_string_window() -> usize {
    default_config().access.string_window
}

fn default_strict() -> bool {
    default_config().access.strict
}

fn default_log_level() -> String {
    default_config().logging.level
}
