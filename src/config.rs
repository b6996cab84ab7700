//! Configuration file loading.
//!
//! Settings come from an optional TOML file and can be overridden from the
//! command line. Every field has a default, so an empty or missing file is a
//! valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::Level;

use crate::cli::Cli;
use crate::game::{MateDetection, Rules};

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The log level is not one of error, warn, info, debug or trace.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Where and how much to log. The terminal belongs to the UI, so logs go to a file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from("hotseat-chess.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Highlight the destinations of the selected piece.
    #[serde(default = "default_highlight_moves")]
    pub highlight_moves: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            highlight_moves: default_highlight_moves(),
        }
    }
}

fn default_highlight_moves() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub rules: Rules,
}

impl AppConfig {
    /// Loads the configuration at `path`, or the defaults if there is no such file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the file named on the command line and applies the flag overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::load(&cli.config)?;
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if let Some(file) = &cli.log_file {
            self.logging.file = file.clone();
        }
        if cli.king_safety {
            self.rules.king_safety = true;
        }
        if cli.full_mate {
            self.rules.mate_detection = MateDetection::Full;
        }
        if cli.no_highlight {
            self.display.highlight_moves = false;
        }
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        self.logging
            .level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.logging.level.clone()))
    }
}
