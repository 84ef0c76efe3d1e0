use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::{Config, MAX_READ_CHUNK_SIZE};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/litecode/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("litecode").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Both interpreter names are non-empty
    /// - The read chunk size is between 1 and 64 KiB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.interpreter.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "session.interpreter must not be empty".to_string(),
            });
        }

        if self.run.interpreter.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "run.interpreter must not be empty".to_string(),
            });
        }

        let chunk = self.session.read_chunk_size;
        if chunk == 0 || chunk > MAX_READ_CHUNK_SIZE {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "session.read_chunk_size must be between 1 and {}, got {}",
                    MAX_READ_CHUNK_SIZE, chunk
                ),
            });
        }

        Ok(())
    }
}
