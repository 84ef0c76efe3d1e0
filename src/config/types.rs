use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

/// Settings for the embedded interpreter session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interpreter executable spawned with no arguments (default: `/bin/sh`).
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Maximum bytes drained from the shell per readiness notification (default: 256).
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// Where the command line is taken from when Enter is pressed.
    #[serde(default)]
    pub line_source: LineSource,
    /// How long teardown waits for the shell to exit on stdin EOF before killing it.
    #[serde(default = "default_teardown_grace_ms")]
    pub teardown_grace_ms: u64,
}

/// Source of the command line submitted on Enter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSource {
    /// Separate accumulator of the characters typed since the last Enter.
    #[default]
    InputLine,
    /// Whatever text sits on the last line of the terminal buffer.
    LastLine,
}

/// Settings for the "run current file" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Interpreter name written in front of the file path (default: `python3`).
    #[serde(default = "default_run_interpreter")]
    pub interpreter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file. Logging stays off when neither this, `--log-file` nor
    /// `LITECODE_LOG` names one.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Upper bound on one event loop turn in milliseconds (default: 50).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

pub const MAX_READ_CHUNK_SIZE: usize = 64 * 1024;

fn default_interpreter() -> String {
    "/bin/sh".to_string()
}

fn default_read_chunk_size() -> usize {
    256
}

fn default_teardown_grace_ms() -> u64 {
    500
}

fn default_run_interpreter() -> String {
    "python3".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            read_chunk_size: default_read_chunk_size(),
            line_source: LineSource::default(),
            teardown_grace_ms: default_teardown_grace_ms(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interpreter: default_run_interpreter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
