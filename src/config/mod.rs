//! Configuration loading.
//!
//! A missing config file is not an error: every field has a default, and
//! command line flags are applied on top of whatever was loaded.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    Config, FrontendConfig, LineSource, LoggingConfig, RunConfig, SessionConfig,
    MAX_READ_CHUNK_SIZE,
};
