use std::io;
use thiserror::Error;

/// Errors raised by the embedded shell session.
///
/// Only [`SessionError::SpawnFailed`] prevents a session from existing.
/// Everything else is reported to the caller, logged, and the event loop
/// carries on.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to shell input: {source}")]
    WriteFailed {
        #[source]
        source: io::Error,
    },

    #[error("Shell {which} descriptor is closed")]
    Closed { which: &'static str },

    #[error("Shell output read failed: {source}")]
    ReadFailed {
        #[source]
        source: io::Error,
    },

    #[error("Failed to reap shell process: {source}")]
    Reap {
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// Whether the session may keep running after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::SpawnFailed { .. })
    }
}
