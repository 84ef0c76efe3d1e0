//! Embedded interactive shell.
//!
//! ```text
//! keypress -> CommandDispatcher -> InputPipe -> shell stdin
//! shell stdout+stderr -> NonBlockingChannel -> (reactor) -> OutputPump -> OutputSink
//! ```
//!
//! A [`Session`] owns the child process and both pipe ends. It never spawns
//! threads; output is pulled only when the reactor reports readiness.

mod channel;
mod dispatch;
mod error;
mod launcher;
mod pump;
mod session;

pub use channel::{InputPipe, NonBlockingChannel, ReadOutcome};
pub use dispatch::{command_line, extract_last_line, run_file_line, CommandDispatcher};
pub use error::SessionError;
pub use launcher::{spawn_shell, SpawnedShell};
pub use pump::{OutputPump, OutputSink, PumpStatus, Utf8Decoder};
pub use session::Session;
