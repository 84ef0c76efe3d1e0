use std::path::Path;

use crate::buffer::DisplayBuffer;
use crate::shell::error::SessionError;
use crate::shell::session::Session;

/// Text of the buffer's final line at this moment.
///
/// The line index is recomputed from the current line count on every call
/// because output keeps arriving between keypresses.
pub fn extract_last_line(buffer: &DisplayBuffer) -> &str {
    let last = buffer.line_count() - 1;
    let start = buffer.line_start(last).unwrap_or(buffer.len());
    buffer.slice(start, buffer.len()).unwrap_or("")
}

/// Trim `raw` and terminate it with exactly one newline.
pub fn command_line(raw: &str) -> String {
    format!("{}\n", raw.trim())
}

/// Command line that runs `path` through `interpreter`.
pub fn run_file_line(interpreter: &str, path: &Path) -> String {
    format!("{} {}\n", interpreter, path.display())
}

/// Sends completed command lines to the session's stdin.
///
/// Every line goes out in a single write so the Enter path and the run-file
/// path never interleave partial lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch the last line of `buffer`. Returns the line that was written.
    pub fn dispatch_last_line(
        &self,
        session: &mut Session,
        buffer: &DisplayBuffer,
    ) -> Result<String, SessionError> {
        self.dispatch(session, extract_last_line(buffer))
    }

    /// Trim `raw`, terminate it and write it. Returns the line that was written.
    pub fn dispatch(&self, session: &mut Session, raw: &str) -> Result<String, SessionError> {
        let line = command_line(raw);
        self.write(session, &line)?;
        Ok(line)
    }

    /// Write `<interpreter> <path>\n`. Returns the line that was written.
    pub fn dispatch_run_file(
        &self,
        session: &mut Session,
        interpreter: &str,
        path: &Path,
    ) -> Result<String, SessionError> {
        let line = run_file_line(interpreter, path);
        self.write(session, &line)?;
        Ok(line)
    }

    fn write(&self, session: &mut Session, line: &str) -> Result<(), SessionError> {
        match session.write_input(line.as_bytes()) {
            Ok(()) => {
                tracing::debug!(session = session.id(), bytes = line.len(), "Command dispatched");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(session = session.id(), error = %err, "Command dispatch failed");
                Err(err)
            }
        }
    }
}
