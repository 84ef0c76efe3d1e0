use std::io;
use std::os::unix::io::{AsRawFd, OwnedFd};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::shell::error::SessionError;

/// A freshly spawned interpreter and the parent's ends of its two pipes.
pub struct SpawnedShell {
    pub child: Child,
    /// Write end of the child's stdin pipe.
    pub input: OwnedFd,
    /// Read end of the pipe carrying the child's stdout and stderr.
    pub output: OwnedFd,
}

/// Spawn `program` with no arguments, stdin fed from one pipe and both
/// stdout and stderr merged into another.
///
/// All pipe descriptors are close-on-exec, so the child keeps only the
/// three it was handed. The parent's copies of the child's ends are
/// closed before this returns, and on failure every descriptor opened
/// so far is closed as well. An executable that cannot be run is
/// reported here as `SpawnFailed` rather than as an early child exit.
pub fn spawn_shell(program: &Path) -> Result<SpawnedShell, SessionError> {
    let spawn_failed = |source: io::Error| SessionError::SpawnFailed {
        program: program.display().to_string(),
        source,
    };

    let (stdin_read, stdin_write) = cloexec_pipe().map_err(spawn_failed)?;
    let (output_read, output_write) = cloexec_pipe().map_err(spawn_failed)?;
    let stderr_write = output_write.try_clone().map_err(spawn_failed)?;

    // The Command owns the child's ends; dropping it at the end of this
    // block closes them in the parent.
    let child = {
        let mut cmd = Command::new(program);
        cmd.stdin(Stdio::from(stdin_read))
            .stdout(Stdio::from(output_write))
            .stderr(Stdio::from(stderr_write));
        cmd.spawn().map_err(spawn_failed)?
    };

    tracing::debug!(
        pid = child.id(),
        input_fd = stdin_write.as_raw_fd(),
        output_fd = output_read.as_raw_fd(),
        "Shell spawned"
    );

    Ok(SpawnedShell {
        child,
        input: stdin_write,
        output: output_read,
    })
}

fn cloexec_pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    // Created with O_CLOEXEC already set, so a spawn racing on another
    // thread cannot inherit either end.
    let (read, write) = io::pipe()?;
    Ok((OwnedFd::from(read), OwnedFd::from(write)))
}
