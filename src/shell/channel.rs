use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, OwnedFd, RawFd};

use crate::reactor::{Reactor, Readiness, WatchControl, WatchToken};
use crate::shell::error::SessionError;

/// Result of one non-blocking read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `n` bytes were copied into the caller's buffer.
    Data(usize),
    /// Nothing available right now.
    Empty,
    /// The writer side is closed and everything has been drained.
    Eof,
}

/// The shell's output descriptor in non-blocking mode.
pub struct NonBlockingChannel {
    file: Option<File>,
}

impl NonBlockingChannel {
    /// Put `fd` into non-blocking mode and take ownership of it.
    pub fn configure(fd: OwnedFd) -> io::Result<Self> {
        let raw = fd.as_raw_fd();
        let flags = unsafe { libc::fcntl(raw, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(raw, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            file: Some(File::from(fd)),
        })
    }

    /// Read whatever is available, up to `buf.len()` bytes, without waiting.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, SessionError> {
        let file = self
            .file
            .as_mut()
            .ok_or(SessionError::Closed { which: "output" })?;
        loop {
            match file.read(buf) {
                Ok(0) => return Ok(ReadOutcome::Eof),
                Ok(n) => return Ok(ReadOutcome::Data(n)),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(ReadOutcome::Empty),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => return Err(SessionError::ReadFailed { source }),
            }
        }
    }

    /// Watch this channel on `reactor`; `callback` runs whenever it is
    /// readable or has reached end-of-stream.
    pub fn register_readiness<C, F>(
        &self,
        reactor: &mut Reactor<C>,
        callback: F,
    ) -> Result<WatchToken, SessionError>
    where
        F: FnMut(&mut C, Readiness) -> WatchControl + 'static,
    {
        let fd = self.raw_fd().ok_or(SessionError::Closed { which: "output" })?;
        Ok(reactor.watch(fd, callback))
    }

    pub fn raw_fd(&self) -> Option<RawFd> {
        self.file.as_ref().map(|f| f.as_raw_fd())
    }

    /// Close the descriptor. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        self.file.take().is_some()
    }
}

/// The write end of the shell's stdin pipe.
pub struct InputPipe {
    file: Option<File>,
}

impl InputPipe {
    pub fn new(fd: OwnedFd) -> Self {
        Self {
            file: Some(File::from(fd)),
        }
    }

    /// Write `bytes` in full with one blocking `write_all`.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let file = self
            .file
            .as_mut()
            .ok_or(SessionError::Closed { which: "input" })?;
        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|source| SessionError::WriteFailed { source })
    }

    pub fn close(&mut self) -> bool {
        self.file.take().is_some()
    }
}
