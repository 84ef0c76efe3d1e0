use std::path::Path;
use std::process::{Child, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::reactor::{Reactor, Readiness, WatchControl, WatchToken};
use crate::shell::channel::{InputPipe, NonBlockingChannel, ReadOutcome};
use crate::shell::error::SessionError;
use crate::shell::launcher::spawn_shell;
use crate::shell::pump::{OutputPump, OutputSink, PumpStatus};

const REAP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One running interpreter wired to the editor through two pipes.
///
/// Owns both descriptors and the child handle. Call [`Session::teardown`]
/// with the reactor the session is attached to; dropping a session that
/// was never torn down closes and reaps it but cannot remove its watch.
pub struct Session {
    id: String,
    input: InputPipe,
    output: NonBlockingChannel,
    child: Child,
    pump: OutputPump,
    watch: Option<WatchToken>,
    exit_status: Option<ExitStatus>,
    teardown_grace: Duration,
    torn_down: bool,
}

impl Session {
    /// Spawn the configured interpreter and put its output in non-blocking mode.
    pub fn launch(config: &SessionConfig) -> Result<Self, SessionError> {
        let program = Path::new(&config.interpreter);
        let spawned = spawn_shell(program)?;
        let mut child = spawned.child;
        let input = InputPipe::new(spawned.input);

        let output = match NonBlockingChannel::configure(spawned.output) {
            Ok(channel) => channel,
            Err(source) => {
                // No session will own this child, so reap it here.
                drop(input);
                let _ = child.kill();
                let _ = child.wait();
                return Err(SessionError::SpawnFailed {
                    program: config.interpreter.clone(),
                    source,
                });
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            session = %id,
            pid = child.id(),
            program = %config.interpreter,
            "Shell session started"
        );

        Ok(Self {
            id,
            input,
            output,
            child,
            pump: OutputPump::new(config.read_chunk_size),
            watch: None,
            exit_status: None,
            teardown_grace: Duration::from_millis(config.teardown_grace_ms),
            torn_down: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn watch(&self) -> Option<WatchToken> {
        self.watch
    }

    /// Register `callback` for readiness of the shell's output.
    ///
    /// Replaces any previous watch of this session on the same reactor.
    pub fn attach<C, F>(&mut self, reactor: &mut Reactor<C>, callback: F) -> Result<WatchToken, SessionError>
    where
        F: FnMut(&mut C, Readiness) -> WatchControl + 'static,
    {
        if let Some(previous) = self.watch.take() {
            reactor.unwatch(previous);
        }
        let token = self.output.register_readiness(reactor, callback)?;
        self.watch = Some(token);
        Ok(token)
    }

    /// Remove the readiness watch. Returns `false` if there was none.
    pub fn detach<C>(&mut self, reactor: &mut Reactor<C>) -> bool {
        match self.watch.take() {
            Some(token) => reactor.unwatch(token),
            None => false,
        }
    }

    /// Drain one chunk of output into `sink`.
    ///
    /// When the shell closes its output the child is polled once for an
    /// exit status.
    pub fn pump<S: OutputSink + ?Sized>(&mut self, sink: &mut S) -> PumpStatus {
        let status = self.pump.on_ready(&mut self.output, sink);
        if status == PumpStatus::EndOfStream {
            self.poll_exit();
        }
        status
    }

    pub fn is_output_finished(&self) -> bool {
        self.pump.is_finished()
    }

    /// Read raw output, bypassing the pump.
    pub fn read_output(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, SessionError> {
        self.output.read(buf)
    }

    /// Write `bytes` to the shell's stdin in one call.
    pub fn write_input(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        self.input.write(bytes)
    }

    /// Check whether the shell has exited, without blocking.
    pub fn poll_exit(&mut self) -> Option<ExitStatus> {
        if self.exit_status.is_some() {
            return self.exit_status;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::info!(session = %self.id, %status, "Shell exited");
                self.exit_status = Some(status);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(session = %self.id, error = %err, "Failed to poll shell status");
            }
        }
        self.exit_status
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    pub fn is_open(&self) -> bool {
        !self.torn_down
    }

    /// Deregister the watch, close both descriptors and reap the shell.
    ///
    /// Closing stdin lets a shell exit on its own; one still running after
    /// the configured grace period is killed. Calling this twice is a no-op
    /// that returns the recorded exit status.
    pub fn teardown<C>(&mut self, reactor: &mut Reactor<C>) -> Result<Option<ExitStatus>, SessionError> {
        self.detach(reactor);
        self.close_and_reap()
    }

    fn close_and_reap(&mut self) -> Result<Option<ExitStatus>, SessionError> {
        if self.torn_down {
            return Ok(self.exit_status);
        }
        self.torn_down = true;
        self.input.close();
        self.output.close();

        let deadline = Instant::now() + self.teardown_grace;
        while self.poll_exit().is_none() && Instant::now() < deadline {
            thread::sleep(REAP_POLL_INTERVAL);
        }

        if self.exit_status.is_none() {
            tracing::warn!(session = %self.id, pid = self.child.id(), "Shell ignored stdin EOF, killing");
            // kill fails only if the child already exited; wait reports either way.
            let _ = self.child.kill();
            let status = self
                .child
                .wait()
                .map_err(|source| SessionError::Reap { source })?;
            self.exit_status = Some(status);
        }

        tracing::info!(
            session = %self.id,
            status = ?self.exit_status,
            output_bytes = self.pump.total_bytes(),
            "Shell session torn down"
        );
        Ok(self.exit_status)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.close_and_reap();
    }
}
