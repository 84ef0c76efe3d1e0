//! Single-threaded readiness reactor.
//!
//! Watches raw descriptors with `poll(2)` and runs the registered callback
//! for every descriptor that is readable, hung up or in error. Watches are
//! level-triggered: a callback keeps firing on each turn for as long as its
//! descriptor stays ready, until it returns [`WatchControl::Remove`] or the
//! watch is removed with [`Reactor::unwatch`].
//!
//! Callbacks receive the caller's context by `&mut` instead of capturing
//! shared state, so every mutation of that context happens on the thread
//! calling [`Reactor::turn`], one callback at a time.

use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Identifies one registered watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchToken(u64);

/// Conditions reported for a descriptor on one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub readable: bool,
    pub hangup: bool,
    pub error: bool,
}

impl Readiness {
    pub const READABLE: Readiness = Readiness {
        readable: true,
        hangup: false,
        error: false,
    };

    fn from_revents(revents: libc::c_short) -> Self {
        Self {
            readable: revents & libc::POLLIN != 0,
            hangup: revents & libc::POLLHUP != 0,
            error: revents & (libc::POLLERR | libc::POLLNVAL) != 0,
        }
    }

    fn is_empty(&self) -> bool {
        !self.readable && !self.hangup && !self.error
    }
}

/// What the reactor should do with a watch after its callback ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchControl {
    Keep,
    Remove,
}

type Callback<C> = Box<dyn FnMut(&mut C, Readiness) -> WatchControl>;

struct Watch<C> {
    token: WatchToken,
    fd: RawFd,
    callback: Callback<C>,
}

pub struct Reactor<C> {
    watches: Vec<Watch<C>>,
    next_token: u64,
}

impl<C> Reactor<C> {
    pub fn new() -> Self {
        Self {
            watches: Vec::new(),
            next_token: 0,
        }
    }

    /// Register `callback` to run whenever `fd` is readable or has reached end-of-stream.
    ///
    /// The reactor does not own `fd`; the caller must remove the watch
    /// before closing the descriptor.
    pub fn watch<F>(&mut self, fd: RawFd, callback: F) -> WatchToken
    where
        F: FnMut(&mut C, Readiness) -> WatchControl + 'static,
    {
        let token = WatchToken(self.next_token);
        self.next_token += 1;
        self.watches.push(Watch {
            token,
            fd,
            callback: Box::new(callback),
        });
        tracing::trace!(fd, token = token.0, "reactor: watch registered");
        token
    }

    /// Remove a watch. Returns `false` if it was not registered.
    pub fn unwatch(&mut self, token: WatchToken) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| w.token != token);
        let removed = self.watches.len() != before;
        if removed {
            tracing::trace!(token = token.0, "reactor: watch removed");
        }
        removed
    }

    pub fn is_watching(&self, token: WatchToken) -> bool {
        self.watches.iter().any(|w| w.token == token)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Run the callback of `token` as if its descriptor had reported `readiness`.
    ///
    /// Returns `false` if no such watch exists.
    pub fn notify(&mut self, ctx: &mut C, token: WatchToken, readiness: Readiness) -> bool {
        let Some(index) = self.watches.iter().position(|w| w.token == token) else {
            return false;
        };
        if (self.watches[index].callback)(ctx, readiness) == WatchControl::Remove {
            self.watches.remove(index);
        }
        true
    }

    /// Wait up to `timeout` (forever when `None`) for any watched descriptor
    /// to become ready, then run the callbacks of the ready ones in
    /// registration order.
    ///
    /// Returns the number of callbacks that ran. A signal interrupting the
    /// wait is reported as a turn with zero callbacks.
    pub fn turn(&mut self, ctx: &mut C, timeout: Option<Duration>) -> io::Result<usize> {
        let mut fds: Vec<libc::pollfd> = self
            .watches
            .iter()
            .map(|w| libc::pollfd {
                fd: w.fd,
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        let timeout_ms = match timeout {
            Some(t) => t.as_millis().min(i32::MAX as u128) as libc::c_int,
            None => -1,
        };

        let ret = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(err);
        }
        if ret == 0 {
            return Ok(0);
        }

        let ready: Vec<(WatchToken, Readiness)> = self
            .watches
            .iter()
            .zip(fds.iter())
            .map(|(w, p)| (w.token, Readiness::from_revents(p.revents)))
            .filter(|(_, r)| !r.is_empty())
            .collect();

        let mut ran = 0;
        for (token, readiness) in ready {
            // An earlier callback in this turn may have removed the watch.
            let Some(index) = self.watches.iter().position(|w| w.token == token) else {
                continue;
            };
            let control = (self.watches[index].callback)(ctx, readiness);
            ran += 1;
            if control == WatchControl::Remove {
                self.watches.remove(index);
                tracing::trace!(token = token.0, "reactor: watch removed by callback");
            }
        }
        Ok(ran)
    }
}

impl<C> Default for Reactor<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::io::{AsRawFd, FromRawFd, OwnedFd};

    fn pipe() -> (OwnedFd, std::fs::File) {
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let read = unsafe { OwnedFd::from_raw_fd(fds[0]) };
        let write = unsafe { std::fs::File::from_raw_fd(fds[1]) };
        (read, write)
    }

    #[test]
    fn idle_turn_runs_nothing() {
        let (read, _write) = pipe();
        let mut reactor: Reactor<Vec<Readiness>> = Reactor::new();
        reactor.watch(read.as_raw_fd(), |seen, r| {
            seen.push(r);
            WatchControl::Keep
        });

        let mut seen = Vec::new();
        let ran = reactor
            .turn(&mut seen, Some(Duration::from_millis(10)))
            .unwrap();
        assert_eq!(ran, 0);
        assert!(seen.is_empty());
    }

    #[test]
    fn level_triggered_until_removed() {
        let (read, mut write) = pipe();
        write.write_all(b"x").unwrap();

        let mut reactor: Reactor<u32> = Reactor::new();
        let token = reactor.watch(read.as_raw_fd(), |count, r| {
            assert!(r.readable);
            *count += 1;
            if *count == 3 {
                WatchControl::Remove
            } else {
                WatchControl::Keep
            }
        });

        let mut count = 0;
        for _ in 0..5 {
            reactor
                .turn(&mut count, Some(Duration::from_millis(10)))
                .unwrap();
        }
        // Nothing drains the pipe, so it stays readable until the callback opts out.
        assert_eq!(count, 3);
        assert!(!reactor.is_watching(token));
    }

    #[test]
    fn hangup_reported_after_writer_closes() {
        let (read, write) = pipe();
        drop(write);

        let mut reactor: Reactor<Option<Readiness>> = Reactor::new();
        reactor.watch(read.as_raw_fd(), |last, r| {
            *last = Some(r);
            WatchControl::Remove
        });

        let mut last = None;
        reactor
            .turn(&mut last, Some(Duration::from_millis(100)))
            .unwrap();
        assert!(last.map(|r| r.hangup).unwrap_or(false));
        assert!(reactor.is_empty());
    }

    #[test]
    fn notify_runs_callback_without_polling() {
        let (read, _write) = pipe();
        let mut reactor: Reactor<u32> = Reactor::new();
        let token = reactor.watch(read.as_raw_fd(), |count, _| {
            *count += 1;
            WatchControl::Keep
        });

        let mut count = 0;
        assert!(reactor.notify(&mut count, token, Readiness::READABLE));
        assert_eq!(count, 1);
        assert!(reactor.unwatch(token));
        assert!(!reactor.notify(&mut count, token, Readiness::READABLE));
        assert!(!reactor.unwatch(token));
    }
}
