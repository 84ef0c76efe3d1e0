//! Editor shell with an embedded interactive interpreter.
//!
//! The interpreter runs as a child process behind two pipes. Its output is
//! pulled on readiness from a single-threaded [`reactor::Reactor`] into a
//! [`buffer::DisplayBuffer`], and command lines typed into that buffer are
//! written back to its stdin.

pub mod buffer;
pub mod config;
pub mod logging;
pub mod reactor;
pub mod shell;
pub mod shutdown;
pub mod ui;
pub mod workspace;
