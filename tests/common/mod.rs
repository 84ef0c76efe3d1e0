//! Shared helpers for tests that drive a real interpreter.

#![allow(dead_code, unused_imports)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use litecode::config::{Config, LineSource};
use litecode::reactor::Reactor;
use litecode::shell::Session;
use litecode::ui::EditorApp;
use litecode::workspace::Workspace;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

pub const TURN: Duration = Duration::from_millis(20);
pub const DEADLINE: Duration = Duration::from_secs(5);

/// Config embedding `program` (e.g. `/bin/sh`, or `/bin/cat` to echo stdin back).
pub fn config_for(program: &str) -> Config {
    let mut config = Config::default();
    config.session.interpreter = program.to_string();
    config.session.teardown_grace_ms = 1000;
    config
}

/// Editor app embedding `program`, attached to a fresh reactor.
pub fn make_app(program: &str, line_source: LineSource) -> (EditorApp, Reactor<EditorApp>, TempDir) {
    let mut config = config_for(program);
    config.session.line_source = line_source;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let session = Session::launch(&config.session).expect("Failed to launch interpreter");
    let mut app = EditorApp::new(session, Workspace::new(dir.path()), &config);
    let mut reactor = Reactor::new();
    app.attach(&mut reactor).expect("Failed to attach session");
    (app, reactor, dir)
}

/// Turn the reactor until the terminal contains `needle`.
pub fn pump_until(app: &mut EditorApp, reactor: &mut Reactor<EditorApp>, needle: &str) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if app.terminal().text().contains(needle) {
            return true;
        }
        reactor.turn(app, Some(TURN)).expect("reactor turn failed");
    }
    app.terminal().text().contains(needle)
}

/// Turn the reactor until the shell's exit has been observed.
pub fn pump_until_exit(app: &mut EditorApp, reactor: &mut Reactor<EditorApp>) -> bool {
    let deadline = Instant::now() + DEADLINE;
    while Instant::now() < deadline {
        if app.poll_child().is_some() {
            return true;
        }
        reactor.turn(app, Some(TURN)).expect("reactor turn failed");
    }
    false
}

pub fn press_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl_key(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

pub fn type_text(app: &mut EditorApp, text: &str) {
    for ch in text.chars() {
        litecode::ui::handle_key(app, press_key(KeyCode::Char(ch)));
    }
}
