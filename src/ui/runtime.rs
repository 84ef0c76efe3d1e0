use crossterm::event::{self, Event};
use std::io::{self, Write};
use std::process::ExitStatus;
use std::time::Duration;

use crate::reactor::Reactor;
use crate::shutdown::ShutdownHandle;
use crate::ui::app::EditorApp;
use crate::ui::input::handle_key;
use crate::ui::render::Screen;
use crate::ui::terminal_guard::setup_terminal;

/// Drive the editor until the user quits or a shutdown signal arrives,
/// then tear the session down.
///
/// Each iteration runs one reactor turn (bounded by `poll_interval`),
/// drains pending key events, checks for shell exit and redraws the
/// current view. Everything happens on the calling thread.
pub fn run(
    mut app: EditorApp,
    mut reactor: Reactor<EditorApp>,
    shutdown: ShutdownHandle,
    poll_interval: Duration,
) -> anyhow::Result<Option<ExitStatus>> {
    let guard = setup_terminal()?;
    let result = event_loop(&mut app, &mut reactor, &shutdown, poll_interval);
    let status = app.teardown(&mut reactor);
    drop(guard);
    result?;
    Ok(status?)
}

fn event_loop(
    app: &mut EditorApp,
    reactor: &mut Reactor<EditorApp>,
    shutdown: &ShutdownHandle,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut screen = Screen::new();

    loop {
        if app.should_quit() || shutdown.is_shutting_down() {
            return Ok(());
        }

        reactor.turn(app, Some(poll_interval))?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        app.poll_child();

        screen.draw(app, &mut stdout)?;
        stdout.flush()?;
    }
}
