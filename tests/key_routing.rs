//! Key routing between shortcuts, the terminal and the editor.

#![cfg(unix)]

mod common;

use common::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use litecode::config::LineSource;
use litecode::ui::{handle_key, KeyOutcome, Screen, View};
use std::path::Path;

#[test]
fn backspace_erases_typed_text_only() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    app.append_terminal("$ ");
    type_text(&mut app, "lsx");
    handle_key(&mut app, press_key(KeyCode::Backspace));
    assert_eq!(app.terminal().text(), "$ ls");
    assert_eq!(app.input_line(), "ls");

    for _ in 0..5 {
        handle_key(&mut app, press_key(KeyCode::Backspace));
    }
    assert_eq!(app.terminal().text(), "$ ");
    assert_eq!(app.input_line(), "");
}

#[test]
fn backspace_after_output_keeps_output() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    type_text(&mut app, "ls");
    // Output lands after the typed text.
    app.append_terminal("hello\n");

    handle_key(&mut app, press_key(KeyCode::Backspace));
    assert_eq!(app.terminal().text(), "lhello\n");
    assert_eq!(app.input_line(), "l");

    handle_key(&mut app, press_key(KeyCode::Backspace));
    handle_key(&mut app, press_key(KeyCode::Backspace));
    assert_eq!(app.terminal().text(), "hello\n");
    assert_eq!(app.input_line(), "");
}

#[test]
fn non_enter_keys_propagate_from_terminal_hook() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    assert_eq!(
        app.on_terminal_key(&press_key(KeyCode::Char('a'))),
        KeyOutcome::Propagate
    );
    assert_eq!(app.on_terminal_key(&press_key(KeyCode::Left)), KeyOutcome::Propagate);
    assert_eq!(app.terminal().text(), "");
}

#[test]
fn unhandled_keys_propagate() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    assert_eq!(handle_key(&mut app, press_key(KeyCode::F(5))), KeyOutcome::Propagate);
    assert_eq!(handle_key(&mut app, ctrl_key('z')), KeyOutcome::Propagate);

    let mut release = press_key(KeyCode::Char('a'));
    release.kind = KeyEventKind::Release;
    assert_eq!(handle_key(&mut app, release), KeyOutcome::Propagate);
    assert_eq!(app.input_line(), "");
}

#[test]
fn toggle_routes_typing_to_document() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    assert!(app.is_terminal_visible());

    assert_eq!(handle_key(&mut app, ctrl_key('t')), KeyOutcome::Consumed);
    assert!(!app.is_terminal_visible());

    type_text(&mut app, "x = 1");
    handle_key(&mut app, press_key(KeyCode::Enter));
    assert_eq!(app.workspace().document().buffer().text(), "x = 1\n");
    assert_eq!(app.terminal().text(), "");
    assert_eq!(app.input_line(), "");

    handle_key(&mut app, ctrl_key('`'));
    assert!(app.is_terminal_visible());
    assert!(app.session().is_open());
}

#[test]
fn alt_characters_are_not_inserted() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    let key = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT);
    assert_eq!(handle_key(&mut app, key), KeyOutcome::Propagate);
    assert_eq!(app.terminal().text(), "");
}

#[test]
fn quit_shortcut_requests_quit() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    assert!(!app.should_quit());
    handle_key(&mut app, ctrl_key('q'));
    assert!(app.should_quit());
}

#[test]
fn save_without_path_warns() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    assert_eq!(handle_key(&mut app, ctrl_key('s')), KeyOutcome::Consumed);
    assert!(app.last_warning().is_some());
}

#[test]
fn save_and_new_document_shortcuts() {
    let (mut app, _reactor, dir) = make_app("/bin/cat", LineSource::InputLine);
    app.toggle_terminal();
    type_text(&mut app, "print(1)");
    app.workspace_mut().save_as(Path::new("a.py")).unwrap();

    type_text(&mut app, "\n");
    handle_key(&mut app, ctrl_key('s'));
    let saved = std::fs::read_to_string(dir.path().join("a.py")).unwrap();
    assert_eq!(saved, "print(1)\n");

    handle_key(&mut app, ctrl_key('n'));
    assert!(app.workspace().document().path().is_none());
    assert!(app.workspace().document().buffer().is_empty());
}

#[test]
fn run_shortcut_dispatches_saved_file() {
    let (mut app, mut reactor, dir) = make_app("/bin/cat", LineSource::InputLine);
    app.workspace_mut().save_as(Path::new("main.py")).unwrap();
    app.toggle_terminal();

    assert_eq!(handle_key(&mut app, ctrl_key('r')), KeyOutcome::Consumed);
    assert!(app.is_terminal_visible());
    let expected = format!("python3 {}\n", dir.path().join("main.py").display());
    assert!(pump_until(&mut app, &mut reactor, &expected));
}

#[test]
fn open_shortcut_picks_file_from_listing() {
    let (mut app, _reactor, dir) = make_app("/bin/cat", LineSource::InputLine);
    std::fs::write(dir.path().join("a.py"), "print('a')\n").unwrap();
    std::fs::write(dir.path().join("b.py"), "print('b')\n").unwrap();

    assert_eq!(handle_key(&mut app, ctrl_key('o')), KeyOutcome::Consumed);
    assert_eq!(app.view(), View::Explorer);

    // Keys go to the listing while it is open.
    type_text(&mut app, "zz");
    assert_eq!(app.input_line(), "");

    handle_key(&mut app, press_key(KeyCode::Down));
    handle_key(&mut app, press_key(KeyCode::Enter));
    assert_eq!(app.view(), View::Document);
    assert_eq!(app.workspace().document().title(), "b.py");
    assert_eq!(app.workspace().document().buffer().text(), "print('b')\n");
    assert!(app.session().is_open());
}

#[test]
fn escape_closes_listing_without_loading() {
    let (mut app, _reactor, dir) = make_app("/bin/cat", LineSource::InputLine);
    std::fs::write(dir.path().join("a.py"), "").unwrap();

    handle_key(&mut app, ctrl_key('o'));
    handle_key(&mut app, press_key(KeyCode::Esc));
    assert_eq!(app.view(), View::Terminal);
    assert!(app.workspace().document().path().is_none());
}

#[test]
fn open_in_empty_directory_warns() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    handle_key(&mut app, ctrl_key('o'));
    assert_eq!(app.view(), View::Terminal);
    assert!(app.last_warning().unwrap().starts_with("No files in"));
}

fn draw(screen: &mut Screen, app: &litecode::ui::EditorApp) -> String {
    let mut out = Vec::new();
    screen.draw(app, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn hidden_terminal_shows_document() {
    let (mut app, _reactor, _dir) = make_app("/bin/cat", LineSource::InputLine);
    let mut screen = Screen::new();
    app.append_terminal("$ ");
    assert_eq!(draw(&mut screen, &app), "$ ");

    handle_key(&mut app, ctrl_key('t'));
    type_text(&mut app, "x = 1");
    let frame = draw(&mut screen, &app);
    assert!(frame.contains("untitled.py (5 bytes)"));
    assert!(frame.ends_with("x = 1"));
    assert_eq!(draw(&mut screen, &app), "");

    handle_key(&mut app, press_key(KeyCode::Enter));
    let frame = draw(&mut screen, &app);
    assert!(frame.ends_with("x = 1\r\n"));

    // Back on the terminal the whole buffer is redrawn.
    handle_key(&mut app, ctrl_key('t'));
    assert!(draw(&mut screen, &app).ends_with("$ "));
}
