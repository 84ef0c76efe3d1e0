use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ui::app::{EditorApp, KeyOutcome};

/// Route one key event: global shortcuts first, then the visible view.
pub fn handle_key(app: &mut EditorApp, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Propagate;
    }

    if app.explorer().is_visible() {
        return handle_explorer_key(app, key);
    }

    if let Some(outcome) = handle_shortcut(app, key) {
        return outcome;
    }

    if app.is_terminal_visible() {
        if app.on_terminal_key(&key) == KeyOutcome::Consumed {
            return KeyOutcome::Consumed;
        }
        insert_terminal_text(app, key)
    } else {
        insert_editor_text(app, key)
    }
}

fn handle_shortcut(app: &mut EditorApp, key: KeyEvent) -> Option<KeyOutcome> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('s') => {
            // Recorded as a warning by the app.
            let _ = app.save_document();
        }
        KeyCode::Char('n') => app.new_document(),
        KeyCode::Char('o') => app.open_explorer(),
        KeyCode::Char('`') | KeyCode::Char('t') => {
            app.toggle_terminal();
        }
        KeyCode::Char('r') => {
            let _ = app.run_current_file();
        }
        _ => return None,
    }
    Some(KeyOutcome::Consumed)
}

/// The explorer is modal: it takes every key until it closes.
fn handle_explorer_key(app: &mut EditorApp, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => app.request_quit(),
        KeyCode::Char('o') if ctrl => app.close_explorer(),
        KeyCode::Esc => app.close_explorer(),
        KeyCode::Up => app.move_explorer_selection(-1),
        KeyCode::Down => app.move_explorer_selection(1),
        KeyCode::Enter => {
            // Recorded as a warning by the app.
            let _ = app.open_selected();
        }
        _ => {}
    }
    KeyOutcome::Consumed
}

fn insert_terminal_text(app: &mut EditorApp, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Char(ch) if is_plain(key) => app.type_char(ch),
        KeyCode::Tab => app.type_char('\t'),
        KeyCode::Backspace => app.erase_char(),
        _ => return KeyOutcome::Propagate,
    }
    KeyOutcome::Consumed
}

fn insert_editor_text(app: &mut EditorApp, key: KeyEvent) -> KeyOutcome {
    let buffer = app.workspace_mut().document_mut().buffer_mut();
    match key.code {
        KeyCode::Char(ch) if is_plain(key) => buffer.append(ch.encode_utf8(&mut [0u8; 4])),
        KeyCode::Tab => buffer.append("\t"),
        KeyCode::Enter => buffer.append("\n"),
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => return KeyOutcome::Propagate,
    }
    KeyOutcome::Consumed
}

fn is_plain(key: KeyEvent) -> bool {
    !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
