use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::path::Path;

use crate::buffer::DisplayBuffer;
use crate::ui::app::{EditorApp, View};
use crate::ui::explorer::ExplorerState;
use crate::workspace::Document;

/// Draws whichever view the app is in.
///
/// The terminal view is written incrementally so shell output scrolls
/// naturally. The document and explorer views are full pages, redrawn on
/// a cleared screen only when their text changes.
#[derive(Debug, Default)]
pub struct Screen {
    view: Option<View>,
    terminal: TerminalRenderer,
    page: String,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw<W: Write>(&mut self, app: &EditorApp, out: &mut W) -> io::Result<()> {
        let view = app.view();
        if self.view != Some(view) {
            if self.view.is_some() {
                queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            }
            self.view = Some(view);
            self.terminal = TerminalRenderer::new();
            self.page.clear();
        }

        match view {
            View::Terminal => self.terminal.render(app.terminal(), out),
            View::Document => self.show_page(document_page(app.workspace().document()), out),
            View::Explorer => {
                self.show_page(explorer_page(app.workspace().root(), app.explorer()), out)
            }
        }
    }

    fn show_page<W: Write>(&mut self, page: String, out: &mut W) -> io::Result<()> {
        if page == self.page {
            return Ok(());
        }
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        out.write_all(raw_mode_text(&page).as_bytes())?;
        self.page = page;
        Ok(())
    }
}

/// Title line followed by the document text.
pub fn document_page(document: &Document) -> String {
    let text = document.buffer().text();
    format!(
        "-- {} ({} bytes) Ctrl+T terminal, Ctrl+O open, Ctrl+S save --\n{}",
        document.title(),
        text.len(),
        text
    )
}

/// Directory listing with the highlighted entry marked.
pub fn explorer_page(root: &Path, explorer: &ExplorerState) -> String {
    let mut page = format!(
        "-- open a file from {} (Enter opens, Esc cancels) --\n",
        root.display()
    );
    if let ExplorerState::Visible { entries, selected } = explorer {
        for (index, entry) in entries.iter().enumerate() {
            let marker = if index == *selected { '>' } else { ' ' };
            page.push_str(&format!("{marker} {}\n", entry.name));
        }
    }
    page
}

/// Mirrors a [`DisplayBuffer`] onto a raw-mode terminal by writing only
/// what changed since the previous frame.
///
/// Text removed from the end of the current line is rubbed out with
/// backspaces. Backspace cannot cross a line break, so when the changed
/// tail spans one the screen is cleared and the whole buffer rewritten.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    shown: String,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<W: Write>(&mut self, buffer: &DisplayBuffer, out: &mut W) -> io::Result<()> {
        let text = buffer.text();
        if text == self.shown {
            return Ok(());
        }

        let common = common_prefix_len(&self.shown, text);
        let removed = &self.shown[common..];
        if removed.contains('\n') {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            out.write_all(raw_mode_text(text).as_bytes())?;
        } else {
            for _ in removed.chars() {
                out.write_all(b"\x08 \x08")?;
            }
            out.write_all(raw_mode_text(&text[common..]).as_bytes())?;
        }

        self.shown.clear();
        self.shown.push_str(text);
        Ok(())
    }
}

/// Raw mode does not translate `\n`, so return to column zero explicitly.
fn raw_mode_text(text: &str) -> String {
    text.replace('\n', "\r\n")
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((index, _), _)| index)
        .unwrap_or_else(|| a.len().min(b.len()))
}
