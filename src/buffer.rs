//! Text buffers shown by the frontend.

use crate::shell::OutputSink;

/// Line-structured text shared between the output pump and user edits.
///
/// Offsets are byte offsets into the UTF-8 text. Lines are separated by
/// `\n`; a buffer ending in `\n` has an empty last line, and an empty
/// buffer has exactly one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayBuffer {
    text: String,
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Byte offset where line `index` starts, or `None` past the last line.
    pub fn line_start(&self, index: usize) -> Option<usize> {
        if index == 0 {
            return Some(0);
        }
        self.text
            .match_indices('\n')
            .nth(index - 1)
            .map(|(offset, _)| offset + 1)
    }

    /// Text between two byte offsets; `None` if either is out of range or
    /// not on a character boundary.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        self.text.get(start..end)
    }

    /// Append `text` at the very end.
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Remove the character starting at byte offset `at`.
    ///
    /// Returns `None` and leaves the text alone if `at` is past the end or
    /// not on a character boundary.
    pub fn remove_char_at(&mut self, at: usize) -> Option<char> {
        if at >= self.text.len() || !self.text.is_char_boundary(at) {
            return None;
        }
        Some(self.text.remove(at))
    }

    /// Remove and return the last character.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }
}

impl OutputSink for DisplayBuffer {
    fn append(&mut self, text: &str) {
        DisplayBuffer::append(self, text);
    }
}

/// Characters typed since the last submitted command.
///
/// Kept apart from the terminal buffer so that shell output arriving
/// mid-typing never ends up in the submitted command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    text: String,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Return the accumulated text and start a new line.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}
