//! Rope-backed line storage.
//!
//! [`LineIndex`] wraps a [`ropey::Rope`] holding LF-normalized text and provides O(log N)
//! line access and editing. It speaks 0-based line indices and char offsets; the 1-based
//! [`crate::Position`] API lives on [`crate::TextModel`].

use ropey::Rope;

/// Logical line index - implemented using Rope data structure.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Build a line index from LF-normalized text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count. An empty document has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Length of line `line_idx` in chars, excluding the newline.
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let start = self.rope.line_to_char(line_idx);
        let end = if line_idx + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line_idx + 1) - 1
        } else {
            self.rope.len_chars()
        };
        end - start
    }

    /// Text of line `line_idx` without its newline.
    pub fn line_text(&self, line_idx: usize) -> String {
        if line_idx >= self.rope.len_lines() {
            return String::new();
        }
        let mut text = self.rope.line(line_idx).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Char offset of the start of line `line_idx`.
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line_idx)
    }

    /// Get line index and char-in-line from a char offset (clamped).
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(char_offset);
        (line_idx, char_offset - self.rope.line_to_char(line_idx))
    }

    /// Get char offset from line index and char-in-line (clamped to the line).
    pub fn position_to_char_offset(&self, line_idx: usize, column: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line_idx) + column.min(self.line_len(line_idx))
    }

    /// Text between two char offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Insert text at a char offset.
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete `len_chars` chars starting at `start_char`.
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// Complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }
}
