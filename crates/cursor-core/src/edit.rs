//! Edit operations.

use crate::{Position, Range};

/// A single replace: delete `range`, then insert `text`.
///
/// `text == None` is a deletion and an empty `range` is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditOperation {
    /// Range to replace.
    pub range: Range,
    /// Replacement text, `None` for a plain deletion.
    pub text: Option<String>,
    /// Force tracked ranges touching the edit to move past inserted text.
    pub force_move_markers: bool,
}

impl EditOperation {
    /// Replace `range` with `text`.
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: Some(text.into()),
            force_move_markers: false,
        }
    }

    /// Replace `range` with `text`, pushing markers at the edges past the new text.
    pub fn replace_move(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            text: Some(text.into()),
            force_move_markers: true,
        }
    }

    /// Insert `text` at `pos`.
    pub fn insert(pos: Position, text: impl Into<String>) -> Self {
        Self::replace(Range::empty_at(pos), text)
    }

    /// Delete `range`.
    pub fn delete(range: Range) -> Self {
        Self {
            range,
            text: None,
            force_move_markers: false,
        }
    }

    /// The replacement text, empty for deletions.
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// One change as reported to content listeners.
///
/// `range`, `range_offset` and `range_length` describe the replaced span in the document as
/// it was *before* the batch; changes in one event are ordered from the end of the document
/// to the start, so applying them in order never invalidates a later offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Replaced range (pre-edit coordinates).
    pub range: Range,
    /// Char offset of `range.start()`.
    pub range_offset: usize,
    /// Length of the replaced range in chars.
    pub range_length: usize,
    /// Inserted text.
    pub text: String,
}
