//! Command Interface Layer
//!
//! Every interaction with a [`crate::CursorController`] is a [`Command`] passed to
//! [`crate::CursorController::trigger`] together with a free-form `source` string.
//!
//! # Overview
//!
//! - **Edit commands** ([`EditCommand`]): typing, IME composition, paste/cut, deletion,
//!   indentation and undo/redo.
//! - **Cursor commands** ([`CursorCommand`]): caret movement, selection extension, multi-cursor
//!   management and column (box) selection.
//!
//! The source only matters for [`EditCommand::Type`]: text typed from [`KEYBOARD_SOURCE`] is
//! processed one character at a time so auto-closing, auto-indent and friends can intercept
//! it. Any other source inserts the text verbatim.
//!
//! # Example
//!
//! ```rust
//! use cursor_core::{Command, CursorController, EditCommand, EndOfLinePreference, KEYBOARD_SOURCE, TextModel};
//!
//! let mut controller = CursorController::new(TextModel::new("ab"));
//! controller
//!     .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::Type { text: "x".to_string() }))
//!     .unwrap();
//! assert_eq!(controller.model().get_value(EndOfLinePreference::Lf), "xab");
//!
//! controller.trigger("api", Command::Edit(EditCommand::Undo)).unwrap();
//! assert_eq!(controller.model().get_value(EndOfLinePreference::Lf), "ab");
//! ```

use crate::{Position, Selection};

/// Source string for text typed on a keyboard.
pub const KEYBOARD_SOURCE: &str = "keyboard";

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type text at every cursor, replacing non-empty selections.
    Type {
        /// Typed text.
        text: String,
    },
    /// Replace characters before each caret (IME composition update).
    ReplacePreviousChar {
        /// Replacement text.
        text: String,
        /// Number of characters before the caret to replace.
        replace_char_count: usize,
    },
    /// Start an IME composition.
    CompositionStart,
    /// End an IME composition.
    CompositionEnd,
    /// Paste clipboard text.
    Paste {
        /// Clipboard text.
        text: String,
        /// The clipboard holds whole lines copied from empty selections.
        paste_on_new_line: bool,
        /// One entry per cursor that produced the clipboard content, if known.
        multicursor_text: Option<Vec<String>>,
    },
    /// Delete the selections (or whole lines for empty ones, when configured).
    Cut,
    /// Backspace
    DeleteLeft,
    /// Delete the character after the caret.
    DeleteRight,
    /// Delete to the start of the previous word.
    DeleteWordLeft,
    /// Delete to the end of the next word.
    DeleteWordRight,
    /// Tab key: insert indentation or indent selected lines.
    Tab,
    /// Shift+Tab: remove one indentation level from selected lines.
    Outdent,
    /// Add one indentation level to selected lines.
    Indent,
    /// Open an empty line above the current one.
    LineInsertBefore,
    /// Open an empty line below the current one.
    LineInsertAfter,
    /// Undo
    Undo,
    /// Redo
    Redo,
    /// Explicitly end the current undo group
    EndUndoGroup,
}

/// Cursor & selection commands
///
/// Commands with a `select` flag extend the selection (keep the anchor) when it is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the primary cursor to a position, dropping secondary cursors.
    MoveTo {
        /// Target position (clamped).
        position: Position,
        /// Keep the anchor.
        select: bool,
    },
    /// One character left.
    Left {
        /// Extend the selection.
        select: bool,
    },
    /// One character right.
    Right {
        /// Extend the selection.
        select: bool,
    },
    /// One visual line up.
    Up {
        /// Extend the selection.
        select: bool,
    },
    /// One visual line down.
    Down {
        /// Extend the selection.
        select: bool,
    },
    /// Toggle between the first non-whitespace column and column 1.
    Home {
        /// Extend the selection.
        select: bool,
    },
    /// End of line.
    End {
        /// Extend the selection.
        select: bool,
    },
    /// Start of the document.
    Top {
        /// Extend the selection.
        select: bool,
    },
    /// End of the document.
    Bottom {
        /// Extend the selection.
        select: bool,
    },
    /// `page_size` visual lines up.
    PageUp {
        /// Extend the selection.
        select: bool,
    },
    /// `page_size` visual lines down.
    PageDown {
        /// Extend the selection.
        select: bool,
    },
    /// Start of the previous word.
    WordLeft {
        /// Extend the selection.
        select: bool,
    },
    /// End of the next word.
    WordRight {
        /// Extend the selection.
        select: bool,
    },
    /// Select the whole document.
    SelectAll,
    /// Grow the selection by one full line.
    ExpandLineSelection,
    /// Collapse the primary selection to its caret and drop secondary cursors.
    CancelSelection,
    /// Keep only the primary cursor.
    RemoveSecondaryCursors,
    /// Add a cursor one line above the topmost one.
    AddCursorAbove,
    /// Add a cursor one line below the bottommost one.
    AddCursorBelow,
    /// Replace all selections (first is primary).
    SetSelections {
        /// New selections; must not be empty.
        selections: Vec<Selection>,
    },
    /// Mouse-driven column select from the primary anchor to `position`.
    ColumnSelect {
        /// Position under the mouse (clamped).
        position: Position,
        /// 1-based visible column under the mouse; may lie past the line end.
        mouse_column: usize,
    },
    /// Keyboard column select: shrink the box by one visible column.
    ColumnSelectLeft,
    /// Keyboard column select: grow the box by one visible column.
    ColumnSelectRight,
    /// Keyboard column select: extend the box one line up.
    ColumnSelectUp,
    /// Keyboard column select: extend the box one line down.
    ColumnSelectDown,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Edit(edit) => match edit {
                EditCommand::Type { .. } => "type",
                EditCommand::ReplacePreviousChar { .. } => "replacePreviousChar",
                EditCommand::CompositionStart => "compositionStart",
                EditCommand::CompositionEnd => "compositionEnd",
                EditCommand::Paste { .. } => "paste",
                EditCommand::Cut => "cut",
                EditCommand::DeleteLeft => "deleteLeft",
                EditCommand::DeleteRight => "deleteRight",
                EditCommand::DeleteWordLeft => "deleteWordLeft",
                EditCommand::DeleteWordRight => "deleteWordRight",
                EditCommand::Tab => "tab",
                EditCommand::Outdent => "outdent",
                EditCommand::Indent => "indent",
                EditCommand::LineInsertBefore => "lineInsertBefore",
                EditCommand::LineInsertAfter => "lineInsertAfter",
                EditCommand::Undo => "undo",
                EditCommand::Redo => "redo",
                EditCommand::EndUndoGroup => "endUndoGroup",
            },
            Command::Cursor(cursor) => match cursor {
                CursorCommand::MoveTo { .. } => "moveTo",
                CursorCommand::Left { .. } => "cursorLeft",
                CursorCommand::Right { .. } => "cursorRight",
                CursorCommand::Up { .. } => "cursorUp",
                CursorCommand::Down { .. } => "cursorDown",
                CursorCommand::Home { .. } => "cursorHome",
                CursorCommand::End { .. } => "cursorEnd",
                CursorCommand::Top { .. } => "cursorTop",
                CursorCommand::Bottom { .. } => "cursorBottom",
                CursorCommand::PageUp { .. } => "cursorPageUp",
                CursorCommand::PageDown { .. } => "cursorPageDown",
                CursorCommand::WordLeft { .. } => "cursorWordLeft",
                CursorCommand::WordRight { .. } => "cursorWordRight",
                CursorCommand::SelectAll => "selectAll",
                CursorCommand::ExpandLineSelection => "expandLineSelection",
                CursorCommand::CancelSelection => "cancelSelection",
                CursorCommand::RemoveSecondaryCursors => "removeSecondaryCursors",
                CursorCommand::AddCursorAbove => "addCursorAbove",
                CursorCommand::AddCursorBelow => "addCursorBelow",
                CursorCommand::SetSelections { .. } => "setSelections",
                CursorCommand::ColumnSelect { .. } => "columnSelect",
                CursorCommand::ColumnSelectLeft => "columnSelectLeft",
                CursorCommand::ColumnSelectRight => "columnSelectRight",
                CursorCommand::ColumnSelectUp => "columnSelectUp",
                CursorCommand::ColumnSelectDown => "columnSelectDown",
            },
        }
    }

    /// Returns `true` if the command may modify the text.
    pub fn is_mutating(&self) -> bool {
        match self {
            Command::Edit(edit) => !matches!(
                edit,
                EditCommand::CompositionStart
                    | EditCommand::CompositionEnd
                    | EditCommand::EndUndoGroup
            ),
            Command::Cursor(_) => false,
        }
    }
}

/// Command execution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The command ran (possibly as a no-op).
    Success,
    /// The model is read-only; the mutating command was ignored.
    ReadOnly,
}
