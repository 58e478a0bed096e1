//! Command handlers.
//!
//! Every handler is a function of the current selections, the model, the editor options and
//! the language configuration. Edit handlers never touch the model: they return one
//! [`CursorEdit`] per cursor wrapped in an [`EditResult`], and the controller pushes the batch
//! and decides where undo stops go. Movement handlers return the new selections directly.
//!
//! # Module Layout
//!
//! - [`movement`] - caret movement and selection extension
//! - [`words`] - word boundaries for word movement and word deletion
//! - [`typing`] - typed characters: enter, auto-closing, overtype, surround, electric indent
//! - [`deleting`] - backspace and delete
//! - [`indent`] - tab, indent/outdent, inherited indentation, line insertion
//! - [`clipboard`] - cut, paste and clipboard content

pub(crate) mod clipboard;
pub(crate) mod deleting;
pub(crate) mod indent;
pub(crate) mod movement;
pub(crate) mod typing;
pub(crate) mod words;

use cursor_core_lang::{IndentationRules, LanguageConfiguration};

use crate::builder::CursorEdit;
use crate::tokens::Tokenizer;
use crate::{CursorConfig, TextModel, columns};

/// The kind of the last edit command; consecutive edits of the same kind share an undo
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum EditKind {
    #[default]
    Other,
    Typing,
    DeletingLeft,
    DeletingRight,
}

/// What an edit handler wants done: per-cursor edits plus undo-stop placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditResult {
    pub(crate) kind: EditKind,
    pub(crate) push_before: bool,
    pub(crate) push_after: bool,
    pub(crate) cursors: Vec<CursorEdit>,
}

impl EditResult {
    pub(crate) fn new(kind: EditKind, cursors: Vec<CursorEdit>) -> Self {
        Self {
            kind,
            push_before: false,
            push_after: false,
            cursors,
        }
    }

    /// A standalone undo element: stops on both sides.
    pub(crate) fn isolated(kind: EditKind, cursors: Vec<CursorEdit>) -> Self {
        Self::new(kind, cursors).push_before(true).push_after(true)
    }

    pub(crate) fn push_before(mut self, push: bool) -> Self {
        self.push_before = push;
        self
    }

    pub(crate) fn push_after(mut self, push: bool) -> Self {
        self.push_after = push;
        self
    }
}

/// Everything a handler may read.
#[derive(Clone, Copy)]
pub(crate) struct OpContext<'a> {
    pub(crate) model: &'a TextModel,
    pub(crate) config: &'a CursorConfig,
    pub(crate) language: Option<&'a LanguageConfiguration>,
    pub(crate) tokenizer: &'a dyn Tokenizer,
}

impl<'a> OpContext<'a> {
    pub(crate) fn tab_size(&self) -> usize {
        self.model.options().tab_size
    }

    pub(crate) fn insert_spaces(&self) -> bool {
        self.model.options().insert_spaces
    }

    pub(crate) fn line(&self, line: usize) -> String {
        self.model.line_content(line)
    }

    pub(crate) fn normalize_indentation(&self, text: &str) -> String {
        columns::normalize_indentation(text, self.tab_size(), self.insert_spaces())
    }

    pub(crate) fn shift_indent(&self, indentation: &str) -> String {
        columns::shift_indent(indentation, self.tab_size(), self.insert_spaces())
    }

    pub(crate) fn unshift_indent(&self, indentation: &str) -> String {
        columns::unshift_indent(indentation, self.tab_size(), self.insert_spaces())
    }

    /// Indentation rules, only when auto-indent is on.
    pub(crate) fn indentation_rules(&self) -> Option<&'a IndentationRules> {
        if !self.config.auto_indent {
            return None;
        }
        self.language.and_then(|lang| lang.indentation_rules.as_ref())
    }
}

/// `line[from..to]` by 0-based char index, clamped.
pub(crate) fn char_slice(line: &str, from: usize, to: usize) -> String {
    line.chars().skip(from).take(to.saturating_sub(from)).collect()
}

/// The char at 0-based index `index`.
pub(crate) fn char_at(line: &str, index: usize) -> Option<char> {
    line.chars().nth(index)
}

/// Char count of `text`, as a signed column delta.
pub(crate) fn char_len(text: &str) -> isize {
    text.chars().count() as isize
}
