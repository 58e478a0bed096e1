#![warn(missing_docs)]
//! Cursor Core - Headless Multi-Cursor Editing Kernel
//!
//! # Overview
//!
//! `cursor-core` turns semantic editing commands (move, select, type, delete, indent, paste,
//! IME composition, undo/redo, box selection) into edits of a line-oriented text model while
//! keeping any number of cursors consistent. It does no rendering, tokenizing or layout of its
//! own: the host supplies those through small traits ([`Tokenizer`], [`WrapPolicy`]) and a
//! [`cursor_core_lang::LanguageConfigProvider`].
//!
//! # Core Features
//!
//! - **Multi-cursor editing**: every command runs on all cursors in one batch; overlapping
//!   results merge
//! - **Exact undo/redo**: undo elements restore text and selections; typing coalesces
//! - **Language rules**: on-enter rules, indentation regexes, auto-closing and surrounding
//!   pairs, word patterns
//! - **Tracked ranges**: cursors follow edits they did not make
//! - **Column selection**: mouse and keyboard box selection over lines of any length
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  CursorController (trigger / events)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Command handlers (typing, deleting, ...)   │  ← Pure functions of state
//! ├─────────────────────────────────────────────┤
//! │  EditOperationBuilder + cursor recipes      │  ← Edit batches
//! ├─────────────────────────────────────────────┤
//! │  TextModel (undo stack, tracked ranges)     │  ← Document
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use cursor_core::{
//!     Command, CursorCommand, CursorController, EditCommand, EndOfLinePreference,
//!     KEYBOARD_SOURCE, Position, Selection, TextModel,
//! };
//!
//! let mut controller = CursorController::new(TextModel::new("one\ntwo"));
//!
//! // Two cursors, one per line.
//! controller
//!     .trigger(
//!         "api",
//!         Command::Cursor(CursorCommand::SetSelections {
//!             selections: vec![
//!                 Selection::caret(Position::new(1, 4)),
//!                 Selection::caret(Position::new(2, 4)),
//!             ],
//!         }),
//!     )
//!     .unwrap();
//!
//! controller
//!     .trigger(KEYBOARD_SOURCE, Command::Edit(EditCommand::Type { text: "!".to_string() }))
//!     .unwrap();
//!
//! assert_eq!(controller.model().get_value(EndOfLinePreference::Lf), "one!\ntwo!");
//! assert_eq!(controller.selections()[1], Selection::caret(Position::new(2, 5)));
//! ```
//!
//! # Module Description
//!
//! - [`commands`] - the closed set of commands accepted by [`CursorController::trigger`]
//! - [`builder`] - per-cursor edits and the recipes that rebuild selections after them
//! - [`columns`] - column, visible column and indentation arithmetic
//! - [`line_ending`] - line ending detection and normalization
//! - [`line_index`] - Rope based line index
//!
//! # Unicode Support
//!
//! - Columns count Unicode scalar values, so an astral character is one column
//! - Left/Right and Backspace step over whole grapheme clusters
//! - Visible columns use East Asian widths and expand tabs to tab stops

pub mod builder;
pub mod columns;
pub mod commands;
mod config;
mod controller;
mod edit;
mod error;
mod events;
pub mod line_ending;
pub mod line_index;
mod model;
mod ops;
mod position;
mod saved_state;
mod selection_set;
mod tokens;
mod tracked;
mod undo;
mod view_lines;

pub use builder::{BuiltEdits, CursorEdit, CursorRecipe, CursorStateRecipe, EditOperationBuilder};
pub use commands::{Command, CommandResult, CursorCommand, EditCommand, KEYBOARD_SOURCE};
pub use config::{
    AutoClosingStrategy, AutoSurroundStrategy, CursorConfig, MultiCursorPaste, TextModelOptions,
};
pub use controller::CursorController;
pub use edit::{ContentChange, EditOperation};
pub use error::{CommandError, ModelError, StateError};
pub use events::{
    ContentChangeCallback, CursorChangeCallback, CursorChangeReason, CursorStateChangedEvent,
    ModelContentChangedEvent,
};
pub use line_ending::LineEnding;
pub use line_index::LineIndex;
pub use model::{CursorStateComputer, EndOfLinePreference, TextModel};
pub use ops::clipboard::ClipboardContent;
pub use position::{Position, Range, Selection, SelectionDirection};
pub use saved_state::SavedSelection;
pub use selection_set::{CursorState, column_select, merge_overlapping, normalize};
pub use tokens::{NullTokenizer, Tokenizer};
pub use tracked::{TrackedRangeId, TrackedRangeStickiness};
pub use undo::StackElement;
pub use view_lines::{ColumnWrap, NoWrap, WrapPolicy};

pub use cursor_core_lang::{
    AutoClosingPair, CharacterPair, EnterAction, IndentAction, IndentationRules,
    LanguageConfigError, LanguageConfigProvider, LanguageConfiguration, LanguageRegistry,
    OnEnterRule, Pattern, ScopeKind,
};
