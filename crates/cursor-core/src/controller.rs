//! The cursor controller.
//!
//! [`CursorController`] owns a [`TextModel`] and the cursors editing it. Every command goes
//! through [`CursorController::trigger`]: the handler for the command reads the selections,
//! the model, the options and the language configuration, and returns either new selections
//! (cursor commands) or per-cursor edits (edit commands). Edits are pushed to the model as one
//! batch and the resulting selections are rebuilt from the batch's inverse operations.
//!
//! Each cursor owns a tracked range in the model, so edits the cursor did not make (undo
//! without recorded selections, host edits through [`CursorController::apply_model_edits`])
//! can move it along with the text.

use std::fmt;
use std::sync::Arc;

use cursor_core_lang::{LanguageConfigProvider, LanguageConfiguration};
use tracing::{debug, trace, warn};

use crate::builder::EditOperationBuilder;
use crate::events::{CursorChangeCallback, Listeners};
use crate::line_ending::normalize_newlines;
use crate::ops::movement::{self, ColumnSelectData, Motion, MovedCursor};
use crate::ops::{EditKind, EditResult, OpContext, clipboard, deleting, indent, typing};
use crate::selection_set::merge_overlapping_indexed;
use crate::tokens::{NullTokenizer, Tokenizer};
use crate::view_lines::{NoWrap, ViewLines, WrapPolicy};
use crate::{
    ClipboardContent, Command, CommandError, CommandResult, CursorChangeReason, CursorCommand,
    CursorConfig, CursorState, CursorStateChangedEvent, EditCommand, EditOperation,
    KEYBOARD_SOURCE, LineEnding, Position, Selection, StateError, TextModel, TextModelOptions,
    TrackedRangeId, TrackedRangeStickiness, saved_state,
};

const CURSOR_STICKINESS: TrackedRangeStickiness = TrackedRangeStickiness::AlwaysGrowsWhenTypingAtEdges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    selection: Selection,
    marker: TrackedRangeId,
    desired_x: Option<usize>,
}

/// Multi-cursor editing over one [`TextModel`].
pub struct CursorController {
    model: TextModel,
    config: CursorConfig,
    languages: Option<Arc<dyn LanguageConfigProvider>>,
    tokenizer: Box<dyn Tokenizer>,
    wrap: Box<dyn WrapPolicy>,
    cursors: Vec<Cursor>,
    prev_edit: EditKind,
    composition: Option<Vec<Selection>>,
    column_select: Option<ColumnSelectData>,
    listeners: Listeners<CursorStateChangedEvent>,
}

impl fmt::Debug for CursorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorController")
            .field("model", &self.model)
            .field("config", &self.config)
            .field("selections", &self.selections())
            .field("prev_edit", &self.prev_edit)
            .field("composing", &self.composition.is_some())
            .finish_non_exhaustive()
    }
}

impl CursorController {
    /// A controller with one caret at (1, 1), default options, no language and no wrapping.
    pub fn new(mut model: TextModel) -> Self {
        let selection = Selection::caret(Position::new(1, 1));
        let marker = model.track_range(selection.range(), CURSOR_STICKINESS);
        Self {
            model,
            config: CursorConfig::default(),
            languages: None,
            tokenizer: Box::new(NullTokenizer),
            wrap: Box::new(NoWrap),
            cursors: vec![Cursor {
                selection,
                marker,
                desired_x: None,
            }],
            prev_edit: EditKind::Other,
            composition: None,
            column_select: None,
            listeners: Listeners::default(),
        }
    }

    /// Use `config` for editor options.
    pub fn with_config(mut self, config: CursorConfig) -> Self {
        self.config = config;
        self
    }

    /// Look language configurations up in `provider`, keyed by the model's language id.
    pub fn with_language_provider(mut self, provider: Arc<dyn LanguageConfigProvider>) -> Self {
        self.languages = Some(provider);
        self
    }

    /// Query `tokenizer` for the scope checks of auto-closing pairs.
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Move vertically through the visual segments produced by `wrap`.
    pub fn with_wrap_policy(mut self, wrap: impl WrapPolicy + 'static) -> Self {
        self.wrap = Box::new(wrap);
        self
    }

    // ---- queries ----

    /// The document.
    pub fn model(&self) -> &TextModel {
        &self.model
    }

    /// Editor options.
    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Replace the editor options.
    pub fn set_config(&mut self, config: CursorConfig) {
        self.config = config;
    }

    /// Replace the model options.
    pub fn update_model_options(&mut self, options: TextModelOptions) {
        self.model.update_options(options);
    }

    /// Change the language the document is edited as.
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.model.set_language_id(language_id);
    }

    /// All selections, primary first, in creation order.
    pub fn selections(&self) -> Vec<Selection> {
        self.cursors.iter().map(|c| c.selection).collect()
    }

    /// The primary selection.
    pub fn primary_selection(&self) -> Selection {
        self.cursors[0].selection
    }

    /// The selections as a [`CursorState`].
    pub fn cursor_state(&self) -> CursorState {
        CursorState::from_selections(self.selections()).unwrap_or_default()
    }

    /// What copying the current selections would put on the clipboard.
    pub fn clipboard_content(&self) -> ClipboardContent {
        let language = self.language();
        let ctx = self.context(language.as_deref());
        clipboard::clipboard_content(&ctx, &self.selections())
    }

    // ---- listeners ----

    /// Subscribe to selection changes.
    pub fn on_did_change_cursor<F>(&mut self, callback: F)
    where
        F: FnMut(&CursorStateChangedEvent) + Send + 'static,
    {
        let callback: CursorChangeCallback = Box::new(callback);
        self.listeners.subscribe(callback);
    }

    /// Subscribe to content changes of the model.
    pub fn on_did_change_content<F>(&mut self, callback: F)
    where
        F: FnMut(&crate::ModelContentChangedEvent) + Send + 'static,
    {
        self.model.on_did_change_content(callback);
    }

    // ---- commands ----

    /// Run one command.
    ///
    /// `source` is reported in cursor events. Text typed from [`KEYBOARD_SOURCE`] goes through
    /// auto-closing, auto-indent and the other typing interceptors; text from any other source
    /// is inserted verbatim.
    ///
    /// Out-of-range positions are clamped. Mutating commands on a read-only model return
    /// [`CommandResult::ReadOnly`] and change nothing.
    pub fn trigger(&mut self, source: &str, command: Command) -> Result<CommandResult, CommandError> {
        trace!(command = command.name(), source, cursors = self.cursors.len(), "trigger");

        let keeps_column_select = matches!(
            command,
            Command::Cursor(
                CursorCommand::ColumnSelect { .. }
                    | CursorCommand::ColumnSelectLeft
                    | CursorCommand::ColumnSelectRight
                    | CursorCommand::ColumnSelectUp
                    | CursorCommand::ColumnSelectDown
            )
        );
        if !keeps_column_select {
            self.column_select = None;
        }

        if command.is_mutating() && self.model.is_read_only() {
            debug!(command = command.name(), "read-only model rejected command");
            return Ok(CommandResult::ReadOnly);
        }

        match command {
            Command::Edit(edit) => self.execute_edit_command(source, edit)?,
            Command::Cursor(cursor) => self.execute_cursor_command(source, cursor)?,
        }
        Ok(CommandResult::Success)
    }

    fn execute_edit_command(&mut self, source: &str, command: EditCommand) -> Result<(), CommandError> {
        let language = self.language();
        let selections = self.selections();

        match command {
            EditCommand::Type { text } => {
                let text = normalize_newlines(&text);
                if source == KEYBOARD_SOURCE && self.composition.is_none() {
                    for ch in text.chars() {
                        let selections = self.selections();
                        let result = typing::type_with_interceptors(
                            &self.context(language.as_deref()),
                            &selections,
                            ch,
                            self.prev_edit,
                        );
                        self.apply_edit_result(source, result, CursorChangeReason::NotSet)?;
                    }
                } else {
                    let result = typing::type_without_interceptors(&selections, &text, self.prev_edit);
                    self.apply_edit_result(source, result, CursorChangeReason::NotSet)?;
                }
            }
            EditCommand::ReplacePreviousChar {
                text,
                replace_char_count,
            } => {
                let text = normalize_newlines(&text);
                let result =
                    typing::replace_previous_char(&selections, &text, replace_char_count, self.prev_edit);
                self.apply_edit_result(source, result, CursorChangeReason::NotSet)?;
            }
            EditCommand::CompositionStart => {
                self.composition = Some(selections);
            }
            EditCommand::CompositionEnd => {
                let Some(started) = self.composition.take() else {
                    return Ok(());
                };
                if source != KEYBOARD_SOURCE || self.model.is_read_only() {
                    return Ok(());
                }
                let result =
                    typing::composition_end(&self.context(language.as_deref()), &started, &selections);
                if let Some(result) = result {
                    self.apply_edit_result(source, result, CursorChangeReason::NotSet)?;
                }
            }
            EditCommand::Paste {
                text,
                paste_on_new_line,
                multicursor_text,
            } => {
                let result = clipboard::paste(
                    &self.context(language.as_deref()),
                    &selections,
                    &text,
                    paste_on_new_line,
                    multicursor_text.as_deref(),
                );
                self.apply_edit_result(source, result, CursorChangeReason::Paste)?;
            }
            EditCommand::Undo => self.undo_redo(source, true),
            EditCommand::Redo => self.undo_redo(source, false),
            EditCommand::EndUndoGroup => self.push_undo_stop(),
            command => {
                let ctx = self.context(language.as_deref());
                let result = match command {
                    EditCommand::Cut => clipboard::cut(&ctx, &selections),
                    EditCommand::DeleteLeft => deleting::delete_left(&ctx, &selections, self.prev_edit),
                    EditCommand::DeleteRight => deleting::delete_right(&ctx, &selections, self.prev_edit),
                    EditCommand::DeleteWordLeft => deleting::delete_word_left(&ctx, &selections),
                    EditCommand::DeleteWordRight => deleting::delete_word_right(&ctx, &selections),
                    EditCommand::Tab => indent::tab(&ctx, &selections),
                    EditCommand::Indent => indent::shift(&ctx, &selections, false),
                    EditCommand::Outdent => indent::shift(&ctx, &selections, true),
                    EditCommand::LineInsertBefore => indent::line_insert(&ctx, &selections, true),
                    EditCommand::LineInsertAfter => indent::line_insert(&ctx, &selections, false),
                    _ => return Ok(()),
                };
                self.apply_edit_result(source, result, CursorChangeReason::NotSet)?;
            }
        }
        Ok(())
    }

    fn execute_cursor_command(&mut self, source: &str, command: CursorCommand) -> Result<(), CommandError> {
        self.push_undo_stop();

        let language = self.language();
        let ctx = self.context(language.as_deref());
        let primary = self.cursors[0];
        let mut reason = CursorChangeReason::NotSet;
        let mut column_select = None;

        let moved: Vec<MovedCursor> = match &command {
            CursorCommand::MoveTo { position, select } => {
                let target = self.model.validate_position(*position);
                let selection = if *select {
                    Selection::from_positions(primary.selection.anchor, target)
                } else {
                    Selection::caret(target)
                };
                vec![MovedCursor::new(selection)]
            }
            CursorCommand::SelectAll => vec![MovedCursor::new(movement::select_all(&ctx))],
            CursorCommand::ExpandLineSelection => self
                .cursors
                .iter()
                .map(|c| MovedCursor::new(movement::expand_line_selection(&ctx, c.selection)))
                .collect(),
            CursorCommand::CancelSelection => {
                vec![MovedCursor::new(Selection::caret(primary.selection.active))]
            }
            CursorCommand::RemoveSecondaryCursors => vec![MovedCursor {
                selection: primary.selection,
                desired_x: primary.desired_x,
            }],
            CursorCommand::AddCursorAbove | CursorCommand::AddCursorBelow => {
                let up = matches!(command, CursorCommand::AddCursorAbove);
                let view = ViewLines::new(&self.model, self.wrap.as_ref());
                let selections = self.selections();
                let mut moved = self.moved_cursors();
                if let Some(added) = movement::add_cursor_vertically(&view, &selections, up) {
                    moved.push(MovedCursor::new(added));
                }
                moved
            }
            CursorCommand::SetSelections { selections } => {
                if selections.is_empty() {
                    return Err(CommandError::EmptySelections);
                }
                reason = CursorChangeReason::Explicit;
                selections.iter().copied().map(MovedCursor::new).collect()
            }
            CursorCommand::ColumnSelect {
                position,
                mouse_column,
            } => {
                let target = self.model.validate_position(*position);
                let mut data = self
                    .column_select
                    .unwrap_or_else(|| ColumnSelectData::from_selection(&ctx, primary.selection));
                data.active_line = target.line;
                data.active_x = mouse_column.saturating_sub(1);
                column_select = Some(data);
                data.selections(&ctx).into_iter().map(MovedCursor::new).collect()
            }
            CursorCommand::ColumnSelectLeft
            | CursorCommand::ColumnSelectRight
            | CursorCommand::ColumnSelectUp
            | CursorCommand::ColumnSelectDown => {
                let data = self
                    .column_select
                    .unwrap_or_else(|| ColumnSelectData::from_selection(&ctx, primary.selection))
                    .step(&ctx, &command);
                column_select = Some(data);
                data.selections(&ctx).into_iter().map(MovedCursor::new).collect()
            }
            motion_command => {
                let Some((motion, select)) = Motion::from_command(motion_command, self.config.page_size)
                else {
                    return Ok(());
                };
                let view = ViewLines::new(&self.model, self.wrap.as_ref());
                self.moved_cursors()
                    .into_iter()
                    .map(|cursor| movement::move_cursor(&ctx, &view, cursor, motion, select))
                    .collect()
            }
        };

        if column_select.is_some() {
            self.column_select = column_select;
        }
        self.set_cursor_state(source, reason, moved);
        Ok(())
    }

    fn undo_redo(&mut self, source: &str, undo: bool) {
        self.prev_edit = EditKind::Other;
        let restored = if undo {
            self.model.undo()
        } else {
            self.model.redo()
        };
        let Some(selections) = restored else {
            return;
        };

        let selections = if selections.is_empty() {
            self.recovered_selections()
        } else {
            selections
        };
        let reason = if undo {
            CursorChangeReason::Undo
        } else {
            CursorChangeReason::Redo
        };
        self.set_cursor_state(source, reason, selections.into_iter().map(MovedCursor::new).collect());
    }

    /// Close the open undo element: the next edit starts a new one.
    pub fn push_undo_stop(&mut self) {
        self.model.push_stack_element();
        self.prev_edit = EditKind::Other;
    }

    // ---- host edits ----

    /// Apply `edits` as one undo element.
    ///
    /// With `end_selections` the cursors end up there; without, they follow the text from
    /// their tracked ranges. Returns `Ok(false)` on a read-only model.
    pub fn execute_edits(
        &mut self,
        source: &str,
        edits: Vec<EditOperation>,
        end_selections: Option<Vec<Selection>>,
    ) -> Result<bool, CommandError> {
        if self.model.is_read_only() {
            debug!(source, "read-only model rejected host edits");
            return Ok(false);
        }
        if end_selections.as_ref().is_some_and(Vec::is_empty) {
            return Err(CommandError::EmptySelections);
        }

        let before = self.selections();
        self.model.push_stack_element();
        let computer = |_: &TextModel, _: &[EditOperation]| end_selections.clone();
        let after = self.model.push_edit_operations(&before, &edits, &computer)?;
        self.push_undo_stop();

        let (selections, reason) = match after {
            Some(selections) => (selections, CursorChangeReason::NotSet),
            None => (self.recovered_selections(), CursorChangeReason::RecoverFromMarkers),
        };
        self.set_cursor_state(source, reason, selections.into_iter().map(MovedCursor::new).collect());
        Ok(true)
    }

    /// Apply `edits` without recording them for undo; cursors follow the text.
    pub fn apply_model_edits(&mut self, edits: &[EditOperation]) -> Result<(), CommandError> {
        self.model.apply_edits(edits)?;
        let selections = self.recovered_selections();
        self.set_cursor_state(
            "model",
            CursorChangeReason::RecoverFromMarkers,
            selections.into_iter().map(MovedCursor::new).collect(),
        );
        Ok(())
    }

    /// Replace the whole content; cursors collapse to (1, 1).
    pub fn set_value(&mut self, text: &str) {
        self.model.set_value(text);
        self.prev_edit = EditKind::Other;
        self.composition = None;
        self.column_select = None;
        self.set_cursor_state(
            "model",
            CursorChangeReason::ContentFlush,
            vec![MovedCursor::new(Selection::caret(Position::new(1, 1)))],
        );
    }

    /// Change the line ending used when reading the text back.
    pub fn set_eol(&mut self, eol: LineEnding) {
        self.model.set_eol(eol);
    }

    /// Make the model read-only (or writable again).
    pub fn set_read_only(&mut self, read_only: bool) {
        self.model.set_read_only(read_only);
    }

    // ---- saved state ----

    /// Serialize the selections.
    pub fn save_state(&self) -> String {
        saved_state::to_json(&self.selections())
    }

    /// Restore selections saved with [`CursorController::save_state`], clamped to the current
    /// text.
    pub fn restore_state(&mut self, json: &str) -> Result<(), StateError> {
        let selections = saved_state::from_json(json)?;
        self.set_cursor_state(
            "restoreState",
            CursorChangeReason::NotSet,
            selections.into_iter().map(MovedCursor::new).collect(),
        );
        Ok(())
    }

    // ---- internals ----

    fn language(&self) -> Option<Arc<LanguageConfiguration>> {
        self.languages
            .as_ref()
            .and_then(|provider| provider.configuration(self.model.language_id()))
    }

    fn context<'a>(&'a self, language: Option<&'a LanguageConfiguration>) -> OpContext<'a> {
        OpContext {
            model: &self.model,
            config: &self.config,
            language,
            tokenizer: self.tokenizer.as_ref(),
        }
    }

    fn moved_cursors(&self) -> Vec<MovedCursor> {
        self.cursors
            .iter()
            .map(|c| MovedCursor {
                selection: c.selection,
                desired_x: c.desired_x,
            })
            .collect()
    }

    /// Selections read back from the cursors' tracked ranges. Carets stay carets.
    fn recovered_selections(&self) -> Vec<Selection> {
        self.cursors
            .iter()
            .map(|cursor| match self.model.tracked_range(cursor.marker) {
                Some(range) if cursor.selection.is_empty() => Selection::caret(range.end()),
                Some(range) => Selection::from_range(range, cursor.selection.direction()),
                None => {
                    warn!(selection = %cursor.selection, "cursor marker missing, clamping selection");
                    self.model.validate_selection(cursor.selection)
                }
            })
            .collect()
    }

    /// Push an edit handler's result and adopt the selections it produces.
    fn apply_edit_result(
        &mut self,
        source: &str,
        result: EditResult,
        reason: CursorChangeReason,
    ) -> Result<(), CommandError> {
        let before = self.selections();
        let mut builder = EditOperationBuilder::new();
        for (cursor, edit) in self.cursors.iter().zip(result.cursors) {
            builder.add_cursor(cursor.selection, Some(cursor.marker), edit);
        }
        if builder.has_no_edits() {
            return Ok(());
        }

        if result.push_before {
            self.model.push_stack_element();
        }
        let built = builder.build();
        let after = self.model.push_edits(&before, built.edits, &built.computer)?;
        if result.push_after {
            self.model.push_stack_element();
        }
        self.prev_edit = result.kind;

        let selections = match after {
            Some(selections) if !selections.is_empty() => selections,
            _ => self.recovered_selections(),
        };
        self.set_cursor_state(source, reason, selections.into_iter().map(MovedCursor::new).collect());
        Ok(())
    }

    /// Adopt new cursors: clamp, merge overlaps, re-aim the tracked ranges and notify.
    fn set_cursor_state(&mut self, source: &str, reason: CursorChangeReason, moved: Vec<MovedCursor>) {
        if moved.is_empty() {
            return;
        }
        let old_selections = self.selections();

        let mut moved: Vec<MovedCursor> = moved
            .into_iter()
            .map(|m| MovedCursor {
                selection: self.model.validate_selection(m.selection),
                desired_x: m.desired_x,
            })
            .collect();
        if self.config.multi_cursor_merge_overlapping && moved.len() > 1 {
            let selections: Vec<Selection> = moved.iter().map(|m| m.selection).collect();
            moved = merge_overlapping_indexed(&selections)
                .into_iter()
                .map(|(index, selection)| MovedCursor {
                    selection,
                    desired_x: moved[index].desired_x,
                })
                .collect();
        }

        let mut markers: Vec<TrackedRangeId> = self.cursors.drain(..).map(|c| c.marker).collect();
        let surplus = markers.split_off(markers.len().min(moved.len()));
        for marker in surplus {
            self.model.untrack_range(marker);
        }

        let mut cursors = Vec::with_capacity(moved.len());
        for (index, m) in moved.into_iter().enumerate() {
            let range = m.selection.range();
            let marker = match markers.get(index) {
                Some(&id) if self.model.set_tracked_range(id, range) => id,
                _ => self.model.track_range(range, CURSOR_STICKINESS),
            };
            cursors.push(Cursor {
                selection: m.selection,
                marker,
                desired_x: m.desired_x,
            });
        }
        self.cursors = cursors;

        let selections = self.selections();
        if selections != old_selections || reason == CursorChangeReason::ContentFlush {
            self.listeners.emit(&CursorStateChangedEvent {
                selections,
                old_selections,
                reason,
                source: source.to_string(),
            });
        }
    }
}
