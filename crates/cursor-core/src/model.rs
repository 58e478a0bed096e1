//! Text model.
//!
//! [`TextModel`] owns the document text (LF-normalized, stored in a rope), its line ending,
//! its options, the undo/redo stack and the tracked ranges that follow the text through edits.
//! All mutations go through edit-operation batches:
//!
//! - [`TextModel::apply_edits`] applies a batch and returns its inverse, without touching the
//!   undo stack.
//! - [`TextModel::push_edit_operations`] applies a batch, records it on the undo stack together
//!   with the selections before and after, and asks a [`CursorStateComputer`] for the
//!   selections to publish.
//!
//! # Example
//!
//! ```rust
//! use cursor_core::{EditOperation, EndOfLinePreference, Position, Selection, TextModel};
//!
//! let mut model = TextModel::new("ab");
//! let before = [Selection::caret(Position::new(1, 1))];
//! model
//!     .push_edit_operations(&before, &[EditOperation::insert(Position::new(1, 1), "x")], &|_: &TextModel, _: &[EditOperation]| {
//!         Some(vec![Selection::caret(Position::new(1, 2))])
//!     })
//!     .unwrap();
//! assert_eq!(model.get_value(EndOfLinePreference::TextDefined), "xab");
//!
//! assert_eq!(model.undo(), Some(before.to_vec()));
//! assert_eq!(model.get_value(EndOfLinePreference::TextDefined), "ab");
//! ```

use tracing::{debug, warn};

use crate::events::{ContentChangeCallback, Listeners};
use crate::line_ending::normalize_newlines;
use crate::tracked::TrackedRanges;
use crate::undo::{StackElement, UndoRedoManager};
use crate::{
    ContentChange, EditOperation, LineEnding, LineIndex, ModelContentChangedEvent, ModelError,
    Position, Range, Selection, TextModelOptions, TrackedRangeId, TrackedRangeStickiness, columns,
};

/// Line ending to use when reading text back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndOfLinePreference {
    /// The model's own line ending.
    #[default]
    TextDefined,
    /// `"\n"`.
    Lf,
    /// `"\r\n"`.
    Crlf,
}

/// Computes the selections to publish after an edit batch.
///
/// `inverse_ops` has one entry per submitted operation, in submission order; each one covers
/// the text its operation inserted, in post-edit coordinates.
pub trait CursorStateComputer {
    /// Return the new selections, or `None` to leave the decision to the caller.
    fn compute_cursor_state(
        &self,
        model: &TextModel,
        inverse_ops: &[EditOperation],
    ) -> Option<Vec<Selection>>;
}

impl<F> CursorStateComputer for F
where
    F: Fn(&TextModel, &[EditOperation]) -> Option<Vec<Selection>>,
{
    fn compute_cursor_state(
        &self,
        model: &TextModel,
        inverse_ops: &[EditOperation],
    ) -> Option<Vec<Selection>> {
        self(model, inverse_ops)
    }
}

/// An edit operation plus whether it only inserts indentation whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelEdit {
    pub(crate) op: EditOperation,
    pub(crate) auto_whitespace: bool,
}

impl ModelEdit {
    pub(crate) fn plain(op: EditOperation) -> Self {
        Self {
            op,
            auto_whitespace: false,
        }
    }
}

#[derive(Debug)]
struct PreparedEdit {
    index: usize,
    range: Range,
    start: usize,
    end: usize,
    text: String,
    text_len: usize,
    force_move_markers: bool,
    auto_whitespace: bool,
}

impl PreparedEdit {
    fn is_noop(&self) -> bool {
        self.start == self.end && self.text_len == 0
    }
}

/// The document: text, line ending, options, undo stack and tracked ranges.
#[derive(Debug)]
pub struct TextModel {
    lines: LineIndex,
    eol: LineEnding,
    options: TextModelOptions,
    language_id: String,
    version_id: u64,
    alternative_version_id: u64,
    read_only: bool,
    undo: UndoRedoManager,
    tracked: TrackedRanges,
    trim_auto_whitespace_lines: Option<Vec<usize>>,
    listeners: Listeners<ModelContentChangedEvent>,
}

impl TextModel {
    /// Create a model with default options.
    pub fn new(text: &str) -> Self {
        Self::with_options(text, TextModelOptions::default(), "plaintext")
    }

    /// Create a model with explicit options and language.
    pub fn with_options(
        text: &str,
        options: TextModelOptions,
        language_id: impl Into<String>,
    ) -> Self {
        let eol = LineEnding::detect_in_text(text, options.default_eol);
        Self {
            lines: LineIndex::from_text(&normalize_newlines(text)),
            eol,
            undo: UndoRedoManager::new(options.max_undo_elements),
            options,
            language_id: language_id.into(),
            version_id: 1,
            alternative_version_id: 1,
            read_only: false,
            tracked: TrackedRanges::default(),
            trim_auto_whitespace_lines: None,
            listeners: Listeners::default(),
        }
    }

    /// Subscribe to content changes.
    pub fn on_did_change_content<F>(&mut self, callback: F)
    where
        F: FnMut(&ModelContentChangedEvent) + Send + 'static,
    {
        let callback: ContentChangeCallback = Box::new(callback);
        self.listeners.subscribe(callback);
    }

    // ---- options & metadata ----

    /// Model options.
    pub fn options(&self) -> &TextModelOptions {
        &self.options
    }

    /// Replace the model options. The undo limit applies to future pushes.
    pub fn update_options(&mut self, options: TextModelOptions) {
        self.undo.set_max_undo(options.max_undo_elements);
        self.options = options;
    }

    /// Language id used to look up the language configuration.
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Change the language id.
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.language_id = language_id.into();
    }

    /// Returns `true` if mutating calls are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Make the model read-only (or writable again).
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Version id, incremented on every mutation.
    pub fn version_id(&self) -> u64 {
        self.version_id
    }

    /// Version id that returns to an earlier value when undo/redo return to an earlier state.
    pub fn alternative_version_id(&self) -> u64 {
        self.alternative_version_id
    }

    /// The document's line ending.
    pub fn eol(&self) -> LineEnding {
        self.eol
    }

    /// Change the document's line ending.
    pub fn set_eol(&mut self, eol: LineEnding) {
        if self.eol == eol {
            return;
        }
        self.eol = eol;
        self.bump_version();
        self.emit(Vec::new(), false, false, false);
    }

    // ---- queries ----

    /// Number of lines; an empty document has one.
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Content of `line` (1-based, clamped) without its line ending.
    pub fn line_content(&self, line: usize) -> String {
        self.lines.line_text(self.clamp_line(line) - 1)
    }

    /// Length of `line` in chars.
    pub fn line_length(&self, line: usize) -> usize {
        self.lines.line_len(self.clamp_line(line) - 1)
    }

    /// The column after the last character of `line`.
    pub fn line_max_column(&self, line: usize) -> usize {
        self.line_length(line) + 1
    }

    /// Column of the first non-whitespace char of `line`, or 0 for a blank line.
    pub fn line_first_non_whitespace_column(&self, line: usize) -> usize {
        columns::first_non_whitespace_index(&self.line_content(line)).map_or(0, |i| i + 1)
    }

    /// Column after the last non-whitespace char of `line`, or 0 for a blank line.
    pub fn line_last_non_whitespace_column(&self, line: usize) -> usize {
        columns::last_non_whitespace_index(&self.line_content(line)).map_or(0, |i| i + 2)
    }

    /// Total length in chars (line breaks count as one).
    pub fn char_count(&self) -> usize {
        self.lines.char_count()
    }

    /// The position after the last character.
    pub fn full_range(&self) -> Range {
        let last = self.line_count();
        Range::from_coords(1, 1, last, self.line_max_column(last))
    }

    /// Clamp `pos` into the document.
    pub fn validate_position(&self, pos: Position) -> Position {
        if pos.line < 1 {
            return Position::new(1, 1);
        }
        let line_count = self.line_count();
        if pos.line > line_count {
            return Position::new(line_count, self.line_max_column(line_count));
        }
        let max_column = self.line_max_column(pos.line);
        Position::new(pos.line, pos.column.clamp(1, max_column))
    }

    /// Clamp both ends of `range` into the document.
    pub fn validate_range(&self, range: Range) -> Range {
        Range::new(
            self.validate_position(range.start()),
            self.validate_position(range.end()),
        )
    }

    /// Clamp both ends of `selection` into the document, keeping its direction.
    pub fn validate_selection(&self, selection: Selection) -> Selection {
        Selection::from_positions(
            self.validate_position(selection.anchor),
            self.validate_position(selection.active),
        )
    }

    /// Char offset of `pos` (clamped).
    pub fn offset_at(&self, pos: Position) -> usize {
        let pos = self.validate_position(pos);
        self.lines.position_to_char_offset(pos.line - 1, pos.column - 1)
    }

    /// Position of the char offset `offset` (clamped).
    pub fn position_at(&self, offset: usize) -> Position {
        let (line, column) = self.lines.char_offset_to_position(offset);
        Position::new(line + 1, column + 1)
    }

    /// The whole text.
    pub fn get_value(&self, eol: EndOfLinePreference) -> String {
        self.resolve_eol(eol).apply_to_text(&self.lines.text())
    }

    /// The text inside `range` (clamped).
    pub fn get_value_in_range(&self, range: Range, eol: EndOfLinePreference) -> String {
        let range = self.validate_range(range);
        let text = self
            .lines
            .slice(self.offset_at(range.start()), self.offset_at(range.end()));
        self.resolve_eol(eol).apply_to_text(&text)
    }

    fn resolve_eol(&self, eol: EndOfLinePreference) -> LineEnding {
        match eol {
            EndOfLinePreference::TextDefined => self.eol,
            EndOfLinePreference::Lf => LineEnding::Lf,
            EndOfLinePreference::Crlf => LineEnding::Crlf,
        }
    }

    fn clamp_line(&self, line: usize) -> usize {
        line.clamp(1, self.line_count())
    }

    // ---- tracked ranges ----

    /// Start tracking `range` through future edits.
    pub fn track_range(
        &mut self,
        range: Range,
        stickiness: TrackedRangeStickiness,
    ) -> TrackedRangeId {
        let range = self.validate_range(range);
        self.tracked.add(
            self.offset_at(range.start()),
            self.offset_at(range.end()),
            stickiness,
        )
    }

    /// Current range of a tracked range.
    pub fn tracked_range(&self, id: TrackedRangeId) -> Option<Range> {
        self.tracked
            .get(id)
            .map(|(start, end)| Range::new(self.position_at(start), self.position_at(end)))
    }

    /// Move a tracked range. Returns `false` if `id` is unknown.
    pub fn set_tracked_range(&mut self, id: TrackedRangeId, range: Range) -> bool {
        let range = self.validate_range(range);
        let (start, end) = (self.offset_at(range.start()), self.offset_at(range.end()));
        self.tracked.set(id, start, end)
    }

    /// Stop tracking a range. Returns `false` if `id` is unknown.
    pub fn untrack_range(&mut self, id: TrackedRangeId) -> bool {
        self.tracked.remove(id)
    }

    /// Number of live tracked ranges.
    pub fn tracked_range_count(&self) -> usize {
        self.tracked.len()
    }

    // ---- mutation ----

    /// Replace the whole content. Clears the undo stack.
    pub fn set_value(&mut self, text: &str) {
        let old_range = self.full_range();
        let old_len = self.char_count();
        let normalized = normalize_newlines(text);

        self.eol = LineEnding::detect_in_text(text, self.options.default_eol);
        self.lines = LineIndex::from_text(&normalized);
        self.undo.clear();
        self.tracked.clamp_to(0);
        self.trim_auto_whitespace_lines = None;
        self.bump_version();

        let change = ContentChange {
            range: old_range,
            range_offset: 0,
            range_length: old_len,
            text: normalized,
        };
        self.emit(vec![change], false, false, true);
    }

    /// Apply a batch without recording it for undo. Returns the inverse operations in
    /// submission order.
    pub fn apply_edits(&mut self, ops: &[EditOperation]) -> Result<Vec<EditOperation>, ModelError> {
        if self.read_only {
            debug!(ops = ops.len(), "read-only model rejected edits");
            return Ok(Vec::new());
        }
        let edits: Vec<ModelEdit> = ops.iter().cloned().map(ModelEdit::plain).collect();
        let prepared = self.prepare(&edits)?;
        Ok(self.apply_prepared(prepared, false, false))
    }

    /// Apply a batch, record it on the undo stack and compute the selections to publish.
    ///
    /// Returns `Ok(None)` when the model is read-only (nothing is applied) or when the
    /// computer returns `None`.
    pub fn push_edit_operations<C>(
        &mut self,
        before_selections: &[Selection],
        ops: &[EditOperation],
        computer: &C,
    ) -> Result<Option<Vec<Selection>>, ModelError>
    where
        C: CursorStateComputer + ?Sized,
    {
        let edits = ops.iter().cloned().map(ModelEdit::plain).collect();
        self.push_edits(before_selections, edits, computer)
    }

    pub(crate) fn push_edits<C>(
        &mut self,
        before_selections: &[Selection],
        mut edits: Vec<ModelEdit>,
        computer: &C,
    ) -> Result<Option<Vec<Selection>>, ModelError>
    where
        C: CursorStateComputer + ?Sized,
    {
        if self.read_only {
            debug!(ops = edits.len(), "read-only model rejected edits");
            return Ok(None);
        }

        self.append_auto_whitespace_trims(before_selections, &mut edits);
        let prepared = self.prepare(&edits)?;
        if prepared.iter().all(PreparedEdit::is_noop) {
            let mut inverse: Vec<(usize, EditOperation)> = prepared
                .iter()
                .map(|e| (e.index, EditOperation::insert(e.range.start(), "")))
                .collect();
            inverse.sort_by_key(|(index, _)| *index);
            let inverse: Vec<EditOperation> = inverse.into_iter().map(|(_, op)| op).collect();
            return Ok(computer.compute_cursor_state(self, &inverse));
        }

        let before_version = self.alternative_version_id;
        let inverse = self.apply_prepared(prepared, false, false);
        self.undo.push_batch(
            before_selections,
            inverse.clone(),
            before_version,
            self.alternative_version_id,
        );

        let after = computer.compute_cursor_state(self, &inverse);
        if let Some(selections) = &after {
            self.undo.set_after_selections(selections);
        }
        Ok(after)
    }

    /// Close the open undo element so the next batch starts a new one.
    pub fn push_stack_element(&mut self) {
        self.undo.close();
    }

    /// Returns `true` if there is something to undo.
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Returns `true` if there is something to redo.
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Returns `true` if the content matches the last [`TextModel::mark_clean`] point.
    pub fn is_clean(&self) -> bool {
        self.undo.is_clean()
    }

    /// Remember the current undo position as the saved state.
    pub fn mark_clean(&mut self) {
        self.undo.mark_clean();
    }

    /// The most recent undo element, if any.
    pub fn last_stack_element(&self) -> Option<&StackElement> {
        self.undo.last_undo()
    }

    /// Revert the last undo element. Returns the selections recorded before it, or `None` if
    /// nothing was undone.
    pub fn undo(&mut self) -> Option<Vec<Selection>> {
        if self.read_only {
            debug!("read-only model rejected undo");
            return None;
        }
        let Some(element) = self.undo.pop_undo() else {
            debug!("nothing to undo");
            return None;
        };

        let batches = self.revert_batches(&element.batches, true);
        self.alternative_version_id = element.before_version_id;
        let selections = element.before_selections.clone();
        self.undo.push_redo(StackElement { batches, ..element });
        Some(selections)
    }

    /// Re-apply the last undone element. Returns the selections recorded after it, or `None`
    /// if nothing was redone.
    pub fn redo(&mut self) -> Option<Vec<Selection>> {
        if self.read_only {
            debug!("read-only model rejected redo");
            return None;
        }
        let Some(element) = self.undo.pop_redo() else {
            debug!("nothing to redo");
            return None;
        };

        let batches = self.revert_batches(&element.batches, false);
        self.alternative_version_id = element.after_version_id;
        let selections = element.after_selections.clone();
        self.undo.push_undo(StackElement { batches, ..element });
        Some(selections)
    }

    /// Apply `batches` from last to first; return the inverse batches in application order.
    fn revert_batches(&mut self, batches: &[Vec<EditOperation>], undoing: bool) -> Vec<Vec<EditOperation>> {
        let mut reverted = Vec::with_capacity(batches.len());
        for batch in batches.iter().rev() {
            let edits: Vec<ModelEdit> = batch.iter().cloned().map(ModelEdit::plain).collect();
            match self.prepare(&edits) {
                Ok(prepared) => reverted.push(self.apply_prepared(prepared, undoing, !undoing)),
                Err(err) => {
                    warn!(%err, "dropping corrupt undo batch");
                    reverted.push(Vec::new());
                }
            }
        }
        reverted
    }

    fn append_auto_whitespace_trims(&mut self, before_selections: &[Selection], edits: &mut Vec<ModelEdit>) {
        let Some(trim_lines) = self.trim_auto_whitespace_lines.take() else {
            return;
        };
        if !self.options.trim_auto_whitespace {
            return;
        }

        let incoming: Vec<(Range, &str)> = edits
            .iter()
            .map(|e| (self.validate_range(e.op.range), e.op.text_str()))
            .collect();

        let near_cursors = before_selections.iter().all(|sel| {
            incoming.iter().any(|(range, _)| {
                range.start().line <= sel.end().line && sel.start().line <= range.end().line
            })
        });
        if !near_cursors {
            return;
        }

        let mut trims = Vec::new();
        for line in trim_lines {
            if line > self.line_count() {
                continue;
            }
            let content = self.line_content(line);
            if content.is_empty() || !columns::is_whitespace_only(&content) {
                continue;
            }
            let max_column = content.chars().count() + 1;

            let blocked = incoming.iter().any(|(range, text)| {
                if line < range.start().line || line > range.end().line {
                    return false;
                }
                let at_start_line = range.is_empty() && range.start().line == line;
                let breaks_after = at_start_line
                    && range.start().column == max_column
                    && text.starts_with('\n');
                let breaks_before =
                    at_start_line && range.start().column == 1 && text.ends_with('\n');
                !(breaks_after || breaks_before)
            });
            if !blocked {
                trims.push(ModelEdit::plain(EditOperation::delete(Range::from_coords(
                    line, 1, line, max_column,
                ))));
            }
        }
        edits.extend(trims);
    }

    /// Validate ranges, normalize text and sort the batch; reject overlapping ranges.
    fn prepare(&self, edits: &[ModelEdit]) -> Result<Vec<PreparedEdit>, ModelError> {
        let mut prepared: Vec<PreparedEdit> = edits
            .iter()
            .enumerate()
            .map(|(index, edit)| {
                let range = self.validate_range(edit.op.range);
                let text = normalize_newlines(edit.op.text_str());
                PreparedEdit {
                    index,
                    range,
                    start: self.offset_at(range.start()),
                    end: self.offset_at(range.end()),
                    text_len: text.chars().count(),
                    text,
                    force_move_markers: edit.op.force_move_markers,
                    auto_whitespace: edit.auto_whitespace,
                }
            })
            .collect();

        prepared.sort_by(|a, b| (a.start, a.end, a.index).cmp(&(b.start, b.end, b.index)));
        for pair in prepared.windows(2) {
            if pair[0].end > pair[1].start {
                return Err(ModelError::OverlappingRanges {
                    first: pair[0].range,
                    second: pair[1].range,
                });
            }
        }
        Ok(prepared)
    }

    /// Mutate the text. `sorted` must come from [`Self::prepare`].
    fn apply_prepared(
        &mut self,
        sorted: Vec<PreparedEdit>,
        is_undoing: bool,
        is_redoing: bool,
    ) -> Vec<EditOperation> {
        if sorted.is_empty() {
            return Vec::new();
        }
        let changes_text = !sorted.iter().all(PreparedEdit::is_noop);

        let deleted: Vec<String> = sorted
            .iter()
            .map(|e| self.lines.slice(e.start, e.end))
            .collect();

        let mut new_starts = Vec::with_capacity(sorted.len());
        let mut delta: isize = 0;
        for e in &sorted {
            new_starts.push((e.start as isize + delta) as usize);
            delta += e.text_len as isize - (e.end - e.start) as isize;
        }

        let mut changes = Vec::with_capacity(sorted.len());
        for e in sorted.iter().rev() {
            if e.is_noop() {
                continue;
            }
            self.lines.delete(e.start, e.end - e.start);
            self.lines.insert(e.start, &e.text);
            self.tracked
                .accept_edit(e.start, e.end, e.text_len, e.force_move_markers);
            changes.push(ContentChange {
                range: e.range,
                range_offset: e.start,
                range_length: e.end - e.start,
                text: e.text.clone(),
            });
        }

        let mut inverse: Vec<(usize, EditOperation)> = Vec::with_capacity(sorted.len());
        let mut auto_whitespace_lines = Vec::new();
        for ((e, new_start), old_text) in sorted.iter().zip(&new_starts).zip(deleted) {
            let start = self.position_at(*new_start);
            let end = self.position_at(new_start + e.text_len);
            if e.auto_whitespace {
                for line in start.line..=end.line {
                    let content = self.line_content(line);
                    if !content.is_empty() && columns::is_whitespace_only(&content) {
                        auto_whitespace_lines.push(line);
                    }
                }
            }
            inverse.push((
                e.index,
                EditOperation {
                    range: Range::new(start, end),
                    text: Some(old_text),
                    force_move_markers: e.force_move_markers,
                },
            ));
        }
        inverse.sort_by_key(|(index, _)| *index);

        self.trim_auto_whitespace_lines =
            (!auto_whitespace_lines.is_empty()).then_some(auto_whitespace_lines);
        if changes_text {
            self.bump_version();
            self.emit(changes, is_undoing, is_redoing, false);
        }

        inverse.into_iter().map(|(_, op)| op).collect()
    }

    fn bump_version(&mut self) {
        self.version_id += 1;
        self.alternative_version_id = self.version_id;
    }

    fn emit(&mut self, changes: Vec<ContentChange>, is_undoing: bool, is_redoing: bool, is_flush: bool) {
        let event = ModelContentChangedEvent {
            changes,
            eol: self.eol,
            version_id: self.version_id,
            is_undoing,
            is_redoing,
            is_flush,
        };
        self.listeners.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn no_cursor(_: &TextModel, _: &[EditOperation]) -> Option<Vec<Selection>> {
        None
    }

    fn text(model: &TextModel) -> String {
        model.get_value(EndOfLinePreference::Lf)
    }

    #[test]
    fn test_validate_position_clamps() {
        let model = TextModel::new("abc\nde");
        assert_eq!(model.validate_position(Position::new(0, 5)), Position::new(1, 1));
        assert_eq!(model.validate_position(Position::new(1, 0)), Position::new(1, 1));
        assert_eq!(model.validate_position(Position::new(1, 9)), Position::new(1, 4));
        assert_eq!(model.validate_position(Position::new(9, 1)), Position::new(2, 3));
    }

    #[test]
    fn test_crlf_is_normalized_and_restored() {
        let model = TextModel::new("a\r\nb\r\nc");
        assert_eq!(model.eol(), LineEnding::Crlf);
        assert_eq!(model.line_count(), 3);
        assert_eq!(model.get_value(EndOfLinePreference::TextDefined), "a\r\nb\r\nc");
        assert_eq!(text(&model), "a\nb\nc");
        assert_eq!(
            model.get_value_in_range(Range::from_coords(1, 1, 2, 2), EndOfLinePreference::TextDefined),
            "a\r\nb"
        );
    }

    #[test]
    fn test_batch_applies_against_original_coordinates() {
        let mut model = TextModel::new("hello world");
        let inverse = model
            .apply_edits(&[
                EditOperation::replace(Range::from_coords(1, 7, 1, 12), "there"),
                EditOperation::insert(Position::new(1, 1), ">> "),
            ])
            .unwrap();
        assert_eq!(text(&model), ">> hello there");
        assert_eq!(inverse[0].range, Range::from_coords(1, 10, 1, 15));
        assert_eq!(inverse[0].text.as_deref(), Some("world"));
        assert_eq!(inverse[1].range, Range::from_coords(1, 1, 1, 4));

        model.apply_edits(&inverse).unwrap();
        assert_eq!(text(&model), "hello world");
    }

    #[test]
    fn test_overlapping_batch_is_rejected_untouched() {
        let mut model = TextModel::new("abcdef");
        let err = model
            .apply_edits(&[
                EditOperation::delete(Range::from_coords(1, 1, 1, 4)),
                EditOperation::delete(Range::from_coords(1, 3, 1, 5)),
            ])
            .unwrap_err();
        assert!(matches!(err, ModelError::OverlappingRanges { .. }));
        assert_eq!(text(&model), "abcdef");
        assert_eq!(model.version_id(), 1);
    }

    #[test]
    fn test_inserts_at_same_position_keep_submission_order() {
        let mut model = TextModel::new("x");
        model
            .apply_edits(&[
                EditOperation::insert(Position::new(1, 1), "a"),
                EditOperation::insert(Position::new(1, 1), "b"),
            ])
            .unwrap();
        assert_eq!(text(&model), "abx");
    }

    #[test]
    fn test_undo_redo_restore_text_and_selections() {
        let mut model = TextModel::new("ab");
        let before = [Selection::caret(Position::new(1, 3))];
        let after = vec![Selection::caret(Position::new(1, 4))];
        let after_clone = after.clone();
        model
            .push_edit_operations(
                &before,
                &[EditOperation::insert(Position::new(1, 3), "c")],
                &move |_: &TextModel, _: &[EditOperation]| Some(after_clone.clone()),
            )
            .unwrap();
        let version_after = model.alternative_version_id();

        assert_eq!(model.undo(), Some(before.to_vec()));
        assert_eq!(text(&model), "ab");
        assert_eq!(model.alternative_version_id(), 1);
        assert!(model.undo().is_none());

        assert_eq!(model.redo(), Some(after));
        assert_eq!(text(&model), "abc");
        assert_eq!(model.alternative_version_id(), version_after);
    }

    #[test]
    fn test_open_element_collects_batches_until_stack_element() {
        let mut model = TextModel::new("");
        for (i, ch) in ["a", "b"].iter().enumerate() {
            model
                .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, i + 1), *ch)], &no_cursor)
                .unwrap();
        }
        model.push_stack_element();
        model
            .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, 3), "c")], &no_cursor)
            .unwrap();

        model.undo();
        assert_eq!(text(&model), "ab");
        model.undo();
        assert_eq!(text(&model), "");
        model.redo();
        assert_eq!(text(&model), "ab");
    }

    #[test]
    fn test_read_only_rejects_everything() {
        let mut model = TextModel::new("abc");
        model
            .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, 1), "x")], &no_cursor)
            .unwrap();
        model.set_read_only(true);

        let result = model
            .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, 1), "y")], &no_cursor)
            .unwrap();
        assert!(result.is_none());
        assert!(model.undo().is_none());
        assert!(model.apply_edits(&[EditOperation::delete(model.full_range())]).unwrap().is_empty());
        assert_eq!(text(&model), "xabc");
    }

    #[test]
    fn test_content_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut model = TextModel::new("abc");
        model.on_did_change_content(move |e| sink.lock().unwrap().push(e.clone()));

        model
            .apply_edits(&[
                EditOperation::insert(Position::new(1, 1), "x"),
                EditOperation::replace(Range::from_coords(1, 2, 1, 3), "Y"),
            ])
            .unwrap();
        model.set_value("new");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        let changes = &events[0].changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].range_offset, 1);
        assert_eq!(changes[0].range_length, 1);
        assert_eq!(changes[1].range_offset, 0);
        assert!(!events[0].is_flush);
        assert!(events[1].is_flush);
        assert_eq!(events[1].version_id, model.version_id());
    }

    #[test]
    fn test_tracked_ranges_follow_edits() {
        let mut model = TextModel::new("hello world");
        let id = model.track_range(
            Range::from_coords(1, 7, 1, 12),
            TrackedRangeStickiness::NeverGrowsWhenTypingAtEdges,
        );
        model
            .apply_edits(&[EditOperation::insert(Position::new(1, 1), "say\n")])
            .unwrap();
        assert_eq!(model.tracked_range(id), Some(Range::from_coords(2, 7, 2, 12)));
        assert!(model.untrack_range(id));
        assert_eq!(model.tracked_range(id), None);
    }

    #[test]
    fn test_auto_whitespace_is_trimmed_by_next_edit_elsewhere() {
        let mut model = TextModel::new("if (a) {");
        let enter = ModelEdit {
            op: EditOperation::insert(Position::new(1, 9), "\n    "),
            auto_whitespace: true,
        };
        model
            .push_edits(&[Selection::caret(Position::new(1, 9))], vec![enter], &no_cursor)
            .unwrap();
        assert_eq!(text(&model), "if (a) {\n    ");
        model.push_stack_element();

        model
            .push_edit_operations(
                &[Selection::caret(Position::new(1, 1))],
                &[EditOperation::insert(Position::new(1, 1), "x")],
                &no_cursor,
            )
            .unwrap();
        assert_eq!(text(&model), "xif (a) {\n");

        model.undo();
        assert_eq!(text(&model), "if (a) {\n    ");
    }

    #[test]
    fn test_auto_whitespace_survives_edit_on_its_line() {
        let mut model = TextModel::new("if (a) {");
        let enter = ModelEdit {
            op: EditOperation::insert(Position::new(1, 9), "\n    "),
            auto_whitespace: true,
        };
        model
            .push_edits(&[Selection::caret(Position::new(1, 9))], vec![enter], &no_cursor)
            .unwrap();
        model
            .push_edit_operations(
                &[Selection::caret(Position::new(2, 5))],
                &[EditOperation::insert(Position::new(2, 5), "y")],
                &no_cursor,
            )
            .unwrap();
        assert_eq!(text(&model), "if (a) {\n    y");
    }

    #[test]
    fn test_max_undo_elements() {
        let options = TextModelOptions {
            max_undo_elements: 2,
            ..TextModelOptions::default()
        };
        let mut model = TextModel::with_options("", options, "plaintext");
        for i in 0..3 {
            model
                .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, i + 1), "z")], &no_cursor)
                .unwrap();
            model.push_stack_element();
        }
        assert!(model.undo().is_some());
        assert!(model.undo().is_some());
        assert!(model.undo().is_none());
        assert_eq!(text(&model), "z");
    }

    #[test]
    fn test_clean_tracking() {
        let mut model = TextModel::new("");
        assert!(model.is_clean());
        model
            .push_edit_operations(&[], &[EditOperation::insert(Position::new(1, 1), "a")], &no_cursor)
            .unwrap();
        assert!(!model.is_clean());
        model.mark_clean();
        assert!(model.is_clean());
        model.undo();
        assert!(!model.is_clean());
        model.redo();
        assert!(model.is_clean());
    }
}
