//! Undo/redo stack.
//!
//! Every call to [`crate::TextModel::push_edit_operations`] contributes one *batch* of inverse
//! edits to the open [`StackElement`]; [`crate::TextModel::push_stack_element`] closes it so
//! the next batch starts a new element. Undo and redo always move whole elements.

use crate::{EditOperation, Selection};

/// One undo unit: the edits to apply to revert it plus the selections on either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackElement {
    /// Selections before the element's first edit. Empty when the caller provided none.
    pub before_selections: Vec<Selection>,
    /// Selections after the element's last edit. Empty when the caller provided none.
    pub after_selections: Vec<Selection>,
    /// Edit batches in application order. Reverting the element applies them from the last
    /// batch to the first.
    pub(crate) batches: Vec<Vec<EditOperation>>,
    pub(crate) before_version_id: u64,
    pub(crate) after_version_id: u64,
}

impl StackElement {
    /// All operations that revert this element, in the order they are applied.
    pub fn inverse_ops(&self) -> impl Iterator<Item = &EditOperation> {
        self.batches.iter().rev().flatten()
    }
}

#[derive(Debug)]
pub(crate) struct UndoRedoManager {
    undo_stack: Vec<StackElement>,
    redo_stack: Vec<StackElement>,
    max_undo: usize,
    /// Clean point tracking. Uses `undo_stack.len()` as the saved position in the linear history.
    /// When `redo_stack` is non-empty, `clean_index` may be greater than `undo_stack.len()`.
    clean_index: Option<usize>,
    open: bool,
}

impl UndoRedoManager {
    pub(crate) fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            clean_index: Some(0),
            open: false,
        }
    }

    pub(crate) fn set_max_undo(&mut self, max_undo: usize) {
        self.max_undo = max_undo.max(1);
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    pub(crate) fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
        self.close();
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
        self.open = false;
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // If clean point is in redo area, it becomes unreachable after clearing redo.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }

    /// Record one batch of inverse edits.
    pub(crate) fn push_batch(
        &mut self,
        before_selections: &[Selection],
        inverse_batch: Vec<EditOperation>,
        before_version_id: u64,
        after_version_id: u64,
    ) {
        self.clear_redo_and_adjust_clean();

        if self.open
            && let Some(element) = self.undo_stack.last_mut()
        {
            element.batches.push(inverse_batch);
            element.after_version_id = after_version_id;
            return;
        }

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(i) => Some(i - 1),
            };
        }

        self.undo_stack.push(StackElement {
            before_selections: before_selections.to_vec(),
            after_selections: Vec::new(),
            batches: vec![inverse_batch],
            before_version_id,
            after_version_id,
        });
        self.open = true;
    }

    /// Set the after-selections of the element that received the last batch.
    pub(crate) fn set_after_selections(&mut self, selections: &[Selection]) {
        if let Some(element) = self.undo_stack.last_mut() {
            element.after_selections = selections.to_vec();
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<StackElement> {
        self.close();
        self.undo_stack.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<StackElement> {
        self.close();
        self.redo_stack.pop()
    }

    pub(crate) fn push_redo(&mut self, element: StackElement) {
        self.redo_stack.push(element);
    }

    /// Put a redone element back on the undo stack without touching the redo stack.
    pub(crate) fn push_undo(&mut self, element: StackElement) {
        self.undo_stack.push(element);
        self.open = false;
    }

    pub(crate) fn last_undo(&self) -> Option<&StackElement> {
        self.undo_stack.last()
    }
}
