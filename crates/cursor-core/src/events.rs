//! Change notifications.
//!
//! The model reports every buffer mutation as a [`ModelContentChangedEvent`]; the controller
//! reports every change of its selections as a [`CursorStateChangedEvent`]. Listeners are plain
//! boxed callbacks registered with `on_did_change_*`.

use crate::{ContentChange, LineEnding, Selection};

/// Why the cursor state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorChangeReason {
    /// Regular command.
    NotSet,
    /// The whole model content was replaced.
    ContentFlush,
    /// Cursors were recovered from their markers after an edit they did not make.
    RecoverFromMarkers,
    /// Selections were set explicitly by the host.
    Explicit,
    /// Paste.
    Paste,
    /// Undo.
    Undo,
    /// Redo.
    Redo,
}

/// Emitted after the controller's selections change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorStateChangedEvent {
    /// New selections; the first one is the primary.
    pub selections: Vec<Selection>,
    /// Selections before the change.
    pub old_selections: Vec<Selection>,
    /// Why the change happened.
    pub reason: CursorChangeReason,
    /// Source passed to [`crate::CursorController::trigger`].
    pub source: String,
}

/// Emitted after every buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelContentChangedEvent {
    /// Changes in pre-edit coordinates, last change first.
    pub changes: Vec<ContentChange>,
    /// Line ending of the model after the change.
    pub eol: LineEnding,
    /// Version id after the change.
    pub version_id: u64,
    /// The change was produced by undo.
    pub is_undoing: bool,
    /// The change was produced by redo.
    pub is_redoing: bool,
    /// The whole content was replaced.
    pub is_flush: bool,
}

/// Content change callback function type
pub type ContentChangeCallback = Box<dyn FnMut(&ModelContentChangedEvent) + Send>;

/// Cursor change callback function type
pub type CursorChangeCallback = Box<dyn FnMut(&CursorStateChangedEvent) + Send>;

/// A list of subscribed callbacks.
pub(crate) struct Listeners<E> {
    callbacks: Vec<Box<dyn FnMut(&E) + Send>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<E> Listeners<E> {
    pub(crate) fn subscribe(&mut self, callback: Box<dyn FnMut(&E) + Send>) {
        self.callbacks.push(callback);
    }

    pub(crate) fn emit(&mut self, event: &E) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
