use thiserror::Error;

use crate::Range;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by [`crate::TextModel`] edit batches.
pub enum ModelError {
    #[error("overlapping ranges are not allowed: {first} and {second}")]
    /// Two operations of one batch replace overlapping ranges.
    OverlappingRanges {
        /// The earlier range in document order.
        first: Range,
        /// The range that overlaps it.
        second: Range,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by [`crate::CursorController::trigger`] for malformed command payloads.
///
/// Out-of-range positions are never errors; they are clamped.
pub enum CommandError {
    #[error("selection list must not be empty")]
    /// `SetSelections` (or `execute_edits` end selections) with an empty list.
    EmptySelections,

    #[error("edit batch rejected: {0}")]
    /// A host-supplied edit batch was invalid.
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
/// Errors produced when restoring saved cursor state.
pub enum StateError {
    #[error("JSON parse error: {0}")]
    /// The saved state is not valid JSON or has the wrong shape.
    Json(#[from] serde_json::Error),

    #[error("saved state contains no selections")]
    /// The saved state is an empty list.
    Empty,
}
