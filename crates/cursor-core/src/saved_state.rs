//! Serialized cursor state.
//!
//! ```json
//! [{ "inSelectionMode": true,
//!    "selectionStart": { "lineNumber": 1, "column": 1 },
//!    "position": { "lineNumber": 1, "column": 4 } }]
//! ```
//!
//! Only selections are saved; the undo stack never crosses this boundary.

use serde::{Deserialize, Serialize};

use crate::{Position, Selection, StateError};

/// One saved selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSelection {
    /// The selection is non-empty.
    pub in_selection_mode: bool,
    /// Anchor.
    pub selection_start: Position,
    /// Caret.
    pub position: Position,
}

impl From<Selection> for SavedSelection {
    fn from(selection: Selection) -> Self {
        Self {
            in_selection_mode: !selection.is_empty(),
            selection_start: selection.anchor,
            position: selection.active,
        }
    }
}

impl From<SavedSelection> for Selection {
    fn from(saved: SavedSelection) -> Self {
        if saved.in_selection_mode {
            Selection::from_positions(saved.selection_start, saved.position)
        } else {
            Selection::caret(saved.position)
        }
    }
}

pub(crate) fn to_json(selections: &[Selection]) -> String {
    let saved: Vec<SavedSelection> = selections.iter().copied().map(SavedSelection::from).collect();
    // A list of plain structs always serializes.
    serde_json::to_string(&saved).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn from_json(json: &str) -> Result<Vec<Selection>, StateError> {
    let saved: Vec<SavedSelection> = serde_json::from_str(json)?;
    if saved.is_empty() {
        return Err(StateError::Empty);
    }
    Ok(saved.into_iter().map(Selection::from).collect())
}
