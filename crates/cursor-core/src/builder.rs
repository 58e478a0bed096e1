//! Edit operation builder.
//!
//! Command handlers describe, per cursor, the edits they want and how the cursor's selection
//! is rebuilt afterwards (a [`CursorRecipe`]). [`EditOperationBuilder`] gathers those per-cursor
//! pieces into one batch, drops cursors whose edits collide with an earlier cursor's, and
//! produces a [`CursorStateRecipe`]: the value the model runs against the inverse operations
//! to obtain the post-edit selections.

use tracing::{debug, warn};

use crate::model::ModelEdit;
use crate::{
    CursorStateComputer, EditOperation, Position, Range, Selection, SelectionDirection,
    TextModel, TrackedRangeId,
};

/// How one cursor's selection is rebuilt from the inverse operations of its own edits.
///
/// Edit indices are local to the cursor: `0` is the first edit the cursor added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorRecipe {
    /// Caret at the end of the text inserted by `edit`, moved by the given deltas.
    AfterEdit {
        /// Local edit index.
        edit: usize,
        /// Lines to move.
        line_delta: isize,
        /// Columns to move.
        column_delta: isize,
    },
    /// Caret at the start of the text inserted by `edit`.
    BeforeEdit {
        /// Local edit index.
        edit: usize,
    },
    /// Selection from the end of `open`'s text to the start of `close`'s text.
    BetweenEdits {
        /// Local index of the edit inserted before the selection.
        open: usize,
        /// Local index of the edit inserted after the selection.
        close: usize,
        /// Direction of the resulting selection.
        direction: SelectionDirection,
    },
    /// Follow the cursor's tracked range.
    Tracked {
        /// Keep the selection start column where it was when the edit grew the range at its
        /// start (used by line shifting).
        start_column_stays_put: bool,
    },
}

impl CursorRecipe {
    /// Caret right after the text inserted by edit 0.
    pub const AFTER_FIRST_EDIT: Self = Self::AfterEdit {
        edit: 0,
        line_delta: 0,
        column_delta: 0,
    };

    fn offset(self, base: usize) -> Self {
        match self {
            Self::AfterEdit {
                edit,
                line_delta,
                column_delta,
            } => Self::AfterEdit {
                edit: edit + base,
                line_delta,
                column_delta,
            },
            Self::BeforeEdit { edit } => Self::BeforeEdit { edit: edit + base },
            Self::BetweenEdits {
                open,
                close,
                direction,
            } => Self::BetweenEdits {
                open: open + base,
                close: close + base,
                direction,
            },
            tracked @ Self::Tracked { .. } => tracked,
        }
    }
}

/// The edits one cursor contributes to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorEdit {
    pub(crate) edits: Vec<ModelEdit>,
    pub(crate) recipe: CursorRecipe,
}

impl CursorEdit {
    /// No edits; the cursor follows its tracked range.
    pub fn tracked() -> Self {
        Self::with_recipe(CursorRecipe::Tracked {
            start_column_stays_put: false,
        })
    }

    /// No edits yet, rebuilt with `recipe`.
    pub fn with_recipe(recipe: CursorRecipe) -> Self {
        Self {
            edits: Vec::new(),
            recipe,
        }
    }

    /// A single edit with the caret placed right after its text.
    pub fn single(op: EditOperation) -> Self {
        Self::with_recipe(CursorRecipe::AFTER_FIRST_EDIT).edit(op)
    }

    /// Add an edit.
    pub fn edit(mut self, op: EditOperation) -> Self {
        self.edits.push(ModelEdit::plain(op));
        self
    }

    /// Add an edit that only inserts indentation; whitespace-only lines it leaves behind are
    /// trimmed by a later edit elsewhere.
    pub(crate) fn auto_whitespace_edit(mut self, op: EditOperation) -> Self {
        self.edits.push(ModelEdit {
            op,
            auto_whitespace: true,
        });
        self
    }

    /// Returns `true` if the cursor adds no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The edit operations, in insertion order.
    pub fn operations(&self) -> impl Iterator<Item = &EditOperation> {
        self.edits.iter().map(|e| &e.op)
    }

    /// How the cursor is rebuilt.
    pub fn recipe(&self) -> CursorRecipe {
        self.recipe
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CursorSlot {
    before: Selection,
    marker: Option<TrackedRangeId>,
    edit: CursorEdit,
}

/// Collects per-cursor edits into one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOperationBuilder {
    cursors: Vec<CursorSlot>,
}

/// A resolved cursor entry of a [`CursorStateRecipe`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedCursor {
    recipe: CursorRecipe,
    marker: Option<TrackedRangeId>,
    before: Selection,
}

/// Rebuilds the selections of the surviving cursors from a batch's inverse operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorStateRecipe {
    cursors: Vec<ResolvedCursor>,
}

/// The output of [`EditOperationBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltEdits {
    pub(crate) edits: Vec<ModelEdit>,
    /// Cursor state computer for the batch.
    pub computer: CursorStateRecipe,
    /// Indices (in insertion order) of the cursors that survived overlap resolution.
    pub survivors: Vec<usize>,
}

impl BuiltEdits {
    /// The flattened batch.
    pub fn operations(&self) -> Vec<EditOperation> {
        self.edits.iter().map(|e| e.op.clone()).collect()
    }
}

impl EditOperationBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next cursor's contribution. `marker` is the tracked range following the cursor,
    /// used by [`CursorRecipe::Tracked`].
    pub fn add_cursor(&mut self, before: Selection, marker: Option<TrackedRangeId>, edit: CursorEdit) {
        self.cursors.push(CursorSlot {
            before,
            marker,
            edit,
        });
    }

    /// Returns `true` if no cursor adds an edit.
    pub fn has_no_edits(&self) -> bool {
        self.cursors.iter().all(|c| c.edit.is_empty())
    }

    /// Flatten into one batch. When the edits of two cursors overlap, the later cursor loses
    /// and is left out of the result entirely.
    pub fn build(self) -> BuiltEdits {
        let mut alive = vec![true; self.cursors.len()];
        while let Some(loser) = self.find_overlap_loser(&alive) {
            debug!(cursor = loser, "dropping cursor with overlapping edits");
            alive[loser] = false;
        }

        let mut edits = Vec::new();
        let mut cursors = Vec::new();
        let mut survivors = Vec::new();
        for (index, slot) in self.cursors.into_iter().enumerate() {
            if !alive[index] {
                continue;
            }
            let base = edits.len();
            edits.extend(slot.edit.edits);
            cursors.push(ResolvedCursor {
                recipe: slot.edit.recipe.offset(base),
                marker: slot.marker,
                before: slot.before,
            });
            survivors.push(index);
        }

        BuiltEdits {
            edits,
            computer: CursorStateRecipe { cursors },
            survivors,
        }
    }

    fn find_overlap_loser(&self, alive: &[bool]) -> Option<usize> {
        let mut ranges: Vec<(Range, usize)> = self
            .cursors
            .iter()
            .enumerate()
            .filter(|(i, _)| alive[*i])
            .flat_map(|(i, slot)| slot.edit.edits.iter().map(move |e| (e.op.range, i)))
            .collect();
        ranges.sort_by(|(a, ai), (b, bi)| {
            a.start()
                .cmp(&b.start())
                .then_with(|| a.end().cmp(&b.end()))
                .then_with(|| ai.cmp(bi))
        });

        ranges.windows(2).find_map(|pair| {
            let ((prev, prev_cursor), (cur, cur_cursor)) = (pair[0], pair[1]);
            (prev_cursor != cur_cursor && prev.end() > cur.start())
                .then_some(prev_cursor.max(cur_cursor))
        })
    }
}

fn shifted(pos: Position, line_delta: isize, column_delta: isize) -> Position {
    let line = (pos.line as isize + line_delta).max(1) as usize;
    let column = (pos.column as isize + column_delta).max(1) as usize;
    Position::new(line, column)
}

impl CursorStateRecipe {
    /// Number of cursors the recipe produces.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Returns `true` if the recipe produces no cursors.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    fn resolve(&self, cursor: &ResolvedCursor, model: &TextModel, inverse: &[EditOperation]) -> Selection {
        let range_of = |edit: usize| inverse.get(edit).map(|op| op.range);

        match cursor.recipe {
            CursorRecipe::AfterEdit {
                edit,
                line_delta,
                column_delta,
            } => match range_of(edit) {
                Some(range) => Selection::caret(
                    model.validate_position(shifted(range.end(), line_delta, column_delta)),
                ),
                None => self.fallback(cursor, model),
            },
            CursorRecipe::BeforeEdit { edit } => match range_of(edit) {
                Some(range) => Selection::caret(range.start()),
                None => self.fallback(cursor, model),
            },
            CursorRecipe::BetweenEdits {
                open,
                close,
                direction,
            } => match (range_of(open), range_of(close)) {
                (Some(open), Some(close)) => {
                    Selection::from_range(Range::new(open.end(), close.start()), direction)
                }
                _ => self.fallback(cursor, model),
            },
            CursorRecipe::Tracked {
                start_column_stays_put,
            } => {
                let Some(range) = cursor.marker.and_then(|id| model.tracked_range(id)) else {
                    return self.fallback(cursor, model);
                };
                if cursor.before.is_empty() {
                    return Selection::caret(range.end());
                }
                let mut range = range;
                let initial_start = cursor.before.start();
                if start_column_stays_put
                    && range.start().line == initial_start.line
                    && range.start().column > initial_start.column
                {
                    range = range.with_start(Position::new(range.start().line, initial_start.column));
                }
                Selection::from_range(range, cursor.before.direction())
            }
        }
    }

    fn fallback(&self, cursor: &ResolvedCursor, model: &TextModel) -> Selection {
        warn!(before = %cursor.before, "cursor recipe could not be resolved, clamping previous selection");
        model.validate_selection(cursor.before)
    }
}

impl CursorStateComputer for CursorStateRecipe {
    fn compute_cursor_state(
        &self,
        model: &TextModel,
        inverse_ops: &[EditOperation],
    ) -> Option<Vec<Selection>> {
        Some(
            self.cursors
                .iter()
                .map(|cursor| self.resolve(cursor, model, inverse_ops))
                .collect(),
        )
    }
}
