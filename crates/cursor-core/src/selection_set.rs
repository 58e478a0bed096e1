//! Multi-selection helpers: the non-empty [`CursorState`], overlap merging and column (box)
//! selection.

use crate::{Position, Range, Selection, SelectionDirection, TextModel, columns};

/// Ordered, non-empty list of selections. The first one is the primary.
///
/// Order is creation order, not document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    selections: Vec<Selection>,
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new(Selection::caret(Position::new(1, 1)))
    }
}

impl CursorState {
    /// A state with a single selection.
    pub fn new(primary: Selection) -> Self {
        Self {
            selections: vec![primary],
        }
    }

    /// Returns `None` for an empty list.
    pub fn from_selections(selections: Vec<Selection>) -> Option<Self> {
        if selections.is_empty() {
            None
        } else {
            Some(Self { selections })
        }
    }

    /// The primary selection.
    pub fn primary(&self) -> Selection {
        self.selections[0]
    }

    /// All selections, primary first.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Consume into the selection list.
    pub fn into_vec(self) -> Vec<Selection> {
        self.selections
    }
}

/// Order two positions, reporting the direction they were given in.
pub fn normalize(anchor: Position, active: Position) -> (Range, SelectionDirection) {
    let direction = if active < anchor {
        SelectionDirection::Backward
    } else {
        SelectionDirection::Forward
    };
    (Range::new(anchor, active), direction)
}

/// Merge overlapping selections.
///
/// Selections are compared in document order. Two non-empty selections merge when they
/// overlap; an empty one also merges with a selection it touches. The merged selection takes
/// the slot of the earlier-created one and the direction of the later-created one. Creation
/// order of the survivors is preserved.
pub fn merge_overlapping(selections: &[Selection]) -> Vec<Selection> {
    merge_overlapping_indexed(selections)
        .into_iter()
        .map(|(_, s)| s)
        .collect()
}

/// Like [`merge_overlapping`], also returning each survivor's original index.
pub(crate) fn merge_overlapping_indexed(selections: &[Selection]) -> Vec<(usize, Selection)> {
    let mut current: Vec<Selection> = selections.to_vec();
    let mut alive = vec![true; selections.len()];

    let mut order: Vec<usize> = (0..selections.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (current[a].range(), current[b].range());
        ra.start()
            .cmp(&rb.start())
            .then_with(|| ra.end().cmp(&rb.end()))
            .then_with(|| a.cmp(&b))
    });

    let mut i = 0;
    while i + 1 < order.len() {
        let (a, b) = (order[i], order[i + 1]);
        let (cur, next) = (current[a], current[b]);

        let should_merge = if cur.is_empty() || next.is_empty() {
            next.start() <= cur.end()
        } else {
            next.start() < cur.end()
        };
        if !should_merge {
            i += 1;
            continue;
        }

        let (winner, loser, loser_pos) = if a < b { (a, b, i + 1) } else { (b, a, i) };
        if current[winner] != current[loser] {
            let range = current[winner].range().plus_range(&current[loser].range());
            current[winner] = Selection::from_range(range, current[loser].direction());
        }
        alive[loser] = false;
        order.remove(loser_pos);
    }

    current
        .into_iter()
        .enumerate()
        .filter(|(i, _)| alive[*i])
        .collect()
}

/// One selection per line between `from_line` and `to_line` (inclusive, in that order),
/// spanning the visible columns `from_visible..to_visible` clipped to each line.
///
/// Lines too short to reach a column get the line end, so no line is skipped.
pub fn column_select(
    model: &TextModel,
    from_line: usize,
    from_visible: usize,
    to_line: usize,
    to_visible: usize,
) -> Vec<Selection> {
    let tab_size = model.options().tab_size;
    let lines: Vec<usize> = if from_line <= to_line {
        (from_line..=to_line).collect()
    } else {
        (to_line..=from_line).rev().collect()
    };

    lines
        .into_iter()
        .map(|line| {
            let content = model.line_content(line);
            let start = columns::column_from_visible_column(&content, from_visible, tab_size);
            let end = columns::column_from_visible_column(&content, to_visible, tab_size);
            Selection::new(line, start, line, end)
        })
        .collect()
}
