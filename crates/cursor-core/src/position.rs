//! Positions, ranges and selections.
//!
//! All coordinates are 1-based: line 1 is the first line and column 1 sits before the first
//! character. Columns count Unicode scalar values (`char`), so an astral character such as
//! `🐶` occupies exactly one column and can never be split by a cursor.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A (line, column) location in a document. Both components are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1.
    #[serde(rename = "lineNumber")]
    pub line: usize,
    /// Column, starting at 1 (before the first character).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns `true` if `self` comes strictly before `other`.
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// Returns `true` if `self` comes before or at `other`.
    pub fn is_before_or_equal(&self, other: &Position) -> bool {
        self <= other
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// A normalized pair of positions with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    /// Create a range from two positions in any order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create a range from raw coordinates in any order.
    pub fn from_coords(
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self::new(
            Position::new(start_line, start_column),
            Position::new(end_line, end_column),
        )
    }

    /// An empty range at `pos`.
    pub fn empty_at(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Start position (the smaller one).
    pub fn start(&self) -> Position {
        self.start
    }

    /// End position (the larger one).
    pub fn end(&self) -> Position {
        self.end
    }

    /// Returns `true` if start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the range spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Returns `true` if `pos` lies inside the range, edges included.
    pub fn contains_position(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Returns `true` if the two ranges overlap or share an edge.
    pub fn intersects_or_touches(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The smallest range containing both ranges.
    pub fn plus_range(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// A copy with a different end position.
    pub fn with_end(&self, end: Position) -> Range {
        Range::new(self.start, end)
    }

    /// A copy with a different start position.
    pub fn with_start(&self, start: Position) -> Range {
        Range::new(start, self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.end)
    }
}

/// Selection direction relative to document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionDirection {
    /// Anchor at the start, caret at the end.
    Forward,
    /// Caret at the start, anchor at the end.
    Backward,
}

/// A range with a direction: the `anchor` stays put while extending, the `active` end is
/// where the caret is drawn. An empty selection is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Selection start (the fixed end).
    pub anchor: Position,
    /// Caret position (the moving end).
    pub active: Position,
}

impl Selection {
    /// Create a selection from anchor and active coordinates.
    pub const fn new(
        anchor_line: usize,
        anchor_column: usize,
        active_line: usize,
        active_column: usize,
    ) -> Self {
        Self {
            anchor: Position::new(anchor_line, anchor_column),
            active: Position::new(active_line, active_column),
        }
    }

    /// Create a selection from two positions.
    pub const fn from_positions(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// An empty selection (caret) at `pos`.
    pub const fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// Build a selection covering `range` in the given direction.
    pub fn from_range(range: Range, direction: SelectionDirection) -> Self {
        match direction {
            SelectionDirection::Forward => Self::from_positions(range.start(), range.end()),
            SelectionDirection::Backward => Self::from_positions(range.end(), range.start()),
        }
    }

    /// Normalized range covered by the selection.
    pub fn range(&self) -> Range {
        Range::new(self.anchor, self.active)
    }

    /// Smaller of anchor and active.
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// Larger of anchor and active.
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Returns `true` for a plain caret.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Direction of the selection; carets are [`SelectionDirection::Forward`].
    pub fn direction(&self) -> SelectionDirection {
        if self.anchor <= self.active {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.anchor, self.active)
    }
}
