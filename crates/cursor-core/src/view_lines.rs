//! Soft-wrap geometry for vertical cursor movement.
//!
//! The host decides where a line wraps through a [`WrapPolicy`]; the controller only needs the
//! wrap points to move carets between visual segments. Without wrapping every buffer line is
//! one segment.

use crate::columns::{cell_width_at, column_from_visible_column, visible_column_from_column};
use crate::{Position, TextModel};

/// Where buffer lines break into visual segments.
pub trait WrapPolicy: Send + Sync {
    /// 0-based char indices at which a new visual segment starts, ascending, never 0.
    fn wrap_points(&self, line: &str, tab_size: usize) -> Vec<usize>;
}

/// No soft wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoWrap;

impl WrapPolicy for NoWrap {
    fn wrap_points(&self, _line: &str, _tab_size: usize) -> Vec<usize> {
        Vec::new()
    }
}

/// Character wrap at a fixed number of visible columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWrap {
    /// Segment width in cells.
    pub width: usize,
}

impl WrapPolicy for ColumnWrap {
    fn wrap_points(&self, line: &str, tab_size: usize) -> Vec<usize> {
        let width = self.width.max(1);
        let mut points = Vec::new();
        let mut x_in_segment = 0usize;
        let mut x_in_line = 0usize;
        let char_count = line.chars().count();

        for (char_index, ch) in line.chars().enumerate() {
            let ch_width = cell_width_at(ch, x_in_line, tab_size);

            // A wide character that does not fit moves to the next segment intact.
            if x_in_segment > 0 && x_in_segment + ch_width > width {
                points.push(char_index);
                x_in_segment = 0;
            }

            x_in_segment += ch_width;
            x_in_line += ch_width;

            if x_in_segment >= width && char_index + 1 < char_count {
                points.push(char_index + 1);
                x_in_segment = 0;
            }
        }

        points
    }
}

/// Buffer lines seen through a wrap policy.
pub(crate) struct ViewLines<'a> {
    model: &'a TextModel,
    wrap: &'a dyn WrapPolicy,
    tab_size: usize,
}

impl<'a> ViewLines<'a> {
    pub(crate) fn new(model: &'a TextModel, wrap: &'a dyn WrapPolicy) -> Self {
        Self {
            model,
            wrap,
            tab_size: model.options().tab_size,
        }
    }

    /// 1-based start columns of the segments of `line`; the first is always 1.
    fn segment_starts(&self, line: usize) -> Vec<usize> {
        let content = self.model.line_content(line);
        std::iter::once(1)
            .chain(
                self.wrap
                    .wrap_points(&content, self.tab_size)
                    .into_iter()
                    .map(|p| p + 1),
            )
            .collect()
    }

    fn segment_index(starts: &[usize], column: usize) -> usize {
        starts
            .iter()
            .rposition(|&start| start <= column)
            .unwrap_or(0)
    }

    /// Visible column of `pos` relative to the start of its segment.
    pub(crate) fn visible_column_in_segment(&self, pos: Position) -> usize {
        let content = self.model.line_content(pos.line);
        let starts = self.segment_starts(pos.line);
        let seg_start = starts[Self::segment_index(&starts, pos.column)];
        visible_column_from_column(&content, pos.column, self.tab_size)
            - visible_column_from_column(&content, seg_start, self.tab_size)
    }

    /// Returns `true` if a visual segment exists above the one containing `pos`.
    pub(crate) fn has_segment_above(&self, pos: Position) -> bool {
        pos.line > 1 || Self::segment_index(&self.segment_starts(pos.line), pos.column) > 0
    }

    /// Returns `true` if a visual segment exists below the one containing `pos`.
    pub(crate) fn has_segment_below(&self, pos: Position) -> bool {
        if pos.line < self.model.line_count() {
            return true;
        }
        let starts = self.segment_starts(pos.line);
        Self::segment_index(&starts, pos.column) + 1 < starts.len()
    }

    fn column_in_segment(&self, line: usize, starts: &[usize], seg: usize, x: usize) -> usize {
        let content = self.model.line_content(line);
        let seg_start = starts[seg];
        let seg_end = match starts.get(seg + 1) {
            Some(next) => next - 1,
            None => self.model.line_max_column(line),
        };
        let base = visible_column_from_column(&content, seg_start, self.tab_size);
        column_from_visible_column(&content, base + x, self.tab_size).clamp(seg_start, seg_end)
    }

    /// Move `count` segments down keeping visible column `x`. Running past the last segment
    /// lands on the end of the document.
    pub(crate) fn move_down(&self, pos: Position, x: usize, count: usize) -> Position {
        let line_count = self.model.line_count();
        let mut line = pos.line;
        let mut starts = self.segment_starts(line);
        let mut seg = Self::segment_index(&starts, pos.column);

        for _ in 0..count {
            if seg + 1 < starts.len() {
                seg += 1;
            } else if line < line_count {
                line += 1;
                starts = self.segment_starts(line);
                seg = 0;
            } else {
                return Position::new(line, self.model.line_max_column(line));
            }
        }
        Position::new(line, self.column_in_segment(line, &starts, seg, x))
    }

    /// Move `count` segments up keeping visible column `x`. Running past the first segment
    /// lands on (1, 1).
    pub(crate) fn move_up(&self, pos: Position, x: usize, count: usize) -> Position {
        let mut line = pos.line;
        let mut starts = self.segment_starts(line);
        let mut seg = Self::segment_index(&starts, pos.column);

        for _ in 0..count {
            if seg > 0 {
                seg -= 1;
            } else if line > 1 {
                line -= 1;
                starts = self.segment_starts(line);
                seg = starts.len() - 1;
            } else {
                return Position::new(1, 1);
            }
        }
        Position::new(line, self.column_in_segment(line, &starts, seg, x))
    }
}
