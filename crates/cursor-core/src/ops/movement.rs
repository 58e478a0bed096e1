//! Caret movement.
//!
//! Motions apply to one cursor at a time; the controller maps them over every cursor and
//! merges the result. Vertical motions remember the visible column they started from so a
//! caret passing through short lines comes back to its column.

use super::{OpContext, words};
use crate::columns::{first_non_whitespace_index, next_grapheme_column, prev_grapheme_column};
use crate::selection_set::column_select;
use crate::view_lines::ViewLines;
use crate::{CursorCommand, Position, Selection};

/// Desired visible column meaning "end of line" for vertical moves after `End`.
const END_OF_LINE_X: usize = usize::MAX / 4;

/// A selection plus the sticky visible column of vertical moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MovedCursor {
    pub(crate) selection: Selection,
    pub(crate) desired_x: Option<usize>,
}

impl MovedCursor {
    pub(crate) fn new(selection: Selection) -> Self {
        Self {
            selection,
            desired_x: None,
        }
    }
}

/// A per-cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Motion {
    Left,
    Right,
    Up(usize),
    Down(usize),
    Home,
    End,
    Top,
    Bottom,
    WordLeft,
    WordRight,
}

impl Motion {
    /// The motion of a per-cursor command and its `select` flag.
    pub(crate) fn from_command(command: &CursorCommand, page_size: usize) -> Option<(Self, bool)> {
        let page = page_size.max(1);
        Some(match *command {
            CursorCommand::Left { select } => (Self::Left, select),
            CursorCommand::Right { select } => (Self::Right, select),
            CursorCommand::Up { select } => (Self::Up(1), select),
            CursorCommand::Down { select } => (Self::Down(1), select),
            CursorCommand::PageUp { select } => (Self::Up(page), select),
            CursorCommand::PageDown { select } => (Self::Down(page), select),
            CursorCommand::Home { select } => (Self::Home, select),
            CursorCommand::End { select } => (Self::End, select),
            CursorCommand::Top { select } => (Self::Top, select),
            CursorCommand::Bottom { select } => (Self::Bottom, select),
            CursorCommand::WordLeft { select } => (Self::WordLeft, select),
            CursorCommand::WordRight { select } => (Self::WordRight, select),
            _ => return None,
        })
    }
}

fn move_to(selection: Selection, target: Position, select: bool) -> Selection {
    if select {
        Selection::from_positions(selection.anchor, target)
    } else {
        Selection::caret(target)
    }
}

/// Apply `motion` to one cursor.
pub(crate) fn move_cursor(
    ctx: &OpContext<'_>,
    view: &ViewLines<'_>,
    cursor: MovedCursor,
    motion: Motion,
    select: bool,
) -> MovedCursor {
    let sel = cursor.selection;
    let model = ctx.model;
    let pos = sel.active;

    let target = match motion {
        Motion::Left => {
            if !select && !sel.is_empty() {
                sel.start()
            } else if pos.column > 1 {
                Position::new(pos.line, prev_grapheme_column(&ctx.line(pos.line), pos.column))
            } else if pos.line > 1 {
                Position::new(pos.line - 1, model.line_max_column(pos.line - 1))
            } else {
                pos
            }
        }
        Motion::Right => {
            if !select && !sel.is_empty() {
                sel.end()
            } else if pos.column < model.line_max_column(pos.line) {
                Position::new(pos.line, next_grapheme_column(&ctx.line(pos.line), pos.column))
            } else if pos.line < model.line_count() {
                Position::new(pos.line + 1, 1)
            } else {
                pos
            }
        }
        Motion::Up(count) | Motion::Down(count) => {
            let up = matches!(motion, Motion::Up(_));
            let collapsing = !select && !sel.is_empty();
            let from = match (collapsing, up) {
                (true, true) => sel.start(),
                (true, false) => sel.end(),
                (false, _) => pos,
            };
            let x = match cursor.desired_x {
                Some(x) if from == pos => x,
                _ => view.visible_column_in_segment(from),
            };
            let target = if up {
                view.move_up(from, x, count)
            } else {
                view.move_down(from, x, count)
            };
            return MovedCursor {
                selection: move_to(sel, target, select),
                desired_x: Some(x),
            };
        }
        Motion::Home => {
            let first_non_blank = first_non_whitespace_index(&ctx.line(pos.line)).map_or(1, |i| i + 1);
            let column = if pos.column == first_non_blank { 1 } else { first_non_blank };
            Position::new(pos.line, column)
        }
        Motion::End => {
            let target = Position::new(pos.line, model.line_max_column(pos.line));
            return MovedCursor {
                selection: move_to(sel, target, select),
                desired_x: Some(END_OF_LINE_X),
            };
        }
        Motion::Top => Position::new(1, 1),
        Motion::Bottom => model.full_range().end(),
        Motion::WordLeft => words::word_left(ctx, pos),
        Motion::WordRight => words::word_right(ctx, pos),
    };

    MovedCursor::new(move_to(sel, target, select))
}

/// The selection covering the whole document.
pub(crate) fn select_all(ctx: &OpContext<'_>) -> Selection {
    let full = ctx.model.full_range();
    Selection::from_positions(full.start(), full.end())
}

/// Grow `sel` to whole lines, one more line each time.
pub(crate) fn expand_line_selection(ctx: &OpContext<'_>, sel: Selection) -> Selection {
    let line_count = ctx.model.line_count();
    let start_line = sel.start().line;
    let end_line = sel.end().line;
    let active = if end_line >= line_count {
        Position::new(line_count, ctx.model.line_max_column(line_count))
    } else {
        Position::new(end_line + 1, 1)
    };
    Selection::from_positions(Position::new(start_line, 1), active)
}

/// A caret one visual line above (`up`) or below the extreme cursor, or `None` at the edge
/// of the document.
pub(crate) fn add_cursor_vertically(
    view: &ViewLines<'_>,
    selections: &[Selection],
    up: bool,
) -> Option<Selection> {
    let from = if up {
        selections.iter().map(|s| s.active).min()?
    } else {
        selections.iter().map(|s| s.active).max()?
    };
    let x = view.visible_column_in_segment(from);
    if up {
        view.has_segment_above(from)
            .then(|| Selection::caret(view.move_up(from, x, 1)))
    } else {
        view.has_segment_below(from)
            .then(|| Selection::caret(view.move_down(from, x, 1)))
    }
}

/// The box of a column selection in progress: anchor and active corners as
/// (line, visible column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnSelectData {
    pub(crate) anchor_line: usize,
    pub(crate) anchor_x: usize,
    pub(crate) active_line: usize,
    pub(crate) active_x: usize,
}

impl ColumnSelectData {
    /// A box spanning the primary selection.
    pub(crate) fn from_selection(ctx: &OpContext<'_>, primary: Selection) -> Self {
        let tab_size = ctx.tab_size();
        let x_of = |pos: Position| {
            crate::columns::visible_column_from_column(&ctx.line(pos.line), pos.column, tab_size)
        };
        Self {
            anchor_line: primary.anchor.line,
            anchor_x: x_of(primary.anchor),
            active_line: primary.active.line,
            active_x: x_of(primary.active),
        }
    }

    /// Move the active corner one step.
    pub(crate) fn step(mut self, ctx: &OpContext<'_>, command: &CursorCommand) -> Self {
        match command {
            CursorCommand::ColumnSelectLeft => self.active_x = self.active_x.saturating_sub(1),
            CursorCommand::ColumnSelectRight => {
                if self.active_x < self.max_visible_column(ctx) {
                    self.active_x += 1;
                }
            }
            CursorCommand::ColumnSelectUp => self.active_line = self.active_line.saturating_sub(1).max(1),
            CursorCommand::ColumnSelectDown => {
                self.active_line = (self.active_line + 1).min(ctx.model.line_count());
            }
            _ => {}
        }
        self
    }

    /// Widest visible line length among the lines of the box.
    fn max_visible_column(&self, ctx: &OpContext<'_>) -> usize {
        let tab_size = ctx.tab_size();
        let (from, to) = if self.anchor_line <= self.active_line {
            (self.anchor_line, self.active_line)
        } else {
            (self.active_line, self.anchor_line)
        };
        (from..=to)
            .map(|line| {
                let content = ctx.line(line);
                let max_column = content.chars().count() + 1;
                crate::columns::visible_column_from_column(&content, max_column, tab_size)
            })
            .max()
            .unwrap_or(0)
    }

    /// One selection per line of the box.
    pub(crate) fn selections(&self, ctx: &OpContext<'_>) -> Vec<Selection> {
        column_select(
            ctx.model,
            self.anchor_line,
            self.anchor_x,
            self.active_line,
            self.active_x,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::context;
    use crate::view_lines::NoWrap;
    use crate::{CursorConfig, TextModel};

    const TEXT: &str = "    \tMy First Line\t \n\tMy Second Line\n    Third Line🐶\n\n1";

    fn run(model: &TextModel, start: Selection, motions: &[(Motion, bool)]) -> Selection {
        let config = CursorConfig::default();
        let ctx = context(model, &config, None);
        let view = ViewLines::new(model, &NoWrap);
        let mut cursor = MovedCursor::new(start);
        for &(motion, select) in motions {
            cursor = move_cursor(&ctx, &view, cursor, motion, select);
        }
        cursor.selection
    }

    fn caret(line: usize, column: usize) -> Selection {
        Selection::caret(Position::new(line, column))
    }

    #[test]
    fn test_left_right_cross_lines_and_graphemes() {
        let model = TextModel::new(TEXT);
        assert_eq!(run(&model, caret(2, 1), &[(Motion::Left, false)]), caret(1, 21));
        assert_eq!(run(&model, caret(1, 21), &[(Motion::Right, false)]), caret(2, 1));
        assert_eq!(run(&model, caret(3, 16), &[(Motion::Left, false)]), caret(3, 15));
        assert_eq!(run(&model, caret(1, 1), &[(Motion::Left, false)]), caret(1, 1));
        assert_eq!(run(&model, caret(5, 2), &[(Motion::Right, false)]), caret(5, 2));
    }

    #[test]
    fn test_left_right_collapse_selection() {
        let model = TextModel::new(TEXT);
        let sel = Selection::new(1, 8, 1, 3);
        assert_eq!(run(&model, sel, &[(Motion::Left, false)]), caret(1, 3));
        assert_eq!(run(&model, sel, &[(Motion::Right, false)]), caret(1, 8));
        assert_eq!(run(&model, sel, &[(Motion::Left, true)]), Selection::new(1, 8, 1, 2));
    }

    #[test]
    fn test_vertical_moves_keep_visible_column() {
        let model = TextModel::new(TEXT);
        let motions = [(Motion::Down(1), false), (Motion::Down(1), false), (Motion::Down(1), false)];
        assert_eq!(run(&model, caret(2, 9), &motions[..1]), caret(3, 12));
        assert_eq!(run(&model, caret(2, 9), &motions[..2]), caret(4, 1));
        assert_eq!(
            run(&model, caret(2, 9), &[(Motion::Down(1), false), (Motion::Down(1), false), (Motion::Up(1), false)]),
            caret(3, 12)
        );
        assert_eq!(run(&model, caret(5, 1), &[(Motion::Down(1), false)]), caret(5, 2));
        assert_eq!(run(&model, caret(1, 5), &[(Motion::Up(1), false)]), caret(1, 1));
    }

    #[test]
    fn test_end_then_vertical_sticks_to_line_end() {
        let model = TextModel::new(TEXT);
        let motions = [(Motion::End, false), (Motion::Down(1), false), (Motion::Down(1), false)];
        assert_eq!(run(&model, caret(1, 1), &motions), caret(3, 16));
    }

    #[test]
    fn test_home_toggles() {
        let model = TextModel::new(TEXT);
        assert_eq!(run(&model, caret(1, 10), &[(Motion::Home, false)]), caret(1, 6));
        assert_eq!(run(&model, caret(1, 6), &[(Motion::Home, false)]), caret(1, 1));
        assert_eq!(run(&model, caret(1, 1), &[(Motion::Home, false)]), caret(1, 6));
        assert_eq!(run(&model, caret(4, 1), &[(Motion::Home, false)]), caret(4, 1));
        assert_eq!(run(&model, caret(3, 3), &[(Motion::Home, true)]), Selection::new(3, 3, 3, 5));
    }

    #[test]
    fn test_top_bottom() {
        let model = TextModel::new(TEXT);
        assert_eq!(run(&model, caret(3, 3), &[(Motion::Top, true)]), Selection::new(3, 3, 1, 1));
        assert_eq!(run(&model, caret(3, 3), &[(Motion::Bottom, false)]), caret(5, 2));
    }

    #[test]
    fn test_expand_line_selection() {
        let model = TextModel::new(TEXT);
        let config = CursorConfig::default();
        let ctx = context(&model, &config, None);

        let mut sel = caret(1, 21);
        let mut seen = Vec::new();
        for _ in 0..6 {
            sel = expand_line_selection(&ctx, sel);
            seen.push(sel);
        }
        assert_eq!(
            seen,
            vec![
                Selection::new(1, 1, 2, 1),
                Selection::new(1, 1, 3, 1),
                Selection::new(1, 1, 4, 1),
                Selection::new(1, 1, 5, 1),
                Selection::new(1, 1, 5, 2),
                Selection::new(1, 1, 5, 2),
            ]
        );
        assert_eq!(select_all(&ctx), Selection::new(1, 1, 5, 2));
    }

    #[test]
    fn test_add_cursor_vertically() {
        let model = TextModel::new("abc\nabcdef\nab");
        let view = ViewLines::new(&model, &NoWrap);
        let selections = [caret(2, 5)];
        assert_eq!(add_cursor_vertically(&view, &selections, true), Some(caret(1, 4)));
        assert_eq!(add_cursor_vertically(&view, &selections, false), Some(caret(3, 3)));
        assert_eq!(add_cursor_vertically(&view, &[caret(1, 2)], true), None);
    }

    #[test]
    fn test_keyboard_column_select() {
        let model = TextModel::new("abcdef\nab\nabcdef");
        let config = CursorConfig::default();
        let ctx = context(&model, &config, None);

        let mut data = ColumnSelectData::from_selection(&ctx, caret(1, 2));
        for command in [
            CursorCommand::ColumnSelectRight,
            CursorCommand::ColumnSelectRight,
            CursorCommand::ColumnSelectDown,
            CursorCommand::ColumnSelectDown,
            CursorCommand::ColumnSelectDown,
        ] {
            data = data.step(&ctx, &command);
        }
        assert_eq!(
            data.selections(&ctx),
            vec![
                Selection::new(1, 2, 1, 4),
                Selection::new(2, 2, 2, 3),
                Selection::new(3, 2, 3, 4),
            ]
        );
    }

    #[test]
    fn test_column_select_right_stops_at_widest_line() {
        let model = TextModel::new("abc\nab");
        let config = CursorConfig::default();
        let ctx = context(&model, &config, None);

        let mut data = ColumnSelectData::from_selection(&ctx, caret(1, 1))
            .step(&ctx, &CursorCommand::ColumnSelectDown);
        for _ in 0..10 {
            data = data.step(&ctx, &CursorCommand::ColumnSelectRight);
        }
        assert_eq!(data.active_x, 3);

        data = data.step(&ctx, &CursorCommand::ColumnSelectLeft);
        assert_eq!(
            data.selections(&ctx),
            vec![Selection::new(1, 1, 1, 3), Selection::new(2, 1, 2, 3)]
        );
    }
}
