//! Backspace and delete.

use super::typing::closing_strategy;
use super::words::{word_left, word_right};
use super::{EditKind, EditResult, OpContext, char_at};
use crate::builder::CursorEdit;
use crate::columns::{
    column_from_visible_column, first_non_whitespace_index, next_grapheme_column,
    prev_grapheme_column, prev_tab_stop, visible_column_from_column,
};
use crate::{AutoClosingStrategy, EditOperation, Position, Range, Selection};

fn delete_range(range: Range) -> CursorEdit {
    if range.is_empty() {
        CursorEdit::tracked()
    } else {
        CursorEdit::single(EditOperation::delete(range))
    }
}

/// Delete both halves of empty auto-closed pairs, if every caret sits inside one.
fn auto_closing_pair_delete(ctx: &OpContext<'_>, selections: &[Selection]) -> Option<EditResult> {
    let language = ctx.language?;
    if !ctx.config.auto_closing_delete {
        return None;
    }

    let cursors = selections
        .iter()
        .map(|sel| {
            if !sel.is_empty() || sel.active.column < 2 {
                return None;
            }
            let pos = sel.active;
            let line = ctx.line(pos.line);
            let before = char_at(&line, pos.column - 2)?;
            let after = char_at(&line, pos.column - 1)?;
            if closing_strategy(ctx, before) == AutoClosingStrategy::Never {
                return None;
            }
            let is_pair = language.auto_closing_pairs.iter().any(|p| {
                p.open.chars().eq(std::iter::once(before)) && p.close.chars().eq(std::iter::once(after))
            });
            is_pair.then(|| {
                CursorEdit::single(EditOperation::delete(Range::from_coords(
                    pos.line,
                    pos.column - 1,
                    pos.line,
                    pos.column + 1,
                )))
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(EditResult::new(EditKind::DeletingLeft, cursors).push_before(true))
}

/// Range Backspace removes at an empty selection.
fn delete_left_range(ctx: &OpContext<'_>, pos: Position) -> Range {
    if pos.column == 1 {
        if pos.line == 1 {
            return Range::empty_at(pos);
        }
        let prev = pos.line - 1;
        return Range::new(Position::new(prev, ctx.model.line_max_column(prev)), pos);
    }

    let line = ctx.line(pos.line);
    if ctx.config.use_tab_stops {
        let last_indentation_column = match first_non_whitespace_index(&line) {
            Some(index) => index + 1,
            None => line.chars().count() + 1,
        };
        if pos.column <= last_indentation_column {
            let tab_size = ctx.tab_size();
            let x = visible_column_from_column(&line, pos.column, tab_size);
            let column = column_from_visible_column(&line, prev_tab_stop(x, tab_size), tab_size);
            return Range::new(Position::new(pos.line, column), pos);
        }
    }

    Range::new(Position::new(pos.line, prev_grapheme_column(&line, pos.column)), pos)
}

/// Backspace.
pub(crate) fn delete_left(ctx: &OpContext<'_>, selections: &[Selection], prev: EditKind) -> EditResult {
    if let Some(result) = auto_closing_pair_delete(ctx, selections) {
        return result;
    }

    let ranges: Vec<Range> = selections
        .iter()
        .map(|sel| {
            if sel.is_empty() {
                delete_left_range(ctx, sel.active)
            } else {
                sel.range()
            }
        })
        .collect();
    let push_before = prev != EditKind::DeletingLeft || ranges.iter().any(Range::is_multiline);
    EditResult::new(EditKind::DeletingLeft, ranges.into_iter().map(delete_range).collect())
        .push_before(push_before)
}

/// Delete.
pub(crate) fn delete_right(ctx: &OpContext<'_>, selections: &[Selection], prev: EditKind) -> EditResult {
    let ranges: Vec<Range> = selections
        .iter()
        .map(|sel| {
            if !sel.is_empty() {
                return sel.range();
            }
            let pos = sel.active;
            let max_column = ctx.model.line_max_column(pos.line);
            if pos.column < max_column {
                let next = next_grapheme_column(&ctx.line(pos.line), pos.column);
                Range::new(pos, Position::new(pos.line, next))
            } else if pos.line < ctx.model.line_count() {
                Range::new(pos, Position::new(pos.line + 1, 1))
            } else {
                Range::empty_at(pos)
            }
        })
        .collect();
    let push_before = prev != EditKind::DeletingRight || ranges.iter().any(Range::is_multiline);
    EditResult::new(EditKind::DeletingRight, ranges.into_iter().map(delete_range).collect())
        .push_before(push_before)
}

/// Delete to the start of the previous word.
pub(crate) fn delete_word_left(ctx: &OpContext<'_>, selections: &[Selection]) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| {
            if sel.is_empty() {
                delete_range(Range::new(word_left(ctx, sel.active), sel.active))
            } else {
                delete_range(sel.range())
            }
        })
        .collect();
    EditResult::isolated(EditKind::Other, cursors)
}

/// Delete to the end of the next word.
pub(crate) fn delete_word_right(ctx: &OpContext<'_>, selections: &[Selection]) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| {
            if sel.is_empty() {
                delete_range(Range::new(sel.active, word_right(ctx, sel.active)))
            } else {
                delete_range(sel.range())
            }
        })
        .collect();
    EditResult::isolated(EditKind::Other, cursors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EditOperationBuilder;
    use crate::ops::test_support::context;
    use crate::{CursorConfig, EndOfLinePreference, TextModel, TrackedRangeStickiness};
    use cursor_core_lang::{AutoClosingPair, LanguageConfiguration};

    fn apply(model: &mut TextModel, result: EditResult, selections: &[Selection]) -> Vec<Selection> {
        let mut builder = EditOperationBuilder::new();
        for (sel, edit) in selections.iter().zip(result.cursors) {
            let marker = model.track_range(sel.range(), TrackedRangeStickiness::AlwaysGrowsWhenTypingAtEdges);
            builder.add_cursor(*sel, Some(marker), edit);
        }
        let built = builder.build();
        model
            .push_edits(selections, built.edits, &built.computer)
            .unwrap()
            .unwrap()
    }

    fn backspace(model: &mut TextModel, config: &CursorConfig, lang: Option<&LanguageConfiguration>, at: Position) -> Position {
        let selections = [Selection::caret(at)];
        let result = delete_left(&context(model, config, lang), &selections, EditKind::Other);
        apply(model, result, &selections)[0].active
    }

    #[test]
    fn test_backspace_deletes_previous_char_and_joins_lines() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("abc\ncd");
        assert_eq!(backspace(&mut model, &config, None, Position::new(1, 3)), Position::new(1, 2));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "ac\ncd");
        assert_eq!(backspace(&mut model, &config, None, Position::new(2, 1)), Position::new(1, 3));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "accd");
    }

    #[test]
    fn test_backspace_in_indentation_goes_to_previous_tab_stop() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("        x");
        assert_eq!(backspace(&mut model, &config, None, Position::new(1, 7)), Position::new(1, 5));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "      x");

        let config = CursorConfig {
            use_tab_stops: false,
            ..CursorConfig::default()
        };
        let mut model = TextModel::new("        x");
        backspace(&mut model, &config, None, Position::new(1, 9));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "       x");
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("e\u{301}x");
        assert_eq!(backspace(&mut model, &config, None, Position::new(1, 3)), Position::new(1, 1));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "x");
    }

    #[test]
    fn test_backspace_inside_empty_pair_deletes_both() {
        let lang = LanguageConfiguration::new().with_auto_closing_pairs(vec![AutoClosingPair::new("(", ")")]);
        let config = CursorConfig::default();
        let mut model = TextModel::new("f()");
        assert_eq!(backspace(&mut model, &config, Some(&lang), Position::new(1, 3)), Position::new(1, 2));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "f");

        let config = CursorConfig {
            auto_closing_delete: false,
            ..CursorConfig::default()
        };
        let mut model = TextModel::new("f()");
        backspace(&mut model, &config, Some(&lang), Position::new(1, 3));
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "f)");
    }

    #[test]
    fn test_backspace_undo_stops() {
        let model = TextModel::new("abc\nd");
        let config = CursorConfig::default();
        let ctx = context(&model, &config, None);
        let same_line = [Selection::caret(Position::new(1, 3))];
        assert!(!delete_left(&ctx, &same_line, EditKind::DeletingLeft).push_before);
        assert!(delete_left(&ctx, &same_line, EditKind::Typing).push_before);
        let line_start = [Selection::caret(Position::new(2, 1))];
        assert!(delete_left(&ctx, &line_start, EditKind::DeletingLeft).push_before);
        let doc_start = [Selection::caret(Position::new(1, 1))];
        assert!(delete_left(&ctx, &doc_start, EditKind::Other).cursors[0].is_empty());
    }

    #[test]
    fn test_delete_right() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("ab\ncd");
        let selections = [Selection::caret(Position::new(1, 3))];
        let result = delete_right(&context(&model, &config, None), &selections, EditKind::Other);
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "abcd");
        assert_eq!(after[0].active, Position::new(1, 3));

        let at_end = [Selection::caret(Position::new(1, 5))];
        let result = delete_right(&context(&model, &config, None), &at_end, EditKind::DeletingRight);
        assert!(result.cursors[0].is_empty());
        assert!(!result.push_before);
    }

    #[test]
    fn test_delete_words() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("foo.bar baz");
        let selections = [Selection::caret(Position::new(1, 12))];
        let result = delete_word_left(&context(&model, &config, None), &selections);
        assert!(result.push_before && result.push_after);
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "foo.bar ");
        assert_eq!(after[0].active, Position::new(1, 9));

        let selections = [Selection::caret(Position::new(1, 1))];
        let result = delete_word_right(&context(&model, &config, None), &selections);
        apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), ".bar ");
    }

    #[test]
    fn test_delete_selection() {
        let config = CursorConfig::default();
        let mut model = TextModel::new("hello world");
        let selections = [Selection::new(1, 6, 1, 1)];
        let result = delete_left(&context(&model, &config, None), &selections, EditKind::Other);
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), " world");
        assert_eq!(after, vec![Selection::caret(Position::new(1, 1))]);
    }
}
