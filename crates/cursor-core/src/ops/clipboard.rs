//! Cut, paste and the text a copy would put on the clipboard.

use super::{EditKind, EditResult, OpContext};
use crate::builder::{CursorEdit, CursorRecipe};
use crate::line_ending::normalize_newlines;
use crate::{EditOperation, EndOfLinePreference, MultiCursorPaste, Position, Range, Selection};

/// What a copy of the current selections yields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardContent {
    /// Clipboard text, joined with the model's line ending.
    pub text: String,
    /// One entry per selection, in creation order. Empty for a single selection.
    pub multicursor_text: Vec<String>,
    /// Every selection was empty and copied its whole line.
    pub is_whole_line: bool,
}

/// The text a copy of `selections` produces.
pub(crate) fn clipboard_content(ctx: &OpContext<'_>, selections: &[Selection]) -> ClipboardContent {
    let eol = ctx.model.eol().as_str();
    let whole_lines = ctx.config.empty_selection_clipboard;
    let is_whole_line = whole_lines && selections.iter().all(Selection::is_empty);

    let piece = |sel: &Selection| {
        if sel.is_empty() {
            if whole_lines {
                format!("{}{eol}", ctx.line(sel.active.line))
            } else {
                String::new()
            }
        } else {
            ctx.model
                .get_value_in_range(sel.range(), EndOfLinePreference::TextDefined)
        }
    };

    if let [only] = selections {
        return ClipboardContent {
            text: piece(only),
            multicursor_text: Vec::new(),
            is_whole_line,
        };
    }

    let multicursor_text: Vec<String> = selections.iter().map(piece).collect();
    ClipboardContent {
        text: multicursor_text.join(eol),
        multicursor_text,
        is_whole_line,
    }
}

/// Delete the selections. Empty selections take their whole line when
/// `empty_selection_clipboard` is on.
pub(crate) fn cut(ctx: &OpContext<'_>, selections: &[Selection]) -> EditResult {
    let line_count = ctx.model.line_count();
    let cursors = selections
        .iter()
        .map(|sel| {
            let range = if !sel.is_empty() {
                sel.range()
            } else if ctx.config.empty_selection_clipboard {
                let line = sel.active.line;
                if line < line_count {
                    Range::from_coords(line, 1, line + 1, 1)
                } else if line > 1 {
                    Range::new(
                        Position::new(line - 1, ctx.model.line_max_column(line - 1)),
                        Position::new(line, ctx.model.line_max_column(line)),
                    )
                } else {
                    Range::from_coords(1, 1, 1, ctx.model.line_max_column(1))
                }
            } else {
                Range::empty_at(sel.active)
            };
            if range.is_empty() {
                CursorEdit::tracked()
            } else {
                CursorEdit::single(EditOperation::delete(range))
            }
        })
        .collect();
    EditResult::isolated(EditKind::Other, cursors)
}

/// One piece of text per cursor, or `None` to paste the full text everywhere.
fn distribute(
    ctx: &OpContext<'_>,
    selections: &[Selection],
    text: &str,
    multicursor_text: Option<&[String]>,
) -> Option<Vec<String>> {
    if selections.len() < 2 || ctx.config.multi_cursor_paste != MultiCursorPaste::Spread {
        return None;
    }
    if let Some(pieces) = multicursor_text {
        if pieces.len() == selections.len() {
            return Some(pieces.iter().map(|p| normalize_newlines(p)).collect());
        }
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    (lines.len() == selections.len()).then_some(lines)
}

/// Paste `text` at every cursor.
///
/// With several cursors and a text that splits into one piece per cursor, each cursor gets
/// its own piece. Whole-line clipboard content from an empty-selection copy goes above the
/// caret's line instead of at the caret.
pub(crate) fn paste(
    ctx: &OpContext<'_>,
    selections: &[Selection],
    text: &str,
    paste_on_new_line: bool,
    multicursor_text: Option<&[String]>,
) -> EditResult {
    let text = normalize_newlines(text);

    if !paste_on_new_line {
        if let Some(pieces) = distribute(ctx, selections, &text, multicursor_text) {
            let cursors = selections
                .iter()
                .zip(pieces)
                .map(|(sel, piece)| CursorEdit::single(EditOperation::replace(sel.range(), piece)))
                .collect();
            return EditResult::isolated(EditKind::Other, cursors);
        }
    }

    let mut on_new_line =
        paste_on_new_line && text.ends_with('\n') && text.find('\n') == Some(text.len() - 1);
    let cursors = selections
        .iter()
        .map(|sel| {
            if on_new_line {
                let range = sel.range();
                let full_line = range.start().column == 1
                    && range.end().column == ctx.model.line_max_column(range.end().line);
                if range.is_multiline() || (!range.is_empty() && full_line) {
                    on_new_line = false;
                }
            }
            if on_new_line {
                let line_start = Position::new(sel.active.line, 1);
                CursorEdit::with_recipe(CursorRecipe::Tracked {
                    start_column_stays_put: false,
                })
                .edit(EditOperation::insert(line_start, text.as_str()))
            } else {
                CursorEdit::single(EditOperation::replace(sel.range(), text.as_str()))
            }
        })
        .collect();
    EditResult::isolated(EditKind::Other, cursors)
}
