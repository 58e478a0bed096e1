//! Word boundaries.
//!
//! A language word pattern wins when one is configured. Otherwise characters fall into three
//! classes (whitespace, separators from `word_separators`, everything else) and a word is a
//! run of one class.

use super::OpContext;
use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Separator,
    Regular,
}

fn classify(ch: char, separators: &str) -> CharClass {
    if ch == ' ' || ch == '\t' {
        CharClass::Whitespace
    } else if separators.contains(ch) {
        CharClass::Separator
    } else {
        CharClass::Regular
    }
}

/// Returns `true` if `ch` belongs to a word (neither whitespace nor a separator).
pub(crate) fn is_word_char(ch: char, separators: &str) -> bool {
    classify(ch, separators) == CharClass::Regular
}

/// Char-column spans `(start, end)` of the language word pattern's matches on `line`.
fn pattern_spans(ctx: &OpContext<'_>, line: &str) -> Option<Vec<(usize, usize)>> {
    let pattern = ctx.language?.word_pattern.as_ref()?;
    let to_column = |byte: usize| line[..byte].chars().count() + 1;
    Some(
        pattern
            .find_all(line)
            .into_iter()
            .filter(|(start, end)| end > start)
            .map(|(start, end)| (to_column(start), to_column(end)))
            .collect(),
    )
}

/// Start of the word before `pos`; at column 1 the end of the previous line.
pub(crate) fn word_left(ctx: &OpContext<'_>, pos: Position) -> Position {
    if pos.column <= 1 {
        return if pos.line > 1 {
            Position::new(pos.line - 1, ctx.model.line_max_column(pos.line - 1))
        } else {
            Position::new(1, 1)
        };
    }

    let content = ctx.line(pos.line);
    if let Some(spans) = pattern_spans(ctx, &content) {
        let column = spans
            .iter()
            .rev()
            .find(|(start, _)| *start < pos.column)
            .map_or(1, |(start, _)| *start);
        return Position::new(pos.line, column);
    }

    let separators = ctx.config.word_separators.as_str();
    let chars: Vec<char> = content.chars().collect();
    let mut i = (pos.column - 1).min(chars.len());
    while i > 0 && classify(chars[i - 1], separators) == CharClass::Whitespace {
        i -= 1;
    }
    if i > 0 {
        let class = classify(chars[i - 1], separators);
        while i > 0 && classify(chars[i - 1], separators) == class {
            i -= 1;
        }
    }
    Position::new(pos.line, i + 1)
}

/// End of the word after `pos`; at the end of a line the start of the next one.
pub(crate) fn word_right(ctx: &OpContext<'_>, pos: Position) -> Position {
    let max_column = ctx.model.line_max_column(pos.line);
    if pos.column >= max_column {
        return if pos.line < ctx.model.line_count() {
            Position::new(pos.line + 1, 1)
        } else {
            Position::new(pos.line, max_column)
        };
    }

    let content = ctx.line(pos.line);
    if let Some(spans) = pattern_spans(ctx, &content) {
        let column = spans
            .iter()
            .find(|(_, end)| *end > pos.column)
            .map_or(max_column, |(_, end)| *end);
        return Position::new(pos.line, column);
    }

    let separators = ctx.config.word_separators.as_str();
    let chars: Vec<char> = content.chars().collect();
    let mut i = pos.column - 1;
    while i < chars.len() && classify(chars[i], separators) == CharClass::Whitespace {
        i += 1;
    }
    if i < chars.len() {
        let class = classify(chars[i], separators);
        while i < chars.len() && classify(chars[i], separators) == class {
            i += 1;
        }
    }
    Position::new(pos.line, i + 1)
}
