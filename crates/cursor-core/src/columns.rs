//! Visible columns, tab stops and indentation strings.
//!
//! A *visible column* is the 0-based cell offset at which a character is drawn: `'\t'` advances
//! to the next tab stop and every other character advances by its UAX #11 width.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Calculate visual width of a character (based on UAX #11).
///
/// Zero-width and control characters count as one cell so a caret is never drawn on top of
/// its neighbour.
pub fn char_width(ch: char) -> usize {
    match UnicodeWidthChar::width(ch) {
        Some(0) | None => 1,
        Some(w) => w,
    }
}

/// Width in cells of `ch` when it starts at visible column `x`.
pub fn cell_width_at(ch: char, x: usize, tab_size: usize) -> usize {
    if ch == '\t' {
        let tab_size = tab_size.max(1);
        tab_size - x % tab_size
    } else {
        char_width(ch)
    }
}

/// Visible column (0-based) of the 1-based `column` on `line`.
///
/// Columns past the end of the line are treated as the end of the line.
pub fn visible_column_from_column(line: &str, column: usize, tab_size: usize) -> usize {
    let mut x = 0usize;
    for ch in line.chars().take(column.saturating_sub(1)) {
        x += cell_width_at(ch, x, tab_size);
    }
    x
}

/// The 1-based column whose visible column is closest to `visible_column`.
///
/// When the target falls inside a wide character (or a tab), the nearer edge wins; a tie
/// goes to the left edge. Targets past the end of the line map to the end of the line.
pub fn column_from_visible_column(line: &str, visible_column: usize, tab_size: usize) -> usize {
    if visible_column == 0 {
        return 1;
    }
    let mut before = 0usize;
    let mut count = 0usize;
    for (i, ch) in line.chars().enumerate() {
        let after = before + cell_width_at(ch, before, tab_size);
        if after >= visible_column {
            let before_delta = visible_column - before;
            let after_delta = after - visible_column;
            return if after_delta < before_delta { i + 2 } else { i + 1 };
        }
        before = after;
        count = i + 1;
    }
    count + 1
}

/// 1-based columns at which grapheme clusters of `line` start, plus the line's max column.
fn grapheme_boundaries(line: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(1).chain(line.graphemes(true).scan(1usize, |column, g| {
        *column += g.chars().count();
        Some(*column)
    }))
}

/// Column of the grapheme boundary before `column`; column 1 stays put.
pub fn prev_grapheme_column(line: &str, column: usize) -> usize {
    grapheme_boundaries(line)
        .take_while(|&c| c < column)
        .last()
        .unwrap_or(1)
}

/// Column of the grapheme boundary after `column`; the end of the line stays put.
pub fn next_grapheme_column(line: &str, column: usize) -> usize {
    let max_column = line.chars().count() + 1;
    grapheme_boundaries(line)
        .find(|&c| c > column)
        .unwrap_or(max_column)
        .min(max_column)
}

/// Next tab stop strictly after visible column `x`.
pub fn next_tab_stop(x: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    x + tab_size - x % tab_size
}

/// Previous tab stop strictly before visible column `x` (0 stays 0).
pub fn prev_tab_stop(x: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    if x == 0 {
        return 0;
    }
    x - 1 - (x - 1) % tab_size
}

/// Index of the first non-whitespace char, if any.
pub fn first_non_whitespace_index(line: &str) -> Option<usize> {
    line.chars().position(|c| c != ' ' && c != '\t')
}

/// Index of the last non-whitespace char, if any.
pub fn last_non_whitespace_index(line: &str) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    chars.iter().rposition(|&c| c != ' ' && c != '\t')
}

/// Leading spaces and tabs of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(_, c)| c != ' ' && c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    &line[..end]
}

/// Returns `true` if the line is empty or contains only spaces and tabs.
pub fn is_whitespace_only(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// Rewrite the leading whitespace of `text` with the configured indentation characters.
///
/// A tab counts as `tab_size` spaces. With `insert_spaces` off, every full group of
/// `tab_size` spaces becomes a tab.
pub fn normalize_indentation(text: &str, tab_size: usize, insert_spaces: bool) -> String {
    let indent = leading_whitespace(text);
    let rest = &text[indent.len()..];

    let tab_size = tab_size.max(1);
    let mut spaces = 0usize;
    for ch in indent.chars() {
        spaces += if ch == '\t' { tab_size } else { 1 };
    }

    let mut out = String::with_capacity(spaces + rest.len());
    if !insert_spaces {
        for _ in 0..spaces / tab_size {
            out.push('\t');
        }
        spaces %= tab_size;
    }
    for _ in 0..spaces {
        out.push(' ');
    }
    out.push_str(rest);
    out
}

/// Indentation string for a line whose content starts at visible column `content_start`,
/// after moving it to the next (`shift`) or previous (`unshift`) tab stop.
fn shifted_indent(content_start: usize, tab_size: usize, insert_spaces: bool, shift: bool) -> String {
    let tab_size = tab_size.max(1);
    let stop = if shift {
        next_tab_stop(content_start, tab_size)
    } else {
        prev_tab_stop(content_start, tab_size)
    };
    let count = stop / tab_size;
    if insert_spaces {
        " ".repeat(count * tab_size)
    } else {
        "\t".repeat(count)
    }
}

/// Indentation one level deeper than `indentation`.
pub fn shift_indent(indentation: &str, tab_size: usize, insert_spaces: bool) -> String {
    let x = visible_column_from_column(indentation, indentation.chars().count() + 1, tab_size);
    shifted_indent(x, tab_size, insert_spaces, true)
}

/// Indentation one level shallower than `indentation`.
pub fn unshift_indent(indentation: &str, tab_size: usize, insert_spaces: bool) -> String {
    let x = visible_column_from_column(indentation, indentation.chars().count() + 1, tab_size);
    shifted_indent(x, tab_size, insert_spaces, false)
}
