//! Typed characters.
//!
//! Keyboard input is handled one character at a time. Before falling back to a plain insert,
//! each character is offered to the interceptors in order:
//!
//! 1. Enter: a new line carrying the right indentation
//! 2. electric indentation: re-indent the line when the character completes a decrease pattern
//! 3. overtype: step over a closing character instead of inserting it
//! 4. auto-closing: insert the closing half of a pair after the caret
//! 5. surround: wrap non-empty selections in a pair
//!
//! Every interceptor applies to all cursors or to none.

use cursor_core_lang::{AutoClosingPair, IndentAction, IndentationRules, is_quote_text};

use super::indent::{self, inherit_indent};
use super::words::is_word_char;
use super::{EditKind, EditResult, OpContext, char_len, char_slice};
use crate::builder::{CursorEdit, CursorRecipe};
use crate::columns::{first_non_whitespace_index, leading_whitespace, visible_column_from_column};
use crate::{
    AutoClosingStrategy, AutoSurroundStrategy, EditOperation, Position, Range, Selection,
    SelectionDirection,
};

fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

fn quote_char(ch: char) -> bool {
    let mut buf = [0u8; 4];
    is_quote_text(ch.encode_utf8(&mut buf))
}

pub(crate) fn closing_strategy(ctx: &OpContext<'_>, ch: char) -> AutoClosingStrategy {
    if quote_char(ch) {
        ctx.config.auto_closing_quotes
    } else {
        ctx.config.auto_closing_brackets
    }
}

fn count_of(chars: &[char], ch: char) -> usize {
    chars.iter().filter(|&&c| c == ch).count()
}

/// Replace `range` with `text`, caret after it, marking the edit as auto-inserted whitespace.
fn type_command(range: Range, text: String) -> CursorEdit {
    CursorEdit::with_recipe(CursorRecipe::AFTER_FIRST_EDIT)
        .auto_whitespace_edit(EditOperation::replace(range, text))
}

/// Type `text` verbatim at every cursor.
pub(crate) fn type_without_interceptors(selections: &[Selection], text: &str, prev: EditKind) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| CursorEdit::single(EditOperation::replace(sel.range(), text)))
        .collect();
    EditResult::new(EditKind::Typing, cursors).push_before(prev != EditKind::Typing)
}

/// Type one keyboard character at every cursor.
pub(crate) fn type_with_interceptors(
    ctx: &OpContext<'_>,
    selections: &[Selection],
    ch: char,
    prev: EditKind,
) -> EditResult {
    if ch == '\n' {
        let cursors = selections.iter().map(|sel| enter(ctx, sel.range())).collect();
        return EditResult::new(EditKind::Typing, cursors).push_before(true);
    }

    if let Some(result) = electric_indent(ctx, selections, ch)
        .or_else(|| overtype(ctx, selections, ch, prev))
        .or_else(|| auto_close_open(ctx, selections, ch))
        .or_else(|| surround(ctx, selections, ch))
    {
        return result;
    }

    let text = ch.to_string();
    let cursors = selections
        .iter()
        .map(|sel| CursorEdit::single(EditOperation::replace(sel.range(), text.as_str())))
        .collect();
    EditResult::new(EditKind::Typing, cursors).push_before(prev != EditKind::Typing || ch == ' ')
}

/// Enter at `range`.
pub(crate) fn enter(ctx: &OpContext<'_>, range: Range) -> CursorEdit {
    let start = range.start();
    let line_text = ctx.line(start.line);
    let indentation = char_slice(leading_whitespace(&line_text), 0, start.column - 1);
    let plain = |indentation: &str| type_command(range, format!("\n{}", ctx.normalize_indentation(indentation)));

    if !ctx.config.auto_indent {
        return plain(&indentation);
    }

    if let Some(language) = ctx.language {
        let end = range.end();
        let above = if start.line > 1 {
            ctx.line(start.line - 1)
        } else {
            String::new()
        };
        let before = char_slice(&line_text, 0, start.column - 1);
        let after = char_slice(&ctx.line(end.line), end.column - 1, usize::MAX);

        if ctx.indentation_rules().is_some_and(|rules| rules.should_ignore(&before)) {
            return plain(&indentation);
        }

        if let Some(action) = indent::enter_action(language, &above, &before, &after) {
            let base = indent::remove_from_end(&indentation, action.remove_text.unwrap_or(0));
            let append = action.append_text.as_deref().unwrap_or("");
            return match action.indent_action {
                IndentAction::None | IndentAction::Indent => plain(&format!("{base}{append}")),
                IndentAction::Outdent => plain(&format!("{}{append}", ctx.unshift_indent(&base))),
                IndentAction::IndentOutdent => {
                    let normal = ctx.normalize_indentation(&base);
                    let increased = ctx.normalize_indentation(&format!("{base}{append}"));
                    let column_delta = char_len(&increased) - char_len(&normal);
                    CursorEdit::with_recipe(CursorRecipe::AfterEdit {
                        edit: 0,
                        line_delta: -1,
                        column_delta,
                    })
                    .auto_whitespace_edit(EditOperation::replace(
                        range,
                        format!("\n{increased}\n{normal}"),
                    ))
                }
            };
        }

        if let Some(rules) = ctx.indentation_rules() {
            return enter_with_rules(ctx, rules, range, &line_text, &indentation);
        }
    }

    plain(&indentation)
}

/// Enter driven by indentation rules: re-indent the text before the caret if the rules
/// disagree with it, and indent the new line by what it inherits.
fn enter_with_rules(
    ctx: &OpContext<'_>,
    rules: &IndentationRules,
    range: Range,
    line_text: &str,
    indentation: &str,
) -> CursorEdit {
    let (start, end) = (range.start(), range.end());
    let before_text = char_slice(line_text, 0, start.column - 1);
    let end_line_text = ctx.line(end.line);
    let after_text = char_slice(&end_line_text, end.column - 1, usize::MAX);

    let before_enter = leading_whitespace(&before_text).to_string();
    let virtual_line = |l: usize| {
        if l == start.line {
            before_text.clone()
        } else {
            ctx.line(l)
        }
    };
    let after_enter = match inherit_indent(rules, start.line + 1, true, virtual_line) {
        None => before_enter.clone(),
        Some(inherited) => {
            let mut indentation = if inherited.indent {
                ctx.shift_indent(&inherited.indentation)
            } else {
                inherited.indentation
            };
            if rules.should_decrease(&after_text) {
                indentation = ctx.unshift_indent(&indentation);
            }
            indentation
        }
    };

    let normalized_before = ctx.normalize_indentation(&before_enter);
    let mut replace_start = start;
    let mut prefix = "\n".to_string();
    if indentation != normalized_before {
        let rest = char_slice(line_text, indentation.chars().count(), start.column - 1);
        prefix = format!("{normalized_before}{rest}\n");
        replace_start = Position::new(start.line, 1);
    }

    let first_non_ws = first_non_whitespace_index(&end_line_text);
    let replace_end_column = match first_non_ws {
        Some(index) => end.column.max(index + 1),
        None => ctx.model.line_max_column(end.line),
    };
    let normalized_after = ctx.normalize_indentation(&after_enter);

    let mut column_delta = 0;
    if let Some(index) = first_non_ws {
        if end.column <= index + 1 {
            let tab_size = ctx.tab_size().max(1);
            let mut old_end_x = visible_column_from_column(&end_line_text, end.column, tab_size);
            if !ctx.insert_spaces() {
                old_end_x = old_end_x.div_ceil(tab_size);
            }
            column_delta = (old_end_x as isize - char_len(&normalized_after)).min(0);
        }
    }

    CursorEdit::with_recipe(CursorRecipe::AfterEdit {
        edit: 0,
        line_delta: 0,
        column_delta,
    })
    .auto_whitespace_edit(EditOperation::replace(
        Range::new(replace_start, Position::new(end.line, replace_end_column)),
        format!("{prefix}{normalized_after}"),
    ))
}

/// Re-indent a line when the typed character makes it match the decrease pattern.
fn electric_indent(ctx: &OpContext<'_>, selections: &[Selection], ch: char) -> Option<EditResult> {
    let rules = ctx.indentation_rules()?;
    let cursors = selections
        .iter()
        .map(|sel| electric_indent_cursor(ctx, rules, *sel, ch))
        .collect::<Option<Vec<_>>>()?;
    Some(EditResult::new(EditKind::Typing, cursors).push_before(true))
}

fn electric_indent_cursor(
    ctx: &OpContext<'_>,
    rules: &IndentationRules,
    sel: Selection,
    ch: char,
) -> Option<CursorEdit> {
    let (start, end) = (sel.start(), sel.end());
    let line_text = ctx.line(start.line);
    let before = char_slice(&line_text, 0, start.column - 1);
    let after = char_slice(&ctx.line(end.line), end.column - 1, usize::MAX);

    if rules.should_decrease(&format!("{before}{after}"))
        || !rules.should_decrease(&format!("{before}{ch}{after}"))
    {
        return None;
    }

    let inherited = inherit_indent(rules, start.line, false, |l| ctx.line(l))?;
    let indentation = if inherited.indent {
        inherited.indentation
    } else {
        ctx.unshift_indent(&inherited.indentation)
    };
    let current = char_slice(leading_whitespace(&line_text), 0, start.column - 1);
    if indentation == ctx.normalize_indentation(&current) {
        return None;
    }

    let typed = match first_non_whitespace_index(&line_text) {
        Some(index) => char_slice(&line_text, index, start.column - 1),
        None => String::new(),
    };
    Some(type_command(
        Range::new(Position::new(start.line, 1), end),
        format!("{}{typed}{ch}", ctx.normalize_indentation(&indentation)),
    ))
}

/// Step over the closing character after every caret.
fn overtype(ctx: &OpContext<'_>, selections: &[Selection], ch: char, prev: EditKind) -> Option<EditResult> {
    let language = ctx.language?;
    if !ctx.config.auto_closing_overtype || closing_strategy(ctx, ch) == AutoClosingStrategy::Never {
        return None;
    }
    let pair = language
        .auto_closing_pairs
        .iter()
        .find(|p| p.close.chars().eq(std::iter::once(ch)))?;
    let symmetric = pair.open == pair.close;

    let cursors = selections
        .iter()
        .map(|sel| {
            if !sel.is_empty() {
                return None;
            }
            let pos = sel.active;
            let chars: Vec<char> = ctx.line(pos.line).chars().collect();
            if chars.get(pos.column - 1) != Some(&ch) {
                return None;
            }
            if symmetric && count_of(&chars[..pos.column - 1], ch) % 2 == 0 {
                return None;
            }
            Some(CursorEdit::single(EditOperation::replace(
                Range::from_coords(pos.line, pos.column, pos.line, pos.column + 1),
                ch.to_string(),
            )))
        })
        .collect::<Option<Vec<_>>>()?;

    Some(EditResult::new(EditKind::Typing, cursors).push_before(prev != EditKind::Typing))
}

/// The longest pair whose opening text ends with `ch` and whose other opening chars sit right
/// before every caret.
fn find_auto_closing_pair<'a>(
    ctx: &OpContext<'a>,
    positions: &[Position],
    ch: char,
) -> Option<&'a AutoClosingPair> {
    let language = ctx.language?;
    let mut best: Option<&'a AutoClosingPair> = None;
    for candidate in language.auto_closing_pairs_ending_with(ch) {
        if best.is_some_and(|b| candidate.open.chars().count() <= b.open.chars().count()) {
            continue;
        }
        let prefix_len = candidate.open.chars().count() - 1;
        let prefix = char_slice(&candidate.open, 0, prefix_len);
        let matches = positions.iter().all(|pos| {
            pos.column > prefix_len
                && char_slice(&ctx.line(pos.line), pos.column - 1 - prefix_len, pos.column - 1) == prefix
        });
        if matches {
            best = Some(candidate);
        }
    }
    best
}

/// Returns `true` if `after` closes another auto-closing pair.
fn is_before_closing_brace(ctx: &OpContext<'_>, pair: &AutoClosingPair, after: char) -> bool {
    let Some(language) = ctx.language else {
        return false;
    };
    let symmetric = pair.open == pair.close;
    language
        .auto_closing_pairs
        .iter()
        .filter(|other| other.close.chars().eq(std::iter::once(after)))
        .any(|other| symmetric || other.open != other.close)
}

fn allowed_before(ctx: &OpContext<'_>, strategy: AutoClosingStrategy, after: char) -> bool {
    match strategy {
        AutoClosingStrategy::Always => {
            is_blank(after) || ctx.language.is_some_and(|l| l.is_auto_closing_close_char(after))
        }
        AutoClosingStrategy::LanguageDefined => ctx
            .language
            .is_some_and(|l| l.auto_close_before_chars().contains(after)),
        AutoClosingStrategy::BeforeWhitespace => is_blank(after),
        AutoClosingStrategy::Never => false,
    }
}

/// Insert the opening character and its closing partner.
fn auto_close_open(ctx: &OpContext<'_>, selections: &[Selection], ch: char) -> Option<EditResult> {
    let strategy = closing_strategy(ctx, ch);
    if strategy == AutoClosingStrategy::Never || selections.iter().any(|s| !s.is_empty()) {
        return None;
    }
    let positions: Vec<Position> = selections.iter().map(|s| s.active).collect();
    let pair = find_auto_closing_pair(ctx, &positions, ch)?;
    let single_quote = pair.open.chars().count() == 1 && quote_char(ch);

    for pos in &positions {
        let chars: Vec<char> = ctx.line(pos.line).chars().collect();
        if let Some(&after) = chars.get(pos.column - 1) {
            if !is_before_closing_brace(ctx, pair, after) && !allowed_before(ctx, strategy, after) {
                return None;
            }
        }
        if single_quote && strategy != AutoClosingStrategy::Always && pos.column > 1 {
            if is_word_char(chars[pos.column - 2], &ctx.config.word_separators) {
                return None;
            }
        }
        if !pair.is_ok_in(ctx.tokenizer.scope_at(ctx.model, *pos)) {
            return None;
        }
    }

    let column_delta = -char_len(&pair.close);
    let cursors = selections
        .iter()
        .map(|sel| {
            CursorEdit::with_recipe(CursorRecipe::AfterEdit {
                edit: 0,
                line_delta: 0,
                column_delta,
            })
            .edit(EditOperation::replace(sel.range(), format!("{ch}{}", pair.close)))
        })
        .collect();
    Some(EditResult::new(EditKind::Typing, cursors).push_before(true))
}

/// Wrap every non-empty selection in the pair opened by `ch`.
fn surround(ctx: &OpContext<'_>, selections: &[Selection], ch: char) -> Option<EditResult> {
    let language = ctx.language?;
    let is_quote = quote_char(ch);
    let enabled = match ctx.config.auto_surround {
        AutoSurroundStrategy::LanguageDefined => true,
        AutoSurroundStrategy::Quotes => is_quote,
        AutoSurroundStrategy::Brackets => !is_quote,
        AutoSurroundStrategy::Never => false,
    };
    if !enabled {
        return None;
    }
    let pair = language
        .effective_surrounding_pairs()
        .into_iter()
        .find(|p| p.open.chars().eq(std::iter::once(ch)))?;

    for sel in selections {
        if sel.is_empty() {
            return None;
        }
        let selected = ctx.model.get_value_in_range(sel.range(), crate::EndOfLinePreference::Lf);
        if selected.chars().all(|c| is_blank(c) || c == '\n') {
            return None;
        }
        if is_quote && sel.start().line == sel.end().line && selected.chars().count() == 1 && is_quote_text(&selected) {
            return None;
        }
    }

    let cursors = selections
        .iter()
        .map(|sel| {
            CursorEdit::with_recipe(CursorRecipe::BetweenEdits {
                open: 0,
                close: 1,
                direction: SelectionDirection::Forward,
            })
            .edit(EditOperation::insert(sel.start(), pair.open.as_str()))
            .edit(EditOperation::insert(sel.end(), pair.close.as_str()))
        })
        .collect();
    Some(EditResult::new(EditKind::Other, cursors).push_before(true).push_after(true))
}

/// Replace the `count` characters before every caret with `text` (IME composition update).
/// Non-empty selections are left alone.
pub(crate) fn replace_previous_char(
    selections: &[Selection],
    text: &str,
    count: usize,
    prev: EditKind,
) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| {
            if !sel.is_empty() {
                return CursorEdit::tracked();
            }
            let pos = sel.active;
            let start = pos.column.saturating_sub(count).max(1);
            CursorEdit::single(EditOperation::replace(
                Range::from_coords(pos.line, start, pos.line, pos.column),
                text,
            ))
        })
        .collect();
    EditResult::new(EditKind::Typing, cursors).push_before(prev != EditKind::Typing)
}

/// After an IME composition committed a character, run the auto-closing logic the
/// composition bypassed: overtype a closing character or auto-close an opening one.
///
/// `started` holds the selections from when the composition began; nothing happens if the
/// composition left them unchanged.
pub(crate) fn composition_end(
    ctx: &OpContext<'_>,
    started: &[Selection],
    selections: &[Selection],
) -> Option<EditResult> {
    if started == selections || selections.iter().any(|s| !s.is_empty()) {
        return None;
    }
    let language = ctx.language?;

    let lines: Vec<Vec<char>> = selections
        .iter()
        .map(|s| ctx.line(s.active.line).chars().collect())
        .collect();
    let mut typed = None;
    for (sel, chars) in selections.iter().zip(&lines) {
        let column = sel.active.column;
        let ch = *chars.get(column.checked_sub(2)?)?;
        if typed.is_some_and(|t| t != ch) {
            return None;
        }
        typed = Some(ch);
    }
    let ch = typed?;

    if ctx.config.auto_closing_overtype {
        if let Some(pair) = language
            .auto_closing_pairs
            .iter()
            .find(|p| p.close.chars().eq(std::iter::once(ch)))
        {
            let symmetric = pair.open == pair.close;
            let all = selections.iter().zip(&lines).all(|(sel, chars)| {
                let column = sel.active.column;
                chars.get(column - 1) == Some(&ch)
                    && (!symmetric || count_of(&chars[..column - 2], ch) % 2 == 1)
            });
            if all {
                let cursors = selections
                    .iter()
                    .map(|sel| {
                        let pos = sel.active;
                        CursorEdit::single(EditOperation::delete(Range::from_coords(
                            pos.line,
                            pos.column,
                            pos.line,
                            pos.column + 1,
                        )))
                    })
                    .collect();
                return Some(EditResult::new(EditKind::Typing, cursors).push_before(true));
            }
        }
    }

    let strategy = closing_strategy(ctx, ch);
    if strategy == AutoClosingStrategy::Never {
        return None;
    }
    let pair = language
        .auto_closing_pairs_ending_with(ch)
        .filter(|p| {
            selections.iter().zip(&lines).all(|(sel, chars)| {
                let before: String = chars[..sel.active.column - 1].iter().collect();
                before.ends_with(p.open.as_str())
            })
        })
        .max_by_key(|p| p.open.chars().count())?;
    let single_quote = pair.open.chars().count() == 1 && quote_char(ch);

    for (sel, chars) in selections.iter().zip(&lines) {
        let column = sel.active.column;
        if chars.get(column - 1).is_some_and(|&after| !is_blank(after)) {
            return None;
        }
        if pair.open == pair.close && count_of(&chars[..column - 2], ch) % 2 == 1 {
            return None;
        }
        if single_quote
            && strategy != AutoClosingStrategy::Always
            && column > 2
            && is_word_char(chars[column - 3], &ctx.config.word_separators)
        {
            return None;
        }
        let typed_at = Position::new(sel.active.line, column - 1);
        if !pair.is_ok_in(ctx.tokenizer.scope_at(ctx.model, typed_at)) {
            return None;
        }
    }

    let cursors = selections
        .iter()
        .map(|sel| {
            CursorEdit::with_recipe(CursorRecipe::BeforeEdit { edit: 0 })
                .edit(EditOperation::insert(sel.active, pair.close.as_str()))
        })
        .collect();
    Some(EditResult::new(EditKind::Typing, cursors).push_before(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EditOperationBuilder;
    use crate::ops::test_support::context;
    use crate::{CursorConfig, EndOfLinePreference, TextModel, TrackedRangeStickiness};
    use cursor_core_lang::{LanguageConfiguration, Pattern, ScopeKind};

    fn auto_closing_language() -> LanguageConfiguration {
        LanguageConfiguration::new()
            .with_brackets([("{", "}"), ("[", "]"), ("(", ")")])
            .with_auto_closing_pairs(vec![
                AutoClosingPair::new("{", "}"),
                AutoClosingPair::new("[", "]"),
                AutoClosingPair::new("(", ")"),
                AutoClosingPair::new("'", "'").not_in([ScopeKind::String, ScopeKind::Comment]),
                AutoClosingPair::new("\"", "\"").not_in([ScopeKind::String]),
                AutoClosingPair::new("`", "`").not_in([ScopeKind::String, ScopeKind::Comment]),
                AutoClosingPair::new("/**", " */").not_in([ScopeKind::String]),
            ])
    }

    fn indent_rules_language() -> LanguageConfiguration {
        LanguageConfiguration::new().with_indentation_rules(IndentationRules::new(
            Pattern::new(r"^.*\{[^}]*$").unwrap(),
            Pattern::new(r"^\s*\}").unwrap(),
        ))
    }

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

    fn type_char(
        model: &mut TextModel,
        lang: Option<&LanguageConfiguration>,
        selections: &[Selection],
        ch: char,
    ) -> Vec<Selection> {
        let config = CursorConfig::default();
        let result = type_with_interceptors(&context(model, &config, lang), selections, ch, EditKind::Other);
        apply(model, result, selections)
    }

    fn caret(line: usize, column: usize) -> Selection {
        Selection::caret(Position::new(line, column))
    }

    #[test]
    fn test_enter_between_brackets_opens_an_indented_line() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("    f() {}");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 10)], '\n');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "    f() {\n        \n    }");
        assert_eq!(after, vec![caret(2, 9)]);
    }

    #[test]
    fn test_enter_after_open_bracket_indents() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("if (x) {");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 9)], '\n');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "if (x) {\n    ");
        assert_eq!(after, vec![caret(2, 5)]);
    }

    #[test]
    fn test_enter_keeps_indentation_up_to_the_caret() {
        let mut model = TextModel::new("\t\tab");
        let after = type_char(&mut model, None, &[caret(1, 2)], '\n');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "\t\n    \tab");
        assert_eq!(after, vec![caret(2, 5)]);
    }

    #[test]
    fn test_enter_with_indentation_rules_outdents_closing_line() {
        let lang = indent_rules_language();
        let mut model = TextModel::new("fn a() {\n    x}");
        let after = type_char(&mut model, Some(&lang), &[caret(2, 6)], '\n');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "fn a() {\n    x\n}");
        assert_eq!(after, vec![caret(3, 1)]);
    }

    #[test]
    fn test_electric_close_brace_outdents() {
        let lang = indent_rules_language();
        let mut model = TextModel::new("fn a() {\n    x\n    ");
        let after = type_char(&mut model, Some(&lang), &[caret(3, 5)], '}');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "fn a() {\n    x\n}");
        assert_eq!(after, vec![caret(3, 2)]);
    }

    #[test]
    fn test_auto_close_before_whitespace_and_closers() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("var a = [];");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 10)], '(');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "var a = [()];");
        assert_eq!(after, vec![caret(1, 11)]);

        let mut model = TextModel::new("var a = x;");
        type_char(&mut model, Some(&lang), &[caret(1, 9)], '(');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "var a = (x;");
    }

    #[test]
    fn test_quote_does_not_auto_close_after_word() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("abc ");
        type_char(&mut model, Some(&lang), &[caret(1, 4)], '\'');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "abc' ");

        let mut model = TextModel::new("abc ");
        type_char(&mut model, Some(&lang), &[caret(1, 5)], '\'');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "abc ''");
    }

    #[test]
    fn test_multi_char_open_closes_with_its_tail() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("/*");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 3)], '*');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "/** */");
        assert_eq!(after, vec![caret(1, 4)]);
    }

    #[test]
    fn test_overtype_closing_character() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("f()");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 3)], ')');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "f()");
        assert_eq!(after, vec![caret(1, 4)]);

        let mut model = TextModel::new("''");
        let after = type_char(&mut model, Some(&lang), &[caret(1, 2)], '\'');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "''");
        assert_eq!(after, vec![caret(1, 3)]);
    }

    #[test]
    fn test_surround_selections() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("var a = asd");
        let selections = [Selection::new(1, 1, 1, 4), Selection::new(1, 9, 1, 12)];
        let after = type_char(&mut model, Some(&lang), &selections, '`');
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "`var` a = `asd`");
        assert_eq!(after, vec![Selection::new(1, 2, 1, 5), Selection::new(1, 12, 1, 15)]);
    }

    #[test]
    fn test_surround_respects_strategy() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("var a = asd");
        let config = CursorConfig {
            auto_surround: AutoSurroundStrategy::Quotes,
            ..CursorConfig::default()
        };
        let selections = [Selection::new(1, 1, 1, 4)];
        let result = type_with_interceptors(&context(&model, &config, Some(&lang)), &selections, '(', EditKind::Other);
        apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "( a = asd");
    }

    #[test]
    fn test_plain_typing_undo_stops() {
        let selections = [caret(1, 1)];
        assert!(type_without_interceptors(&selections, "ab", EditKind::Other).push_before);
        assert!(!type_without_interceptors(&selections, "ab", EditKind::Typing).push_before);

        let model = TextModel::new("");
        let config = CursorConfig::default();
        let ctx = context(&model, &config, None);
        assert!(!type_with_interceptors(&ctx, &selections, 'a', EditKind::Typing).push_before);
        assert!(type_with_interceptors(&ctx, &selections, ' ', EditKind::Typing).push_before);
    }

    #[test]
    fn test_replace_previous_char() {
        let mut model = TextModel::new("abc");
        let selections = [caret(1, 3)];
        let result = replace_previous_char(&selections, "Z", 2, EditKind::Typing);
        assert!(!result.push_before);
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "Zc");
        assert_eq!(after, vec![caret(1, 2)]);
    }

    #[test]
    fn test_composition_end_auto_closes_quote() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("x = '");
        let config = CursorConfig::default();
        let started = [caret(1, 5)];
        let selections = [caret(1, 6)];
        let result = composition_end(&context(&model, &config, Some(&lang)), &started, &selections).unwrap();
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "x = ''");
        assert_eq!(after, vec![caret(1, 6)]);
    }

    #[test]
    fn test_composition_end_overtypes_quote() {
        let lang = auto_closing_language();
        let mut model = TextModel::new("'a''");
        let config = CursorConfig::default();
        let selections = [caret(1, 4)];
        let result = composition_end(&context(&model, &config, Some(&lang)), &[caret(1, 3)], &selections).unwrap();
        let after = apply(&mut model, result, &selections);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "'a'");
        assert_eq!(after, vec![caret(1, 4)]);
    }

    #[test]
    fn test_composition_end_needs_a_change() {
        let lang = auto_closing_language();
        let model = TextModel::new("x = '");
        let config = CursorConfig::default();
        let selections = [caret(1, 6)];
        assert!(composition_end(&context(&model, &config, Some(&lang)), &selections, &selections).is_none());
    }
}
