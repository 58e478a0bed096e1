//! Indentation commands and inherited indentation.
//!
//! [`inherit_indent`] answers "how should line N be indented, judging by the lines above it"
//! from a language's indentation rules. Tab, Indent/Outdent and line insertion build on it.

use cursor_core_lang::{EnterAction, IndentAction, IndentationRules, LanguageConfiguration};

use super::{EditKind, EditResult, OpContext, char_slice, typing};
use crate::builder::{CursorEdit, CursorRecipe};
use crate::columns::{
    first_non_whitespace_index, is_whitespace_only, leading_whitespace, visible_column_from_column,
};
use crate::{EditOperation, Position, Range, Selection};

/// Indentation inherited from preceding lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InheritedIndent {
    pub(crate) indentation: String,
    /// The line should be indented one level deeper than `indentation`.
    pub(crate) indent: bool,
}

impl InheritedIndent {
    fn keep(indentation: &str) -> Self {
        Self {
            indentation: indentation.to_string(),
            indent: false,
        }
    }

    fn deeper(indentation: &str) -> Self {
        Self {
            indentation: indentation.to_string(),
            indent: true,
        }
    }
}

/// The nearest line above `line` that is neither blank nor ignored by the rules.
fn preceding_valid_line<F>(rules: &IndentationRules, line: usize, content: &F) -> Option<usize>
where
    F: Fn(usize) -> String,
{
    (1..line).rev().find(|&l| {
        let text = content(l);
        !(rules.should_ignore(&text) || is_whitespace_only(&text))
    })
}

/// Walk up from `from` while lines only indent the next line; the indentation of the first
/// line of that chain.
fn indent_next_line_chain_start<F>(rules: &IndentationRules, from: usize, content: &F) -> String
where
    F: Fn(usize) -> String,
{
    let stop = (1..from)
        .rev()
        .find(|&l| !rules.should_indent_next_line(&content(l)))
        .unwrap_or(0);
    leading_whitespace(&content(stop + 1)).to_string()
}

/// Indentation for `line` inherited from the lines above it.
///
/// `content` returns the text of a line, which lets callers pretend a line holds something
/// else. With `honor_intentional` set, an unremarkable preceding line's indentation is kept
/// as is; otherwise the search continues upwards for a line that explains it. Returns `None`
/// when every line above is blank or ignored.
pub(crate) fn inherit_indent<F>(
    rules: &IndentationRules,
    line: usize,
    honor_intentional: bool,
    content: F,
) -> Option<InheritedIndent>
where
    F: Fn(usize) -> String,
{
    if line <= 1 {
        return Some(InheritedIndent::keep(""));
    }
    let preceding = preceding_valid_line(rules, line, &content)?;
    let preceding_text = content(preceding);
    let preceding_indent = leading_whitespace(&preceding_text);

    if rules.should_increase(&preceding_text) || rules.should_indent_next_line(&preceding_text) {
        return Some(InheritedIndent::deeper(preceding_indent));
    }
    if rules.should_decrease(&preceding_text) {
        return Some(InheritedIndent::keep(preceding_indent));
    }
    if preceding == 1 {
        return Some(InheritedIndent::keep(preceding_indent));
    }

    let previous = rules.metadata(&content(preceding - 1));
    if !(previous.increase || previous.decrease) && previous.indent_next_line {
        return Some(InheritedIndent {
            indentation: indent_next_line_chain_start(rules, preceding - 1, &content),
            indent: false,
        });
    }

    if honor_intentional {
        return Some(InheritedIndent::keep(preceding_indent));
    }

    for l in (1..=preceding).rev() {
        let text = content(l);
        if rules.should_increase(&text) {
            return Some(InheritedIndent::deeper(leading_whitespace(&text)));
        }
        if rules.should_indent_next_line(&text) {
            return Some(InheritedIndent {
                indentation: indent_next_line_chain_start(rules, l, &content),
                indent: false,
            });
        }
        if rules.should_decrease(&text) {
            return Some(InheritedIndent::keep(leading_whitespace(&text)));
        }
    }
    Some(InheritedIndent::keep(leading_whitespace(&content(1))))
}

/// On-enter evaluation with the append text filled in: a tab for indenting actions, nothing
/// otherwise.
pub(crate) fn enter_action(
    language: &LanguageConfiguration,
    one_line_above: &str,
    before: &str,
    after: &str,
) -> Option<EnterAction> {
    let mut action = language.on_enter(one_line_above, before, after)?;
    if action.append_text.as_deref().is_none_or(str::is_empty) {
        let text = match action.indent_action {
            IndentAction::Indent | IndentAction::IndentOutdent => "\t",
            IndentAction::None | IndentAction::Outdent => "",
        };
        action.append_text = Some(text.to_string());
    }
    Some(action)
}

/// `indentation` with `count` chars removed from its end.
pub(crate) fn remove_from_end(indentation: &str, count: usize) -> String {
    let len = indentation.chars().count();
    char_slice(indentation, 0, len.saturating_sub(count))
}

/// The indentation Tab should produce on the blank line `line`, or `None` when nothing
/// suggests one.
fn good_indent_for_line(ctx: &OpContext<'_>, line: usize) -> Option<String> {
    let inherited = ctx
        .indentation_rules()
        .and_then(|rules| inherit_indent(rules, line, false, |l| ctx.line(l)));

    let indentation = if let Some(inherited) = inherited {
        let indentation = if inherited.indent {
            ctx.shift_indent(&inherited.indentation)
        } else {
            inherited.indentation
        };
        ctx.normalize_indentation(&indentation)
    } else {
        let language = ctx.language?;
        let last = (1..line).rev().find(|&l| !is_whitespace_only(&ctx.line(l)))?;
        let text = ctx.line(last);
        let above = if last > 1 { ctx.line(last - 1) } else { String::new() };
        let action = enter_action(language, &above, &text, "")?;
        let indentation = remove_from_end(leading_whitespace(&text), action.remove_text.unwrap_or(0));
        let appended = format!("{indentation}{}", action.append_text.unwrap_or_default());
        ctx.normalize_indentation(&appended)
    };

    (!indentation.is_empty()).then_some(indentation)
}

/// Whitespace from `pos` to the next tab stop (or a tab).
fn jump_to_next_indent(ctx: &OpContext<'_>, pos: Position) -> String {
    if ctx.insert_spaces() {
        let tab_size = ctx.tab_size().max(1);
        let x = visible_column_from_column(&ctx.line(pos.line), pos.column, tab_size);
        " ".repeat(tab_size - x % tab_size)
    } else {
        "\t".to_string()
    }
}

/// Tab key.
pub(crate) fn tab(ctx: &OpContext<'_>, selections: &[Selection]) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| {
            if sel.is_empty() {
                let line = sel.active.line;
                let text = ctx.line(line);
                if is_whitespace_only(&text) {
                    let good = good_indent_for_line(ctx, line).unwrap_or_else(|| "\t".to_string());
                    let possible = ctx.normalize_indentation(&good);
                    if !text.starts_with(&possible) {
                        let whole_line = Range::from_coords(line, 1, line, ctx.model.line_max_column(line));
                        return CursorEdit::with_recipe(CursorRecipe::AFTER_FIRST_EDIT)
                            .auto_whitespace_edit(EditOperation::replace(whole_line, possible));
                    }
                }
                let jump = jump_to_next_indent(ctx, sel.start());
                return CursorEdit::with_recipe(CursorRecipe::AFTER_FIRST_EDIT)
                    .auto_whitespace_edit(EditOperation::replace(sel.range(), jump));
            }

            let (start, end) = (sel.start(), sel.end());
            if start.line == end.line
                && (start.column != 1 || end.column != ctx.model.line_max_column(start.line))
            {
                return CursorEdit::single(EditOperation::replace(
                    sel.range(),
                    jump_to_next_indent(ctx, start),
                ));
            }
            shift_selection(ctx, *sel, false)
        })
        .collect();

    EditResult::isolated(EditKind::Other, cursors)
}

/// Indent (or outdent) the lines of every selection.
pub(crate) fn shift(ctx: &OpContext<'_>, selections: &[Selection], outdent: bool) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| shift_selection(ctx, *sel, outdent))
        .collect();
    EditResult::isolated(EditKind::Other, cursors)
}

/// Spaces that belong to the alignment requested by the previous line's on-enter rule rather
/// than to the indentation of `line`.
fn alignment_spaces(ctx: &OpContext<'_>, line: usize, previous_extra: usize) -> Option<usize> {
    let language = ctx.language?;
    let previous = ctx.line(line - 1);
    let above = if line > 2 { ctx.line(line - 2) } else { String::new() };
    let action = language.on_enter(&above, &previous, "")?;

    let indent_size = ctx.tab_size();
    let mut extra = previous_extra;
    if let Some(append) = &action.append_text {
        for ch in append.chars() {
            if ch != ' ' || extra >= indent_size {
                break;
            }
            extra += 1;
        }
    }
    if let Some(remove) = action.remove_text {
        extra = extra.saturating_sub(remove);
    }
    Some(extra)
}

fn shift_selection(ctx: &OpContext<'_>, sel: Selection, outdent: bool) -> CursorEdit {
    let start_line = sel.start().line;
    let mut end_line = sel.end().line;
    if sel.end().column == 1 && start_line != end_line {
        end_line -= 1;
    }
    let indent_empty_lines = start_line == end_line;
    let tab_size = ctx.tab_size().max(1);

    let mut after_last_edit = false;
    let mut start_column_stays_put = false;
    let mut ops = Vec::new();

    if ctx.config.use_tab_stops {
        if sel.is_empty() && is_whitespace_only(&ctx.line(start_line)) {
            after_last_edit = true;
        }
        let mut extra_spaces = 0;
        for line in start_line..=end_line {
            let previous_extra = extra_spaces;
            extra_spaces = 0;

            let text = ctx.line(line);
            let chars: Vec<char> = text.chars().collect();
            let first = first_non_whitespace_index(&text);
            if outdent && (chars.is_empty() || first == Some(0)) {
                continue;
            }
            if !indent_empty_lines && !outdent && chars.is_empty() {
                continue;
            }
            let mut indent_end = first.unwrap_or(chars.len());

            if line > 1 && visible_column_from_column(&text, indent_end + 1, tab_size) % tab_size != 0 {
                if let Some(extra) = alignment_spaces(ctx, line, previous_extra) {
                    extra_spaces = extra;
                    for _ in 0..extra {
                        if indent_end == 0 || chars[indent_end - 1] != ' ' {
                            break;
                        }
                        indent_end -= 1;
                    }
                }
            }
            if outdent && indent_end == 0 {
                continue;
            }

            let indentation = char_slice(&text, 0, indent_end);
            let desired = if outdent {
                ctx.unshift_indent(&indentation)
            } else {
                ctx.shift_indent(&indentation)
            };
            ops.push(EditOperation::replace(
                Range::from_coords(line, 1, line, indent_end + 1),
                desired,
            ));
            if line == start_line && !sel.is_empty() {
                start_column_stays_put = sel.start().column <= indent_end + 1;
            }
        }
    } else {
        if !outdent && sel.is_empty() && ctx.model.line_length(start_line) == 0 {
            after_last_edit = true;
        }
        let one_indent = if ctx.insert_spaces() {
            " ".repeat(tab_size)
        } else {
            "\t".to_string()
        };
        for line in start_line..=end_line {
            let text = ctx.line(line);
            let first = first_non_whitespace_index(&text);
            if outdent && (text.is_empty() || first == Some(0)) {
                continue;
            }
            if !indent_empty_lines && !outdent && text.is_empty() {
                continue;
            }
            let indent_end = first.unwrap_or_else(|| text.chars().count());
            if outdent && indent_end == 0 {
                continue;
            }

            if outdent {
                let limit = indent_end.min(tab_size);
                let end = text
                    .chars()
                    .take(limit)
                    .position(|c| c == '\t')
                    .map_or(limit, |i| i + 1);
                ops.push(EditOperation::delete(Range::from_coords(line, 1, line, end + 1)));
            } else {
                ops.push(EditOperation::insert(Position::new(line, 1), one_indent.clone()));
                if line == start_line && !sel.is_empty() {
                    start_column_stays_put = sel.start().column == 1;
                }
            }
        }
    }

    let recipe = if after_last_edit && !ops.is_empty() {
        CursorRecipe::AfterEdit {
            edit: ops.len() - 1,
            line_delta: 0,
            column_delta: 0,
        }
    } else {
        CursorRecipe::Tracked {
            start_column_stays_put,
        }
    };
    ops.into_iter()
        .fold(CursorEdit::with_recipe(recipe), CursorEdit::edit)
}

/// Open an empty line above (`before`) or below each cursor's line.
pub(crate) fn line_insert(ctx: &OpContext<'_>, selections: &[Selection], before: bool) -> EditResult {
    let cursors = selections
        .iter()
        .map(|sel| {
            let line = sel.active.line;
            if before && line == 1 {
                return CursorEdit::with_recipe(CursorRecipe::BeforeEdit { edit: 0 })
                    .edit(EditOperation::insert(Position::new(1, 1), "\n"));
            }
            let target = if before { line - 1 } else { line };
            let end = Position::new(target, ctx.model.line_max_column(target));
            typing::enter(ctx, Range::empty_at(end))
        })
        .collect();

    EditResult::new(EditKind::Other, cursors).push_before(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::context;
    use crate::{CursorConfig, EndOfLinePreference, TextModel};
    use cursor_core_lang::Pattern;

    fn rules() -> IndentationRules {
        IndentationRules::new(
            Pattern::new(r"^.*\{[^}]*$").unwrap(),
            Pattern::new(r"^\s*\}").unwrap(),
        )
        .with_indent_next_line(Pattern::new(r"^\s*(if|while)\b.*\)\s*$").unwrap())
    }

    fn lines<'a>(text: &'a [&'a str]) -> impl Fn(usize) -> String + 'a {
        move |l| text.get(l - 1).map_or_else(String::new, |s| s.to_string())
    }

    #[test]
    fn test_inherit_after_increase_line() {
        let text = ["fn main() {", "", "x"];
        let r = inherit_indent(&rules(), 3, false, lines(&text)).unwrap();
        assert_eq!(r, InheritedIndent::deeper(""));
        assert_eq!(inherit_indent(&rules(), 1, false, lines(&text)), Some(InheritedIndent::keep("")));
    }

    #[test]
    fn test_inherit_all_blank_above() {
        let text = ["", "  ", "x"];
        assert_eq!(inherit_indent(&rules(), 3, false, lines(&text)), None);
    }

    #[test]
    fn test_inherit_after_indent_next_line_chain() {
        let text = ["    if (a)", "        b();", "x"];
        let r = inherit_indent(&rules(), 3, true, lines(&text)).unwrap();
        assert_eq!(r, InheritedIndent::keep("    "));
    }

    #[test]
    fn test_inherit_searches_upwards_unless_intentional() {
        let text = ["{", "  a", "      b", "x"];
        assert_eq!(
            inherit_indent(&rules(), 4, true, lines(&text)),
            Some(InheritedIndent::keep("      "))
        );
        assert_eq!(
            inherit_indent(&rules(), 4, false, lines(&text)),
            Some(InheritedIndent::deeper(""))
        );
    }

    fn apply(model: &mut TextModel, result: EditResult, selections: &[Selection]) -> Vec<Selection> {
        let mut builder = crate::builder::EditOperationBuilder::new();
        for (sel, edit) in selections.iter().zip(result.cursors) {
            let marker = model.track_range(
                sel.range(),
                crate::TrackedRangeStickiness::AlwaysGrowsWhenTypingAtEdges,
            );
            builder.add_cursor(*sel, Some(marker), edit);
        }
        let built = builder.build();
        model
            .push_edits(selections, built.edits, &built.computer)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_tab_jumps_to_next_tab_stop() {
        let mut model = TextModel::new("ab\n");
        let config = CursorConfig::default();
        let sel = [Selection::caret(Position::new(1, 2))];
        let result = tab(&context(&model, &config, None), &sel);
        assert!(result.push_before && result.push_after);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "a   b\n");
        assert_eq!(after, vec![Selection::caret(Position::new(1, 5))]);
    }

    #[test]
    fn test_tab_on_blank_line_uses_inherited_indent() {
        let mut model = TextModel::new("fn main() {\n\n}");
        let config = CursorConfig::default();
        let lang = LanguageConfiguration::new().with_indentation_rules(rules());
        let sel = [Selection::caret(Position::new(2, 1))];
        let result = tab(&context(&model, &config, Some(&lang)), &sel);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "fn main() {\n    \n}");
        assert_eq!(after, vec![Selection::caret(Position::new(2, 5))]);
    }

    #[test]
    fn test_tab_on_full_line_selection_indents() {
        let mut model = TextModel::new("ab\ncd");
        let config = CursorConfig::default();
        let sel = [Selection::new(1, 1, 1, 3)];
        let result = tab(&context(&model, &config, None), &sel);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "    ab\ncd");
        assert_eq!(after, vec![Selection::new(1, 1, 1, 7)]);
    }

    #[test]
    fn test_shift_skips_last_line_at_column_one() {
        let mut model = TextModel::new("a\n\nb\nc");
        let config = CursorConfig::default();
        let sel = [Selection::new(1, 1, 4, 1)];
        let result = shift(&context(&model, &config, None), &sel, false);
        apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "    a\n\n    b\nc");
    }

    #[test]
    fn test_outdent_to_previous_tab_stop() {
        let mut model = TextModel::new("      a\n\tb\nc");
        let config = CursorConfig::default();
        let sel = [Selection::new(1, 1, 3, 2)];
        let result = shift(&context(&model, &config, None), &sel, true);
        apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "    a\nb\nc");
    }

    #[test]
    fn test_outdent_without_tab_stops_stops_after_a_tab() {
        let mut model = TextModel::new(" \t  a");
        let config = CursorConfig {
            use_tab_stops: false,
            ..CursorConfig::default()
        };
        let sel = [Selection::caret(Position::new(1, 5))];
        let result = shift(&context(&model, &config, None), &sel, true);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "  a");
        assert_eq!(after, vec![Selection::caret(Position::new(1, 3))]);
    }

    #[test]
    fn test_line_insert_before_first_line() {
        let mut model = TextModel::new("abc");
        let config = CursorConfig::default();
        let sel = [Selection::caret(Position::new(1, 2))];
        let result = line_insert(&context(&model, &config, None), &sel, true);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "\nabc");
        assert_eq!(after, vec![Selection::caret(Position::new(1, 1))]);
    }

    #[test]
    fn test_line_insert_after_keeps_indentation() {
        let mut model = TextModel::new("    abc\nx");
        let config = CursorConfig::default();
        let sel = [Selection::caret(Position::new(1, 2))];
        let result = line_insert(&context(&model, &config, None), &sel, false);
        let after = apply(&mut model, result, &sel);
        assert_eq!(model.get_value(EndOfLinePreference::Lf), "    abc\n    \nx");
        assert_eq!(after, vec![Selection::caret(Position::new(2, 5))]);
    }
}
