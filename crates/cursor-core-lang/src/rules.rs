//! Indentation and on-enter rules.

use serde::{Deserialize, Serialize};

use crate::Pattern;

/// Regex-driven indentation heuristics for a language.
#[derive(Debug, Clone, PartialEq)]
pub struct IndentationRules {
    /// If a line matches, the lines after it are indented once more.
    pub increase_indent_pattern: Pattern,
    /// If a line matches, it is indented once less than the line above.
    pub decrease_indent_pattern: Pattern,
    /// If a line matches, only the next line is indented once more.
    pub indent_next_line_pattern: Option<Pattern>,
    /// If a line matches, its indentation is ignored when inheriting indentation.
    pub unindented_line_pattern: Option<Pattern>,
}

/// Which of the indentation patterns match a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentMetadata {
    /// `increase_indent_pattern` matched.
    pub increase: bool,
    /// `decrease_indent_pattern` matched.
    pub decrease: bool,
    /// `indent_next_line_pattern` matched.
    pub indent_next_line: bool,
    /// `unindented_line_pattern` matched.
    pub unindented: bool,
}

impl IndentationRules {
    /// Create rules from the two mandatory patterns.
    pub fn new(increase: Pattern, decrease: Pattern) -> Self {
        Self {
            increase_indent_pattern: increase,
            decrease_indent_pattern: decrease,
            indent_next_line_pattern: None,
            unindented_line_pattern: None,
        }
    }

    /// Set `indent_next_line_pattern`.
    pub fn with_indent_next_line(mut self, pattern: Pattern) -> Self {
        self.indent_next_line_pattern = Some(pattern);
        self
    }

    /// Set `unindented_line_pattern`.
    pub fn with_unindented_line(mut self, pattern: Pattern) -> Self {
        self.unindented_line_pattern = Some(pattern);
        self
    }

    /// Does `text` increase the indentation of the following lines?
    pub fn should_increase(&self, text: &str) -> bool {
        self.increase_indent_pattern.is_match(text)
    }

    /// Does `text` sit one level left of the line above?
    pub fn should_decrease(&self, text: &str) -> bool {
        self.decrease_indent_pattern.is_match(text)
    }

    /// Does `text` indent only the next line?
    pub fn should_indent_next_line(&self, text: &str) -> bool {
        self.indent_next_line_pattern
            .as_ref()
            .is_some_and(|p| p.is_match(text))
    }

    /// Should `text` be skipped when looking for the line to inherit indentation from?
    pub fn should_ignore(&self, text: &str) -> bool {
        self.unindented_line_pattern
            .as_ref()
            .is_some_and(|p| p.is_match(text))
    }

    /// Evaluate every pattern against `text`.
    pub fn metadata(&self, text: &str) -> IndentMetadata {
        IndentMetadata {
            increase: self.should_increase(text),
            decrease: self.should_decrease(text),
            indent_next_line: self.should_indent_next_line(text),
            unindented: self.should_ignore(text),
        }
    }
}

/// What to do with the indentation of the line created by Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndentAction {
    /// Keep the current indentation.
    #[default]
    None,
    /// Indent the new line once.
    Indent,
    /// Insert two lines: the first indented once (cursor goes there), the second at the
    /// current indentation.
    IndentOutdent,
    /// Outdent the new line once.
    Outdent,
}

/// The result of evaluating on-enter rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnterAction {
    /// Indentation change.
    pub indent_action: IndentAction,
    /// Text appended after the indentation of the new line.
    pub append_text: Option<String>,
    /// Number of characters removed from the indentation of the new line.
    pub remove_text: Option<usize>,
}

impl EnterAction {
    /// An action with no extra text.
    pub fn new(indent_action: IndentAction) -> Self {
        Self {
            indent_action,
            append_text: None,
            remove_text: None,
        }
    }

    /// Append `text` after the indentation.
    pub fn with_append_text(mut self, text: impl Into<String>) -> Self {
        self.append_text = Some(text.into());
        self
    }

    /// Remove `count` characters of indentation.
    pub fn with_remove_text(mut self, count: usize) -> Self {
        self.remove_text = Some(count);
        self
    }
}

/// A rule evaluated when Enter is pressed.
///
/// All present patterns must match for the rule to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct OnEnterRule {
    /// Matched against the text before the cursor on the current line.
    pub before_text: Pattern,
    /// Matched against the text after the cursor on the current line.
    pub after_text: Option<Pattern>,
    /// Matched against the whole line above the current line.
    pub one_line_above_text: Option<Pattern>,
    /// Action to take.
    pub action: EnterAction,
}

impl OnEnterRule {
    /// Create a rule that only looks at the text before the cursor.
    pub fn new(before_text: Pattern, action: EnterAction) -> Self {
        Self {
            before_text,
            after_text: None,
            one_line_above_text: None,
            action,
        }
    }

    /// Also require the text after the cursor to match.
    pub fn with_after_text(mut self, pattern: Pattern) -> Self {
        self.after_text = Some(pattern);
        self
    }

    /// Also require the line above to match.
    pub fn with_one_line_above_text(mut self, pattern: Pattern) -> Self {
        self.one_line_above_text = Some(pattern);
        self
    }

    /// Returns `true` if every present pattern matches.
    pub fn matches(&self, one_line_above: &str, before: &str, after: &str) -> bool {
        self.before_text.is_match(before)
            && self.after_text.as_ref().is_none_or(|p| p.is_match(after))
            && self
                .one_line_above_text
                .as_ref()
                .is_none_or(|p| p.is_match(one_line_above))
    }
}
