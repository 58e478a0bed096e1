use crate::{
    AutoClosingPair, CharacterPair, DEFAULT_AUTO_CLOSE_BEFORE, EnterAction, IndentAction,
    IndentationRules, OnEnterRule, Pattern,
};

/// Everything the cursor core needs to know about a language.
///
/// Every field is optional in spirit: an empty configuration disables the language-aware
/// features and leaves plain insertion behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageConfiguration {
    /// Bracket pairs, used by the built-in Enter logic between brackets.
    pub brackets: Vec<CharacterPair>,
    /// Indentation regexes.
    pub indentation_rules: Option<IndentationRules>,
    /// Rules evaluated (in order) when Enter is pressed.
    pub on_enter_rules: Vec<OnEnterRule>,
    /// Pairs that auto-close when the opening text is typed.
    pub auto_closing_pairs: Vec<AutoClosingPair>,
    /// Characters before which pairs auto-close with the `languageDefined` strategy.
    pub auto_close_before: Option<String>,
    /// Pairs that wrap a selection. Falls back to `auto_closing_pairs` when empty.
    pub surrounding_pairs: Vec<CharacterPair>,
    /// What counts as a word for word navigation.
    pub word_pattern: Option<Pattern>,
}

impl LanguageConfiguration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bracket pairs.
    pub fn with_brackets<I, O, C>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, C)>,
        O: Into<String>,
        C: Into<String>,
    {
        self.brackets = pairs
            .into_iter()
            .map(|(o, c)| CharacterPair::new(o, c))
            .collect();
        self
    }

    /// Set the indentation rules.
    pub fn with_indentation_rules(mut self, rules: IndentationRules) -> Self {
        self.indentation_rules = Some(rules);
        self
    }

    /// Add an on-enter rule.
    pub fn with_on_enter_rule(mut self, rule: OnEnterRule) -> Self {
        self.on_enter_rules.push(rule);
        self
    }

    /// Set the auto-closing pairs.
    pub fn with_auto_closing_pairs(mut self, pairs: Vec<AutoClosingPair>) -> Self {
        self.auto_closing_pairs = pairs;
        self
    }

    /// Set the `autoCloseBefore` characters.
    pub fn with_auto_close_before(mut self, chars: impl Into<String>) -> Self {
        self.auto_close_before = Some(chars.into());
        self
    }

    /// Set the surrounding pairs.
    pub fn with_surrounding_pairs<I, O, C>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, C)>,
        O: Into<String>,
        C: Into<String>,
    {
        self.surrounding_pairs = pairs
            .into_iter()
            .map(|(o, c)| CharacterPair::new(o, c))
            .collect();
        self
    }

    /// Set the word pattern.
    pub fn with_word_pattern(mut self, pattern: Pattern) -> Self {
        self.word_pattern = Some(pattern);
        self
    }

    /// Characters before which `languageDefined` auto-closing applies.
    pub fn auto_close_before_chars(&self) -> &str {
        self.auto_close_before
            .as_deref()
            .unwrap_or(DEFAULT_AUTO_CLOSE_BEFORE)
    }

    /// The pairs used to surround selections.
    pub fn effective_surrounding_pairs(&self) -> Vec<CharacterPair> {
        if !self.surrounding_pairs.is_empty() {
            return self.surrounding_pairs.clone();
        }
        self.auto_closing_pairs
            .iter()
            .map(|p| CharacterPair::new(p.open.clone(), p.close.clone()))
            .collect()
    }

    /// Auto-closing pairs whose opening text ends with `ch`.
    pub fn auto_closing_pairs_ending_with(&self, ch: char) -> impl Iterator<Item = &AutoClosingPair> {
        self.auto_closing_pairs
            .iter()
            .filter(move |p| p.open.ends_with(ch))
    }

    /// Returns `true` if `ch` is the closing text of some auto-closing pair.
    pub fn is_auto_closing_close_char(&self, ch: char) -> bool {
        self.auto_closing_pairs
            .iter()
            .any(|p| p.close.chars().eq(std::iter::once(ch)))
    }

    /// Evaluate Enter at a cursor.
    ///
    /// `before` and `after` are the current line's text around the cursor and
    /// `one_line_above` is the previous line. Explicit rules are tried in order; then text
    /// sitting between a bracket pair yields [`IndentAction::IndentOutdent`] and text after an
    /// opening bracket yields [`IndentAction::Indent`].
    pub fn on_enter(&self, one_line_above: &str, before: &str, after: &str) -> Option<EnterAction> {
        if let Some(rule) = self
            .on_enter_rules
            .iter()
            .find(|r| r.matches(one_line_above, before, after))
        {
            return Some(rule.action.clone());
        }

        if !before.is_empty() && !after.is_empty() {
            let between = self.brackets.iter().any(|b| {
                before.trim_end().ends_with(b.open.as_str())
                    && after.trim_start().starts_with(b.close.as_str())
            });
            if between {
                return Some(EnterAction::new(IndentAction::IndentOutdent));
            }
        }

        if !before.is_empty()
            && self
                .brackets
                .iter()
                .any(|b| before.trim_end().ends_with(b.open.as_str()))
        {
            return Some(EnterAction::new(IndentAction::Indent));
        }

        None
    }
}
