//! Loading `language-configuration.json` documents.
//!
//! Invalid patterns are logged and dropped so a partially broken configuration still
//! provides whatever rules are usable.

use serde::Deserialize;
use tracing::warn;

use crate::{
    AutoClosingPair, CharacterPair, EnterAction, IndentAction, IndentationRules,
    LanguageConfigError, LanguageConfiguration, OnEnterRule, Pattern, ScopeKind,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPattern {
    Source(String),
    WithFlags {
        pattern: String,
        #[serde(default)]
        flags: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPair {
    Tuple(String, String),
    Object {
        open: String,
        close: String,
        #[serde(default, rename = "notIn")]
        not_in: Vec<ScopeKind>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndentationRules {
    increase_indent_pattern: RawPattern,
    decrease_indent_pattern: RawPattern,
    indent_next_line_pattern: Option<RawPattern>,
    un_indented_line_pattern: Option<RawPattern>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnterAction {
    indent: IndentAction,
    append_text: Option<String>,
    remove_text: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOnEnterRule {
    before_text: RawPattern,
    after_text: Option<RawPattern>,
    one_line_above_text: Option<RawPattern>,
    action: RawEnterAction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLanguageConfiguration {
    brackets: Vec<(String, String)>,
    indentation_rules: Option<RawIndentationRules>,
    on_enter_rules: Vec<RawOnEnterRule>,
    auto_closing_pairs: Vec<RawPair>,
    auto_close_before: Option<String>,
    surrounding_pairs: Vec<RawPair>,
    word_pattern: Option<RawPattern>,
}

fn compile(raw: &RawPattern, field: &str) -> Option<Pattern> {
    let result = match raw {
        RawPattern::Source(source) => Pattern::new(source),
        RawPattern::WithFlags { pattern, flags } => Pattern::with_flags(pattern, flags),
    };
    match result {
        Ok(p) => Some(p),
        Err(err) => {
            warn!(field, %err, "dropping invalid language pattern");
            None
        }
    }
}

fn pair_parts(raw: RawPair) -> (String, String, Vec<ScopeKind>) {
    match raw {
        RawPair::Tuple(open, close) => (open, close, Vec::new()),
        RawPair::Object {
            open,
            close,
            not_in,
        } => (open, close, not_in),
    }
}

impl LanguageConfiguration {
    /// Parse a `language-configuration.json` document.
    ///
    /// Only malformed JSON is an error. A rule whose pattern does not compile is skipped; an
    /// indentation rule set missing a valid increase or decrease pattern is skipped whole.
    pub fn from_json(json: &str) -> Result<Self, LanguageConfigError> {
        let raw: RawLanguageConfiguration = serde_json::from_str(json)?;

        let indentation_rules = raw.indentation_rules.and_then(|r| {
            let increase = compile(&r.increase_indent_pattern, "increaseIndentPattern")?;
            let decrease = compile(&r.decrease_indent_pattern, "decreaseIndentPattern")?;
            let mut rules = IndentationRules::new(increase, decrease);
            rules.indent_next_line_pattern = r
                .indent_next_line_pattern
                .as_ref()
                .and_then(|p| compile(p, "indentNextLinePattern"));
            rules.unindented_line_pattern = r
                .un_indented_line_pattern
                .as_ref()
                .and_then(|p| compile(p, "unIndentedLinePattern"));
            Some(rules)
        });

        let on_enter_rules = raw
            .on_enter_rules
            .into_iter()
            .filter_map(|r| {
                let before_text = compile(&r.before_text, "beforeText")?;
                let after_text = match &r.after_text {
                    Some(p) => Some(compile(p, "afterText")?),
                    None => None,
                };
                let one_line_above_text = match &r.one_line_above_text {
                    Some(p) => Some(compile(p, "oneLineAboveText")?),
                    None => None,
                };
                Some(OnEnterRule {
                    before_text,
                    after_text,
                    one_line_above_text,
                    action: EnterAction {
                        indent_action: r.action.indent,
                        append_text: r.action.append_text,
                        remove_text: r.action.remove_text,
                    },
                })
            })
            .collect();

        let auto_closing_pairs = raw
            .auto_closing_pairs
            .into_iter()
            .map(|p| {
                let (open, close, not_in) = pair_parts(p);
                AutoClosingPair::new(open, close).not_in(not_in)
            })
            .collect();

        let surrounding_pairs = raw
            .surrounding_pairs
            .into_iter()
            .map(|p| {
                let (open, close, _) = pair_parts(p);
                CharacterPair::new(open, close)
            })
            .collect();

        Ok(Self {
            brackets: raw
                .brackets
                .into_iter()
                .map(|(o, c)| CharacterPair::new(o, c))
                .collect(),
            indentation_rules,
            on_enter_rules,
            auto_closing_pairs,
            auto_close_before: raw.auto_close_before,
            surrounding_pairs,
            word_pattern: raw
                .word_pattern
                .as_ref()
                .and_then(|p| compile(p, "wordPattern")),
        })
    }
}
