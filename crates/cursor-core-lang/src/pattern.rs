//! Compiled language patterns.
//!
//! Language configurations are usually authored with JavaScript-flavoured regular expressions
//! that rely on look-around (`(?!...)`), so patterns are compiled with Oniguruma.

use std::fmt;
use std::sync::Arc;

use onig::{Regex, RegexOptions, SearchOptions, Syntax};

use crate::LanguageConfigError;

/// A compiled regular expression used by indentation, on-enter and word rules.
///
/// Matching is unanchored: [`Pattern::is_match`] succeeds when the pattern matches anywhere in
/// the input, like `RegExp.prototype.test`.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Arc<Regex>,
}

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, LanguageConfigError> {
        Self::with_flags(source, "")
    }

    /// Compile a pattern with JavaScript-style flags. Only `i` changes matching; other flags
    /// (`g`, `m`, `u`, ...) are accepted and ignored.
    pub fn with_flags(source: &str, flags: &str) -> Result<Self, LanguageConfigError> {
        let mut options = RegexOptions::REGEX_OPTION_NONE;
        if flags.contains('i') {
            options |= RegexOptions::REGEX_OPTION_IGNORECASE;
        }
        let regex = Regex::with_options(source, options, Syntax::default()).map_err(|e| {
            LanguageConfigError::RegexCompile {
                pattern: source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            source: source.to_string(),
            regex: Arc::new(regex),
        })
    }

    /// The pattern source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.find_from(text, 0).is_some()
    }

    /// Find the first match starting at or after byte offset `from`.
    ///
    /// Returns the match as a half-open byte range.
    pub fn find_from(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        if from > text.len() {
            return None;
        }
        let mut region = onig::Region::new();
        self.regex.search_with_options(
            text,
            from,
            text.len(),
            SearchOptions::SEARCH_OPTION_NONE,
            Some(&mut region),
        )?;
        region.pos(0)
    }

    /// All non-overlapping, non-empty matches in `text` as byte ranges.
    pub fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut from = 0usize;
        while let Some((start, end)) = self.find_from(text, from) {
            if end > start {
                out.push((start, end));
                from = end;
            } else {
                // Step over one char so an empty match cannot loop forever.
                match text[start..].chars().next() {
                    Some(ch) => from = start + ch.len_utf8(),
                    None => break,
                }
            }
        }
        out
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
