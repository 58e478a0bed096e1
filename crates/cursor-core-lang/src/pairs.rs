use serde::{Deserialize, Serialize};

/// Characters before which a `languageDefined` auto-closing strategy closes a pair, when the
/// language does not provide its own set.
pub const DEFAULT_AUTO_CLOSE_BEFORE: &str = ";:.,=}])> \n\t";

/// Coarse token classification at a position, as reported by an external tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Inside a string literal.
    String,
    /// Inside a comment.
    Comment,
    /// Anything else.
    #[default]
    Other,
}

/// An (open, close) pair used for brackets and surrounding pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterPair {
    /// Opening text.
    pub open: String,
    /// Closing text.
    pub close: String,
}

impl CharacterPair {
    /// Create a pair.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// A pair whose closing text is inserted automatically when the opening text is typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AutoClosingPair {
    /// Opening text. May be longer than one character (e.g. `/**`).
    pub open: String,
    /// Closing text.
    pub close: String,
    /// Token kinds in which the pair must not auto-close.
    pub not_in: Vec<ScopeKind>,
}

impl AutoClosingPair {
    /// Create a pair that auto-closes everywhere.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            not_in: Vec::new(),
        }
    }

    /// Restrict the pair so it does not auto-close inside the given token kinds.
    pub fn not_in(mut self, scopes: impl IntoIterator<Item = ScopeKind>) -> Self {
        self.not_in = scopes.into_iter().collect();
        self
    }

    /// Returns `true` if the pair may auto-close inside a token of kind `scope`.
    pub fn is_ok_in(&self, scope: ScopeKind) -> bool {
        !self.not_in.contains(&scope)
    }

    /// Returns `true` if open and close are the same single quote-like character.
    pub fn is_quote(&self) -> bool {
        is_quote_text(&self.open)
    }
}

/// Returns `true` for the quote characters that use the `autoClosingQuotes` strategy.
pub fn is_quote_text(text: &str) -> bool {
    matches!(text, "'" | "\"" | "`")
}
