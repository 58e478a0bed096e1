//! Tokenizer seam.

use cursor_core_lang::ScopeKind;

use crate::{Position, TextModel};

/// Pull-based access to the host's last completed tokenization.
///
/// Implementations must answer from whatever result they already have; the controller calls
/// this while handling a keystroke and never waits for fresh tokens.
pub trait Tokenizer: Send + Sync {
    /// Kind of the token that ends at (or contains) the character before `position`.
    fn scope_at(&self, model: &TextModel, position: Position) -> ScopeKind;
}

/// A tokenizer that knows nothing: every position is [`ScopeKind::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullTokenizer;

impl Tokenizer for NullTokenizer {
    fn scope_at(&self, _model: &TextModel, _position: Position) -> ScopeKind {
        ScopeKind::Other
    }
}
