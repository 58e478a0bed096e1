//! Editor and model options.
//!
//! Both option structs deserialize from camelCase JSON settings with every key optional:
//!
//! ```rust
//! use cursor_core::{AutoClosingStrategy, CursorConfig};
//!
//! let config: CursorConfig =
//!     serde_json::from_str(r#"{ "autoClosingBrackets": "always", "useTabStops": false }"#).unwrap();
//! assert_eq!(config.auto_closing_brackets, AutoClosingStrategy::Always);
//! assert!(!config.use_tab_stops);
//! assert!(config.auto_indent);
//! ```

use serde::{Deserialize, Serialize};

use crate::LineEnding;

/// When typing an opening character inserts its closing partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoClosingStrategy {
    /// Close when the next character is whitespace, a closing character or the line end.
    Always,
    /// Close when the next character is one of the language's `autoCloseBefore` characters.
    #[default]
    LanguageDefined,
    /// Close only before whitespace or the line end.
    BeforeWhitespace,
    /// Never close.
    Never,
}

/// Which pairs wrap a non-empty selection when their opening character is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoSurroundStrategy {
    /// Every surrounding pair of the language.
    #[default]
    LanguageDefined,
    /// Only quote pairs.
    Quotes,
    /// Only non-quote pairs.
    Brackets,
    /// Never surround.
    Never,
}

/// How a multi-line paste is distributed over several cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultiCursorPaste {
    /// One line per cursor when the line count matches the cursor count.
    #[default]
    Spread,
    /// Always paste the full text at every cursor.
    Full,
}

/// Editor options consulted by the cursor controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    /// Backspace inside leading whitespace deletes back to the previous tab stop.
    pub use_tab_stops: bool,
    /// Apply indentation and on-enter rules.
    pub auto_indent: bool,
    /// Auto-closing strategy for brackets.
    pub auto_closing_brackets: AutoClosingStrategy,
    /// Auto-closing strategy for quotes.
    pub auto_closing_quotes: AutoClosingStrategy,
    /// Type over a closing character that was auto-inserted.
    pub auto_closing_overtype: bool,
    /// Delete both halves of an empty auto-closed pair on Backspace.
    pub auto_closing_delete: bool,
    /// Auto-surround strategy.
    pub auto_surround: AutoSurroundStrategy,
    /// Merge selections that overlap after a command.
    pub multi_cursor_merge_overlapping: bool,
    /// Paste distribution policy.
    pub multi_cursor_paste: MultiCursorPaste,
    /// Characters that separate words when the language has no word pattern.
    pub word_separators: String,
    /// Lines moved by page up/down.
    pub page_size: usize,
    /// Copy/cut with an empty selection takes the whole line.
    pub empty_selection_clipboard: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            use_tab_stops: true,
            auto_indent: true,
            auto_closing_brackets: AutoClosingStrategy::LanguageDefined,
            auto_closing_quotes: AutoClosingStrategy::LanguageDefined,
            auto_closing_overtype: true,
            auto_closing_delete: true,
            auto_surround: AutoSurroundStrategy::LanguageDefined,
            multi_cursor_merge_overlapping: true,
            multi_cursor_paste: MultiCursorPaste::Spread,
            word_separators: "`~!@#$%^&*()-=+[{]}\\|;:'\",.<>/?".to_string(),
            page_size: 20,
            empty_selection_clipboard: true,
        }
    }
}

/// Options that belong to a [`crate::TextModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextModelOptions {
    /// Width of a tab stop in visible columns.
    pub tab_size: usize,
    /// Indent with spaces instead of tabs.
    pub insert_spaces: bool,
    /// Remove whitespace-only lines left behind by auto-indentation.
    pub trim_auto_whitespace: bool,
    /// Line ending used when the initial text has none.
    pub default_eol: LineEnding,
    /// Maximum number of undo elements kept.
    pub max_undo_elements: usize,
}

impl Default for TextModelOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            trim_auto_whitespace: true,
            default_eol: LineEnding::Lf,
            max_undo_elements: 1000,
        }
    }
}
