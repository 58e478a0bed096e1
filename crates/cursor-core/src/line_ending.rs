//! Line ending helpers.
//!
//! The text model stores text with LF (`'\n'`) newlines only. The document's preferred line
//! ending is tracked separately and applied when text is read back with
//! [`crate::TextModel::get_value`].

use serde::{Deserialize, Serialize};

/// A newline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending from a source text.
    ///
    /// Policy: the line ending that occurs most often wins; ties (including no newline at all)
    /// resolve to `fallback`.
    pub fn detect_in_text(text: &str, fallback: LineEnding) -> Self {
        let crlf = text.matches("\r\n").count();
        let lf = text.matches('\n').count() - crlf;
        match crlf.cmp(&lf) {
            std::cmp::Ordering::Greater => Self::Crlf,
            std::cmp::Ordering::Less => Self::Lf,
            std::cmp::Ordering::Equal => fallback,
        }
    }

    /// The newline sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Convert an LF-normalized text to this line ending.
    pub fn apply_to_text(self, text: &str) -> String {
        match self {
            Self::Lf => text.to_string(),
            Self::Crlf => text.replace('\n', "\r\n"),
        }
    }
}

/// Convert `"\r\n"` and lone `'\r'` to `'\n'`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
