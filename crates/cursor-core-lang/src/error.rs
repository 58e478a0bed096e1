use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while building a [`crate::LanguageConfiguration`].
pub enum LanguageConfigError {
    #[error("JSON parse error: {0}")]
    /// The configuration document is not valid JSON or has the wrong shape.
    Json(#[from] serde_json::Error),

    #[error("regex compile error for pattern '{pattern}': {message}")]
    /// A pattern failed to compile.
    RegexCompile {
        /// The pattern source.
        pattern: String,
        /// The compiler error message.
        message: String,
    },
}
