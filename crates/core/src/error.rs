//! Error types for code highlighting on slides.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while highlighting code tags.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read a configuration or grammar file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The requested language has not been registered with the highlighter.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// The highlighting engine failed on otherwise valid input.
    #[error("Highlighting error: {0}")]
    HighlightError(String),

    /// A grammar definition could not be loaded.
    #[error("Invalid grammar for language '{name}': {message}")]
    GrammarError { name: String, message: String },

    /// A line-range specification could not be parsed.
    #[error("Invalid line range '{input}': {message}")]
    RangeSpec { input: String, message: String },

    /// The plugin configuration could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A code container holds element children instead of escaped text.
    #[error("Unescaped HTML inside code element: {0}")]
    UnescapedHtml(String),

    /// The document tree did not have the expected shape.
    #[error("Document structure error: {0}")]
    DomError(String),
}
