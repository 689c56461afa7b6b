//! Core domain types, text normalization, line wrapping and line-range
//! parsing for syntax-highlighted code on HTML slides.

pub mod config;
pub mod error;
pub mod highlighter;
pub mod lines;
pub mod normalize;
pub mod ranges;
pub mod types;

pub use config::{HighlighterOptions, PluginConfig};
pub use error::{Error, Result};
pub use highlighter::{escape_html, Highlighted, Highlighter};
pub use lines::{LineBreak, LineWrapper, WrappedCode};
pub use normalize::TextNormalizer;
pub use ranges::{LineRange, RangeItem, RangeSpec};
pub use types::{
    BlockKind, CodeBlock, OutcomeStatus, ProcessingReport, TagOutcome, BLOCK_TAG, INLINE_TAG,
};
