//! syntect highlighting backend for codeslide.
//!
//! Renders code as HTML with class-based spans, using syntect's bundled
//! grammars plus any sublime-syntax grammars registered by name.

pub mod highlighter;

pub use highlighter::SyntectHighlighter;
