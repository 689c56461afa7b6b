//! Document pass for codeslide.
//!
//! Parses an HTML document or fragment, replaces `<source-code>` and
//! `<src-code>` tags with highlighted markup and hands back handles to the
//! rendered blocks so their line highlighting can be changed later.

pub mod document;
pub mod processor;
pub mod rendered;

pub use document::HtmlDocument;
pub use processor::{ProcessedDocument, TagProcessor};
pub use rendered::{RenderedBlock, HIGHLIGHT_CLASS};
