//! The interface to an external syntax highlighting engine.

use crate::error::Result;
use pulldown_cmark_escape::escape_html_body_text;

/// Output of a highlighting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    /// HTML markup: escaped code text interleaved with highlighting spans.
    pub value: String,

    /// Language the engine used, if it knows.
    pub language: Option<String>,
}

impl Highlighted {
    /// Escaped, unhighlighted code.
    pub fn plain(code: &str) -> Self {
        Self {
            value: escape_html(code),
            language: None,
        }
    }
}

/// A syntax highlighting engine.
///
/// Implementations own their registered grammars; the processor only ever
/// sees them through this trait, so several differently configured engines
/// can coexist.
pub trait Highlighter {
    /// Highlight `code` with an explicitly named language.
    ///
    /// Returns [`crate::Error::UnknownLanguage`] if no grammar is registered
    /// under that name.
    fn highlight(&self, code: &str, language: &str) -> Result<Highlighted>;

    /// Highlight `code`, detecting the language.
    fn highlight_auto(&self, code: &str) -> Result<Highlighted>;

    /// Whether a grammar is registered under `name`.
    fn has_language(&self, name: &str) -> bool;

    /// Highlight with the declared language, or detect one if none is declared.
    fn highlight_declared(&self, code: &str, language: Option<&str>) -> Result<Highlighted> {
        match language {
            Some(language) => self.highlight(code, language),
            None => self.highlight_auto(code),
        }
    }
}

impl<H: Highlighter + ?Sized> Highlighter for &H {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlighted> {
        (**self).highlight(code, language)
    }

    fn highlight_auto(&self, code: &str) -> Result<Highlighted> {
        (**self).highlight_auto(code)
    }

    fn has_language(&self, name: &str) -> bool {
        (**self).has_language(name)
    }
}

/// Escape code for use as HTML text content (`&`, `<` and `>`).
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    escape_html_body_text(&mut escaped, text).expect("writing to a String cannot fail");
    escaped
}
