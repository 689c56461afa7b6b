//! Plugin configuration.
//!
//! The configuration is plain JSON. Field names follow the host framework's
//! camelCase spelling (`highlightAll`, `ignoreUnescapedHTML`); snake_case
//! spellings are accepted as aliases.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File extension marking a grammar value as a path instead of inline source.
const GRAMMAR_FILE_EXTENSION: &str = ".sublime-syntax";

/// Top-level plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    /// Extra grammars to register, keyed by the language name used in markup.
    /// Values are sublime-syntax definitions (inline, or a path when loaded
    /// through [`PluginConfig::from_path`]).
    pub languages: BTreeMap<String, String>,

    /// Options handed through to the highlighter.
    #[serde(alias = "highlightJs", alias = "highlight_js")]
    pub highlighter: HighlighterOptions,

    /// Also highlight every pre-existing `<pre><code>` container.
    #[serde(alias = "highlight_all")]
    pub highlight_all: bool,
}

/// Options for the highlighting engine and in-place element highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterOptions {
    /// Do not warn when a code element contains element children.
    #[serde(rename = "ignoreUnescapedHTML", alias = "ignore_unescaped_html")]
    pub ignore_unescaped_html: bool,

    /// Refuse to highlight a code element that contains element children.
    #[serde(rename = "throwUnescapedHTML", alias = "throw_unescaped_html")]
    pub throw_unescaped_html: bool,

    /// Unrecognized options, kept so they survive a round trip.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for HighlighterOptions {
    fn default() -> Self {
        Self {
            ignore_unescaped_html: true,
            throw_unescaped_html: false,
            extra: BTreeMap::new(),
        }
    }
}

impl PluginConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the sweep over pre-existing code containers.
    pub fn with_highlight_all(mut self, enabled: bool) -> Self {
        self.highlight_all = enabled;
        self
    }

    /// Register a grammar under a language name.
    pub fn with_language(mut self, name: impl Into<String>, grammar: impl Into<String>) -> Self {
        self.languages.insert(name.into(), grammar.into());
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Load a configuration file.
    ///
    /// Grammar values ending in `.sublime-syntax` are read from disk,
    /// relative to the configuration file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut config = Self::from_json_str(&json)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.load_grammar_files(base)?;

        Ok(config)
    }

    /// Replace grammar values that name a file with the file's contents.
    pub fn load_grammar_files(&mut self, base: &Path) -> Result<()> {
        for (name, grammar) in self.languages.iter_mut() {
            if !is_grammar_path(grammar) {
                continue;
            }

            let grammar_path = base.join(grammar.trim());
            log::debug!(
                "Loading grammar '{}' from {}",
                name,
                grammar_path.display()
            );
            *grammar = std::fs::read_to_string(&grammar_path).map_err(|e| Error::GrammarError {
                name: name.clone(),
                message: format!("{}: {}", grammar_path.display(), e),
            })?;
        }

        Ok(())
    }
}

fn is_grammar_path(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.contains('\n') && trimmed.ends_with(GRAMMAR_FILE_EXTENSION)
}
