//! Highlighter implementation on top of syntect.

use codeslide_core::{Error, Highlighted, Highlighter, PluginConfig, Result};
use std::collections::BTreeMap;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxDefinition, SyntaxReference, SyntaxSet, SyntaxSetBuilder};
use syntect::util::LinesWithEndings;

/// Spelling of CSS classes in the generated markup: `keyword control rust`.
const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

/// Names that always mean "no highlighting".
const PLAIN_TEXT_NAMES: &[&str] = &["text", "txt", "plain", "plaintext", "nohighlight"];

/// syntect-backed [`Highlighter`].
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,

    /// Registered language names (lowercase) mapped to syntax names.
    aliases: BTreeMap<String, String>,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectHighlighter {
    /// Create a highlighter with syntect's bundled grammars.
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            aliases: BTreeMap::new(),
        }
    }

    /// Create a highlighter that knows only plain text.
    ///
    /// Every language has to be registered before use.
    pub fn empty() -> Self {
        let mut builder = SyntaxSetBuilder::new();
        builder.add_plain_text_syntax();
        Self {
            syntaxes: builder.build(),
            aliases: BTreeMap::new(),
        }
    }

    /// Create a highlighter with the bundled grammars plus the configured ones.
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        let mut highlighter = Self::new();
        for (name, grammar) in &config.languages {
            highlighter.register_language(name, grammar)?;
        }

        if !config.highlighter.extra.is_empty() {
            log::debug!(
                "Ignoring highlighter options: {:?}",
                config.highlighter.extra.keys().collect::<Vec<_>>()
            );
        }

        Ok(highlighter)
    }

    /// Register a sublime-syntax grammar under `name`.
    ///
    /// The name is matched case-insensitively by [`Highlighter::highlight`].
    pub fn register_language(&mut self, name: &str, grammar: &str) -> Result<()> {
        let definition =
            SyntaxDefinition::load_from_str(grammar, true, Some(name)).map_err(|e| {
                Error::GrammarError {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            })?;
        let syntax_name = definition.name.clone();

        let mut builder = std::mem::take(&mut self.syntaxes).into_builder();
        builder.add(definition);
        self.syntaxes = builder.build();

        log::debug!("Registered language '{}' ({})", name, syntax_name);
        self.aliases.insert(name.to_lowercase(), syntax_name);
        Ok(())
    }

    /// Make `alias` another name for an already known language.
    pub fn register_alias(&mut self, alias: &str, language: &str) -> Result<()> {
        let syntax_name = self
            .resolve(language)
            .map(|syntax| syntax.name.clone())
            .ok_or_else(|| Error::UnknownLanguage(language.to_string()))?;
        self.aliases.insert(alias.to_lowercase(), syntax_name);
        Ok(())
    }

    /// Names of all known grammars.
    pub fn languages(&self) -> Vec<&str> {
        self.syntaxes
            .syntaxes()
            .iter()
            .map(|syntax| syntax.name.as_str())
            .collect()
    }

    /// CSS for the classes this highlighter emits, from a bundled theme
    /// such as `InspiredGitHub` or `base16-ocean.dark`.
    pub fn stylesheet(theme_name: &str) -> Result<String> {
        let themes = ThemeSet::load_defaults();
        let theme = themes.themes.get(theme_name).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unknown theme '{}'. Available: {}",
                theme_name,
                themes.themes.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;

        css_for_theme_with_class_style(theme, CLASS_STYLE)
            .map_err(|e| Error::HighlightError(format!("Failed to render theme CSS: {}", e)))
    }

    /// Find the grammar for a language name.
    ///
    /// Registered names win; otherwise the name is matched against file
    /// extensions and then grammar names, case-insensitively.
    fn resolve(&self, name: &str) -> Option<&SyntaxReference> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }

        if PLAIN_TEXT_NAMES.contains(&key.as_str()) {
            return Some(self.syntaxes.find_syntax_plain_text());
        }

        if let Some(syntax_name) = self.aliases.get(&key) {
            return self.syntaxes.find_syntax_by_name(syntax_name);
        }

        self.syntaxes.find_syntax_by_token(&key)
    }

    /// Render code with a grammar into class-annotated HTML.
    fn render(&self, syntax: &SyntaxReference, code: &str) -> Result<String> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| {
                    Error::HighlightError(format!("{} grammar failed: {}", syntax.name, e))
                })?;
        }

        Ok(generator.finalize())
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<Highlighted> {
        let syntax = self
            .resolve(language)
            .ok_or_else(|| Error::UnknownLanguage(language.to_string()))?;

        Ok(Highlighted {
            value: self.render(syntax, code)?,
            language: Some(syntax.name.clone()),
        })
    }

    fn highlight_auto(&self, code: &str) -> Result<Highlighted> {
        let first_line = code.lines().next().unwrap_or("");
        let detected = self.syntaxes.find_syntax_by_first_line(first_line);
        let syntax = detected.unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        Ok(Highlighted {
            value: self.render(syntax, code)?,
            language: detected.map(|syntax| syntax.name.clone()),
        })
    }

    fn has_language(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_GRAMMAR: &str = r#"%YAML 1.2
---
name: Toy
scope: source.toy
file_extensions: [toy]
contexts:
  main:
    - match: '\b(let|fn)\b'
      scope: keyword.declaration.toy
    - match: '#.*$'
      scope: comment.line.toy
"#;

    #[test]
    fn test_bundled_language() {
        let highlighter = SyntectHighlighter::new();
        let result = highlighter.highlight("fn main() {}", "rust").unwrap();

        assert_eq!(result.language.as_deref(), Some("Rust"));
        assert!(result.value.contains("source rust"));
        assert!(result.value.contains("main"));
    }

    #[test]
    fn test_language_lookup_is_case_insensitive() {
        let highlighter = SyntectHighlighter::new();
        assert!(highlighter.has_language("Python"));
        assert!(highlighter.has_language("py"));
        assert!(highlighter.has_language("JavaScript"));
    }

    #[test]
    fn test_unknown_language() {
        let highlighter = SyntectHighlighter::new();
        let err = highlighter.highlight("x", "klingon").unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(ref name) if name == "klingon"));
        assert!(!highlighter.has_language("klingon"));
    }

    #[test]
    fn test_register_language() {
        let mut highlighter = SyntectHighlighter::empty();
        assert!(!highlighter.has_language("toy"));

        highlighter.register_language("Toy", TOY_GRAMMAR).unwrap();
        assert!(highlighter.has_language("toy"));

        let result = highlighter.highlight("let x # note", "toy").unwrap();
        assert_eq!(result.language.as_deref(), Some("Toy"));
        assert!(result.value.contains("class=\"keyword declaration toy\""));
        assert!(result.value.contains("class=\"comment line toy\""));
    }

    #[test]
    fn test_register_invalid_grammar() {
        let mut highlighter = SyntectHighlighter::empty();
        let err = highlighter
            .register_language("broken", "contexts: [unclosed")
            .unwrap_err();
        assert!(matches!(err, Error::GrammarError { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_register_alias() {
        let mut highlighter = SyntectHighlighter::new();
        highlighter.register_alias("rs-lang", "rust").unwrap();
        assert!(highlighter.has_language("RS-LANG"));
        assert!(highlighter.register_alias("x", "klingon").is_err());
    }

    #[test]
    fn test_output_is_escaped() {
        let highlighter = SyntectHighlighter::new();
        let result = highlighter.highlight("a < b && c", "text").unwrap();
        assert!(result.value.contains("a &lt; b &amp;&amp; c"));
    }

    #[test]
    fn test_auto_detects_from_first_line() {
        let highlighter = SyntectHighlighter::new();
        let result = highlighter
            .highlight_auto("#!/usr/bin/env python\nprint(1)\n")
            .unwrap();
        assert_eq!(result.language.as_deref(), Some("Python"));
    }

    #[test]
    fn test_auto_falls_back_to_plain_text() {
        let highlighter = SyntectHighlighter::new();
        let result = highlighter.highlight_auto("just <words>").unwrap();
        assert_eq!(result.language, None);
        assert!(result.value.contains("just &lt;words&gt;"));
    }

    #[test]
    fn test_line_structure_preserved() {
        let highlighter = SyntectHighlighter::new();
        let result = highlighter.highlight("a = 1\nb = 2\n\nc = 3", "python").unwrap();
        assert_eq!(result.value.matches('\n').count(), 3);
    }

    #[test]
    fn test_from_config_registers_languages() {
        let config = PluginConfig::new().with_language("toy", TOY_GRAMMAR);
        let highlighter = SyntectHighlighter::from_config(&config).unwrap();
        assert!(highlighter.has_language("toy"));
        assert!(highlighter.languages().contains(&"Toy"));
    }

    #[test]
    fn test_stylesheet() {
        let css = SyntectHighlighter::stylesheet("InspiredGitHub").unwrap();
        assert!(css.contains('{'));
        assert!(SyntectHighlighter::stylesheet("no-such-theme").is_err());
    }
}
