//! The document pass: finds code tags, highlights them and splices the
//! rendered markup back into the tree.

use crate::document::{
    add_class, append_child, attributes, create_element, create_text, element_name, get_attr,
    has_class, has_element_children, parent_of, parse_children, replace_children, replace_node,
    select, set_attr, text_content, HtmlDocument, Visit,
};
use crate::rendered::RenderedBlock;
use codeslide_core::{
    BlockKind, CodeBlock, Error, Highlighted, Highlighter, HighlighterOptions, LineWrapper,
    OutcomeStatus, PluginConfig, ProcessingReport, RangeSpec, Result, TagOutcome,
    TextNormalizer,
};
use markup5ever_rcdom::Handle;
use regex::Regex;
use std::sync::LazyLock;

/// `language-xxx` / `lang-xxx` class on a code container.
static LANGUAGE_CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(?:lang|language)-([\w+#.-]+)").unwrap());

/// Classes that exclude a container from the sweep.
const NO_HIGHLIGHT_CLASSES: &[&str] = &["no-highlight", "nohighlight"];

/// Marker attribute set on everything this pass produced.
const HIGHLIGHTED_ATTR: &str = "data-highlighted";

/// Processes `<source-code>` and `<src-code>` tags with an injected highlighter.
pub struct TagProcessor<H> {
    highlighter: H,
    options: HighlighterOptions,
    highlight_all: bool,
    normalizer: TextNormalizer,
    wrapper: LineWrapper,
}

impl<H: Highlighter> TagProcessor<H> {
    /// Create a processor with default options.
    pub fn new(highlighter: H) -> Self {
        Self::with_config(highlighter, &PluginConfig::default())
    }

    /// Create a processor using the options of a plugin configuration.
    ///
    /// Languages listed in the configuration must already be registered with
    /// the highlighter.
    pub fn with_config(highlighter: H, config: &PluginConfig) -> Self {
        Self {
            highlighter,
            options: config.highlighter.clone(),
            highlight_all: config.highlight_all,
            normalizer: TextNormalizer::default(),
            wrapper: LineWrapper::default(),
        }
    }

    /// Enable or disable the sweep over pre-existing `<pre><code>` containers.
    pub fn with_highlight_all(mut self, enabled: bool) -> Self {
        self.highlight_all = enabled;
        self
    }

    /// Use a custom normalizer for captured code.
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Use a custom line wrapper for block output.
    pub fn with_wrapper(mut self, wrapper: LineWrapper) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// The injected highlighter.
    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Parse and process an HTML string.
    pub fn process_html(&self, html: &str) -> ProcessedDocument {
        self.process(HtmlDocument::parse(html))
    }

    /// Process every code tag in `document`.
    ///
    /// Failures are isolated per tag and recorded in the report; the pass
    /// itself never fails.
    pub fn process(&self, document: HtmlDocument) -> ProcessedDocument {
        let root = document.document();

        // Collected before any tag is rendered, so the sweep never sees
        // tag output.
        let containers = if self.highlight_all {
            find_code_containers(&root)
        } else {
            Vec::new()
        };
        let tags = find_code_tags(&root);
        log::debug!(
            "Found {} code tags and {} code containers",
            tags.len(),
            containers.len()
        );

        let mut report = ProcessingReport::new();
        let mut blocks = Vec::new();

        for (index, tag) in tags.iter().enumerate() {
            let (outcome, block) = self.process_tag(index, tag);
            blocks.extend(block);
            report.push(outcome);
        }

        for (index, code) in containers.iter().enumerate() {
            if let Some(outcome) = self.highlight_container(index, code) {
                report.push(outcome);
            }
        }

        ProcessedDocument {
            document,
            blocks,
            report,
        }
    }

    /// Render one custom tag and put the output in its place.
    fn process_tag(&self, index: usize, tag: &Handle) -> (TagOutcome, Option<RenderedBlock>) {
        let name = element_name(tag).unwrap_or_default().to_string();
        let kind = BlockKind::from_tag_name(&name).unwrap_or(BlockKind::Block);
        let label = format!("<{}> #{}", name, index);
        let source = CodeBlock::from_attributes(text_content(tag), kind, attributes(tag));

        let mut warnings = Vec::new();
        let code = self.normalizer.normalize(&source.text);
        let highlighted =
            self.highlight_or_plain(&label, &code, source.language.as_deref(), &mut warnings);
        let language = source
            .language
            .clone()
            .or_else(|| highlighted.language.clone());

        let mut outcome = TagOutcome {
            index,
            kind,
            language: language.clone(),
            lines: None,
            status: OutcomeStatus::Rendered,
        };

        let output = if kind.has_lines() {
            self.render_block(&source, &highlighted, language.as_deref())
                .map(|block| (block.element().clone(), Some(block)))
        } else {
            self.render_inline(&source, &highlighted, language.as_deref())
                .map(|code| (code, None))
        };
        let rendered = output.and_then(|(element, block)| {
            replace_node(tag, element)?;
            Ok(block)
        });

        let block = match rendered {
            Ok(block) => block,
            Err(e) => {
                log::warn!("codeslide: {} left unchanged: {}", label, e);
                warnings.push(e.to_string());
                outcome.status = OutcomeStatus::Failed(warnings);
                return (outcome, None);
            }
        };

        if let Some(block) = &block {
            outcome.lines = Some(block.lines());

            if let Some(spec) = source.highlight.as_deref() {
                if let Err(e) = block.highlight_lines_str(spec) {
                    log::warn!("codeslide: {} line highlighting skipped: {}", label, e);
                    warnings.push(e.to_string());
                }
            }
        }

        log::debug!("Rendered {} ({} warnings)", label, warnings.len());
        if !warnings.is_empty() {
            outcome.status = OutcomeStatus::Degraded(warnings);
        }

        (outcome, block)
    }

    /// Highlight with the declared language, falling back to escaped text.
    fn highlight_or_plain(
        &self,
        label: &str,
        code: &str,
        language: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> Highlighted {
        match self.highlighter.highlight_declared(code, language) {
            Ok(highlighted) => highlighted,
            Err(e) => {
                log::warn!("codeslide: {} rendered without highlighting: {}", label, e);
                warnings.push(e.to_string());
                Highlighted::plain(code)
            }
        }
    }

    /// Build a detached `<pre><code>` listing with one container per line.
    fn render_block(
        &self,
        source: &CodeBlock,
        highlighted: &Highlighted,
        language: Option<&str>,
    ) -> Result<RenderedBlock> {
        let wrapped = self.wrapper.wrap(&highlighted.value);

        let pre = create_element("pre", vec![("class", "code")]);
        if let Some(filename) = source.attribute("filename") {
            set_attr(&pre, "data-lang", filename);
        }
        copy_attributes(&pre, source);

        let code = code_element(language);
        set_attr(&code, "data-lines", &wrapped.len().to_string());

        let separator = wrapped.line_break().as_str();
        let mut lines = Vec::with_capacity(wrapped.len());
        for (idx, content) in wrapped.contents().iter().enumerate() {
            if idx > 0 {
                append_child(&code, create_text(separator));
            }
            let line = create_element("span", vec![("class", wrapped.class())]);
            replace_children(&line, parse_children(content)?);
            append_child(&code, line.clone());
            lines.push(line);
        }

        append_child(&pre, code.clone());
        Ok(RenderedBlock::new(pre, code, lines))
    }

    /// Build a detached inline `<code>` element.
    fn render_inline(
        &self,
        source: &CodeBlock,
        highlighted: &Highlighted,
        language: Option<&str>,
    ) -> Result<Handle> {
        let code = code_element(language);
        copy_attributes(&code, source);
        replace_children(&code, parse_children(&highlighted.value)?);
        Ok(code)
    }

    /// Highlight a pre-existing `<pre><code>` container in place.
    ///
    /// Returns `None` for containers that are skipped outright.
    fn highlight_container(&self, index: usize, code: &Handle) -> Option<TagOutcome> {
        if get_attr(code, HIGHLIGHTED_ATTR).as_deref() == Some("yes") {
            return None;
        }
        if NO_HIGHLIGHT_CLASSES.iter().any(|class| has_class(code, class)) {
            log::debug!("Skipping <pre><code> #{}: highlighting disabled", index);
            return None;
        }

        let label = format!("<pre><code> #{}", index);
        let declared = declared_language(code)
            .or_else(|| parent_of(code).and_then(|pre| declared_language(&pre)));

        let mut outcome = TagOutcome {
            index,
            kind: BlockKind::Generic,
            language: declared.clone(),
            lines: None,
            status: OutcomeStatus::Rendered,
        };
        let mut warnings = Vec::new();

        if has_element_children(code) {
            let e = Error::UnescapedHtml(label.clone());
            if self.options.throw_unescaped_html {
                log::warn!("codeslide: {} left unchanged: {}", label, e);
                outcome.status = OutcomeStatus::Failed(vec![e.to_string()]);
                return Some(outcome);
            }
            if !self.options.ignore_unescaped_html {
                log::warn!("codeslide: {}", e);
                warnings.push(e.to_string());
            }
        }

        let text = self.normalizer.normalize(&text_content(code));
        let highlighted = self.highlight_or_plain(&label, &text, declared.as_deref(), &mut warnings);
        let language = declared.or_else(|| highlighted.language.clone());

        match parse_children(&highlighted.value) {
            Ok(children) => replace_children(code, children),
            Err(e) => {
                log::warn!("codeslide: {} left unchanged: {}", label, e);
                warnings.push(e.to_string());
                outcome.status = OutcomeStatus::Failed(warnings);
                return Some(outcome);
            }
        }

        add_class(code, "hljs");
        if let Some(language) = &language {
            add_class(code, &language_class(language));
        }
        set_attr(code, HIGHLIGHTED_ATTR, "yes");

        outcome.language = language;
        if !warnings.is_empty() {
            outcome.status = OutcomeStatus::Degraded(warnings);
        }
        Some(outcome)
    }
}

/// A processed document together with handles to its rendered blocks.
pub struct ProcessedDocument {
    document: HtmlDocument,
    blocks: Vec<RenderedBlock>,
    report: ProcessingReport,
}

impl ProcessedDocument {
    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }

    /// Rendered `<source-code>` blocks, in document order.
    pub fn blocks(&self) -> &[RenderedBlock] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&RenderedBlock> {
        self.blocks.get(index)
    }

    /// Per-tag outcomes of the pass.
    pub fn report(&self) -> &ProcessingReport {
        &self.report
    }

    /// Apply a line-range spec to one block.
    pub fn highlight_lines(&self, block: usize, spec: impl Into<RangeSpec>) -> Result<()> {
        let block = self.blocks.get(block).ok_or_else(|| {
            Error::DomError(format!(
                "No code block at index {} ({} blocks)",
                block,
                self.blocks.len()
            ))
        })?;
        block.highlight_lines(spec);
        Ok(())
    }

    /// Serialize the document in its current state.
    pub fn to_html(&self) -> Result<String> {
        self.document.to_html()
    }
}

/// Custom code tags in document order. Tags nested inside another tag are
/// part of its text and not collected on their own.
fn find_code_tags(root: &Handle) -> Vec<Handle> {
    select(root, &mut |node| match element_name(node) {
        Some(name) if BlockKind::from_tag_name(name).is_some() => Visit::Take,
        _ => Visit::Descend,
    })
}

/// `<code>` elements directly inside a `<pre>`, outside of custom tags.
fn find_code_containers(root: &Handle) -> Vec<Handle> {
    select(root, &mut |node| match element_name(node) {
        Some(name) if BlockKind::from_tag_name(name).is_some() => Visit::Skip,
        Some("code") => {
            let in_pre = parent_of(node).is_some_and(|parent| element_name(&parent) == Some("pre"));
            if in_pre {
                Visit::Take
            } else {
                Visit::Skip
            }
        }
        _ => Visit::Descend,
    })
}

/// Language named by a `language-xxx` or `lang-xxx` class.
fn declared_language(node: &Handle) -> Option<String> {
    let class = get_attr(node, "class")?;
    LANGUAGE_CLASS_REGEX
        .captures(&class)
        .map(|caps| caps[1].to_string())
}

/// `language-xxx` class for a language name.
fn language_class(language: &str) -> String {
    let name: Vec<String> = language
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect();
    format!("language-{}", name.join("-"))
}

/// Output `<code>` element with the highlighter classes.
fn code_element(language: Option<&str>) -> Handle {
    let class = match language {
        Some(language) => format!("hljs {}", language_class(language)),
        None => "hljs".to_string(),
    };
    create_element("code", vec![("class", &class), (HIGHLIGHTED_ATTR, "yes")])
}

/// Copy passthrough attributes; classes are merged.
fn copy_attributes(target: &Handle, source: &CodeBlock) {
    for (name, value) in &source.attributes {
        if name == "class" {
            for class in value.split_whitespace() {
                add_class(target, class);
            }
        } else {
            set_attr(target, name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeslide_core::escape_html;

    /// Knows `toy` (keywords wrapped in spans) and `comment` (everything
    /// wrapped in one span); `broken` always fails.
    struct FakeHighlighter;

    impl Highlighter for FakeHighlighter {
        fn highlight(&self, code: &str, language: &str) -> Result<Highlighted> {
            let value = match language {
                "toy" => escape_html(code).replace("let", "<span class=\"kw\">let</span>"),
                "comment" => format!("<span class=\"cm\">{}</span>", escape_html(code)),
                "broken" => return Err(Error::HighlightError("grammar exploded".to_string())),
                other => return Err(Error::UnknownLanguage(other.to_string())),
            };
            Ok(Highlighted {
                value,
                language: Some(language.to_string()),
            })
        }

        fn highlight_auto(&self, code: &str) -> Result<Highlighted> {
            Ok(Highlighted::plain(code))
        }

        fn has_language(&self, name: &str) -> bool {
            matches!(name, "toy" | "comment")
        }
    }

    fn process(html: &str) -> ProcessedDocument {
        TagProcessor::new(FakeHighlighter).process_html(html)
    }

    #[test]
    fn test_block_rendering() {
        let doc = process(
            "<source-code language=\"toy\">\n    let a = 1;\n    let b = 2;\n</source-code>",
        );

        assert_eq!(
            doc.to_html().unwrap(),
            "<pre class=\"code\"><code class=\"hljs language-toy\" data-highlighted=\"yes\" data-lines=\"2\">\
             <span class=\"line\"><span class=\"kw\">let</span> a = 1;</span>\n\
             <span class=\"line\"><span class=\"kw\">let</span> b = 2;</span></code></pre>"
        );
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].lines(), 2);
        assert!(doc.report().is_clean());
        assert_eq!(doc.report().outcomes[0].lines, Some(2));
    }

    #[test]
    fn test_blank_lines_keep_containers() {
        let doc = process("<source-code language=\"toy\">\n  let a\n\n  let b\n\n</source-code>");
        let block = &doc.blocks()[0];

        assert_eq!(block.lines(), 3);
        assert_eq!(block.line_text(2).as_deref(), Some(" "));
        assert_eq!(block.line_text(3).as_deref(), Some("let b"));
    }

    #[test]
    fn test_multiline_span_split_per_line() {
        let doc = process("<source-code language=\"comment\">/* a\nb\nc */</source-code>");
        let block = &doc.blocks()[0];

        assert_eq!(block.lines(), 3);
        assert_eq!(block.line_text(2).as_deref(), Some("b"));
        assert_eq!(doc.to_html().unwrap().matches("<span class=\"cm\">").count(), 3);
    }

    #[test]
    fn test_attribute_passthrough() {
        let doc = process(
            "<source-code language=\"toy\" filename=\"demo.toy\" data-step=\"2\" class=\"wide\">let</source-code>",
        );
        let block = &doc.blocks()[0];

        assert_eq!(block.attribute("class").as_deref(), Some("code wide"));
        assert_eq!(block.attribute("data-lang").as_deref(), Some("demo.toy"));
        assert_eq!(block.attribute("filename").as_deref(), Some("demo.toy"));
        assert_eq!(block.attribute("data-step").as_deref(), Some("2"));
        assert_eq!(block.attribute("language"), None);
        assert_eq!(block.language().as_deref(), Some("toy"));
    }

    #[test]
    fn test_initial_highlight_attribute() {
        let doc = process("<source-code language=\"toy\" highlight=\"1, [3, 4]\">a\nb\nc\nd\ne</source-code>");
        let block = &doc.blocks()[0];

        assert_eq!(block.highlighted_lines(), vec![1, 3, 4]);
        assert_eq!(block.attribute("highlight"), None);
        assert!(doc
            .to_html()
            .unwrap()
            .contains("<span class=\"line highlight-line\">a</span>"));
    }

    #[test]
    fn test_malformed_highlight_keeps_render() {
        let doc = process("<source-code language=\"toy\" highlight=\"1,,\">a\nb</source-code>");
        let outcome = &doc.report().outcomes[0];

        assert!(matches!(outcome.status, OutcomeStatus::Degraded(_)));
        assert!(outcome.messages()[0].contains("Invalid line range"));
        assert_eq!(doc.blocks()[0].lines(), 2);
        assert!(doc.blocks()[0].highlighted_lines().is_empty());
    }

    #[test]
    fn test_failing_tag_does_not_stop_others() {
        let doc = process(
            "<source-code language=\"klingon\">a &lt; b</source-code>\
             <source-code language=\"toy\" highlight=\"2\">let x\nlet y</source-code>",
        );
        let report = doc.report();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.rendered_count(), 2);
        assert_eq!(report.warnings(), vec!["Unknown language: klingon"]);
        assert_eq!(report.outcomes[1].status, OutcomeStatus::Rendered);

        assert_eq!(doc.blocks()[0].line_text(1).as_deref(), Some("a < b"));
        assert_eq!(doc.blocks()[1].highlighted_lines(), vec![2]);
        assert!(doc.to_html().unwrap().contains("<span class=\"kw\">let</span> y"));
    }

    #[test]
    fn test_highlighter_error_falls_back_to_text() {
        let doc = process("<source-code language=\"broken\">x &amp; y</source-code>");

        assert_eq!(
            doc.report().warnings(),
            vec!["Highlighting error: grammar exploded"]
        );
        assert_eq!(doc.blocks()[0].line_text(1).as_deref(), Some("x & y"));
        assert!(doc.to_html().unwrap().contains("x &amp; y"));
    }

    #[test]
    fn test_inline_rendering() {
        let doc = process("<p>Use <src-code language=\"toy\" title=\"t\">let x</src-code> here.</p>");

        assert_eq!(
            doc.to_html().unwrap(),
            "<p>Use <code class=\"hljs language-toy\" data-highlighted=\"yes\" title=\"t\">\
             <span class=\"kw\">let</span> x</code> here.</p>"
        );
        assert!(doc.blocks().is_empty());
        assert_eq!(doc.report().outcomes[0].kind, BlockKind::Inline);
        assert_eq!(doc.report().outcomes[0].lines, None);
    }

    #[test]
    fn test_inline_without_language_is_autodetected() {
        let doc = process("<src-code>a &lt; b</src-code>");
        assert_eq!(
            doc.to_html().unwrap(),
            "<code class=\"hljs\" data-highlighted=\"yes\">a &lt; b</code>"
        );
        assert_eq!(doc.report().outcomes[0].language, None);
    }

    #[test]
    fn test_nested_tag_is_plain_text() {
        let doc = process("<source-code>outer <src-code>inner</src-code></source-code>");
        assert_eq!(doc.report().outcomes.len(), 1);
        assert_eq!(doc.blocks()[0].line_text(1).as_deref(), Some("outer inner"));
    }

    #[test]
    fn test_rehighlight_after_processing() {
        let doc = process(
            "<source-code language=\"toy\">a\nb\nc</source-code>\
             <source-code language=\"toy\">d\ne</source-code>",
        );

        doc.highlight_lines(0, (2u32, 3u32)).unwrap();
        doc.highlight_lines(1, 1u32).unwrap();
        doc.highlight_lines(0, 1u32).unwrap();

        assert_eq!(doc.blocks()[0].highlighted_lines(), vec![1]);
        assert_eq!(doc.blocks()[1].highlighted_lines(), vec![1]);
        assert_eq!(
            doc.to_html().unwrap().matches("highlight-line").count(),
            2
        );
        assert!(doc.highlight_lines(5, 1u32).is_err());
    }

    #[test]
    fn test_sweep_disabled_by_default() {
        let html = "<pre><code class=\"language-toy\">let x</code></pre>";
        let doc = process(html);

        assert_eq!(doc.to_html().unwrap(), html);
        assert!(doc.report().outcomes.is_empty());
    }

    #[test]
    fn test_highlight_all_sweep() {
        let doc = TagProcessor::new(FakeHighlighter)
            .with_highlight_all(true)
            .process_html(
                "<pre><code class=\"language-toy\">let x</code></pre>\
                 <pre><code class=\"nohighlight\">raw</code></pre>\
                 <source-code language=\"toy\">let y</source-code>",
            );
        let html = doc.to_html().unwrap();

        assert!(html.contains(
            "<pre><code class=\"language-toy hljs\" data-highlighted=\"yes\"><span class=\"kw\">let</span> x</code></pre>"
        ));
        assert!(html.contains("<pre><code class=\"nohighlight\">raw</code></pre>"));

        let kinds: Vec<BlockKind> = doc.report().outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Block, BlockKind::Generic]);
        assert_eq!(html.matches("class=\"line\"").count(), 1);
    }

    #[test]
    fn test_sweep_reads_language_from_pre() {
        let doc = TagProcessor::new(FakeHighlighter)
            .with_highlight_all(true)
            .process_html("<pre class=\"lang-toy\"><code>let x</code></pre>");

        assert_eq!(doc.report().outcomes[0].language.as_deref(), Some("toy"));
        assert!(doc
            .to_html()
            .unwrap()
            .contains("<code class=\"hljs language-toy\" data-highlighted=\"yes\">"));
    }

    #[test]
    fn test_sweep_skips_already_highlighted() {
        let html = "<pre><code class=\"hljs\" data-highlighted=\"yes\">done</code></pre>";
        let doc = TagProcessor::new(FakeHighlighter)
            .with_highlight_all(true)
            .process_html(html);

        assert_eq!(doc.to_html().unwrap(), html);
        assert!(doc.report().outcomes.is_empty());
    }

    const UNESCAPED: &str = "<pre><code class=\"language-toy\">let <b>x</b></code></pre>";

    fn sweep_with(options: &str) -> ProcessedDocument {
        let config = PluginConfig::from_json_str(options).unwrap();
        TagProcessor::with_config(FakeHighlighter, &config).process_html(UNESCAPED)
    }

    #[test]
    fn test_unescaped_html_ignored_by_default() {
        let doc = sweep_with(r#"{ "highlightAll": true }"#);

        assert!(doc.report().is_clean());
        assert!(!doc.to_html().unwrap().contains("<b>"));
    }

    #[test]
    fn test_unescaped_html_warning() {
        let doc = sweep_with(
            r#"{ "highlightAll": true, "highlightJs": { "ignoreUnescapedHTML": false } }"#,
        );
        let outcome = &doc.report().outcomes[0];

        assert!(matches!(outcome.status, OutcomeStatus::Degraded(_)));
        assert!(outcome.messages()[0].starts_with("Unescaped HTML"));
        assert!(doc.to_html().unwrap().contains("<span class=\"kw\">let</span> x"));
    }

    #[test]
    fn test_unescaped_html_refused() {
        let doc = sweep_with(
            r#"{ "highlightAll": true, "highlightJs": { "throwUnescapedHTML": true } }"#,
        );

        assert_eq!(doc.report().failed_count(), 1);
        assert_eq!(doc.to_html().unwrap(), UNESCAPED);
    }

    #[test]
    fn test_full_document() {
        let doc = process(
            "<!DOCTYPE html><html><head></head><body><source-code language=\"toy\">let</source-code></body></html>",
        );
        let html = doc.to_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<body><pre class=\"code\">"));
    }

    #[test]
    fn test_custom_wrapper_and_normalizer() {
        let processor = TagProcessor::new(FakeHighlighter)
            .with_wrapper(LineWrapper::new().with_class("row"))
            .with_normalizer(TextNormalizer::new().with_trim_line_ends(false));
        let doc = processor.process_html("<source-code language=\"toy\">a  \nb</source-code>");

        assert!(processor.highlighter().has_language("toy"));
        assert_eq!(doc.to_html().unwrap().matches("<span class=\"row\">").count(), 2);
        assert_eq!(doc.blocks()[0].line_text(1).as_deref(), Some("a  "));
    }

    #[test]
    fn test_language_class_spelling() {
        assert_eq!(language_class("toy"), "language-toy");
        assert_eq!(language_class("Plain Text"), "language-plain-text");
    }
}
