//! End-to-end runs of the document pass with the syntect backend.

use codeslide_core::{Highlighter, LineWrapper, OutcomeStatus, PluginConfig};
use codeslide_dom::TagProcessor;
use codeslide_syntect::SyntectHighlighter;

const TOY_GRAMMAR: &str = r#"%YAML 1.2
---
name: Toy
scope: source.toy
contexts:
  main:
    - match: '\blet\b'
      scope: keyword.declaration.toy
"#;

#[test]
fn test_unknown_language_does_not_block_next_tag() {
    let highlighter = SyntectHighlighter::new();
    let doc = TagProcessor::new(&highlighter).process_html(
        "<source-code language=\"klingon\">hello &lt;world&gt;</source-code>\n\
         <source-code language=\"rust\" highlight=\"2\">fn main() {\n    let x = 1;\n}</source-code>",
    );

    let report = doc.report();
    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(report.outcomes[0].status, OutcomeStatus::Degraded(_)));
    assert!(report.outcomes[0].messages()[0].contains("klingon"));
    assert_eq!(report.outcomes[1].status, OutcomeStatus::Rendered);

    let first = doc.block(0).unwrap();
    assert_eq!(first.line_text(1).as_deref(), Some("hello <world>"));

    let second = doc.block(1).unwrap();
    assert_eq!(second.lines(), 3);
    assert_eq!(second.highlighted_lines(), vec![2]);
    assert_eq!(second.line_text(2).as_deref(), Some("    let x = 1;"));

    let html = doc.to_html().unwrap();
    assert!(html.contains("hello &lt;world&gt;"));
    assert!(html.contains("source rust"));
}

#[test]
fn test_range_spec_on_long_block() {
    let code: Vec<String> = (1..=10).map(|n| format!("x{} = {}", n, n)).collect();
    let html = format!(
        "<source-code language=\"python\" highlight=\"1, 3, [7, 9]\">{}</source-code>",
        code.join("\n")
    );
    let doc = TagProcessor::new(SyntectHighlighter::new()).process_html(&html);
    let block = doc.block(0).unwrap();

    assert_eq!(block.lines(), 10);
    assert_eq!(block.highlighted_lines(), vec![1, 3, 7, 8, 9]);

    block.highlight_lines((1u32, 9999u32));
    assert_eq!(block.highlighted_lines().len(), 10);
}

#[test]
fn test_surrounding_blank_lines_and_indent_removed() {
    let doc = TagProcessor::new(SyntectHighlighter::new()).process_html(
        "<source-code language=\"python\">\n\n    def f():\n        return 1\n\n</source-code>",
    );
    let block = doc.block(0).unwrap();

    assert_eq!(block.lines(), 2);
    assert_eq!(block.line_text(1).as_deref(), Some("def f():"));
    assert_eq!(block.line_text(2).as_deref(), Some("    return 1"));
}

#[test]
fn test_blank_line_after_comment_keeps_placeholder() {
    let highlighter = SyntectHighlighter::new();

    for (language, code) in [("python", "# note\n\nx = 1"), ("rust", "// a\n\nfn f() {}")] {
        let html = format!("<source-code language=\"{}\">{}</source-code>", language, code);
        let doc = TagProcessor::new(&highlighter).process_html(&html);
        let block = doc.block(0).unwrap();

        assert_eq!(block.lines(), 3, "{}", language);
        assert_eq!(block.line_text(2).as_deref(), Some(" "), "{}", language);
    }
}

#[test]
fn test_trailing_break_after_comment_adds_no_line() {
    let highlighter = SyntectHighlighter::new();
    let highlighted = highlighter.highlight("x = 1\n# c\n", "python").unwrap();
    let wrapped = LineWrapper::new().wrap(&highlighted.value);

    assert_eq!(wrapped.len(), 2);
    assert!(wrapped.contents()[1].contains("comment"));
}

#[test]
fn test_custom_attribute_on_output() {
    let doc = TagProcessor::new(SyntectHighlighter::new()).process_html(
        "<source-code language=\"rust\" data-fragment-index=\"3\" filename=\"main.rs\">fn f() {}</source-code>",
    );
    let block = doc.block(0).unwrap();

    assert_eq!(block.attribute("data-fragment-index").as_deref(), Some("3"));
    assert_eq!(block.attribute("data-lang").as_deref(), Some("main.rs"));
    assert_eq!(block.language().as_deref(), Some("rust"));
}

#[test]
fn test_configured_language() {
    let config = PluginConfig::new()
        .with_language("toy", TOY_GRAMMAR)
        .with_highlight_all(true);
    let highlighter = SyntectHighlighter::from_config(&config).unwrap();
    let doc = TagProcessor::with_config(&highlighter, &config).process_html(
        "<p><src-code language=\"toy\">let a</src-code></p>\
         <pre><code class=\"language-toy\">let b</code></pre>",
    );

    assert!(doc.report().is_clean());
    assert_eq!(doc.report().outcomes.len(), 2);

    let html = doc.to_html().unwrap();
    assert_eq!(html.matches("keyword declaration toy").count(), 2);
    assert_eq!(html.matches("data-highlighted=\"yes\"").count(), 2);
}
