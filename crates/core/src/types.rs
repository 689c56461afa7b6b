//! Domain types for code captured from slide markup and the outcome of
//! processing it.

use serde::{Deserialize, Serialize};

/// Tag name for block-level code listings.
pub const BLOCK_TAG: &str = "source-code";

/// Tag name for inline code snippets.
pub const INLINE_TAG: &str = "src-code";

/// Attributes consumed by the processor and never copied onto the output.
pub const RESERVED_ATTRIBUTES: &[&str] = &["language", "highlight"];

/// How a piece of code is presented on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// `<source-code>`: a `<pre>` listing with addressable lines.
    Block,
    /// `<src-code>`: a single `<code>` element inside running text.
    Inline,
    /// A pre-existing `<pre><code>` container picked up by the generic sweep.
    Generic,
}

impl BlockKind {
    /// Map a (lowercase) element name to the custom tag kind it represents.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            BLOCK_TAG => Some(Self::Block),
            INLINE_TAG => Some(Self::Inline),
            _ => None,
        }
    }

    /// Whether line wrapping and range highlighting apply.
    pub fn has_lines(self) -> bool {
        matches!(self, Self::Block)
    }
}

/// Code captured from one custom tag instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Raw text content of the tag, before normalization.
    pub text: String,

    /// Declared language, if any. `None` requests auto-detection.
    pub language: Option<String>,

    /// Presentation kind.
    pub kind: BlockKind,

    /// Initial line-range specification from the `highlight` attribute.
    pub highlight: Option<String>,

    /// Non-reserved attributes copied onto the rendered output, in source order.
    pub attributes: Vec<(String, String)>,
}

impl CodeBlock {
    /// Create a new code block with no language or attributes.
    pub fn new(text: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            text: text.into(),
            language: None,
            kind,
            highlight: None,
            attributes: Vec::new(),
        }
    }

    /// Build a code block from a tag's attribute list.
    ///
    /// `language` and `highlight` are consumed; blank values count as absent.
    /// Everything else is kept for passthrough.
    pub fn from_attributes<I, K, V>(text: impl Into<String>, kind: BlockKind, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut block = Self::new(text, kind);

        for (name, value) in attrs {
            let name = name.into();
            let value = value.into();
            match name.as_str() {
                "language" => block.language = non_blank(value),
                "highlight" => block.highlight = non_blank(value),
                _ => block.attributes.push((name, value)),
            }
        }

        block
    }

    /// Look up a passthrough attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Result of processing a single tag or container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "messages", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Rendered and highlighted without complaints.
    Rendered,
    /// Rendered, but something was skipped (unhighlighted text, no line
    /// highlighting). Carries the warnings.
    Degraded(Vec<String>),
    /// Left untouched in the document.
    Failed(Vec<String>),
}

/// Outcome record for one tag instance, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOutcome {
    /// 0-based position among the items handled by the same pass.
    pub index: usize,

    /// What kind of element was processed.
    pub kind: BlockKind,

    /// Language used (declared or detected), if known.
    pub language: Option<String>,

    /// Number of line containers produced (block kind only).
    pub lines: Option<usize>,

    /// Final status.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl TagOutcome {
    /// Warnings or errors recorded for this item.
    pub fn messages(&self) -> &[String] {
        match &self.status {
            OutcomeStatus::Rendered => &[],
            OutcomeStatus::Degraded(messages) | OutcomeStatus::Failed(messages) => messages,
        }
    }
}

/// Aggregated per-item results of one document pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    /// Outcomes in processing order (custom tags first, then the sweep).
    pub outcomes: Vec<TagOutcome>,
}

impl ProcessingReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome.
    pub fn push(&mut self, outcome: TagOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of items that ended up in the document (rendered or degraded).
    pub fn rendered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !matches!(o.status, OutcomeStatus::Failed(_)))
            .count()
    }

    /// Number of items left untouched.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.rendered_count()
    }

    /// All warnings and errors, flattened.
    pub fn warnings(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .flat_map(|o| o.messages().iter().map(String::as_str))
            .collect()
    }

    /// Whether every item rendered cleanly.
    pub fn is_clean(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Rendered)
    }
}
