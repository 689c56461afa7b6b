//! Rendered code blocks and their line highlighting.

use crate::document::{add_class, get_attr, has_class, remove_class, serialize_node, text_content};
use codeslide_core::{RangeSpec, Result};
use html5ever::serialize::TraversalScope;
use markup5ever_rcdom::Handle;
use std::fmt;

/// Class toggled on highlighted line containers.
pub const HIGHLIGHT_CLASS: &str = "highlight-line";

/// Handle to a `<pre>` block produced from a `<source-code>` tag.
///
/// The handle shares the nodes with the document it was rendered into, so
/// changes made through it show up when the document is serialized. Each
/// block only touches its own lines.
#[derive(Clone)]
pub struct RenderedBlock {
    pre: Handle,
    code: Handle,
    lines: Vec<Handle>,
}

impl RenderedBlock {
    pub(crate) fn new(pre: Handle, code: Handle, lines: Vec<Handle>) -> Self {
        Self { pre, code, lines }
    }

    /// The `<pre>` element.
    pub fn element(&self) -> &Handle {
        &self.pre
    }

    /// Number of line containers.
    pub fn lines(&self) -> usize {
        self.lines.len()
    }

    /// Highlight the lines selected by `spec`, after clearing every line.
    ///
    /// Positions past the last line are ignored. An empty spec just clears.
    pub fn highlight_lines(&self, spec: impl Into<RangeSpec>) {
        let spec = spec.into();
        self.clear_highlight();

        for line in spec.lines_within(self.lines.len()) {
            add_class(&self.lines[line - 1], HIGHLIGHT_CLASS);
        }
    }

    /// Parse a textual spec such as `1, 3, [7, 9]` and apply it.
    ///
    /// On a parse error nothing is changed.
    pub fn highlight_lines_str(&self, spec: &str) -> Result<()> {
        let spec = RangeSpec::parse(spec)?;
        self.highlight_lines(spec);
        Ok(())
    }

    /// Remove the highlight marker from every line.
    pub fn clear_highlight(&self) {
        for line in &self.lines {
            remove_class(line, HIGHLIGHT_CLASS);
        }
    }

    /// 1-based positions of highlighted lines.
    pub fn highlighted_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| has_class(line, HIGHLIGHT_CLASS))
            .map(|(idx, _)| idx + 1)
            .collect()
    }

    /// Text of a line (1-based).
    pub fn line_text(&self, line: usize) -> Option<String> {
        let idx = line.checked_sub(1)?;
        self.lines.get(idx).map(text_content)
    }

    /// Language class of the block, if one was recorded.
    pub fn language(&self) -> Option<String> {
        get_attr(&self.code, "class")?
            .split_whitespace()
            .find_map(|class| class.strip_prefix("language-"))
            .map(str::to_string)
    }

    /// Value of an attribute on the `<pre>` element.
    pub fn attribute(&self, name: &str) -> Option<String> {
        get_attr(&self.pre, name)
    }

    /// Serialize the block.
    pub fn to_html(&self) -> Result<String> {
        serialize_node(&self.pre, TraversalScope::IncludeNode)
    }
}

impl fmt::Debug for RenderedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedBlock")
            .field("lines", &self.lines.len())
            .field("highlighted", &self.highlighted_lines())
            .finish()
    }
}
