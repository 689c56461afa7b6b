//! Line wrapping for highlighted markup.
//!
//! Highlighted code is split into one `<span class="line">` container per
//! source line so that individual lines can be addressed and highlighted.

use regex::Regex;
use std::sync::LazyLock;

/// Regex matching opening and closing element tags, including attribute
/// values that contain `>` (comments and doctypes are not matched).
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/)?([A-Za-z][A-Za-z0-9-]*)(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#).unwrap()
});

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Default class of a line container.
pub const LINE_CLASS: &str = "line";

/// Content emitted for a line with no visible content.
pub const EMPTY_LINE_PLACEHOLDER: &str = " ";

/// A line-break convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineBreak {
    /// Detect the convention from the first line break in `text`.
    ///
    /// Returns `None` if the text is a single line.
    pub fn detect(text: &str) -> Option<Self> {
        let idx = text.find(['\r', '\n'])?;
        let bytes = text.as_bytes();

        Some(match bytes[idx] {
            b'\n' => Self::Lf,
            _ if bytes.get(idx + 1) == Some(&b'\n') => Self::CrLf,
            _ => Self::Cr,
        })
    }

    /// The line-break token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Split `text` on this token.
    pub fn split(self, text: &str) -> std::str::Split<'_, &'static str> {
        text.split(self.as_str())
    }
}

/// Splits highlighted markup into line containers.
#[derive(Debug, Clone)]
pub struct LineWrapper {
    /// Class attribute of every container.
    class: String,

    /// Whether tags spanning several lines are closed and reopened per line.
    balance_tags: bool,
}

impl Default for LineWrapper {
    fn default() -> Self {
        Self {
            class: LINE_CLASS.to_string(),
            balance_tags: true,
        }
    }
}

impl LineWrapper {
    /// Create a wrapper producing `<span class="line">` containers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom container class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set whether tags spanning several lines are closed and reopened per line.
    pub fn with_balance_tags(mut self, balance: bool) -> Self {
        self.balance_tags = balance;
        self
    }

    /// Split markup into per-line contents.
    ///
    /// A trailing empty or whitespace-only line is dropped. Empty lines get
    /// a single-space placeholder.
    pub fn wrap(&self, markup: &str) -> WrappedCode {
        let detected = LineBreak::detect(markup);

        let mut parts: Vec<&str> = match detected {
            Some(line_break) => line_break.split(markup).collect(),
            None => vec![markup],
        };

        if parts.last().is_some_and(|last| is_blank_markup(last)) {
            parts.pop();
        }

        let mut open: Vec<OpenTag> = Vec::new();
        let mut lines = Vec::with_capacity(parts.len());

        for part in parts {
            // Tags on a blank line (a span closed after the break) are kept
            // for balancing; the placeholder goes after them.
            let body = if is_blank_markup(part) {
                format!("{}{}", part.trim(), EMPTY_LINE_PLACEHOLDER)
            } else {
                part.to_string()
            };

            if !self.balance_tags {
                lines.push(body);
                continue;
            }

            let mut content: String = open.iter().map(|tag| tag.markup.as_str()).collect();
            content.push_str(&body);
            track_tags(part, &mut open);
            for tag in open.iter().rev() {
                content.push_str("</");
                content.push_str(&tag.name);
                content.push('>');
            }

            lines.push(content);
        }

        WrappedCode {
            lines,
            line_break: detected.unwrap_or_default(),
            class: self.class.clone(),
        }
    }
}

/// Whether a line of markup has no visible text.
fn is_blank_markup(line: &str) -> bool {
    TAG_REGEX.replace_all(line, "").trim().is_empty()
}

/// An element left open at the end of a line.
#[derive(Debug, Clone)]
struct OpenTag {
    name: String,
    markup: String,
}

/// Update the stack of open elements with the tags found in `line`.
fn track_tags(line: &str, open: &mut Vec<OpenTag>) {
    for caps in TAG_REGEX.captures_iter(line) {
        let name = caps[2].to_ascii_lowercase();
        let whole = &caps[0];

        if caps.get(1).is_some() {
            if let Some(pos) = open.iter().rposition(|tag| tag.name == name) {
                open.truncate(pos);
            }
        } else if !whole.ends_with("/>") && !VOID_ELEMENTS.contains(&name.as_str()) {
            open.push(OpenTag {
                name,
                markup: whole.to_string(),
            });
        }
    }
}

/// Highlighted markup split into line containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedCode {
    /// Inner markup of each line container, in source order.
    lines: Vec<String>,

    /// Line break used to join containers.
    line_break: LineBreak,

    /// Container class.
    class: String,
}

impl WrappedCode {
    /// Number of line containers.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Inner markup of each line.
    pub fn contents(&self) -> &[String] {
        &self.lines
    }

    /// Line break detected in the input (LF if there was none).
    pub fn line_break(&self) -> LineBreak {
        self.line_break
    }

    /// Class of the line containers.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Each line wrapped in its container element.
    pub fn containers(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| format!("<span class=\"{}\">{}</span>", self.class, line))
            .collect()
    }

    /// All containers joined with the detected line break.
    pub fn to_markup(&self) -> String {
        self.containers().join(self.line_break.as_str())
    }
}
