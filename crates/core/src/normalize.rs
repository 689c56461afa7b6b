//! Text normalization for code captured from slide markup.
//!
//! Code typed inside a custom tag inherits the indentation of the surrounding
//! HTML and usually starts and ends with a line break. The normalizer removes
//! that incidental whitespace while keeping the relative indentation of the
//! code intact and the line-break convention untouched.

use crate::lines::LineBreak;

/// Text normalizer for captured code.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to strip trailing whitespace from every line.
    trim_line_ends: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            trim_line_ends: true,
        }
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether trailing whitespace is stripped from every line, not only
    /// from the end of the block.
    pub fn with_trim_line_ends(mut self, trim: bool) -> Self {
        self.trim_line_ends = trim;
        self
    }

    /// Normalize a captured code block.
    ///
    /// - Detects the line-break convention (LF, CRLF or CR) and keeps it
    /// - Removes leading and trailing blank lines
    /// - Removes the indentation shared by all non-blank lines
    /// - Trims trailing whitespace from the block (and each line, if enabled)
    pub fn normalize(&self, text: &str) -> String {
        let line_break = LineBreak::detect(text).unwrap_or_default();

        let lines: Vec<&str> = line_break
            .split(text)
            .map(|line| {
                if self.trim_line_ends {
                    line.trim_end()
                } else {
                    line
                }
            })
            .collect();

        let Some(first) = lines.iter().position(|l| !is_blank(l)) else {
            return String::new();
        };
        // A non-blank line exists, so rposition finds one too.
        let last = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(first);
        let lines = &lines[first..=last];

        let indent = common_indent(lines);

        let shifted: Vec<&str> = lines
            .iter()
            .map(|line| match line.strip_prefix(indent) {
                Some(rest) => rest,
                None if is_blank(line) => "",
                None => line,
            })
            .collect();

        shifted.join(line_break.as_str()).trim_end().to_string()
    }

    /// Normalize and split into lines.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let line_break = LineBreak::detect(&normalized).unwrap_or_default();
        line_break.split(&normalized).map(str::to_string).collect()
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading whitespace of a line.
fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Longest whitespace prefix shared by all non-blank lines.
///
/// Compared character by character, so a tab never matches spaces.
fn common_indent<'a>(lines: &[&'a str]) -> &'a str {
    let mut indent: Option<&'a str> = None;

    for line in lines.iter().filter(|l| !is_blank(l)) {
        let leading = leading_whitespace(line);
        indent = Some(match indent {
            None => leading,
            Some(current) => {
                let shared = current
                    .char_indices()
                    .zip(leading.chars())
                    .find(|((_, a), b)| a != b)
                    .map(|((idx, _), _)| idx)
                    .unwrap_or_else(|| current.len().min(leading.len()));
                &current[..shared]
            }
        });
    }

    indent.unwrap_or("")
}
