//! Line-range specifications.
//!
//! A range specification selects lines of a code block by 1-based position.
//! The textual form is a comma-separated list of line numbers and bracketed
//! `[start, end]` ranges, e.g. `1, 3, [7, 9]`: exactly what becomes a valid
//! JSON array when wrapped in brackets.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// One element of a range specification as written by an author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RangeItem {
    /// A single line.
    Line(u32),
    /// An inclusive `[start, end]` range.
    Range([u32; 2]),
}

impl From<u32> for RangeItem {
    fn from(line: u32) -> Self {
        Self::Line(line)
    }
}

impl From<(u32, u32)> for RangeItem {
    fn from((start, end): (u32, u32)) -> Self {
        Self::Range([start, end])
    }
}

/// Inclusive, 1-based interval of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Positions of this range that exist in a block of `count` lines.
    ///
    /// Positions outside `1..=count` are skipped. A range with `start > end`
    /// selects nothing; it is not reordered.
    pub fn clamped(self, count: usize) -> std::ops::RangeInclusive<usize> {
        if self.start > self.end {
            return 1..=0;
        }
        (self.start as usize).max(1)..=(self.end as usize).min(count)
    }
}

impl From<RangeItem> for LineRange {
    fn from(item: RangeItem) -> Self {
        match item {
            RangeItem::Line(line) => Self::new(line, line),
            RangeItem::Range([start, end]) => Self::new(start, end),
        }
    }
}

/// Accepted shapes of a programmatic range specification.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RangeInput {
    /// A list of lines and ranges.
    Many(Vec<RangeItem>),
    /// A single line or range.
    One(RangeItem),
}

/// Normalized list of inclusive line ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RangeInput")]
pub struct RangeSpec {
    ranges: Vec<LineRange>,
}

impl RangeSpec {
    /// An empty specification: highlight nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the textual form, e.g. `1, 3, [7, 9]`.
    ///
    /// Blank input yields an empty specification. Anything that is not a
    /// list of non-negative integers and two-element integer arrays is an
    /// error.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        let items: Vec<RangeItem> =
            serde_json::from_str(&format!("[{}]", trimmed)).map_err(|e| Error::RangeSpec {
                input: text.to_string(),
                message: e.to_string(),
            })?;

        Ok(items.into_iter().collect())
    }

    /// Normalized ranges, in the order given.
    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sorted, de-duplicated 1-based positions selected in a block of
    /// `count` lines.
    pub fn lines_within(&self, count: usize) -> Vec<usize> {
        let mut lines: Vec<usize> = self
            .ranges
            .iter()
            .flat_map(|range| range.clamped(count))
            .collect();
        lines.sort_unstable();
        lines.dedup();
        lines
    }
}

impl FromStr for RangeSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromIterator<RangeItem> for RangeSpec {
    fn from_iter<I: IntoIterator<Item = RangeItem>>(iter: I) -> Self {
        Self {
            ranges: iter.into_iter().map(LineRange::from).collect(),
        }
    }
}

impl From<RangeInput> for RangeSpec {
    fn from(input: RangeInput) -> Self {
        match input {
            RangeInput::Many(items) => items.into_iter().collect(),
            RangeInput::One(item) => Self::from(item),
        }
    }
}

impl From<RangeItem> for RangeSpec {
    fn from(item: RangeItem) -> Self {
        std::iter::once(item).collect()
    }
}

impl From<u32> for RangeSpec {
    fn from(line: u32) -> Self {
        Self::from(RangeItem::from(line))
    }
}

impl From<(u32, u32)> for RangeSpec {
    fn from(range: (u32, u32)) -> Self {
        Self::from(RangeItem::from(range))
    }
}

impl From<Vec<RangeItem>> for RangeSpec {
    fn from(items: Vec<RangeItem>) -> Self {
        items.into_iter().collect()
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, range) in self.ranges.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if range.start == range.end {
                write!(f, "{}", range.start)?;
            } else {
                write!(f, "[{}, {}]", range.start, range.end)?;
            }
        }
        Ok(())
    }
}
