//! Correspondences between the original and the modified document
//!
//! - `LineRangeMapping`: a span of original lines corresponds to a span of
//!   modified lines
//! - `RangeMapping`: the character-level equivalent, in line/column positions
//! - `DetailedLineRangeMapping`: a line mapping carrying the character mappings
//!   inside it
//!
//! `reconcile` turns a flat list of character mappings into line mappings.

pub mod reconcile;

use crate::error::{DiffError, Result};
use crate::geometry::{LineRange, MAX_COLUMN, Position, Range};
use crate::text::{AbstractText, SingleTextEdit, TextEdit};
use derive_new::new;
use std::fmt;

pub use reconcile::line_range_mapping_from_range_mappings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct LineRangeMapping {
    pub original: LineRange,
    pub modified: LineRange,
}

impl LineRangeMapping {
    /// The unchanged regions around and between `mappings`, skipping regions
    /// that are empty on the modified side.
    pub fn inverse(
        mappings: &[LineRangeMapping],
        original_line_count: usize,
        modified_line_count: usize,
    ) -> Vec<LineRangeMapping> {
        let mut result = Vec::new();
        let (mut last_original_end, mut last_modified_end) = (1, 1);

        for m in mappings {
            let gap = LineRangeMapping::new(
                LineRange::new(last_original_end, m.original.start_line),
                LineRange::new(last_modified_end, m.modified.start_line),
            );
            if !gap.modified.is_empty() {
                result.push(gap);
            }
            last_original_end = m.original.end_line_exclusive;
            last_modified_end = m.modified.end_line_exclusive;
        }

        let tail = LineRangeMapping::new(
            LineRange::new(last_original_end, original_line_count + 1),
            LineRange::new(last_modified_end, modified_line_count + 1),
        );
        if !tail.modified.is_empty() {
            result.push(tail);
        }
        result
    }

    pub fn flip(&self) -> Self {
        Self::new(self.modified, self.original)
    }

    pub fn join(&self, other: &LineRangeMapping) -> Self {
        Self::new(
            self.original.join(&other.original),
            self.modified.join(&other.modified),
        )
    }

    /// The character range mapping that covers exactly these lines, including
    /// the line breaks that belong to them.
    ///
    /// Lines are addressed by `line_start..line_end` where possible. A mapping
    /// that reaches the end of either document instead takes the line break
    /// *before* it, or ends at the last character when neither side is empty.
    pub fn to_range_mapping<S: AsRef<str>>(
        &self,
        original: &[S],
        modified: &[S],
    ) -> Result<RangeMapping> {
        let (o, m) = (self.original, self.modified);

        if is_valid_line_number(o.end_line_exclusive, original)
            && is_valid_line_number(m.end_line_exclusive, modified)
        {
            return Ok(RangeMapping::new(
                Range::from_coords(o.start_line, 1, o.end_line_exclusive, 1),
                Range::from_coords(m.start_line, 1, m.end_line_exclusive, 1),
            ));
        }

        if !o.is_empty() && !m.is_empty() {
            return Ok(RangeMapping::new(
                Range::new(
                    Position::new(o.start_line, 1),
                    normalize_position(end_of_line(o.end_line_exclusive - 1), original),
                ),
                Range::new(
                    Position::new(m.start_line, 1),
                    normalize_position(end_of_line(m.end_line_exclusive - 1), modified),
                ),
            ));
        }

        if o.start_line > 1 && m.start_line > 1 {
            return Ok(RangeMapping::new(
                Range::new(
                    normalize_position(end_of_line(o.start_line - 1), original),
                    normalize_position(end_of_line(o.end_line_exclusive - 1), original),
                ),
                Range::new(
                    normalize_position(end_of_line(m.start_line - 1), modified),
                    normalize_position(end_of_line(m.end_line_exclusive - 1), modified),
                ),
            ));
        }

        Err(DiffError::InvariantViolation(format!(
            "line mapping {self} has no character range equivalent"
        )))
    }
}

impl From<&DetailedLineRangeMapping> for LineRangeMapping {
    fn from(mapping: &DetailedLineRangeMapping) -> Self {
        Self::new(mapping.original, mapping.modified)
    }
}

impl fmt::Display for LineRangeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} -> {}}}", self.original, self.modified)
    }
}

fn end_of_line(line: usize) -> Position {
    Position::new(line, MAX_COLUMN)
}

fn is_valid_line_number<S>(line: usize, lines: &[S]) -> bool {
    line >= 1 && line <= lines.len()
}

/// Clamps `position` into `content`, which is treated as `[""]` when empty.
fn normalize_position<S: AsRef<str>>(position: Position, content: &[S]) -> Position {
    let line_len = |idx: usize| {
        content
            .get(idx)
            .map_or(0, |line| line.as_ref().chars().count())
    };
    let line_count = content.len().max(1);

    if position.line < 1 {
        return Position::new(1, 1);
    }
    if position.line > line_count {
        return Position::new(line_count, line_len(line_count - 1) + 1);
    }
    let max_column = line_len(position.line - 1) + 1;
    if position.column > max_column {
        return Position::new(position.line, max_column);
    }
    position
}

/// A line mapping plus the character-level mappings that explain it. Changes
/// produced by the diff computer always carry inner changes.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DetailedLineRangeMapping {
    pub original: LineRange,
    pub modified: LineRange,
    pub inner_changes: Option<Vec<RangeMapping>>,
}

impl DetailedLineRangeMapping {
    pub fn flip(&self) -> Self {
        Self::new(
            self.modified,
            self.original,
            self.inner_changes
                .as_ref()
                .map(|changes| changes.iter().map(RangeMapping::flip).collect()),
        )
    }

    pub fn inner_changes(&self) -> &[RangeMapping] {
        self.inner_changes.as_deref().unwrap_or_default()
    }

    /// The edit that turns the original lines of this mapping into the modified
    /// ones, built from the inner changes.
    pub fn to_text_edit(&self, modified: &dyn AbstractText) -> Result<TextEdit> {
        TextEdit::try_new(
            self.inner_changes()
                .iter()
                .map(|change| change.to_text_edit(modified))
                .collect(),
        )
    }
}

impl fmt::Display for DetailedLineRangeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} -> {}", self.original, self.modified)?;
        for change in self.inner_changes() {
            write!(f, ", {change}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct RangeMapping {
    pub original_range: Range,
    pub modified_range: Range,
}

impl RangeMapping {
    pub fn flip(&self) -> Self {
        Self::new(self.modified_range, self.original_range)
    }

    pub fn join(&self, other: &RangeMapping) -> Self {
        Self::new(
            self.original_range.union(&other.original_range),
            self.modified_range.union(&other.modified_range),
        )
    }

    pub fn to_text_edit(&self, modified: &dyn AbstractText) -> SingleTextEdit {
        SingleTextEdit::new(
            self.original_range,
            modified.get_value_of_range(&self.modified_range),
        )
    }
}

impl fmt::Display for RangeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} -> {}}}", self.original_range, self.modified_range)
    }
}
