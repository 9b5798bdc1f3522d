//! Text access
//!
//! [`AbstractText`] lets the reconciliation layer read substrings of a document
//! by line/column range without caring whether the document is held as a line
//! array ([`ListText`]) or a flat string ([`StringText`]). Both join lines with a
//! single `\n`, exactly like the line sequences the diff algorithms see.

pub mod offset_edit;
pub mod text_edit;

use crate::common::strings::{char_len, char_slice};
use crate::geometry::{
    MAX_COLUMN, OffsetRange, Position, PositionOffsetTransformer, Range, TextLength,
};

pub use offset_edit::{OffsetEdit, SingleOffsetEdit};
pub use text_edit::{SingleTextEdit, TextEdit};

pub trait AbstractText {
    fn get_value_of_range(&self, range: &Range) -> String;

    fn length(&self) -> TextLength;

    fn get_line_length(&self, line: usize) -> usize {
        char_len(&self.get_value_of_range(&Range::from_coords(line, 1, line, MAX_COLUMN)))
    }

    /// The position just past the last character.
    fn end_position_exclusive(&self) -> Position {
        self.length().add_to_position(&Position::new(1, 1))
    }

    fn get_value(&self) -> String {
        self.get_value_of_range(&self.length().to_range())
    }
}

/// A document held as an array of lines without terminators.
#[derive(Debug, Clone, Copy)]
pub struct ListText<'a, S> {
    lines: &'a [S],
}

impl<'a, S: AsRef<str>> ListText<'a, S> {
    pub fn new(lines: &'a [S]) -> Self {
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len().max(1)
    }

    fn line(&self, line: usize) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map_or("", |l| l.as_ref())
    }
}

impl<S: AsRef<str>> AbstractText for ListText<'_, S> {
    fn get_value_of_range(&self, range: &Range) -> String {
        let (start, end) = (range.start, range.end);
        if start.line == end.line {
            return char_slice(
                self.line(start.line),
                start.column.saturating_sub(1),
                end.column.saturating_sub(1),
            )
            .to_string();
        }

        let mut result = char_slice(self.line(start.line), start.column.saturating_sub(1), MAX_COLUMN)
            .to_string();
        for line in start.line + 1..end.line {
            result.push('\n');
            result.push_str(self.line(line));
        }
        result.push('\n');
        result.push_str(char_slice(self.line(end.line), 0, end.column.saturating_sub(1)));
        result
    }

    fn length(&self) -> TextLength {
        TextLength::new(self.line_count() - 1, char_len(self.line(self.line_count())))
    }

    fn get_line_length(&self, line: usize) -> usize {
        char_len(self.line(line))
    }
}

/// A document held as one flat string, possibly containing `\r\n` terminators.
#[derive(Debug, Clone)]
pub struct StringText {
    transformer: PositionOffsetTransformer,
}

impl StringText {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            transformer: PositionOffsetTransformer::new(value),
        }
    }

    pub fn value(&self) -> &str {
        self.transformer.text()
    }

    pub fn transformer(&self) -> &PositionOffsetTransformer {
        &self.transformer
    }
}

impl AbstractText for StringText {
    fn get_value_of_range(&self, range: &Range) -> String {
        let offsets: OffsetRange = self.transformer.get_offset_range(range);
        self.transformer.substring(&offsets).to_string()
    }

    fn length(&self) -> TextLength {
        self.transformer.text_length()
    }
}
