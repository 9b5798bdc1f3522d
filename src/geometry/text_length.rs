use crate::geometry::line_range::LineRange;
use crate::geometry::position::Position;
use crate::geometry::range::Range;
use derive_new::new;
use std::fmt;

/// The size of a text span: how many line breaks it contains and how many
/// characters follow the last one. Relative, unlike [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, new)]
pub struct TextLength {
    pub line_count: usize,
    pub column_count: usize,
}

impl TextLength {
    pub const ZERO: TextLength = TextLength {
        line_count: 0,
        column_count: 0,
    };

    pub fn between_positions(from: &Position, to: &Position) -> Self {
        if from.line == to.line {
            Self::new(0, to.column.saturating_sub(from.column))
        } else {
            Self::new(to.line - from.line, to.column - 1)
        }
    }

    pub fn of_range(range: &Range) -> Self {
        Self::between_positions(&range.start, &range.end)
    }

    pub fn of_text(text: &str) -> Self {
        text.chars().fold(Self::ZERO, |acc, c| {
            if c == '\n' {
                Self::new(acc.line_count + 1, 0)
            } else {
                Self::new(acc.line_count, acc.column_count + 1)
            }
        })
    }

    pub fn create_range(&self, start: &Position) -> Range {
        Range::new(*start, self.add_to_position(start))
    }

    pub fn to_range(&self) -> Range {
        Range::from_coords(1, 1, self.line_count + 1, self.column_count + 1)
    }

    pub fn to_line_range(&self) -> LineRange {
        LineRange::of_length(1, self.line_count + 1)
    }

    pub fn add_to_position(&self, position: &Position) -> Position {
        if self.line_count == 0 {
            Position::new(position.line, position.column + self.column_count)
        } else {
            Position::new(position.line + self.line_count, self.column_count + 1)
        }
    }
}

impl std::ops::Add for TextLength {
    type Output = TextLength;

    fn add(self, other: TextLength) -> TextLength {
        if other.line_count == 0 {
            TextLength::new(self.line_count, self.column_count + other.column_count)
        } else {
            TextLength::new(self.line_count + other.line_count, other.column_count)
        }
    }
}

impl fmt::Display for TextLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line_count, self.column_count)
    }
}
