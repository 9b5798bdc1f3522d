use crate::geometry::position::Position;
use std::fmt;

/// An ordered pair of positions. Construction swaps the endpoints if needed, so
/// `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        if start > end {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    pub fn from_coords(
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        Self::new(
            Position::new(start_line, start_column),
            Position::new(end_line, end_column),
        )
    }

    pub fn empty_at(position: Position) -> Self {
        Self::new(position, position)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn union(&self, other: &Range) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{} -> {},{}]",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}
