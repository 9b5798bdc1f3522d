use derive_new::new;
use std::fmt;

/// A 1-based `(line, column)` location. Column 1 is before the first character
/// of the line.
///
/// Ordering is lexicographic: line first, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    pub fn is_before_or_equal(&self, other: &Position) -> bool {
        self <= other
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_orders_before_column() {
        assert!(Position::new(1, 80) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 5));
        assert!(Position::new(3, 5).is_before_or_equal(&Position::new(3, 5)));
        assert!(!Position::new(3, 5).is_before(&Position::new(3, 5)));
    }
}
