use crate::common::lists::{
    find_first_idx_monotonous_or_len, find_last_idx_monotonous, find_last_monotonous,
};
use crate::error::{DiffError, Result};
use crate::geometry::MAX_COLUMN;
use crate::geometry::offset_range::OffsetRange;
use crate::geometry::position::Position;
use crate::geometry::range::Range;
use std::fmt;

/// A half-open interval `[start_line, end_line_exclusive)` of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRange {
    pub start_line: usize,
    pub end_line_exclusive: usize,
}

impl LineRange {
    /// # Panics
    ///
    /// Panics when `start_line > end_line_exclusive`.
    pub fn new(start_line: usize, end_line_exclusive: usize) -> Self {
        match Self::try_new(start_line, end_line_exclusive) {
            Ok(range) => range,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(start_line: usize, end_line_exclusive: usize) -> Result<Self> {
        if start_line > end_line_exclusive {
            return Err(DiffError::InvalidInterval {
                start: start_line,
                end: end_line_exclusive,
            });
        }

        Ok(Self {
            start_line,
            end_line_exclusive,
        })
    }

    pub fn of_length(start_line: usize, length: usize) -> Self {
        Self::new(start_line, start_line + length)
    }

    /// The lines touched by `range`, including the line its end sits on.
    pub fn from_range_inclusive(range: &Range) -> Self {
        Self::new(range.start.line, range.end.line + 1)
    }

    pub fn join_many(ranges: &[LineRange]) -> Option<Self> {
        let (first, rest) = ranges.split_first()?;
        Some(rest.iter().fold(*first, |acc, r| acc.join(r)))
    }

    pub fn len(&self) -> usize {
        self.end_line_exclusive - self.start_line
    }

    pub fn is_empty(&self) -> bool {
        self.start_line == self.end_line_exclusive
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line < self.end_line_exclusive
    }

    pub fn delta(&self, offset: isize) -> Self {
        Self::new(
            self.start_line.saturating_add_signed(offset),
            self.end_line_exclusive.saturating_add_signed(offset),
        )
    }

    pub fn join(&self, other: &LineRange) -> Self {
        Self::new(
            self.start_line.min(other.start_line),
            self.end_line_exclusive.max(other.end_line_exclusive),
        )
    }

    /// `None` when the ranges neither overlap nor touch.
    pub fn intersect(&self, other: &LineRange) -> Option<Self> {
        let start_line = self.start_line.max(other.start_line);
        let end_line_exclusive = self.end_line_exclusive.min(other.end_line_exclusive);
        (start_line <= end_line_exclusive).then(|| Self::new(start_line, end_line_exclusive))
    }

    pub fn intersects_strict(&self, other: &LineRange) -> bool {
        self.start_line < other.end_line_exclusive && other.start_line < self.end_line_exclusive
    }

    pub fn overlap_or_touch(&self, other: &LineRange) -> bool {
        self.start_line <= other.end_line_exclusive && other.start_line <= self.end_line_exclusive
    }

    /// Column-level range covering these lines from their first to their last
    /// character, or `None` for an empty range.
    pub fn to_inclusive_range(&self) -> Option<Range> {
        (!self.is_empty()).then(|| {
            Range::new(
                Position::new(self.start_line, 1),
                Position::new(self.end_line_exclusive - 1, MAX_COLUMN),
            )
        })
    }

    /// The range in 0-based line-index space.
    pub fn to_offset_range(&self) -> OffsetRange {
        OffsetRange::new(self.start_line - 1, self.end_line_exclusive - 1)
    }

    pub fn from_offset_range(range: &OffsetRange) -> Self {
        Self::new(range.start + 1, range.end_exclusive + 1)
    }

    pub fn lines(&self) -> std::ops::Range<usize> {
        self.start_line..self.end_line_exclusive
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start_line, self.end_line_exclusive)
    }
}

/// A set of line numbers stored as sorted, non-overlapping and non-touching
/// [`LineRange`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRangeSet {
    normalized_ranges: Vec<LineRange>,
}

impl LineRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranges(&self) -> &[LineRange] {
        &self.normalized_ranges
    }

    /// The window of stored ranges that overlap or touch `range`, as
    /// `(first_idx, end_idx_exclusive)`.
    fn touching_window(&self, range: &LineRange) -> (usize, usize) {
        let start_idx = find_first_idx_monotonous_or_len(&self.normalized_ranges, |r| {
            r.end_line_exclusive >= range.start_line
        });
        let end_idx_exclusive = find_last_idx_monotonous(&self.normalized_ranges, |r| {
            r.start_line <= range.end_line_exclusive
        })
        .map_or(0, |idx| idx + 1);
        (start_idx, end_idx_exclusive.max(start_idx))
    }

    pub fn add_range(&mut self, range: LineRange) {
        if range.is_empty() {
            return;
        }

        let (start_idx, end_idx_exclusive) = self.touching_window(&range);
        if start_idx == end_idx_exclusive {
            self.normalized_ranges.insert(start_idx, range);
        } else {
            let joined = self.normalized_ranges[start_idx]
                .join(&self.normalized_ranges[end_idx_exclusive - 1])
                .join(&range);
            self.normalized_ranges
                .splice(start_idx..end_idx_exclusive, [joined]);
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        find_last_monotonous(&self.normalized_ranges, |r| r.start_line <= line)
            .is_some_and(|r| r.end_line_exclusive > line)
    }

    /// The lines of `range` that are not in this set.
    pub fn subtract_from(&self, range: &LineRange) -> LineRangeSet {
        let (start_idx, end_idx_exclusive) = self.touching_window(range);
        if start_idx == end_idx_exclusive {
            return LineRangeSet::from_normalized(vec![*range]);
        }

        let mut result = Vec::new();
        let mut start_line = range.start_line;
        for r in &self.normalized_ranges[start_idx..end_idx_exclusive] {
            if r.start_line > start_line {
                result.push(LineRange::new(start_line, r.start_line));
            }
            start_line = r.end_line_exclusive;
        }
        if start_line < range.end_line_exclusive {
            result.push(LineRange::new(start_line, range.end_line_exclusive));
        }

        LineRangeSet::from_normalized(result)
    }

    pub fn get_intersection(&self, other: &LineRangeSet) -> LineRangeSet {
        let mut result = Vec::new();
        let (mut i1, mut i2) = (0, 0);
        while i1 < self.normalized_ranges.len() && i2 < other.normalized_ranges.len() {
            let r1 = &self.normalized_ranges[i1];
            let r2 = &other.normalized_ranges[i2];
            if let Some(i) = r1.intersect(r2).filter(|i| !i.is_empty()) {
                result.push(i);
            }

            if r1.end_line_exclusive < r2.end_line_exclusive {
                i1 += 1;
            } else {
                i2 += 1;
            }
        }

        LineRangeSet::from_normalized(result)
    }

    pub fn get_with_delta(&self, delta: isize) -> LineRangeSet {
        LineRangeSet::from_normalized(
            self.normalized_ranges
                .iter()
                .map(|r| r.delta(delta))
                .collect(),
        )
    }

    fn from_normalized(normalized_ranges: Vec<LineRange>) -> Self {
        Self { normalized_ranges }
    }
}

impl fmt::Display for LineRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.normalized_ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::lists::check_adjacent_items;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn set_of(ranges: &[(usize, usize)]) -> LineRangeSet {
        let mut set = LineRangeSet::new();
        for (s, e) in ranges {
            set.add_range(LineRange::new(*s, *e));
        }
        set
    }

    #[test]
    fn try_new_rejects_inverted_lines() {
        assert_eq!(
            LineRange::try_new(7, 3),
            Err(DiffError::InvalidInterval { start: 7, end: 3 })
        );
    }

    #[test]
    fn inclusive_range_and_offset_range() {
        let range = LineRange::new(3, 5);
        assert_eq!(
            range.to_inclusive_range(),
            Some(Range::from_coords(3, 1, 4, MAX_COLUMN))
        );
        assert_eq!(LineRange::new(3, 3).to_inclusive_range(), None);
        assert_eq!(range.to_offset_range(), OffsetRange::new(2, 4));
        assert_eq!(LineRange::from_offset_range(&OffsetRange::new(2, 4)), range);
        assert_eq!(
            LineRange::from_range_inclusive(&Range::from_coords(3, 4, 4, 1)),
            range
        );
    }

    #[rstest]
    #[case((1, 4), (4, 6), Some((4, 4)), true, false)]
    #[case((1, 4), (5, 6), None, false, false)]
    #[case((2, 8), (3, 5), Some((3, 5)), true, true)]
    fn pairwise_relations(
        #[case] a: (usize, usize),
        #[case] b: (usize, usize),
        #[case] intersection: Option<(usize, usize)>,
        #[case] touching: bool,
        #[case] strict: bool,
    ) {
        let a = LineRange::new(a.0, a.1);
        let b = LineRange::new(b.0, b.1);
        assert_eq!(
            a.intersect(&b),
            intersection.map(|(s, e)| LineRange::new(s, e))
        );
        assert_eq!(a.overlap_or_touch(&b), touching);
        assert_eq!(a.intersects_strict(&b), strict);
    }

    #[test]
    fn join_many_spans_all() {
        let ranges = [LineRange::new(4, 6), LineRange::new(1, 2), LineRange::new(9, 9)];
        assert_eq!(LineRange::join_many(&ranges), Some(LineRange::new(1, 9)));
        assert_eq!(LineRange::join_many(&[]), None);
    }

    #[test]
    fn add_range_merges_touching_ranges() {
        let set = set_of(&[(1, 3), (10, 12), (3, 5), (7, 8)]);
        assert_eq!(
            set.ranges(),
            &[LineRange::new(1, 5), LineRange::new(7, 8), LineRange::new(10, 12)]
        );

        let set = set_of(&[(1, 3), (10, 12), (7, 8), (2, 11)]);
        assert_eq!(set.ranges(), &[LineRange::new(1, 12)]);
    }

    #[test]
    fn add_range_ignores_empty_ranges() {
        let set = set_of(&[(4, 4)]);
        assert!(set.ranges().is_empty());
    }

    #[test]
    fn contains_checks_membership() {
        let set = set_of(&[(2, 4), (8, 9)]);
        assert!(!set.contains(1));
        assert!(set.contains(2));
        assert!(set.contains(3));
        assert!(!set.contains(4));
        assert!(set.contains(8));
        assert!(!set.contains(9));
    }

    #[test]
    fn subtract_from_leaves_uncovered_lines() {
        let set = set_of(&[(3, 5), (7, 8)]);
        assert_eq!(
            set.subtract_from(&LineRange::new(1, 10)).ranges(),
            &[LineRange::new(1, 3), LineRange::new(5, 7), LineRange::new(8, 10)]
        );
        assert_eq!(
            set.subtract_from(&LineRange::new(10, 12)).ranges(),
            &[LineRange::new(10, 12)]
        );
        assert!(set.subtract_from(&LineRange::new(3, 5)).ranges().is_empty());
    }

    #[test]
    fn intersection_of_sets() {
        let a = set_of(&[(1, 5), (8, 12)]);
        let b = set_of(&[(3, 9), (11, 20)]);
        assert_eq!(
            a.get_intersection(&b).ranges(),
            &[LineRange::new(3, 5), LineRange::new(8, 9), LineRange::new(11, 12)]
        );
    }

    #[test]
    fn delta_shifts_every_range() {
        let set = set_of(&[(3, 5), (7, 8)]).get_with_delta(-2);
        assert_eq!(set.ranges(), &[LineRange::new(1, 3), LineRange::new(5, 6)]);
    }

    proptest! {
        #[test]
        fn prop_add_range_keeps_set_normalized(
            ranges in prop::collection::vec((1usize..60, 0usize..8), 0..25)
        ) {
            let mut set = LineRangeSet::new();
            let mut expected = std::collections::BTreeSet::new();
            for (start, len) in ranges {
                set.add_range(LineRange::of_length(start, len));
                expected.extend(start..start + len);
            }

            let normalized =
                check_adjacent_items(set.ranges(), |a, b| a.end_line_exclusive < b.start_line);
            prop_assert!(normalized);
            prop_assert!(set.ranges().iter().all(|r| !r.is_empty()));
            for line in 0..70 {
                prop_assert_eq!(set.contains(line), expected.contains(&line));
            }
        }

        #[test]
        fn prop_join_contains_both(a in 1usize..40, la in 0usize..10, b in 1usize..40, lb in 0usize..10) {
            let ra = LineRange::of_length(a, la);
            let rb = LineRange::of_length(b, lb);
            let joined = ra.join(&rb);
            prop_assert!(joined.start_line <= ra.start_line && ra.end_line_exclusive <= joined.end_line_exclusive);
            prop_assert!(joined.start_line <= rb.start_line && rb.end_line_exclusive <= joined.end_line_exclusive);
        }
    }
}
