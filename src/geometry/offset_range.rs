use crate::error::{DiffError, Result};
use std::fmt;

/// A half-open interval `[start, end_exclusive)` over a flat offset space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OffsetRange {
    pub start: usize,
    pub end_exclusive: usize,
}

impl OffsetRange {
    /// # Panics
    ///
    /// Panics when `start > end_exclusive`. Use [`OffsetRange::try_new`] for
    /// untrusted bounds.
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        match Self::try_new(start, end_exclusive) {
            Ok(range) => range,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(start: usize, end_exclusive: usize) -> Result<Self> {
        if start > end_exclusive {
            return Err(DiffError::InvalidInterval {
                start,
                end: end_exclusive,
            });
        }

        Ok(Self {
            start,
            end_exclusive,
        })
    }

    pub fn of_length(length: usize) -> Self {
        Self::new(0, length)
    }

    pub fn of_start_and_length(start: usize, length: usize) -> Self {
        Self::new(start, start + length)
    }

    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end_exclusive
    }

    /// Both endpoints shifted by `offset`. Endpoints saturate at zero.
    pub fn delta(&self, offset: isize) -> Self {
        Self::new(
            self.start.saturating_add_signed(offset),
            self.end_exclusive.saturating_add_signed(offset),
        )
    }

    pub fn delta_start(&self, offset: isize) -> Self {
        Self::new(self.start.saturating_add_signed(offset), self.end_exclusive)
    }

    pub fn delta_end(&self, offset: isize) -> Self {
        Self::new(self.start, self.end_exclusive.saturating_add_signed(offset))
    }

    /// The smallest range containing both ranges.
    pub fn join(&self, other: &OffsetRange) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }

    /// The common part of both ranges. Touching ranges produce an empty range,
    /// disjoint ranges produce `None`.
    pub fn intersect(&self, other: &OffsetRange) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end_exclusive.min(other.end_exclusive);
        (start <= end).then(|| Self::new(start, end))
    }

    /// True when the ranges share at least one offset.
    pub fn intersects(&self, other: &OffsetRange) -> bool {
        self.start.max(other.start) < self.end_exclusive.min(other.end_exclusive)
    }

    pub fn intersects_or_touches(&self, other: &OffsetRange) -> bool {
        self.start.max(other.start) <= self.end_exclusive.min(other.end_exclusive)
    }

    pub fn is_before(&self, other: &OffsetRange) -> bool {
        self.end_exclusive <= other.start
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start..self.end_exclusive]
    }

    /// Substring by character offsets.
    pub fn substring(&self, source: &str) -> String {
        source
            .chars()
            .skip(self.start)
            .take(self.len())
            .collect()
    }

    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end_exclusive
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end_exclusive)
    }
}

impl From<OffsetRange> for std::ops::Range<usize> {
    fn from(range: OffsetRange) -> Self {
        range.start..range.end_exclusive
    }
}
