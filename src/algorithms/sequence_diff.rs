use crate::error::{DiffError, Result};
use crate::geometry::OffsetRange;
use derive_new::new;
use std::fmt;

/// "`seq1_range` of the first sequence is replaced by `seq2_range` of the second."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct SequenceDiff {
    pub seq1_range: OffsetRange,
    pub seq2_range: OffsetRange,
}

impl SequenceDiff {
    /// The unchanged spans around and between the sorted `diffs`, where
    /// `doc_length` is the length of the first sequence.
    pub fn invert(diffs: &[SequenceDiff], doc_length: usize) -> Vec<SequenceDiff> {
        let mut result = Vec::with_capacity(diffs.len() + 1);
        for i in 0..=diffs.len() {
            let prev = i.checked_sub(1).map(|p| &diffs[p]);
            let start = prev.map_or(OffsetPair::ZERO, SequenceDiff::end_exclusives);
            let end = match diffs.get(i) {
                Some(next) => next.starts(),
                None => {
                    let shift = prev.map_or(0, |p| {
                        p.seq2_range.end_exclusive as isize - p.seq1_range.end_exclusive as isize
                    });
                    OffsetPair::new(doc_length, doc_length.saturating_add_signed(shift))
                }
            };
            result.push(SequenceDiff::from_offset_pairs(start, end));
        }
        result
    }

    pub fn from_offset_pairs(start: OffsetPair, end_exclusive: OffsetPair) -> Self {
        Self::new(
            OffsetRange::new(start.offset1, end_exclusive.offset1),
            OffsetRange::new(start.offset2, end_exclusive.offset2),
        )
    }

    /// Fails unless every diff ends, in both sequences, no later than the next one
    /// starts.
    pub fn assert_sorted(diffs: &[SequenceDiff]) -> Result<()> {
        match diffs.windows(2).position(|pair| {
            pair[0].seq1_range.end_exclusive > pair[1].seq1_range.start
                || pair[0].seq2_range.end_exclusive > pair[1].seq2_range.start
        }) {
            Some(idx) => Err(DiffError::UnsortedDiffs { index: idx + 1 }),
            None => Ok(()),
        }
    }

    pub fn swap(&self) -> Self {
        Self::new(self.seq2_range, self.seq1_range)
    }

    pub fn join(&self, other: &SequenceDiff) -> Self {
        Self::new(
            self.seq1_range.join(&other.seq1_range),
            self.seq2_range.join(&other.seq2_range),
        )
    }

    pub fn delta(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(self.seq1_range.delta(offset), self.seq2_range.delta(offset))
    }

    pub fn delta_start(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(
            self.seq1_range.delta_start(offset),
            self.seq2_range.delta_start(offset),
        )
    }

    pub fn delta_end(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(
            self.seq1_range.delta_end(offset),
            self.seq2_range.delta_end(offset),
        )
    }

    pub fn intersects_or_touches(&self, other: &SequenceDiff) -> bool {
        self.seq1_range.intersects_or_touches(&other.seq1_range)
            || self.seq2_range.intersects_or_touches(&other.seq2_range)
    }

    /// The overlap of both sides, or `None` when either side overlaps in no
    /// element at all.
    pub fn intersect(&self, other: &SequenceDiff) -> Option<Self> {
        let i1 = self.seq1_range.intersect(&other.seq1_range)?;
        let i2 = self.seq2_range.intersect(&other.seq2_range)?;
        if i1.is_empty() || i2.is_empty() {
            return None;
        }
        Some(Self::new(i1, i2))
    }

    pub fn starts(&self) -> OffsetPair {
        OffsetPair::new(self.seq1_range.start, self.seq2_range.start)
    }

    pub fn end_exclusives(&self) -> OffsetPair {
        OffsetPair::new(self.seq1_range.end_exclusive, self.seq2_range.end_exclusive)
    }
}

impl fmt::Display for SequenceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.seq1_range, self.seq2_range)
    }
}

/// A join point between two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct OffsetPair {
    pub offset1: usize,
    pub offset2: usize,
}

impl OffsetPair {
    pub const ZERO: OffsetPair = OffsetPair {
        offset1: 0,
        offset2: 0,
    };

    pub const MAX: OffsetPair = OffsetPair {
        offset1: usize::MAX,
        offset2: usize::MAX,
    };

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn max() -> Self {
        Self::MAX
    }

    pub fn delta(&self, offset: isize) -> Self {
        if offset == 0 {
            return *self;
        }
        Self::new(
            self.offset1.saturating_add_signed(offset),
            self.offset2.saturating_add_signed(offset),
        )
    }
}

impl fmt::Display for OffsetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.offset1, self.offset2)
    }
}
