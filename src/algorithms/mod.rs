//! Sequence diffing
//!
//! This module contains the element-level diff machinery shared by the line pass
//! and the character pass:
//!
//! - `sequence_diff`: `SequenceDiff`/`OffsetPair`, the algorithms' output vocabulary
//! - `timeout`: cooperative deadlines checked while the algorithms run
//! - `myers`: Myers' O(ND) algorithm, used for large inputs
//! - `dynamic_programming`: an LCS table with optional equality scores, used
//!   for small inputs
//! - `heuristics`: post-passes that shift, join and widen raw diffs so they read
//!   the way a human would mark the change

pub mod dynamic_programming;
pub mod heuristics;
pub mod myers;
pub mod sequence_diff;
pub mod timeout;

use crate::geometry::OffsetRange;

pub use dynamic_programming::DynamicProgrammingDiffing;
pub use myers::MyersDiffAlgorithm;
pub use sequence_diff::{OffsetPair, SequenceDiff};
pub use timeout::{DateTimeout, InfiniteTimeout, Timeout};

/// An indexed sequence of comparable elements.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Equal elements compare equal with `==`; nothing else is implied.
    fn element(&self, offset: usize) -> u32;

    /// How good a place the gap before `offset` is for a diff boundary. Higher is
    /// better.
    fn boundary_score(&self, _offset: usize) -> i32 {
        0
    }

    /// Exact equality of the raw elements at two offsets of this sequence, which
    /// may be stricter than `element` equality.
    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool {
        self.element(offset1) == self.element(offset2)
    }
}

pub trait DiffAlgorithm {
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        timeout: &dyn Timeout,
    ) -> DiffAlgorithmResult;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffAlgorithmResult {
    pub diffs: Vec<SequenceDiff>,
    pub hit_timeout: bool,
}

impl DiffAlgorithmResult {
    pub fn new(diffs: Vec<SequenceDiff>) -> Self {
        Self {
            diffs,
            hit_timeout: false,
        }
    }

    /// A single diff replacing all of `len1` by all of `len2`.
    pub fn trivial(len1: usize, len2: usize) -> Self {
        Self::new(vec![SequenceDiff::new(
            OffsetRange::of_length(len1),
            OffsetRange::of_length(len2),
        )])
    }

    pub fn trivial_timeout(len1: usize, len2: usize) -> Self {
        Self {
            hit_timeout: true,
            ..Self::trivial(len1, len2)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Sequence;

    /// A plain sequence of characters for exercising the algorithms directly.
    pub struct CharSeq(pub Vec<u32>);

    impl CharSeq {
        pub fn of(text: &str) -> Self {
            Self(text.chars().map(|c| c as u32).collect())
        }
    }

    impl Sequence for CharSeq {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn element(&self, offset: usize) -> u32 {
            self.0[offset]
        }
    }
}
