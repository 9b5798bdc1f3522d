use crate::algorithms::{DiffAlgorithm, DiffAlgorithmResult, Sequence, SequenceDiff, Timeout};
use crate::geometry::OffsetRange;

/// Weight of aligning element `s1` of the first sequence with element `s2` of the
/// second. Without one every match weighs `1.0`.
pub type EqualityScore<'a> = &'a dyn Fn(usize, usize) -> f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
}

/// O(N·M) LCS table. Among equally long alignments it prefers the one with the
/// longest runs of consecutive matches, which keeps small diffs tidy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingDiffing;

impl DynamicProgrammingDiffing {
    pub fn compute_with_score<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        timeout: &dyn Timeout,
        equality_score: Option<EqualityScore<'_>>,
    ) -> DiffAlgorithmResult {
        let (n, m) = (seq1.len(), seq2.len());
        if n == 0 && m == 0 {
            return DiffAlgorithmResult::new(Vec::new());
        }
        if n == 0 || m == 0 {
            return DiffAlgorithmResult::trivial(n, m);
        }

        let at = |s1: usize, s2: usize| s1 * m + s2;
        let mut lcs_lengths = vec![0f64; n * m];
        let mut directions = vec![Direction::Horizontal; n * m];
        let mut lengths = vec![0usize; n * m];

        for s1 in 0..n {
            if !timeout.is_valid() {
                return DiffAlgorithmResult::trivial_timeout(n, m);
            }

            for s2 in 0..m {
                let horizontal = if s1 == 0 { 0.0 } else { lcs_lengths[at(s1 - 1, s2)] };
                let vertical = if s2 == 0 { 0.0 } else { lcs_lengths[at(s1, s2 - 1)] };

                let diagonal = if seq1.element(s1) == seq2.element(s2) {
                    let mut score = if s1 == 0 || s2 == 0 {
                        0.0
                    } else {
                        lcs_lengths[at(s1 - 1, s2 - 1)]
                    };
                    if s1 > 0 && s2 > 0 && directions[at(s1 - 1, s2 - 1)] == Direction::Diagonal {
                        // prefer consecutive diagonals
                        score += lengths[at(s1 - 1, s2 - 1)] as f64;
                    }
                    score + equality_score.map_or(1.0, |f| f(s1, s2))
                } else {
                    -1.0
                };

                let best = horizontal.max(vertical).max(diagonal);
                let cell = at(s1, s2);
                if best == diagonal {
                    let prev_len = if s1 > 0 && s2 > 0 {
                        lengths[at(s1 - 1, s2 - 1)]
                    } else {
                        0
                    };
                    lengths[cell] = prev_len + 1;
                    directions[cell] = Direction::Diagonal;
                } else if best == horizontal {
                    directions[cell] = Direction::Horizontal;
                } else {
                    directions[cell] = Direction::Vertical;
                }
                lcs_lengths[cell] = best;
            }
        }

        // (i, j) are one past the cell being visited
        let mut result = Vec::new();
        let (mut last1, mut last2) = (n, m);
        let (mut i, mut j) = (n, m);
        while i > 0 && j > 0 {
            match directions[at(i - 1, j - 1)] {
                Direction::Diagonal => {
                    if i != last1 || j != last2 {
                        result.push(SequenceDiff::new(
                            OffsetRange::new(i, last1),
                            OffsetRange::new(j, last2),
                        ));
                    }
                    last1 = i - 1;
                    last2 = j - 1;
                    i -= 1;
                    j -= 1;
                }
                Direction::Horizontal => i -= 1,
                Direction::Vertical => j -= 1,
            }
        }
        if last1 != 0 || last2 != 0 {
            result.push(SequenceDiff::new(
                OffsetRange::new(0, last1),
                OffsetRange::new(0, last2),
            ));
        }

        result.reverse();
        DiffAlgorithmResult::new(result)
    }
}

impl DiffAlgorithm for DynamicProgrammingDiffing {
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        timeout: &dyn Timeout,
    ) -> DiffAlgorithmResult {
        self.compute_with_score(seq1, seq2, timeout, None)
    }
}
