use crate::algorithms::{DiffAlgorithm, DiffAlgorithmResult, Sequence, SequenceDiff, Timeout};
use crate::geometry::OffsetRange;

/// Myers' O(ND) difference algorithm.
///
/// `v[offset + k]` holds the furthest `x` reached on diagonal `k = x - y` and
/// `paths[offset + k]` the last snake on that furthest path. Snakes live in an
/// arena and point back at their predecessor by index.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiffAlgorithm;

#[derive(Debug, Clone, Copy)]
struct SnakePath {
    prev: Option<usize>,
    x: usize,
    y: usize,
    length: usize,
}

impl DiffAlgorithm for MyersDiffAlgorithm {
    fn compute<S: Sequence + ?Sized>(
        &self,
        seq1: &S,
        seq2: &S,
        timeout: &dyn Timeout,
    ) -> DiffAlgorithmResult {
        let (n, m) = (seq1.len(), seq2.len());
        if n == 0 && m == 0 {
            return DiffAlgorithmResult::new(Vec::new());
        }
        if n == 0 || m == 0 {
            return DiffAlgorithmResult::trivial(n, m);
        }

        let snake = |mut x: usize, mut y: usize| {
            while x < n && y < m && seq1.element(x) == seq2.element(y) {
                x += 1;
                y += 1;
            }
            x
        };

        // diagonals range over [-(m + 1), n + 1]
        let offset = m as isize + 1;
        let idx = |k: isize| (offset + k) as usize;
        let mut v = vec![0usize; n + m + 3];
        let mut paths: Vec<Option<usize>> = vec![None; n + m + 3];
        let mut arena: Vec<SnakePath> = Vec::new();

        let x0 = snake(0, 0);
        v[idx(0)] = x0;
        if x0 > 0 {
            arena.push(SnakePath {
                prev: None,
                x: 0,
                y: 0,
                length: x0,
            });
            paths[idx(0)] = Some(0);
        }

        let mut d: isize = 0;
        let final_k = 'search: loop {
            if d == 0 && x0 == n && x0 == m {
                break 'search 0;
            }
            d += 1;
            if !timeout.is_valid() {
                return DiffAlgorithmResult::trivial_timeout(n, m);
            }

            let lower = -d.min(m as isize + d % 2);
            let upper = d.min(n as isize + d % 2);
            for k in (lower..=upper).step_by(2) {
                // we could have come from k+1 (insertion) or k-1 (deletion)
                let from_top = if k == upper { -1 } else { v[idx(k + 1)] as isize };
                let from_left = if k == lower { -1 } else { v[idx(k - 1)] as isize + 1 };
                let x = from_top.max(from_left).min(n as isize);
                let y = x - k;
                if x < 0 || y < 0 || x > n as isize || y > m as isize {
                    continue;
                }
                let (x, y) = (x as usize, y as usize);

                let new_x = snake(x, y);
                v[idx(k)] = new_x;
                let last_path = if x as isize == from_top {
                    paths[idx(k + 1)]
                } else {
                    paths[idx(k - 1)]
                };
                paths[idx(k)] = if new_x != x {
                    arena.push(SnakePath {
                        prev: last_path,
                        x,
                        y,
                        length: new_x - x,
                    });
                    Some(arena.len() - 1)
                } else {
                    last_path
                };

                if new_x == n && new_x - x + y == m {
                    break 'search k;
                }
            }
        };

        let mut result = Vec::new();
        let mut path = paths[idx(final_k)];
        let (mut last1, mut last2) = (n, m);
        loop {
            let (end_x, end_y) = path.map_or((0, 0), |p| {
                let snake = arena[p];
                (snake.x + snake.length, snake.y + snake.length)
            });
            if end_x != last1 || end_y != last2 {
                result.push(SequenceDiff::new(
                    OffsetRange::new(end_x, last1),
                    OffsetRange::new(end_y, last2),
                ));
            }
            let Some(p) = path else {
                break;
            };
            last1 = arena[p].x;
            last2 = arena[p].y;
            path = arena[p].prev;
        }

        result.reverse();
        DiffAlgorithmResult::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::InfiniteTimeout;
    use crate::algorithms::test_support::CharSeq;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn diff(s1: (usize, usize), s2: (usize, usize)) -> SequenceDiff {
        SequenceDiff::new(OffsetRange::new(s1.0, s1.1), OffsetRange::new(s2.0, s2.1))
    }

    fn compute(a: &str, b: &str) -> Vec<SequenceDiff> {
        MyersDiffAlgorithm
            .compute(&CharSeq::of(a), &CharSeq::of(b), &InfiniteTimeout)
            .diffs
    }

    fn apply(a: &str, b: &str, diffs: &[SequenceDiff]) -> String {
        let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
        let mut result = String::new();
        let mut pos = 0;
        for d in diffs {
            result.extend(&a[pos..d.seq1_range.start]);
            result.extend(&b[d.seq2_range.start..d.seq2_range.end_exclusive]);
            pos = d.seq1_range.end_exclusive;
        }
        result.extend(&a[pos..]);
        result
    }

    #[rstest]
    #[case("abc", "abc", vec![])]
    #[case("", "", vec![])]
    #[case("", "xy", vec![diff((0, 0), (0, 2))])]
    #[case("abc", "abxc", vec![diff((2, 2), (2, 3))])]
    #[case("abc", "ac", vec![diff((1, 2), (1, 1))])]
    #[case("abcd", "xbcy", vec![diff((0, 1), (0, 1)), diff((3, 4), (3, 4))])]
    fn finds_minimal_diffs(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Vec<SequenceDiff>,
    ) {
        assert_eq!(compute(a, b), expected);
    }

    #[test]
    fn edit_distance_is_minimal() {
        let diffs = compute("abcabba", "cbabac");
        let cost: usize = diffs
            .iter()
            .map(|d| d.seq1_range.len() + d.seq2_range.len())
            .sum();
        assert_eq!(cost, 5);
        assert_eq!(apply("abcabba", "cbabac", &diffs), "cbabac");
    }

    #[test]
    fn expired_timeout_yields_trivial_result() {
        let timeout = crate::algorithms::DateTimeout::new(std::time::Duration::ZERO);
        let result = MyersDiffAlgorithm.compute(&CharSeq::of("abc"), &CharSeq::of("xbz"), &timeout);
        assert!(result.hit_timeout);
        assert_eq!(result.diffs, vec![diff((0, 3), (0, 3))]);
    }

    proptest! {
        #[test]
        fn diffs_reconstruct_the_second_sequence(a in "[abc]{0,24}", b in "[abc]{0,24}") {
            let diffs = compute(&a, &b);
            prop_assert!(SequenceDiff::assert_sorted(&diffs).is_ok());
            prop_assert!(diffs.iter().all(|d| !(d.seq1_range.is_empty() && d.seq2_range.is_empty())));
            prop_assert_eq!(apply(&a, &b, &diffs), b);
        }
    }
}
