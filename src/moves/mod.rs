//! Move detection
//!
//! Finds blocks of lines that were moved rather than deleted and re-inserted.
//! Candidates come from two passes over the changes of a line diff:
//!
//! - pure deletions are paired with pure insertions whose content is identical
//!   or has a near-identical character histogram
//! - the remaining changes are searched for runs of at least three lines that
//!   hash the same on both sides, widened over neighbouring similar lines
//!
//! Close moves are then joined and moves that carry too little text, or that
//! start and end within the same change, are dropped.

mod fragment;

use crate::algorithms::{DiffAlgorithm, MyersDiffAlgorithm, Sequence, SequenceDiff, Timeout};
use crate::common::lists::{MonotonousList, find_last_idx_monotonous};
use crate::common::strings::{char_len, count_non_whitespace, is_space};
use crate::geometry::{LineRange, LineRangeSet, Range};
use crate::mapping::{DetailedLineRangeMapping, LineRangeMapping};
use crate::sequences::LinesSliceCharSequence;
use derive_new::new;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

pub use fragment::LineRangeFragment;

/// Tunable limits of move detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveThresholds {
    /// Smallest deletion or insertion, in lines, paired by similarity.
    pub min_block_lines: usize,
    /// Histogram similarity a deletion/insertion pair must exceed.
    pub min_similarity: f64,
    /// Trimmed characters a move must carry, line breaks included.
    pub min_text_length: usize,
    /// Lines of at least two trimmed characters a move must carry.
    pub min_significant_lines: usize,
}

impl Default for MoveThresholds {
    fn default() -> Self {
        Self {
            min_block_lines: 3,
            min_similarity: 0.90,
            min_text_length: 15,
            min_significant_lines: 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MoveCandidate {
    mapping: LineRangeMapping,
    /// Both sides hold the same trimmed lines.
    exact: bool,
}

/// Moved blocks found by [`compute_moved_lines`].
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MovedLines {
    pub moves: Vec<LineRangeMapping>,
    /// The timeout expired and `moves` is empty.
    pub hit_timeout: bool,
}

/// Detects moved blocks among `changes`, which must be sorted and cover the
/// differences between `original_lines` and `modified_lines`. The hashes are
/// the per-line trimmed-content ids the line diff ran on.
///
/// Finds nothing once `timeout` has expired, and says so.
pub fn compute_moved_lines<S: AsRef<str>>(
    changes: &[DetailedLineRangeMapping],
    original_lines: &[S],
    modified_lines: &[S],
    hashed_original_lines: &[u32],
    hashed_modified_lines: &[u32],
    timeout: &dyn Timeout,
    thresholds: &MoveThresholds,
) -> MovedLines {
    let moves = find_moves(
        changes,
        original_lines,
        modified_lines,
        hashed_original_lines,
        hashed_modified_lines,
        timeout,
        thresholds,
    );

    // expiry is sticky, so this also catches an expiry inside any pass above
    if !timeout.is_valid() {
        tracing::debug!("move detection ran out of time");
        return MovedLines::new(Vec::new(), true);
    }
    tracing::debug!(moves = moves.len(), "move detection finished");
    MovedLines::new(moves, false)
}

fn find_moves<S: AsRef<str>>(
    changes: &[DetailedLineRangeMapping],
    original_lines: &[S],
    modified_lines: &[S],
    hashed_original_lines: &[u32],
    hashed_modified_lines: &[u32],
    timeout: &dyn Timeout,
    thresholds: &MoveThresholds,
) -> Vec<LineRangeMapping> {
    let (mut moves, excluded) = compute_moves_from_simple_deletions_to_simple_insertions(
        changes,
        original_lines,
        modified_lines,
        timeout,
        thresholds,
    );
    if !timeout.is_valid() {
        return Vec::new();
    }

    let remaining: Vec<&DetailedLineRangeMapping> = changes
        .iter()
        .enumerate()
        .filter(|(idx, _)| !excluded.contains(idx))
        .map(|(_, change)| change)
        .collect();
    moves.extend(
        compute_unchanged_moves(
            &remaining,
            hashed_original_lines,
            hashed_modified_lines,
            original_lines,
            modified_lines,
            timeout,
        )
        .into_iter()
        .map(|mapping| MoveCandidate {
            mapping,
            exact: false,
        }),
    );

    let moves: Vec<MoveCandidate> = join_close_consecutive_moves(moves)
        .into_iter()
        .filter(|m| m.exact || carries_enough_text(&m.mapping, original_lines, thresholds))
        .collect();
    remove_moves_in_same_diff(changes, moves)
}

/// Pairs every pure deletion with the best remaining pure insertion: an
/// identical block first, then the most similar block above the threshold.
/// Returns the moves and the indices of the changes they consumed.
fn compute_moves_from_simple_deletions_to_simple_insertions<S: AsRef<str>>(
    changes: &[DetailedLineRangeMapping],
    original_lines: &[S],
    modified_lines: &[S],
    timeout: &dyn Timeout,
    thresholds: &MoveThresholds,
) -> (Vec<MoveCandidate>, HashSet<usize>) {
    let mut moves = Vec::new();
    let mut excluded = HashSet::new();

    let deletions: Vec<LineRangeFragment> = changes
        .iter()
        .enumerate()
        .filter(|(_, c)| c.modified.is_empty() && !c.original.is_empty())
        .map(|(idx, c)| LineRangeFragment::new(c.original, original_lines, idx))
        .collect();
    let mut insertions: Vec<Option<LineRangeFragment>> = changes
        .iter()
        .enumerate()
        .filter(|(_, c)| c.original.is_empty() && !c.modified.is_empty())
        .map(|(idx, c)| Some(LineRangeFragment::new(c.modified, modified_lines, idx)))
        .collect();

    for deletion in &deletions {
        let mut best: Option<(usize, PairRank)> = None;
        for (slot, insertion) in insertions.iter().enumerate() {
            let Some(insertion) = insertion else {
                continue;
            };
            let exact = has_same_trimmed_content(
                &deletion.range,
                original_lines,
                &insertion.range,
                modified_lines,
            );
            let similarity = deletion.compute_similarity(insertion);
            let eligible = exact
                || (deletion.range.len() >= thresholds.min_block_lines
                    && insertion.range.len() >= thresholds.min_block_lines
                    && similarity > thresholds.min_similarity);
            if !eligible {
                continue;
            }

            let rank = PairRank {
                exact,
                similarity,
                distance: Reverse(deletion.range.start_line.abs_diff(insertion.range.start_line)),
                size: insertion.range.len(),
            };
            if best.is_none_or(|(_, best_rank)| rank > best_rank) {
                best = Some((slot, rank));
            }
        }

        if let Some((slot, PairRank { exact, .. })) = best {
            if let Some(insertion) = insertions[slot].take() {
                moves.push(MoveCandidate {
                    mapping: LineRangeMapping::new(deletion.range, insertion.range),
                    exact,
                });
                excluded.insert(deletion.source);
                excluded.insert(insertion.source);
            }
        }

        if !timeout.is_valid() {
            break;
        }
    }

    (moves, excluded)
}

/// How well an insertion fits a deletion. Fields compare in declaration
/// order: exact matches first, then similarity, then the block closest in
/// document order, then the larger block.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct PairRank {
    exact: bool,
    similarity: f64,
    distance: Reverse<usize>,
    size: usize,
}

/// Both blocks hold the same lines after trimming, and some of them are not blank.
fn has_same_trimmed_content<S: AsRef<str>>(
    range1: &LineRange,
    lines1: &[S],
    range2: &LineRange,
    lines2: &[S],
) -> bool {
    let block1 = range1.to_offset_range().slice(lines1);
    let block2 = range2.to_offset_range().slice(lines2);
    block1.len() == block2.len()
        && block1
            .iter()
            .zip(block2)
            .all(|(l1, l2)| l1.as_ref().trim() == l2.as_ref().trim())
        && block1.iter().any(|line| !line.as_ref().trim().is_empty())
}

type WindowKey = (u32, u32, u32);

/// Line sets already claimed by a move on either side.
#[derive(Debug, Default)]
struct ClaimedLines {
    original: LineRangeSet,
    modified: LineRangeSet,
}

impl ClaimedLines {
    fn claim(&mut self, original: LineRange, modified: LineRange) {
        self.original.add_range(original);
        self.modified.add_range(modified);
    }

    /// Whether a move may grow over original line `orig_line` and modified line
    /// `mod_line`.
    fn can_extend_over<S: AsRef<str>>(
        &self,
        orig_line: usize,
        mod_line: usize,
        original_lines: &[S],
        modified_lines: &[S],
        timeout: &dyn Timeout,
    ) -> bool {
        if orig_line == 0 || mod_line == 0 {
            return false;
        }
        if orig_line > original_lines.len() || mod_line > modified_lines.len() {
            return false;
        }
        if self.modified.contains(mod_line) || self.original.contains(orig_line) {
            return false;
        }
        are_lines_similar(
            original_lines[orig_line - 1].as_ref(),
            modified_lines[mod_line - 1].as_ref(),
            timeout,
        )
    }
}

/// Moves of at least three lines whose trimmed content did not change.
fn compute_unchanged_moves<S: AsRef<str>>(
    changes: &[&DetailedLineRangeMapping],
    hashed_original_lines: &[u32],
    hashed_modified_lines: &[u32],
    original_lines: &[S],
    modified_lines: &[S],
    timeout: &dyn Timeout,
) -> Vec<LineRangeMapping> {
    let window = |hashes: &[u32], line: usize| -> WindowKey {
        (hashes[line - 1], hashes[line], hashes[line + 1])
    };

    let mut original_windows: HashMap<WindowKey, Vec<LineRange>> = HashMap::new();
    for change in changes {
        for line in change.original.start_line..change.original.end_line_exclusive.saturating_sub(2) {
            original_windows
                .entry(window(hashed_original_lines, line))
                .or_default()
                .push(LineRange::of_length(line, 3));
        }
    }

    // Windows that continue the previous window's match on both sides grow that
    // match instead of starting a new one.
    let mut possible_mappings: Vec<LineRangeMapping> = Vec::new();
    for change in changes {
        let mut last_mappings: Vec<usize> = Vec::new();
        for line in change.modified.start_line..change.modified.end_line_exclusive.saturating_sub(2) {
            let current = LineRange::of_length(line, 3);
            let mut next_mappings = Vec::new();
            let matches = original_windows.get(&window(hashed_modified_lines, line));
            for range in matches.into_iter().flatten() {
                let continued = last_mappings.iter().copied().find(|&idx| {
                    let last = &possible_mappings[idx];
                    last.original.end_line_exclusive + 1 == range.end_line_exclusive
                        && last.modified.end_line_exclusive + 1 == current.end_line_exclusive
                });
                match continued {
                    Some(idx) => {
                        let last = &mut possible_mappings[idx];
                        last.original =
                            LineRange::new(last.original.start_line, range.end_line_exclusive);
                        last.modified =
                            LineRange::new(last.modified.start_line, current.end_line_exclusive);
                        next_mappings.push(idx);
                    }
                    None => {
                        possible_mappings.push(LineRangeMapping::new(*range, current));
                        next_mappings.push(possible_mappings.len() - 1);
                    }
                }
            }
            last_mappings = next_mappings;
        }

        if !timeout.is_valid() {
            return Vec::new();
        }
    }

    possible_mappings.sort_by(|a, b| b.modified.len().cmp(&a.modified.len()));

    let mut claimed = ClaimedLines::default();
    let mut moves = Vec::new();
    for mapping in &possible_mappings {
        let orig_to_mod =
            mapping.modified.start_line as isize - mapping.original.start_line as isize;
        let modified_sections = claimed.modified.subtract_from(&mapping.modified);
        let original_translated_sections = claimed
            .original
            .subtract_from(&mapping.original)
            .get_with_delta(orig_to_mod);

        for section in modified_sections
            .get_intersection(&original_translated_sections)
            .ranges()
        {
            if section.len() < 3 {
                continue;
            }
            let original = section.delta(-orig_to_mod);
            moves.push(LineRangeMapping::new(original, *section));
            claimed.claim(original, *section);
        }
    }

    moves.sort_by_key(|m| m.original.start_line);

    let mut first_touching = MonotonousList::new(changes);
    let mut last_touching = MonotonousList::new(changes);
    for mv in moves.iter_mut() {
        let first_orig = first_touching
            .find_last_monotonous(|c| c.original.start_line <= mv.original.start_line);
        let first_mod = find_last_idx_monotonous(changes, |c| {
            c.modified.start_line <= mv.modified.start_line
        })
        .map(|idx| changes[idx]);
        let last_orig = last_touching
            .find_last_monotonous(|c| c.original.start_line < mv.original.end_line_exclusive);
        let last_mod = find_last_idx_monotonous(changes, |c| {
            c.modified.start_line < mv.modified.end_line_exclusive
        })
        .map(|idx| changes[idx]);
        let (Some(first_orig), Some(first_mod), Some(last_orig), Some(last_mod)) =
            (first_orig, first_mod, last_orig, last_mod)
        else {
            continue;
        };

        let lines_above = (mv.original.start_line - first_orig.original.start_line.min(mv.original.start_line))
            .max(mv.modified.start_line - first_mod.modified.start_line.min(mv.modified.start_line));
        let lines_below = last_orig
            .original
            .end_line_exclusive
            .saturating_sub(mv.original.end_line_exclusive)
            .max(
                last_mod
                    .modified
                    .end_line_exclusive
                    .saturating_sub(mv.modified.end_line_exclusive),
            );

        let mut extend_to_top = 0;
        while extend_to_top < lines_above
            && claimed.can_extend_over(
                mv.original.start_line.saturating_sub(extend_to_top + 1),
                mv.modified.start_line.saturating_sub(extend_to_top + 1),
                original_lines,
                modified_lines,
                timeout,
            )
        {
            extend_to_top += 1;
        }
        if extend_to_top > 0 {
            claimed.claim(
                LineRange::new(mv.original.start_line - extend_to_top, mv.original.start_line),
                LineRange::new(mv.modified.start_line - extend_to_top, mv.modified.start_line),
            );
        }

        let mut extend_to_bottom = 0;
        while extend_to_bottom < lines_below
            && claimed.can_extend_over(
                mv.original.end_line_exclusive + extend_to_bottom,
                mv.modified.end_line_exclusive + extend_to_bottom,
                original_lines,
                modified_lines,
                timeout,
            )
        {
            extend_to_bottom += 1;
        }
        if extend_to_bottom > 0 {
            claimed.claim(
                LineRange::of_length(mv.original.end_line_exclusive, extend_to_bottom),
                LineRange::of_length(mv.modified.end_line_exclusive, extend_to_bottom),
            );
        }

        if extend_to_top > 0 || extend_to_bottom > 0 {
            *mv = LineRangeMapping::new(
                LineRange::new(
                    mv.original.start_line - extend_to_top,
                    mv.original.end_line_exclusive + extend_to_bottom,
                ),
                LineRange::new(
                    mv.modified.start_line - extend_to_top,
                    mv.modified.end_line_exclusive + extend_to_bottom,
                ),
            );
        }
    }

    moves
}

/// Lines count as similar when they are equal after trimming, or when more
/// than 60% of the non-whitespace characters of the longer one are shared and
/// it has more than 10 of them.
fn are_lines_similar(line1: &str, line2: &str, timeout: &dyn Timeout) -> bool {
    if line1.trim() == line2.trim() {
        return true;
    }
    let (len1, len2) = (char_len(line1), char_len(line2));
    if len1 > 300 && len2 > 300 {
        return false;
    }

    let (lines1, lines2) = ([line1], [line2]);
    let seq1 = LinesSliceCharSequence::new(&lines1, Range::from_coords(1, 1, 1, len1 + 1), false);
    let seq2 = LinesSliceCharSequence::new(&lines2, Range::from_coords(1, 1, 1, len2 + 1), false);
    let result = MyersDiffAlgorithm.compute(&seq1, &seq2, timeout);

    let common_non_space = SequenceDiff::invert(&result.diffs, seq1.len())
        .iter()
        .flat_map(|unchanged| unchanged.seq1_range.iter())
        .filter(|&idx| !is_space(seq1.element(idx)))
        .count();
    let longer_line_length = count_non_whitespace(if len1 > len2 { line1 } else { line2 });

    longer_line_length > 10 && common_non_space as f64 / longer_line_length as f64 > 0.6
}

/// Joins moves that follow each other with at most two skipped lines in total.
fn join_close_consecutive_moves(mut moves: Vec<MoveCandidate>) -> Vec<MoveCandidate> {
    moves.sort_by_key(|m| m.mapping.original.start_line);

    let mut result: Vec<MoveCandidate> = Vec::with_capacity(moves.len());
    for current in moves {
        if let Some(last) = result.last_mut() {
            let original_dist = current.mapping.original.start_line as isize
                - last.mapping.original.end_line_exclusive as isize;
            let modified_dist = current.mapping.modified.start_line as isize
                - last.mapping.modified.end_line_exclusive as isize;
            if original_dist >= 0 && modified_dist >= 0 && original_dist + modified_dist <= 2 {
                *last = MoveCandidate {
                    mapping: last.mapping.join(&current.mapping),
                    exact: last.exact && current.exact && original_dist + modified_dist == 0,
                };
                continue;
            }
        }
        result.push(current);
    }
    result
}

fn carries_enough_text<S: AsRef<str>>(
    mv: &LineRangeMapping,
    original_lines: &[S],
    thresholds: &MoveThresholds,
) -> bool {
    let lines: Vec<&str> = mv
        .original
        .to_offset_range()
        .slice(original_lines)
        .iter()
        .map(|line| line.as_ref().trim())
        .collect();
    let text_length = lines.iter().map(|line| char_len(line)).sum::<usize>()
        + lines.len().saturating_sub(1);
    let significant_lines = lines.iter().filter(|line| char_len(line) >= 2).count();

    text_length >= thresholds.min_text_length
        && significant_lines >= thresholds.min_significant_lines
}

/// Drops moves whose source and destination end inside the same change.
fn remove_moves_in_same_diff(
    changes: &[DetailedLineRangeMapping],
    moves: Vec<MoveCandidate>,
) -> Vec<LineRangeMapping> {
    moves
        .into_iter()
        .map(|m| m.mapping)
        .filter(|m| {
            let before_end_original = find_last_idx_monotonous(changes, |c| {
                c.original.start_line < m.original.end_line_exclusive
            });
            let before_end_modified = find_last_idx_monotonous(changes, |c| {
                c.modified.start_line < m.modified.end_line_exclusive
            });
            !matches!(
                (before_end_original, before_end_modified),
                (Some(o), Some(m)) if o == m
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{DateTimeout, InfiniteTimeout};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::time::Duration;

    fn lrm(o: (usize, usize), m: (usize, usize)) -> LineRangeMapping {
        LineRangeMapping::new(LineRange::new(o.0, o.1), LineRange::new(m.0, m.1))
    }

    fn change(o: (usize, usize), m: (usize, usize)) -> DetailedLineRangeMapping {
        DetailedLineRangeMapping::new(LineRange::new(o.0, o.1), LineRange::new(m.0, m.1), None)
    }

    /// Trimmed-content ids shared by both documents.
    fn hashes(original: &[&str], modified: &[&str]) -> (Vec<u32>, Vec<u32>) {
        let mut ids: HashMap<String, u32> = HashMap::new();
        let mut id_of = |line: &&str| {
            let next = ids.len() as u32;
            *ids.entry(line.trim().to_string()).or_insert(next)
        };
        let original = original.iter().map(&mut id_of).collect();
        let modified = modified.iter().map(&mut id_of).collect();
        (original, modified)
    }

    fn moved_lines(
        changes: &[DetailedLineRangeMapping],
        original: &[&str],
        modified: &[&str],
        timeout: &dyn Timeout,
    ) -> Vec<LineRangeMapping> {
        let (hashed_original, hashed_modified) = hashes(original, modified);
        compute_moved_lines(
            changes,
            original,
            modified,
            &hashed_original,
            &hashed_modified,
            timeout,
            &MoveThresholds::default(),
        )
        .moves
    }

    const BLOCK: [&str; 3] = ["fn load(path: &Path) {", "    read_config(path);", "}"];

    #[test]
    fn deleted_block_reinserted_below_is_a_move() {
        let original = [BLOCK[0], BLOCK[1], BLOCK[2], "x", "y"];
        let modified = ["x", "y", BLOCK[0], BLOCK[1], BLOCK[2]];
        let changes = [change((1, 4), (1, 1)), change((6, 6), (3, 6))];

        assert_eq!(
            moved_lines(&changes, &original, &modified, &InfiniteTimeout),
            vec![lrm((1, 4), (3, 6))]
        );
    }

    #[test]
    fn identical_single_line_is_a_move() {
        let original = ["a", "b", "c", "d"];
        let modified = ["d", "a", "b", "c"];
        let changes = [change((1, 1), (1, 2)), change((4, 5), (5, 5))];

        assert_eq!(
            moved_lines(&changes, &original, &modified, &InfiniteTimeout),
            vec![lrm((4, 5), (1, 2))]
        );
    }

    #[test]
    fn identical_insertions_prefer_the_closest_one() {
        let original = ["a", "b", "c", "e", "f", "g", "h", "d", "i"];
        let modified = ["d", "a", "b", "c", "e", "f", "g", "d", "h", "i"];
        let changes = [
            change((1, 1), (1, 2)),
            change((7, 7), (8, 9)),
            change((8, 9), (10, 10)),
        ];

        assert_eq!(
            moved_lines(&changes, &original, &modified, &InfiniteTimeout),
            vec![lrm((8, 9), (8, 9))]
        );
    }

    #[test]
    fn equally_close_insertions_prefer_the_larger_block() {
        let near = PairRank {
            exact: false,
            similarity: 0.95,
            distance: Reverse(4),
            size: 3,
        };
        let larger = PairRank { size: 5, ..near };
        let farther = PairRank {
            distance: Reverse(9),
            size: 8,
            ..near
        };

        assert!(larger > near);
        assert!(near > farther);
    }

    #[test]
    fn blank_lines_are_never_moves() {
        let original = ["", "a"];
        let modified = ["a", ""];
        let changes = [change((1, 2), (1, 1)), change((3, 3), (2, 3))];

        assert!(moved_lines(&changes, &original, &modified, &InfiniteTimeout).is_empty());
    }

    #[test]
    fn unchanged_block_inside_replacements_is_a_move() {
        let original = [BLOCK[0], BLOCK[1], BLOCK[2], "keep", "x"];
        let modified = ["y", "keep", BLOCK[0], BLOCK[1], BLOCK[2]];
        let changes = [change((1, 4), (1, 2)), change((5, 6), (3, 6))];

        assert_eq!(
            moved_lines(&changes, &original, &modified, &InfiniteTimeout),
            vec![lrm((1, 4), (3, 6))]
        );
    }

    #[test]
    fn block_moved_within_one_change_is_dropped() {
        let original = ["alpha one", "beta two", BLOCK[0], BLOCK[1], BLOCK[2], "q"];
        let modified = [BLOCK[0], BLOCK[1], BLOCK[2], "alpha 1", "beta 2", "q"];
        let changes = [change((1, 6), (1, 6))];

        assert!(moved_lines(&changes, &original, &modified, &InfiniteTimeout).is_empty());
    }

    #[test]
    fn expired_timeout_yields_no_moves() {
        let original = [BLOCK[0], BLOCK[1], BLOCK[2], "x", "y"];
        let modified = ["x", "y", BLOCK[0], BLOCK[1], BLOCK[2]];
        let changes = [change((1, 4), (1, 1)), change((6, 6), (3, 6))];
        let timeout = DateTimeout::new(Duration::ZERO);

        let (hashed_original, hashed_modified) = hashes(&original, &modified);
        let detected = compute_moved_lines(
            &changes,
            &original,
            &modified,
            &hashed_original,
            &hashed_modified,
            &timeout,
            &MoveThresholds::default(),
        );

        assert_eq!(detected, MovedLines::new(Vec::new(), true));
    }

    #[test]
    fn finished_detection_reports_no_timeout() {
        let original = [BLOCK[0], BLOCK[1], BLOCK[2], "x", "y"];
        let modified = ["x", "y", BLOCK[0], BLOCK[1], BLOCK[2]];
        let changes = [change((1, 4), (1, 1)), change((6, 6), (3, 6))];
        let (hashed_original, hashed_modified) = hashes(&original, &modified);

        let detected = compute_moved_lines(
            &changes,
            &original,
            &modified,
            &hashed_original,
            &hashed_modified,
            &InfiniteTimeout,
            &MoveThresholds::default(),
        );

        assert!(!detected.hit_timeout);
        assert_eq!(detected.moves, vec![lrm((1, 4), (3, 6))]);
    }

    #[rstest]
    #[case::same_after_trim("  let x = 1;", "let x = 1;  ", true)]
    #[case::mostly_shared("let value = compute(first);", "let value = compute(second);", true)]
    #[case::too_short("ab", "ac", false)]
    #[case::nothing_shared("aaaaaaaaaaaa", "bbbbbbbbbbbb", false)]
    fn line_similarity(#[case] line1: &str, #[case] line2: &str, #[case] expected: bool) {
        assert_eq!(are_lines_similar(line1, line2, &InfiniteTimeout), expected);
    }

    #[test]
    fn close_moves_are_joined() {
        let candidate = |o, m| MoveCandidate {
            mapping: lrm(o, m),
            exact: true,
        };
        let joined = join_close_consecutive_moves(vec![
            candidate((20, 23), (30, 33)),
            candidate((5, 8), (14, 17)),
            candidate((1, 4), (10, 13)),
        ]);

        assert_eq!(
            joined.iter().map(|m| m.mapping).collect::<Vec<_>>(),
            vec![lrm((1, 8), (10, 17)), lrm((20, 23), (30, 33))]
        );
        assert!(!joined[0].exact);
        assert!(joined[1].exact);
    }

    #[rstest]
    #[case::braces(&["{", "}", "x"], false)]
    #[case::one_long_line(&["let configuration = load();"], false)]
    #[case::real_code(&["let a = load();", "run(a);"], true)]
    fn move_needs_enough_text(#[case] lines: &[&str], #[case] expected: bool) {
        let mv = lrm((1, lines.len() + 1), (1, lines.len() + 1));
        assert_eq!(
            carries_enough_text(&mv, lines, &MoveThresholds::default()),
            expected
        );
    }
}
