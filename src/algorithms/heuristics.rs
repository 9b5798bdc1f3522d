//! Post-processing of raw algorithm output.
//!
//! Minimal diffs are often not the ones a reader expects: an inserted block may be
//! reported one line too early, a changed word may be split into fragments around
//! coincidentally equal letters. The passes here keep every diff valid (the
//! unchanged parts between diffs stay equal) while moving boundaries to better
//! places and merging fragments.

use crate::algorithms::{OffsetPair, Sequence, SequenceDiff};
use crate::common::lists::for_each_with_neighbors;
use crate::common::strings::{char_len, count_non_whitespace};
use crate::geometry::OffsetRange;
use crate::sequences::{LineSequence, LinesSliceCharSequence};
use std::collections::VecDeque;

const MAX_SHIFT_LIMIT: usize = 100;
const MAX_JOIN_PASSES: usize = 11;

pub fn optimize_sequence_diffs<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let mut result = join_sequence_diffs_by_shifting(seq1, seq2, diffs);
    // a second round sometimes finds joins the first one enabled
    result = join_sequence_diffs_by_shifting(seq1, seq2, result);
    shift_sequence_diffs(seq1, seq2, result)
}

/// Slides pure insertions and deletions as far left as possible, then as far
/// right as possible, merging them into a neighbor whenever the gap closes.
fn join_sequence_diffs_by_shifting<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    let Some(&first) = diffs.first() else {
        return diffs;
    };

    let mut result = vec![first];
    for &cur in &diffs[1..] {
        let Some(prev) = result.last().copied() else {
            continue;
        };
        if !(cur.seq1_range.is_empty() || cur.seq2_range.is_empty()) {
            result.push(cur);
            continue;
        }

        let length = (cur.seq1_range.start - prev.seq1_range.end_exclusive)
            .min(cur.seq2_range.start - prev.seq2_range.end_exclusive);
        let mut d = 1;
        while d <= length {
            if seq1.element(cur.seq1_range.start - d) != seq1.element(cur.seq1_range.end_exclusive - d)
                || seq2.element(cur.seq2_range.start - d)
                    != seq2.element(cur.seq2_range.end_exclusive - d)
            {
                break;
            }
            d += 1;
        }
        d -= 1;

        if d == length {
            if let Some(last) = result.last_mut() {
                *last = SequenceDiff::new(
                    OffsetRange::new(prev.seq1_range.start, cur.seq1_range.end_exclusive - length),
                    OffsetRange::new(prev.seq2_range.start, cur.seq2_range.end_exclusive - length),
                );
            }
            continue;
        }
        result.push(cur.delta(-(d as isize)));
    }

    let mut shifted = Vec::with_capacity(result.len());
    for i in 0..result.len().saturating_sub(1) {
        let next = result[i + 1];
        let mut cur = result[i];
        if cur.seq1_range.is_empty() || cur.seq2_range.is_empty() {
            let length = (next.seq1_range.start - cur.seq1_range.end_exclusive)
                .min(next.seq2_range.start - cur.seq2_range.end_exclusive);
            let mut d = 0;
            while d < length {
                if !seq1.is_strongly_equal(cur.seq1_range.start + d, cur.seq1_range.end_exclusive + d)
                    || !seq2.is_strongly_equal(
                        cur.seq2_range.start + d,
                        cur.seq2_range.end_exclusive + d,
                    )
                {
                    break;
                }
                d += 1;
            }

            if d == length {
                // no gap left, fold into the next diff
                result[i + 1] = SequenceDiff::new(
                    OffsetRange::new(cur.seq1_range.start + length, next.seq1_range.end_exclusive),
                    OffsetRange::new(cur.seq2_range.start + length, next.seq2_range.end_exclusive),
                );
                continue;
            }
            cur = cur.delta(d as isize);
        }
        shifted.push(cur);
    }
    if let Some(&last) = result.last() {
        shifted.push(last);
    }
    shifted
}

/// Moves each pure insertion/deletion to the position within its slack that
/// scores best on the sequences' boundary scores.
fn shift_sequence_diffs<S: Sequence + ?Sized>(
    seq1: &S,
    seq2: &S,
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    for i in 0..diffs.len() {
        let diff = diffs[i];
        let prev = i.checked_sub(1).map(|p| diffs[p]);
        let next = diffs.get(i + 1).copied();

        let valid = |prev_end: Option<usize>, next_start: Option<usize>, len: usize| {
            let start = prev_end.map_or(0, |e| e + 1);
            let end = next_start.map_or(len, |s| s.saturating_sub(1));
            OffsetRange::new(start, end.max(start))
        };
        let seq1_valid = valid(
            prev.map(|p| p.seq1_range.end_exclusive),
            next.map(|n| n.seq1_range.start),
            seq1.len(),
        );
        let seq2_valid = valid(
            prev.map(|p| p.seq2_range.end_exclusive),
            next.map(|n| n.seq2_range.start),
            seq2.len(),
        );

        if diff.seq1_range.is_empty() {
            diffs[i] = shift_diff_to_better_position(diff, seq1, seq2, seq1_valid, seq2_valid);
        } else if diff.seq2_range.is_empty() {
            diffs[i] =
                shift_diff_to_better_position(diff.swap(), seq2, seq1, seq2_valid, seq1_valid)
                    .swap();
        }
    }
    diffs
}

/// `diff` inserts into `seq2`; its `seq1_range` is empty.
fn shift_diff_to_better_position<S: Sequence + ?Sized>(
    diff: SequenceDiff,
    seq1: &S,
    seq2: &S,
    seq1_valid: OffsetRange,
    seq2_valid: OffsetRange,
) -> SequenceDiff {
    let (s1, s2) = (diff.seq1_range, diff.seq2_range);

    let mut delta_before = 1;
    while s1.start >= seq1_valid.start + delta_before
        && s2.start >= seq2_valid.start + delta_before
        && seq2.is_strongly_equal(s2.start - delta_before, s2.end_exclusive - delta_before)
        && delta_before < MAX_SHIFT_LIMIT
    {
        delta_before += 1;
    }
    delta_before -= 1;

    let mut delta_after = 0;
    while s1.start + delta_after < seq1_valid.end_exclusive
        && s2.end_exclusive + delta_after < seq2_valid.end_exclusive
        && seq2.is_strongly_equal(s2.start + delta_after, s2.end_exclusive + delta_after)
        && delta_after < MAX_SHIFT_LIMIT
    {
        delta_after += 1;
    }

    if delta_before == 0 && delta_after == 0 {
        return diff;
    }

    let mut best_delta = 0isize;
    let mut best_score = i32::MIN;
    for delta in -(delta_before as isize)..=delta_after as isize {
        let at = |offset: usize| offset.saturating_add_signed(delta);
        let score = seq1.boundary_score(at(s1.start))
            + seq2.boundary_score(at(s2.start))
            + seq2.boundary_score(at(s2.end_exclusive));
        if score > best_score {
            best_score = score;
            best_delta = delta;
        }
    }
    diff.delta(best_delta)
}

/// Merges diffs separated by at most two unchanged elements in either sequence.
pub fn remove_short_matches(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match result.last_mut() {
            Some(last)
                if diff.seq1_range.start.saturating_sub(last.seq1_range.end_exclusive) <= 2
                    || diff.seq2_range.start.saturating_sub(last.seq2_range.end_exclusive) <= 2 =>
            {
                *last = last.join(&diff);
            }
            _ => result.push(diff),
        }
    }
    result
}

/// Finds the word (or sub-word) around an offset of a char sequence.
pub type FindParent<'f, S> = &'f dyn Fn(&LinesSliceCharSequence<'_, S>, usize) -> Option<OffsetRange>;

struct WordExtender<'s, 'f, 'l, S> {
    seq1: &'s LinesSliceCharSequence<'l, S>,
    seq2: &'s LinesSliceCharSequence<'l, S>,
    find_parent: FindParent<'f, S>,
    force: bool,
    equal_mappings: VecDeque<SequenceDiff>,
    additional: Vec<SequenceDiff>,
    last_point: OffsetPair,
}

impl<S: AsRef<str>> WordExtender<'_, '_, '_, S> {
    fn scan_word(&mut self, pair: OffsetPair, equal_mapping: &SequenceDiff) {
        if pair.offset1 < self.last_point.offset1 || pair.offset2 < self.last_point.offset2 {
            return;
        }
        let (Some(w1), Some(w2)) = (
            (self.find_parent)(self.seq1, pair.offset1),
            (self.find_parent)(self.seq2, pair.offset2),
        ) else {
            return;
        };

        let mut word = SequenceDiff::new(w1, w2);
        let (mut equal1, mut equal2) = word
            .intersect(equal_mapping)
            .map_or((0, 0), |p| (p.seq1_range.len(), p.seq2_range.len()));

        // the word cannot reach back into equal parts that were already scanned,
        // but it may run into the following ones
        while let Some(&next) = self.equal_mappings.front() {
            let intersects = next.seq1_range.intersects(&word.seq1_range)
                || next.seq2_range.intersects(&word.seq2_range);
            if !intersects {
                break;
            }
            let (Some(v1), Some(v2)) = (
                (self.find_parent)(self.seq1, next.seq1_range.start),
                (self.find_parent)(self.seq2, next.seq2_range.start),
            ) else {
                break;
            };

            let v = SequenceDiff::new(v1, v2);
            if let Some(part) = v.intersect(&next) {
                equal1 += part.seq1_range.len();
                equal2 += part.seq2_range.len();
            }
            word = word.join(&v);

            if word.seq1_range.end_exclusive >= next.seq1_range.end_exclusive {
                self.equal_mappings.pop_front();
            } else {
                break;
            }
        }

        let equal = equal1 + equal2;
        let total = word.seq1_range.len() + word.seq2_range.len();
        if (self.force && equal < total) || 3 * equal < 2 * total {
            self.additional.push(word);
        }
        self.last_point = word.end_exclusives();
    }
}

/// Widens diffs to cover whole words when most of a word already changed.
/// With `force`, any partially changed word is widened.
pub fn extend_diffs_to_entire_word_if_appropriate<S: AsRef<str>>(
    seq1: &LinesSliceCharSequence<'_, S>,
    seq2: &LinesSliceCharSequence<'_, S>,
    diffs: Vec<SequenceDiff>,
    find_parent: FindParent<'_, S>,
    force: bool,
) -> Vec<SequenceDiff> {
    let mut extender = WordExtender {
        seq1,
        seq2,
        find_parent,
        force,
        equal_mappings: SequenceDiff::invert(&diffs, seq1.len()).into(),
        additional: Vec::new(),
        last_point: OffsetPair::ZERO,
    };

    while let Some(next) = extender.equal_mappings.pop_front() {
        if next.seq1_range.is_empty() {
            continue;
        }
        extender.scan_word(next.starts(), &next);
        // equal parts are non-empty, so one before the end is still equal on both sides
        extender.scan_word(next.end_exclusives().delta(-1), &next);
    }

    merge_sequence_diffs(diffs, extender.additional)
}

fn merge_sequence_diffs(first: Vec<SequenceDiff>, second: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut first = first.into_iter().peekable();
    let mut second = second.into_iter().peekable();
    let mut result: Vec<SequenceDiff> = Vec::new();

    loop {
        let take_first = match (first.peek(), second.peek()) {
            (None, None) => break,
            (Some(a), Some(b)) => a.seq1_range.start < b.seq1_range.start,
            (Some(_), None) => true,
            (None, Some(_)) => false,
        };
        let Some(next) = (if take_first { first.next() } else { second.next() }) else {
            break;
        };

        match result.last_mut() {
            Some(last) if last.seq1_range.end_exclusive >= next.seq1_range.start => {
                *last = last.join(&next);
            }
            _ => result.push(next),
        }
    }
    result
}

/// Repeatedly joins adjacent diffs while `should_join` says so.
fn join_adjacent_while(
    mut diffs: Vec<SequenceDiff>,
    mut should_join: impl FnMut(&SequenceDiff, &SequenceDiff) -> bool,
) -> Vec<SequenceDiff> {
    if diffs.is_empty() {
        return diffs;
    }

    for _ in 0..MAX_JOIN_PASSES {
        let mut should_repeat = false;
        let mut result = vec![diffs[0]];
        for cur in diffs.iter().skip(1) {
            let last = result.len() - 1;
            if should_join(&result[last], cur) {
                should_repeat = true;
                result[last] = result[last].join(cur);
            } else {
                result.push(*cur);
            }
        }
        diffs = result;
        if !should_repeat {
            break;
        }
    }
    diffs
}

/// Joins line diffs separated by a few nearly blank lines when at least one of
/// them is large.
pub fn remove_very_short_matching_lines_between_diffs<S: AsRef<str>>(
    seq1: &LineSequence<'_, S>,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    join_adjacent_while(diffs, |before, after| {
        let unchanged = OffsetRange::new(before.seq1_range.end_exclusive, after.seq1_range.start);
        let unchanged_text = seq1.get_text(&unchanged);
        count_non_whitespace(&unchanged_text) <= 4
            && (before.seq1_range.len() + before.seq2_range.len() > 5
                || after.seq1_range.len() + after.seq2_range.len() > 5)
    })
}

/// Joins character diffs separated by a short single-line match when both are
/// long, then marks tiny line prefixes and suffixes of long diffs as changed.
pub fn remove_very_short_matching_text_between_long_diffs<S: AsRef<str>>(
    seq1: &LinesSliceCharSequence<'_, S>,
    seq2: &LinesSliceCharSequence<'_, S>,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    const MAX: f64 = (2 * 40 + 50) as f64;
    let cap = |v: usize| (v as f64).min(MAX);
    let weight = |d: &SequenceDiff| {
        let w1 = cap(seq1.count_lines_in(&d.seq1_range) * 40 + d.seq1_range.len());
        let w2 = cap(seq2.count_lines_in(&d.seq2_range) * 40 + d.seq2_range.len());
        (w1.powf(1.5) + w2.powf(1.5)).powf(1.5)
    };

    let diffs = join_adjacent_while(diffs, |before, after| {
        let unchanged = OffsetRange::new(before.seq1_range.end_exclusive, after.seq1_range.start);
        if seq1.count_lines_in(&unchanged) > 5 || unchanged.len() > 500 {
            return false;
        }
        let text = seq1.get_text(&unchanged);
        let trimmed = text.trim();
        if char_len(trimmed) > 20 || trimmed.contains(['\r', '\n']) {
            return false;
        }
        weight(before) + weight(after) > MAX.powf(1.5).powf(1.5) * 1.3
    });

    let mut new_diffs: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for_each_with_neighbors(&diffs, |prev, cur, next| {
        let should_mark_as_changed = |text: &str| {
            !text.is_empty()
                && char_len(text.trim()) <= 3
                && cur.seq1_range.len() + cur.seq2_range.len() > 100
        };

        let mut new_diff = *cur;
        let full = seq1.extend_to_full_lines(&cur.seq1_range);
        let prefix = OffsetRange::new(full.start, cur.seq1_range.start.max(full.start));
        if should_mark_as_changed(&seq1.get_text(&prefix)) {
            new_diff = new_diff.delta_start(-(prefix.len() as isize));
        }
        let suffix = OffsetRange::new(
            cur.seq1_range.end_exclusive,
            full.end_exclusive.max(cur.seq1_range.end_exclusive),
        );
        if should_mark_as_changed(&seq1.get_text(&suffix)) {
            new_diff = new_diff.delta_end(suffix.len() as isize);
        }

        let available = SequenceDiff::from_offset_pairs(
            prev.map_or(OffsetPair::ZERO, SequenceDiff::end_exclusives),
            next.map_or(OffsetPair::MAX, SequenceDiff::starts),
        );
        let result = new_diff.intersect(&available).unwrap_or(*cur);
        match new_diffs.last_mut() {
            Some(last) if result.starts() == last.end_exclusives() => *last = last.join(&result),
            _ => new_diffs.push(result),
        }
    });
    new_diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::CharSeq;
    use crate::geometry::Range;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn diff(s1: (usize, usize), s2: (usize, usize)) -> SequenceDiff {
        SequenceDiff::new(OffsetRange::new(s1.0, s1.1), OffsetRange::new(s2.0, s2.1))
    }

    fn ids(lines: &[&str], table: &mut HashMap<String, u32>) -> Vec<u32> {
        lines
            .iter()
            .map(|l| {
                let next = table.len() as u32;
                *table.entry(l.trim().to_string()).or_insert(next)
            })
            .collect()
    }

    #[test]
    fn insertions_are_joined_when_shifting_closes_the_gap() {
        // "ab" -> "axbyb": inserting "x" and "yb" is the same as inserting "xby"
        let seq1 = CharSeq::of("ab");
        let seq2 = CharSeq::of("axbyb");
        let diffs = vec![diff((1, 1), (1, 2)), diff((2, 2), (3, 5))];
        assert_eq!(
            join_sequence_diffs_by_shifting(&seq1, &seq2, diffs),
            vec![diff((1, 1), (1, 4))]
        );
    }

    #[test]
    fn insertion_moves_next_to_blank_lines() {
        let lines1 = ["a {", "    x", "}", "", "c {", "    z", "}"];
        let lines2 = [
            "a {", "    x", "}", "", "b {", "    y", "}", "", "c {", "    z", "}",
        ];
        let mut table = HashMap::new();
        let seq1 = LineSequence::new(ids(&lines1, &mut table), &lines1);
        let seq2 = LineSequence::new(ids(&lines2, &mut table), &lines2);

        // inserting `}`, ``, `b {`, `    y` is just as minimal but cuts through a block
        let raw = vec![diff((2, 2), (2, 6))];
        assert_eq!(
            optimize_sequence_diffs(&seq1, &seq2, raw),
            vec![diff((3, 3), (3, 7))]
        );
    }

    #[test]
    fn short_matches_are_absorbed() {
        let diffs = vec![diff((0, 2), (0, 2)), diff((4, 5), (4, 5)), diff((10, 11), (10, 11))];
        assert_eq!(
            remove_short_matches(diffs),
            vec![diff((0, 5), (0, 5)), diff((10, 11), (10, 11))]
        );
    }

    #[test]
    fn mostly_changed_word_is_extended() {
        let lines1 = ["let value = 1;"];
        let lines2 = ["let vague = 1;"];
        let range = Range::from_coords(1, 1, 1, 15);
        let seq1 = LinesSliceCharSequence::new(&lines1, range, true);
        let seq2 = LinesSliceCharSequence::new(&lines2, range, true);
        let find_word: FindParent<'_, &str> = &|seq, offset| seq.find_word_containing(offset);

        // "value" -> "vague": 4 of 5 chars stay equal
        let diffs = vec![diff((6, 7), (6, 7))];
        let extended =
            extend_diffs_to_entire_word_if_appropriate(&seq1, &seq2, diffs.clone(), find_word, false);
        assert_eq!(extended, diffs);

        let forced =
            extend_diffs_to_entire_word_if_appropriate(&seq1, &seq2, diffs, find_word, true);
        assert_eq!(forced, vec![diff((4, 9), (4, 9))]);
    }

    #[test]
    fn word_with_little_in_common_is_extended() {
        let lines1 = ["call alpha now"];
        let lines2 = ["call omega now"];
        let range = Range::from_coords(1, 1, 1, 15);
        let seq1 = LinesSliceCharSequence::new(&lines1, range, true);
        let seq2 = LinesSliceCharSequence::new(&lines2, range, true);
        let find_word: FindParent<'_, &str> = &|seq, offset| seq.find_word_containing(offset);

        // only the trailing "a" survived
        let diffs = vec![diff((5, 9), (5, 9))];
        let extended =
            extend_diffs_to_entire_word_if_appropriate(&seq1, &seq2, diffs, find_word, false);
        assert_eq!(extended, vec![diff((5, 10), (5, 10))]);
    }

    #[test]
    fn blank_line_between_large_diffs_is_absorbed() {
        let lines = ["a", "b", "c", "", "d"];
        let seq1 = LineSequence::new(vec![0, 1, 2, 3, 4], &lines);
        let diffs = vec![diff((0, 3), (0, 4)), diff((4, 5), (5, 6))];
        assert_eq!(
            remove_very_short_matching_lines_between_diffs(&seq1, diffs),
            vec![diff((0, 5), (0, 6))]
        );
    }

    #[test]
    fn meaningful_line_between_small_diffs_is_kept() {
        let lines = ["a", "keep me", "c"];
        let seq1 = LineSequence::new(vec![0, 1, 2], &lines);
        let diffs = vec![diff((0, 1), (0, 1)), diff((2, 3), (2, 3))];
        assert_eq!(
            remove_very_short_matching_lines_between_diffs(&seq1, diffs.clone()),
            diffs
        );
    }

    #[test]
    fn short_text_between_long_diffs_is_absorbed() {
        let long1 = "x".repeat(120);
        let long2 = "y".repeat(120);
        let lines1 = [format!("{long1} = {long1}")];
        let lines2 = [format!("{long2} = {long2}")];
        let range = Range::from_coords(1, 1, 1, 300);
        let seq1 = LinesSliceCharSequence::new(&lines1, range, true);
        let seq2 = LinesSliceCharSequence::new(&lines2, range, true);

        let diffs = vec![diff((0, 120), (0, 120)), diff((123, 243), (123, 243))];
        assert_eq!(
            remove_very_short_matching_text_between_long_diffs(&seq1, &seq2, diffs),
            vec![diff((0, 243), (0, 243))]
        );
    }
}
