use crate::algorithms::heuristics::{
    extend_diffs_to_entire_word_if_appropriate, optimize_sequence_diffs, remove_short_matches,
    remove_very_short_matching_lines_between_diffs,
    remove_very_short_matching_text_between_long_diffs,
};
use crate::algorithms::timeout::timeout_for_budget;
use crate::algorithms::{
    DiffAlgorithm, DynamicProgrammingDiffing, MyersDiffAlgorithm, Sequence, SequenceDiff, Timeout,
};
use crate::common::lists::check_adjacent_items;
use crate::common::strings::char_len;
use crate::computer::{LinesDiff, LinesDiffComputer, LinesDiffComputerOptions, MovedText};
use crate::error::{DiffError, Result};
use crate::geometry::{LineRange, OffsetRange, Position, Range};
use crate::mapping::{
    DetailedLineRangeMapping, LineRangeMapping, RangeMapping,
    line_range_mapping_from_range_mappings,
};
use crate::moves::{MoveThresholds, compute_moved_lines};
use crate::sequences::{LineSequence, LinesSliceCharSequence};
use crate::text::ListText;
use derive_new::new;
use std::collections::HashMap;

/// Below this many lines in total the line pass uses the dynamic programming
/// algorithm.
const LINE_DP_LIMIT: usize = 1700;
/// Below this many characters in total a refinement uses the dynamic
/// programming algorithm.
const CHAR_DP_LIMIT: usize = 500;

/// Diffs lines first, then the characters of every changed region.
#[derive(Debug, Clone, Default, new)]
pub struct DefaultLinesDiffComputer {
    move_thresholds: MoveThresholds,
}

impl LinesDiffComputer for DefaultLinesDiffComputer {
    fn compute_diff<S: AsRef<str>>(
        &self,
        original_lines: &[S],
        modified_lines: &[S],
        options: &LinesDiffComputerOptions,
    ) -> LinesDiff {
        let original = as_document(original_lines);
        let modified = as_document(modified_lines);

        if original.len() <= 1 && original == modified {
            return LinesDiff::new(Vec::new(), Vec::new(), false);
        }
        if is_single_empty_line(&original) || is_single_empty_line(&modified) {
            return whole_document_diff(&original, &modified, false);
        }

        let timeout = timeout_for_budget(options.max_computation_time_ms);
        let run = DiffRun {
            original: &original,
            modified: &modified,
            timeout: timeout.as_ref(),
            consider_whitespace_changes: !options.ignore_trim_whitespace,
            extend_to_subwords: options.extend_to_subwords,
        };

        match run.compute(options.compute_moves, &self.move_thresholds) {
            Ok(diff) => {
                if diff.hit_timeout {
                    tracing::warn!(
                        budget_ms = options.max_computation_time_ms,
                        "diff computation ran out of time, the result may not be minimal"
                    );
                }
                diff
            }
            Err(err) => {
                tracing::error!(%err, "falling back to a whole-document diff");
                debug_assert!(
                    !cfg!(feature = "debug_invariants"),
                    "diff invariant violated: {err}"
                );
                whole_document_diff(&original, &modified, false)
            }
        }
    }
}

/// An empty line array is the document holding a single empty line.
fn as_document<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    if lines.is_empty() {
        vec![""]
    } else {
        lines.iter().map(AsRef::as_ref).collect()
    }
}

fn is_single_empty_line(lines: &[&str]) -> bool {
    matches!(lines, [line] if line.is_empty())
}

/// One change replacing all of `original` by all of `modified`.
fn whole_document_diff(original: &[&str], modified: &[&str], hit_timeout: bool) -> LinesDiff {
    let document_range = |lines: &[&str]| {
        let last_line_length = lines.last().map_or(0, |line| char_len(line));
        Range::new(
            Position::new(1, 1),
            Position::new(lines.len().max(1), last_line_length + 1),
        )
    };

    LinesDiff::new(
        vec![DetailedLineRangeMapping::new(
            LineRange::new(1, original.len() + 1),
            LineRange::new(1, modified.len() + 1),
            Some(vec![RangeMapping::new(
                document_range(original),
                document_range(modified),
            )]),
        )],
        Vec::new(),
        hit_timeout,
    )
}

/// Maps every distinct trimmed line to a small id.
#[derive(Debug, Default)]
struct LineInterner<'a> {
    ids: HashMap<&'a str, u32>,
}

impl<'a> LineInterner<'a> {
    fn id(&mut self, line: &'a str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(line.trim()).or_insert(next)
    }
}

struct RefinedDiff {
    mappings: Vec<RangeMapping>,
    hit_timeout: bool,
}

/// One `compute_diff` call: both documents and the deadline shared by every
/// phase.
struct DiffRun<'a> {
    original: &'a [&'a str],
    modified: &'a [&'a str],
    timeout: &'a dyn Timeout,
    consider_whitespace_changes: bool,
    extend_to_subwords: bool,
}

impl DiffRun<'_> {
    fn compute(&self, compute_moves: bool, move_thresholds: &MoveThresholds) -> Result<LinesDiff> {
        let mut interner = LineInterner::default();
        let original_hashes: Vec<u32> = self.original.iter().map(|&l| interner.id(l)).collect();
        let modified_hashes: Vec<u32> = self.modified.iter().map(|&l| interner.id(l)).collect();

        let seq1 = LineSequence::new(original_hashes.clone(), self.original);
        let seq2 = LineSequence::new(modified_hashes.clone(), self.modified);

        let line_alignment = if seq1.len() + seq2.len() < LINE_DP_LIMIT {
            // identical lines weigh more the longer they are; lines equal only
            // after trimming weigh slightly less than one
            let equality_score = |offset1: usize, offset2: usize| {
                if self.original[offset1] == self.modified[offset2] {
                    match char_len(self.modified[offset2]) {
                        0 => 0.1,
                        len => 1.0 + (1.0 + len as f64).ln(),
                    }
                } else {
                    0.99
                }
            };
            tracing::debug!(
                lines = seq1.len() + seq2.len(),
                "line pass with dynamic programming"
            );
            DynamicProgrammingDiffing.compute_with_score(
                &seq1,
                &seq2,
                self.timeout,
                Some(&equality_score),
            )
        } else {
            tracing::debug!(lines = seq1.len() + seq2.len(), "line pass with myers");
            MyersDiffAlgorithm.compute(&seq1, &seq2, self.timeout)
        };

        let mut hit_timeout = line_alignment.hit_timeout;
        let line_diffs = optimize_sequence_diffs(&seq1, &seq2, line_alignment.diffs);
        let line_diffs = remove_very_short_matching_lines_between_diffs(&seq1, line_diffs);
        check_sorted(&line_diffs)?;
        tracing::debug!(line_diffs = line_diffs.len(), "line pass finished");

        let mut alignments: Vec<RangeMapping> = Vec::new();
        let (mut seq1_last_start, mut seq2_last_start) = (0, 0);
        for diff in &line_diffs {
            let equal_lines = equal_run_length(
                diff.seq1_range.start.checked_sub(seq1_last_start),
                diff.seq2_range.start.checked_sub(seq2_last_start),
            )
            .ok_or_else(|| {
                DiffError::InvariantViolation(format!(
                    "line diff {diff} is not preceded by equally long unchanged runs"
                ))
            })?;
            hit_timeout |= self.scan_for_whitespace_changes(
                seq1_last_start,
                seq2_last_start,
                equal_lines,
                &mut alignments,
            )?;
            seq1_last_start = diff.seq1_range.end_exclusive;
            seq2_last_start = diff.seq2_range.end_exclusive;

            let refined = self.refine_diff(diff)?;
            hit_timeout |= refined.hit_timeout;
            alignments.extend(refined.mappings);
        }

        let trailing_lines = equal_run_length(
            self.original.len().checked_sub(seq1_last_start),
            self.modified.len().checked_sub(seq2_last_start),
        )
        .ok_or_else(|| {
            DiffError::InvariantViolation(
                "line diffs leave unequal unchanged tails".to_string(),
            )
        })?;
        hit_timeout |= self.scan_for_whitespace_changes(
            seq1_last_start,
            seq2_last_start,
            trailing_lines,
            &mut alignments,
        )?;

        let changes = line_range_mapping_from_range_mappings(
            &alignments,
            &ListText::new(self.original),
            &ListText::new(self.modified),
            false,
        )?;

        let moves = if compute_moves {
            let (moves, moves_hit_timeout) = self.compute_moves(
                &changes,
                &original_hashes,
                &modified_hashes,
                move_thresholds,
            )?;
            hit_timeout |= moves_hit_timeout;
            moves
        } else {
            Vec::new()
        };

        self.validate(&changes)?;
        Ok(LinesDiff::new(changes, moves, hit_timeout))
    }

    /// Lines that hash the same may still differ in their leading or trailing
    /// whitespace. Unless whitespace is ignored, those differences are diffed
    /// character by character.
    fn scan_for_whitespace_changes(
        &self,
        seq1_start: usize,
        seq2_start: usize,
        equal_lines: usize,
        alignments: &mut Vec<RangeMapping>,
    ) -> Result<bool> {
        if !self.consider_whitespace_changes {
            return Ok(false);
        }

        let mut hit_timeout = false;
        for i in 0..equal_lines {
            let (offset1, offset2) = (seq1_start + i, seq2_start + i);
            if self.original[offset1] != self.modified[offset2] {
                let refined = self.refine_diff(&SequenceDiff::new(
                    OffsetRange::of_start_and_length(offset1, 1),
                    OffsetRange::of_start_and_length(offset2, 1),
                ))?;
                hit_timeout |= refined.hit_timeout;
                alignments.extend(refined.mappings);
            }
        }
        Ok(hit_timeout)
    }

    /// Diffs the characters of the lines a line diff covers.
    fn refine_diff(&self, diff: &SequenceDiff) -> Result<RefinedDiff> {
        let line_mapping = LineRangeMapping::new(
            LineRange::from_offset_range(&diff.seq1_range),
            LineRange::from_offset_range(&diff.seq2_range),
        );
        let range_mapping = line_mapping.to_range_mapping(self.original, self.modified)?;

        let slice1 = LinesSliceCharSequence::new(
            self.original,
            range_mapping.original_range,
            self.consider_whitespace_changes,
        );
        let slice2 = LinesSliceCharSequence::new(
            self.modified,
            range_mapping.modified_range,
            self.consider_whitespace_changes,
        );

        let result = if slice1.len() + slice2.len() < CHAR_DP_LIMIT {
            DynamicProgrammingDiffing.compute(&slice1, &slice2, self.timeout)
        } else {
            MyersDiffAlgorithm.compute(&slice1, &slice2, self.timeout)
        };

        let diffs = optimize_sequence_diffs(&slice1, &slice2, result.diffs);
        let diffs = extend_diffs_to_entire_word_if_appropriate(
            &slice1,
            &slice2,
            diffs,
            &|seq, idx| seq.find_word_containing(idx),
            false,
        );
        let diffs = if self.extend_to_subwords {
            extend_diffs_to_entire_word_if_appropriate(
                &slice1,
                &slice2,
                diffs,
                &|seq, idx| seq.find_sub_word_containing(idx),
                true,
            )
        } else {
            diffs
        };
        let diffs = remove_short_matches(diffs);
        let diffs = remove_very_short_matching_text_between_long_diffs(&slice1, &slice2, diffs);
        check_sorted(&diffs)?;

        Ok(RefinedDiff {
            mappings: diffs
                .iter()
                .map(|d| {
                    RangeMapping::new(
                        slice1.translate_range(&d.seq1_range),
                        slice2.translate_range(&d.seq2_range),
                    )
                })
                .collect(),
            hit_timeout: result.hit_timeout,
        })
    }

    fn compute_moves(
        &self,
        changes: &[DetailedLineRangeMapping],
        original_hashes: &[u32],
        modified_hashes: &[u32],
        thresholds: &MoveThresholds,
    ) -> Result<(Vec<MovedText>, bool)> {
        let detected = compute_moved_lines(
            changes,
            self.original,
            self.modified,
            original_hashes,
            modified_hashes,
            self.timeout,
            thresholds,
        );

        let mut hit_timeout = detected.hit_timeout;
        let mut moves = Vec::with_capacity(detected.moves.len());
        for moved in detected.moves {
            let refined = self.refine_diff(&SequenceDiff::new(
                moved.original.to_offset_range(),
                moved.modified.to_offset_range(),
            ))?;
            hit_timeout |= refined.hit_timeout;
            let changes = line_range_mapping_from_range_mappings(
                &refined.mappings,
                &ListText::new(self.original),
                &ListText::new(self.modified),
                true,
            )?;
            moves.push(MovedText::new(moved, changes));
        }

        Ok((moves, hit_timeout))
    }

    /// Changes must stay inside both documents and follow each other.
    fn validate(&self, changes: &[DetailedLineRangeMapping]) -> Result<()> {
        let within = |range: &LineRange, line_count: usize| {
            range.start_line >= 1 && range.end_line_exclusive <= line_count + 1
        };
        if let Some(change) = changes.iter().find(|c| {
            !within(&c.original, self.original.len()) || !within(&c.modified, self.modified.len())
        }) {
            return Err(DiffError::InvariantViolation(format!(
                "change {change} lies outside the documents"
            )));
        }

        let ordered = check_adjacent_items(changes, |c1, c2| {
            c1.original.end_line_exclusive <= c2.original.start_line
                && c1.modified.end_line_exclusive <= c2.modified.start_line
        });
        if !ordered {
            return Err(DiffError::InvariantViolation(
                "changes overlap or are out of order".to_string(),
            ));
        }
        Ok(())
    }
}

fn equal_run_length(length1: Option<usize>, length2: Option<usize>) -> Option<usize> {
    match (length1, length2) {
        (Some(l1), Some(l2)) if l1 == l2 => Some(l1),
        _ => None,
    }
}

fn check_sorted(diffs: &[SequenceDiff]) -> Result<()> {
    if cfg!(feature = "debug_invariants") {
        SequenceDiff::assert_sorted(diffs)?;
    }
    Ok(())
}
