use crate::common::lists::{check_adjacent_items, group_adjacent_by};
use crate::error::{DiffError, Result};
use crate::geometry::LineRange;
use crate::mapping::{DetailedLineRangeMapping, RangeMapping};
use crate::text::AbstractText;

/// Groups sorted character mappings into line mappings.
///
/// Each character mapping is first widened to the lines it really touches, then
/// mappings whose line ranges overlap or touch on either side are merged. The
/// result must leave equally long unchanged regions between consecutive
/// mappings on both sides; unless `dont_assert_start_line` is set, the regions
/// before the first and after the last mapping must match as well. A violation
/// means the character mappings were inconsistent.
pub fn line_range_mapping_from_range_mappings(
    alignments: &[RangeMapping],
    original: &dyn AbstractText,
    modified: &dyn AbstractText,
    dont_assert_start_line: bool,
) -> Result<Vec<DetailedLineRangeMapping>> {
    let groups = group_adjacent_by(
        alignments
            .iter()
            .map(|a| get_line_range_mapping(a, original, modified)),
        |a1, a2| {
            a1.original.overlap_or_touch(&a2.original) || a1.modified.overlap_or_touch(&a2.modified)
        },
    );

    let changes: Vec<DetailedLineRangeMapping> = groups
        .into_iter()
        .filter_map(|group| {
            let (first, last) = (group.first()?, group.last()?);
            Some(DetailedLineRangeMapping::new(
                first.original.join(&last.original),
                first.modified.join(&last.modified),
                Some(group.iter().flat_map(|m| m.inner_changes().iter().copied()).collect()),
            ))
        })
        .collect();

    if !dont_assert_start_line {
        if let (Some(first), Some(last)) = (changes.first(), changes.last()) {
            if first.modified.start_line != first.original.start_line {
                return Err(DiffError::InvariantViolation(format!(
                    "first change {first} starts on different lines"
                )));
            }
            let original_tail = (original.length().line_count + 1).saturating_sub(last.original.end_line_exclusive);
            let modified_tail = (modified.length().line_count + 1).saturating_sub(last.modified.end_line_exclusive);
            if original_tail != modified_tail {
                return Err(DiffError::InvariantViolation(format!(
                    "last change {last} leaves {original_tail} original and {modified_tail} modified lines"
                )));
            }
        }
    }

    let gaps_match = check_adjacent_items(&changes, |m1, m2| {
        m1.original.end_line_exclusive < m2.original.start_line
            && m1.modified.end_line_exclusive < m2.modified.start_line
            && m2.original.start_line - m1.original.end_line_exclusive
                == m2.modified.start_line - m1.modified.end_line_exclusive
    });
    if !gaps_match {
        return Err(DiffError::InvariantViolation(
            "consecutive changes are not separated by equal unchanged regions".to_string(),
        ));
    }

    Ok(changes)
}

/// The lines a single character mapping touches.
///
/// A change ending at column 1 on both sides does not touch its end line. A
/// change starting at the end of its start line on both sides does not touch
/// that line either, as long as that leaves a valid range.
fn get_line_range_mapping(
    mapping: &RangeMapping,
    original: &dyn AbstractText,
    modified: &dyn AbstractText,
) -> DetailedLineRangeMapping {
    let (o, m) = (mapping.original_range, mapping.modified_range);

    let mut line_end_delta: isize = 0;
    if m.end.column == 1 && o.end.column == 1 {
        line_end_delta = -1;
    }

    let mut line_start_delta = 0;
    let end_line = |line: usize| (line as isize + line_end_delta) as usize;
    if m.start.column - 1 >= modified.get_line_length(m.start.line)
        && o.start.column - 1 >= original.get_line_length(o.start.line)
        && o.start.line <= end_line(o.end.line)
        && m.start.line <= end_line(m.end.line)
    {
        line_start_delta = 1;
    }

    DetailedLineRangeMapping::new(
        LineRange::new(o.start.line + line_start_delta, end_line(o.end.line + 1)),
        LineRange::new(m.start.line + line_start_delta, end_line(m.end.line + 1)),
        Some(vec![*mapping]),
    )
}
