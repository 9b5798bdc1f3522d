use crate::algorithms::Sequence;
use crate::common::lists::{find_first_monotonous, find_last_idx_monotonous, find_last_monotonous};
use crate::common::strings::{
    CARRIAGE_RETURN, COMMA, LINE_FEED, SEMICOLON, is_space, is_upper_case, is_word_char,
};
use crate::geometry::{OffsetRange, Position, Range};

/// Which side of a boundary a flat offset should map to when whitespace trimmed
/// from a line start makes the choice ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetPreference {
    Left,
    Right,
}

/// The characters of a line/column range of a document, lines joined by `\n`.
///
/// With whitespace changes ignored every line is trimmed before it contributes
/// elements; offsets translate back to positions in the untrimmed lines.
#[derive(Debug, Clone)]
pub struct LinesSliceCharSequence<'a, S> {
    lines: &'a [S],
    range: Range,
    elements: Vec<u32>,
    first_element_offset_by_line_idx: Vec<usize>,
    line_start_offsets: Vec<usize>,
    trimmed_ws_lengths_by_line_idx: Vec<usize>,
}

impl<'a, S: AsRef<str>> LinesSliceCharSequence<'a, S> {
    pub fn new(lines: &'a [S], range: Range, consider_whitespace_changes: bool) -> Self {
        let mut elements = Vec::new();
        let mut first_element_offset_by_line_idx = vec![0];
        let mut line_start_offsets = Vec::new();
        let mut trimmed_ws_lengths_by_line_idx = Vec::new();

        for line_number in range.start.line..=range.end.line {
            let full: Vec<char> = line_number
                .checked_sub(1)
                .and_then(|idx| lines.get(idx))
                .map_or_else(Vec::new, |l| l.as_ref().chars().collect());

            let line_start_offset = if line_number == range.start.line && range.start.column > 1 {
                (range.start.column - 1).min(full.len())
            } else {
                0
            };
            line_start_offsets.push(line_start_offset);
            let mut line = &full[line_start_offset..];

            let mut trimmed_ws_length = 0;
            if !consider_whitespace_changes {
                trimmed_ws_length = line.iter().take_while(|c| c.is_whitespace()).count();
                line = &line[trimmed_ws_length..];
                let trailing = line.iter().rev().take_while(|c| c.is_whitespace()).count();
                line = &line[..line.len() - trailing];
            }
            trimmed_ws_lengths_by_line_idx.push(trimmed_ws_length);

            let line_length = if line_number == range.end.line {
                range
                    .end
                    .column
                    .saturating_sub(1 + line_start_offset + trimmed_ws_length)
                    .min(line.len())
            } else {
                line.len()
            };
            elements.extend(line[..line_length].iter().map(|&c| c as u32));

            if line_number < range.end.line {
                elements.push(LINE_FEED);
                first_element_offset_by_line_idx.push(elements.len());
            }
        }

        Self {
            lines,
            range,
            elements,
            first_element_offset_by_line_idx,
            line_start_offsets,
            trimmed_ws_lengths_by_line_idx,
        }
    }

    pub fn lines(&self) -> &'a [S] {
        self.lines
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn get_text(&self, range: &OffsetRange) -> String {
        range
            .slice(&self.elements)
            .iter()
            .filter_map(|&code| char::from_u32(code))
            .collect()
    }

    pub fn translate_offset(&self, offset: usize, preference: OffsetPreference) -> Position {
        let i = find_last_idx_monotonous(&self.first_element_offset_by_line_idx, |&o| o <= offset)
            .unwrap_or(0);
        let line_offset = offset - self.first_element_offset_by_line_idx[i];
        let trimmed = if line_offset == 0 && preference == OffsetPreference::Left {
            0
        } else {
            self.trimmed_ws_lengths_by_line_idx[i]
        };
        Position::new(
            self.range.start.line + i,
            1 + self.line_start_offsets[i] + line_offset + trimmed,
        )
    }

    pub fn translate_range(&self, range: &OffsetRange) -> Range {
        let start = self.translate_offset(range.start, OffsetPreference::Right);
        let end = self.translate_offset(range.end_exclusive, OffsetPreference::Left);
        if end.is_before(&start) {
            return Range::empty_at(end);
        }
        Range::new(start, end)
    }

    /// The maximal run of word characters around `offset`.
    pub fn find_word_containing(&self, offset: usize) -> Option<OffsetRange> {
        if !self.elements.get(offset).is_some_and(|&c| is_word_char(c)) {
            return None;
        }

        let mut start = offset;
        while start > 0 && is_word_char(self.elements[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < self.elements.len() && is_word_char(self.elements[end]) {
            end += 1;
        }
        Some(OffsetRange::new(start, end))
    }

    /// Like [`Self::find_word_containing`], but an upper-case letter starts a new
    /// word, so `fooBar` splits into `foo` and `Bar`.
    pub fn find_sub_word_containing(&self, offset: usize) -> Option<OffsetRange> {
        if !self.elements.get(offset).is_some_and(|&c| is_word_char(c)) {
            return None;
        }

        let mut start = offset;
        while start > 0 && is_word_char(self.elements[start - 1]) && !is_upper_case(self.elements[start]) {
            start -= 1;
        }
        let mut end = offset + 1;
        while end < self.elements.len()
            && is_word_char(self.elements[end])
            && !is_upper_case(self.elements[end])
        {
            end += 1;
        }
        Some(OffsetRange::new(start, end))
    }

    pub fn count_lines_in(&self, range: &OffsetRange) -> usize {
        let end = self.translate_offset(range.end_exclusive, OffsetPreference::Right);
        let start = self.translate_offset(range.start, OffsetPreference::Right);
        end.line - start.line
    }

    /// Widens `range` to whole lines of this slice.
    pub fn extend_to_full_lines(&self, range: &OffsetRange) -> OffsetRange {
        let start = find_last_monotonous(&self.first_element_offset_by_line_idx, |&o| {
            o <= range.start
        })
        .copied()
        .unwrap_or(0);
        let end = find_first_monotonous(&self.first_element_offset_by_line_idx, |&o| {
            range.end_exclusive <= o
        })
        .copied()
        .unwrap_or(self.elements.len());
        OffsetRange::new(start, end.max(start))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharBoundaryCategory {
    WordLower,
    WordUpper,
    WordNumber,
    End,
    Other,
    Separator,
    Space,
    LineBreakCR,
    LineBreakLF,
}

impl CharBoundaryCategory {
    fn of(code: Option<u32>) -> Self {
        let Some(code) = code else {
            return Self::End;
        };
        match code {
            LINE_FEED => Self::LineBreakLF,
            CARRIAGE_RETURN => Self::LineBreakCR,
            COMMA | SEMICOLON => Self::Separator,
            c if is_space(c) => Self::Space,
            c => match char::from_u32(c) {
                Some(ch) if ch.is_ascii_lowercase() => Self::WordLower,
                Some(ch) if ch.is_ascii_uppercase() => Self::WordUpper,
                Some(ch) if ch.is_ascii_digit() => Self::WordNumber,
                _ => Self::Other,
            },
        }
    }

    fn score(self) -> i32 {
        match self {
            Self::WordLower | Self::WordUpper | Self::WordNumber => 0,
            Self::End => 10,
            Self::Other => 2,
            Self::Separator => 30,
            Self::Space => 3,
            Self::LineBreakCR | Self::LineBreakLF => 10,
        }
    }
}

impl<S: AsRef<str>> Sequence for LinesSliceCharSequence<'_, S> {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.elements[offset]
    }

    fn boundary_score(&self, length: usize) -> i32 {
        let prev = CharBoundaryCategory::of(length.checked_sub(1).map(|i| self.elements[i]));
        let next = CharBoundaryCategory::of(self.elements.get(length).copied());

        if prev == CharBoundaryCategory::LineBreakCR && next == CharBoundaryCategory::LineBreakLF {
            // never split a \r\n pair
            return 0;
        }
        if prev == CharBoundaryCategory::LineBreakLF {
            return 150;
        }

        let mut score = 0;
        if prev != next {
            score += 10;
            if prev == CharBoundaryCategory::WordLower && next == CharBoundaryCategory::WordUpper {
                score += 1;
            }
        }
        score + prev.score() + next.score()
    }

    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool {
        self.elements[offset1] == self.elements[offset2]
    }
}
