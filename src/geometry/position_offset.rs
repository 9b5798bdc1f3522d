use crate::common::lists::find_last_idx_monotonous;
use crate::common::strings::char_slice;
use crate::geometry::offset_range::OffsetRange;
use crate::geometry::position::Position;
use crate::geometry::range::Range;
use crate::geometry::text_length::TextLength;

/// Converts between [`Position`]s and flat character offsets of one text.
///
/// Positions outside the text are clamped instead of rejected:
/// a line before the first clamps to `(1, 1)`, a line after the last clamps to
/// the end of the last line, and a column past the end of a line clamps to one
/// past its last character. A `\r\n` terminator does not count towards the
/// length of its line.
#[derive(Debug, Clone)]
pub struct PositionOffsetTransformer {
    text: String,
    char_count: usize,
    line_start_offset_by_line_idx: Vec<usize>,
    line_end_offset_by_line_idx: Vec<usize>,
}

impl PositionOffsetTransformer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_start_offset_by_line_idx = vec![0];
        let mut line_end_offset_by_line_idx = Vec::new();
        let mut prev = None;
        let mut char_count = 0;

        for (i, c) in text.chars().enumerate() {
            if c == '\n' {
                line_start_offset_by_line_idx.push(i + 1);
                if prev == Some('\r') {
                    line_end_offset_by_line_idx.push(i - 1);
                } else {
                    line_end_offset_by_line_idx.push(i);
                }
            }
            prev = Some(c);
            char_count += 1;
        }
        line_end_offset_by_line_idx.push(char_count);

        Self {
            text,
            char_count,
            line_start_offset_by_line_idx,
            line_end_offset_by_line_idx,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_start_offset_by_line_idx.len()
    }

    pub fn text_length(&self) -> TextLength {
        let last_idx = self.line_count() - 1;
        TextLength::new(
            last_idx,
            self.char_count - self.line_start_offset_by_line_idx[last_idx],
        )
    }

    /// Length of `line` without its terminator. `line` must be in `1..=line_count`.
    pub fn get_line_length(&self, line: usize) -> usize {
        self.line_end_offset_by_line_idx[line - 1] - self.line_start_offset_by_line_idx[line - 1]
    }

    pub fn get_offset(&self, position: &Position) -> usize {
        let position = self.validate_position(position);
        self.line_start_offset_by_line_idx[position.line - 1] + position.column - 1
    }

    pub fn get_offset_range(&self, range: &Range) -> OffsetRange {
        OffsetRange::new(self.get_offset(&range.start), self.get_offset(&range.end))
    }

    pub fn get_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.char_count);
        let idx = find_last_idx_monotonous(&self.line_start_offset_by_line_idx, |start| {
            *start <= offset
        })
        .unwrap_or(0);
        Position::new(
            idx + 1,
            offset - self.line_start_offset_by_line_idx[idx] + 1,
        )
    }

    pub fn get_range(&self, range: &OffsetRange) -> Range {
        Range::new(
            self.get_position(range.start),
            self.get_position(range.end_exclusive),
        )
    }

    pub fn substring(&self, range: &OffsetRange) -> &str {
        char_slice(&self.text, range.start, range.end_exclusive)
    }

    fn validate_position(&self, position: &Position) -> Position {
        if position.line < 1 {
            return Position::new(1, 1);
        }

        let line_count = self.line_count();
        if position.line > line_count {
            return Position::new(line_count, self.get_line_length(line_count) + 1);
        }

        if position.column < 1 {
            return Position::new(position.line, 1);
        }

        let line_length = self.get_line_length(position.line);
        if position.column - 1 > line_length {
            return Position::new(position.line, line_length + 1);
        }

        *position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn transformer() -> PositionOffsetTransformer {
        PositionOffsetTransformer::new("abc\r\nde\n\nfghi")
    }

    #[rstest]
    fn line_lengths_exclude_terminators(transformer: PositionOffsetTransformer) {
        assert_eq!(transformer.line_count(), 4);
        assert_eq!(transformer.get_line_length(1), 3);
        assert_eq!(transformer.get_line_length(2), 2);
        assert_eq!(transformer.get_line_length(3), 0);
        assert_eq!(transformer.get_line_length(4), 4);
        assert_eq!(transformer.text_length(), TextLength::new(3, 4));
    }

    #[rstest]
    #[case(Position::new(1, 1), 0)]
    #[case(Position::new(2, 2), 6)]
    #[case(Position::new(4, 5), 13)]
    fn offsets_of_positions(
        transformer: PositionOffsetTransformer,
        #[case] position: Position,
        #[case] offset: usize,
    ) {
        assert_eq!(transformer.get_offset(&position), offset);
        assert_eq!(transformer.get_position(offset), position);
    }

    #[rstest]
    #[case(Position::new(0, 7), Position::new(1, 1))]
    #[case(Position::new(9, 1), Position::new(4, 5))]
    #[case(Position::new(1, 0), Position::new(1, 1))]
    #[case(Position::new(2, 40), Position::new(2, 3))]
    fn out_of_bounds_positions_are_clamped(
        transformer: PositionOffsetTransformer,
        #[case] position: Position,
        #[case] clamped: Position,
    ) {
        assert_eq!(
            transformer.get_offset(&position),
            transformer.get_offset(&clamped)
        );
    }

    #[rstest]
    fn substring_of_range(transformer: PositionOffsetTransformer) {
        let range = transformer.get_offset_range(&Range::from_coords(2, 2, 4, 3));
        assert_eq!(transformer.substring(&range), "e\n\nfg");
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(prop_oneof![Just("a"), Just("é"), Just("\n"), Just("xy")], 0..30)
            .prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn prop_offset_position_round_trip(text in text_strategy(), seed in 0usize..1000) {
            let transformer = PositionOffsetTransformer::new(text.clone());
            let len = text.chars().count();
            let offset = seed % (len + 1);
            let position = transformer.get_position(offset);
            prop_assert_eq!(transformer.get_offset(&position), offset);
            prop_assert_eq!(transformer.get_position(transformer.get_offset(&position)), position);

            let other = (seed * 7) % (len + 1);
            let range = OffsetRange::new(offset.min(other), offset.max(other));
            prop_assert_eq!(transformer.get_offset_range(&transformer.get_range(&range)), range);
        }
    }
}
