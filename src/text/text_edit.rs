use crate::error::{DiffError, Result};
use crate::geometry::{Position, Range};
use crate::text::AbstractText;
use derive_new::new;

/// Replaces `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct SingleTextEdit {
    pub range: Range,
    pub text: String,
}

impl SingleTextEdit {
    pub fn is_empty(&self) -> bool {
        self.range.is_empty() && self.text.is_empty()
    }
}

/// A list of non-overlapping edits sorted by position, all relative to the same
/// original text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEdit {
    edits: Vec<SingleTextEdit>,
}

impl TextEdit {
    pub fn try_new(edits: Vec<SingleTextEdit>) -> Result<Self> {
        if let Some(index) = edits
            .windows(2)
            .position(|pair| pair[0].range.end > pair[1].range.start)
        {
            return Err(DiffError::UnorderedEdits {
                index: index + 1,
                start: edits[index + 1].range.start.to_string(),
                previous_end: edits[index].range.end.to_string(),
            });
        }

        Ok(Self { edits })
    }

    pub fn edits(&self) -> &[SingleTextEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.iter().all(SingleTextEdit::is_empty)
    }

    pub fn apply(&self, text: &dyn AbstractText) -> String {
        let mut result = String::new();
        let mut last_edit_end = Position::new(1, 1);
        for edit in &self.edits {
            let kept = Range::new(last_edit_end, edit.range.start);
            if !kept.is_empty() {
                result.push_str(&text.get_value_of_range(&kept));
            }
            result.push_str(&edit.text);
            last_edit_end = edit.range.end;
        }

        let rest = Range::new(last_edit_end, text.end_position_exclusive());
        if !rest.is_empty() {
            result.push_str(&text.get_value_of_range(&rest));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StringText;
    use pretty_assertions::assert_eq;

    #[test]
    fn apply_replaces_each_range() -> Result<()> {
        let text = StringText::new("hello\nworld");
        let edit = TextEdit::try_new(vec![
            SingleTextEdit::new(Range::from_coords(1, 1, 1, 2), "J".to_string()),
            SingleTextEdit::new(Range::from_coords(1, 6, 2, 1), " ".to_string()),
            SingleTextEdit::new(Range::from_coords(2, 6, 2, 6), "!".to_string()),
        ])?;

        assert_eq!(edit.apply(&text), "Jello world!");
        Ok(())
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let result = TextEdit::try_new(vec![
            SingleTextEdit::new(Range::from_coords(1, 1, 1, 5), String::new()),
            SingleTextEdit::new(Range::from_coords(1, 3, 1, 4), String::new()),
        ]);

        assert_eq!(
            result,
            Err(DiffError::UnorderedEdits {
                index: 1,
                start: "(1, 3)".to_string(),
                previous_end: "(1, 5)".to_string(),
            })
        );
    }

    #[test]
    fn empty_edit_list_is_identity() -> Result<()> {
        let text = StringText::new("unchanged\n");
        let edit = TextEdit::try_new(Vec::new())?;
        assert!(edit.is_empty());
        assert_eq!(edit.apply(&text), "unchanged\n");
        Ok(())
    }
}
