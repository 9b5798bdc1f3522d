use crate::common::strings::char_slice;
use crate::error::{DiffError, Result};
use crate::geometry::OffsetRange;
use derive_new::new;
use std::fmt;

/// Replaces the characters in `replace_range` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct SingleOffsetEdit {
    pub replace_range: OffsetRange,
    pub new_text: String,
}

impl SingleOffsetEdit {
    pub fn is_empty(&self) -> bool {
        self.new_text.is_empty() && self.replace_range.is_empty()
    }
}

impl fmt::Display for SingleOffsetEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.replace_range, self.new_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetEdit {
    edits: Vec<SingleOffsetEdit>,
}

impl OffsetEdit {
    pub fn try_new(edits: Vec<SingleOffsetEdit>) -> Result<Self> {
        let mut last_end = 0;
        for (index, edit) in edits.iter().enumerate() {
            if index > 0 && edit.replace_range.start < last_end {
                return Err(DiffError::UnorderedEdits {
                    index,
                    start: edit.replace_range.start.to_string(),
                    previous_end: last_end.to_string(),
                });
            }
            last_end = edit.replace_range.end_exclusive;
        }

        Ok(Self { edits })
    }

    pub fn edits(&self) -> &[SingleOffsetEdit] {
        &self.edits
    }

    pub fn apply(&self, source: &str) -> String {
        let mut result = String::new();
        let mut pos = 0;
        for edit in &self.edits {
            result.push_str(char_slice(source, pos, edit.replace_range.start));
            result.push_str(&edit.new_text);
            pos = edit.replace_range.end_exclusive;
        }
        result.push_str(char_slice(source, pos, usize::MAX));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn apply_splices_new_text() -> Result<()> {
        let edit = OffsetEdit::try_new(vec![
            SingleOffsetEdit::new(OffsetRange::new(0, 1), "C".to_string()),
            SingleOffsetEdit::new(OffsetRange::new(4, 7), "e".to_string()),
        ])?;

        assert_eq!(edit.apply("caféXYZ!"), "Cafée!");
        Ok(())
    }

    #[test]
    fn non_monotonic_edits_are_rejected() {
        let result = OffsetEdit::try_new(vec![
            SingleOffsetEdit::new(OffsetRange::new(2, 6), String::new()),
            SingleOffsetEdit::new(OffsetRange::new(5, 8), String::new()),
        ]);

        assert!(matches!(
            result,
            Err(DiffError::UnorderedEdits { index: 1, .. })
        ));
    }
}
