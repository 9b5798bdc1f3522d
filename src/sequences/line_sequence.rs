use crate::algorithms::Sequence;
use crate::common::strings::indentation;
use crate::geometry::OffsetRange;

/// The lines of a document, compared by the ids of their trimmed content.
#[derive(Debug, Clone)]
pub struct LineSequence<'a, S> {
    trimmed_hash: Vec<u32>,
    lines: &'a [S],
}

impl<'a, S: AsRef<str>> LineSequence<'a, S> {
    /// `trimmed_hash[i]` must be the id of `lines[i]`'s trimmed content, with ids
    /// shared across every sequence that is going to be compared.
    pub fn new(trimmed_hash: Vec<u32>, lines: &'a [S]) -> Self {
        debug_assert_eq!(trimmed_hash.len(), lines.len());
        Self {
            trimmed_hash,
            lines,
        }
    }

    pub fn lines(&self) -> &'a [S] {
        self.lines
    }

    pub fn get_text(&self, range: &OffsetRange) -> String {
        range
            .slice(self.lines)
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join("\n")
    }
}

impl<S: AsRef<str>> Sequence for LineSequence<'_, S> {
    fn len(&self) -> usize {
        self.trimmed_hash.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.trimmed_hash[offset]
    }

    /// Boundaries next to shallow indentation score higher.
    fn boundary_score(&self, length: usize) -> i32 {
        let before = if length == 0 {
            0
        } else {
            indentation(self.lines[length - 1].as_ref())
        };
        let after = if length == self.lines.len() {
            0
        } else {
            indentation(self.lines[length].as_ref())
        };
        1000 - (before + after) as i32
    }

    fn is_strongly_equal(&self, offset1: usize, offset2: usize) -> bool {
        self.lines[offset1].as_ref() == self.lines[offset2].as_ref()
    }
}
