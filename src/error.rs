use thiserror::Error;

/// Failures surfaced by the diff engine.
///
/// Construction failures (`InvalidInterval`, `UnorderedEdits`) are returned by the
/// fallible constructors. `UnsortedDiffs` and `InvariantViolation` indicate a bug in
/// the engine itself; `compute_diff` never hands them to its caller and degrades to
/// the trivial whole-document diff instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("invalid interval [{start}, {end}): start must not exceed end")]
    InvalidInterval { start: usize, end: usize },

    #[error("edit #{index} starts at {start} before the previous edit ends at {previous_end}")]
    UnorderedEdits {
        index: usize,
        start: String,
        previous_end: String,
    },

    #[error("sequence diff #{index} overlaps or precedes its predecessor")]
    UnsortedDiffs { index: usize },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;
