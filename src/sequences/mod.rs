//! Concrete [`Sequence`](crate::algorithms::Sequence)s fed to the diff algorithms:
//! whole lines for the first pass, characters of a line range for refinement.

pub mod char_sequence;
pub mod line_sequence;

pub use char_sequence::{LinesSliceCharSequence, OffsetPreference};
pub use line_sequence::LineSequence;
