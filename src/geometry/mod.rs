//! Coordinate model
//!
//! Every layer of the engine talks about spans of text in one of three spaces:
//!
//! - flat offsets (`OffsetRange`), used by the sequence diff algorithms
//! - line numbers (`LineRange`, `LineRangeSet`), used by line-level mappings
//! - line/column positions (`Position`, `Range`, `TextLength`), used by
//!   character-level mappings
//!
//! `PositionOffsetTransformer` converts between positions and flat offsets for a
//! concrete text.

pub mod line_range;
pub mod offset_range;
pub mod position;
pub mod position_offset;
pub mod range;
pub mod text_length;

pub use line_range::{LineRange, LineRangeSet};
pub use offset_range::OffsetRange;
pub use position::Position;
pub use position_offset::PositionOffsetTransformer;
pub use range::Range;
pub use text_length::TextLength;

/// Column used to address "the end of the line" without knowing its length.
pub const MAX_COLUMN: usize = (1 << 30) - 1;
