//! Line-oriented text diffing
//!
//! `linediff` compares two documents given as arrays of lines and reports which
//! lines changed, which characters inside them changed and, optionally, which
//! blocks of lines moved.
//!
//! - `geometry`: offsets, line ranges, positions and conversions between them
//! - `text`: read access to documents and edits applied to them
//! - `common`: search, grouping and string helpers
//! - `algorithms`: sequence diff algorithms and their heuristic post-passes
//! - `sequences`: the line and character sequences the algorithms run on
//! - `mapping`: line and character correspondences between two documents
//! - `moves`: detection of moved blocks
//! - `computer`: the `compute_diff` pipeline
//! - `commands`: the `linediff` command line front end
//!
//! ```
//! use linediff::{LinesDiffComputerOptions, compute_diff};
//!
//! let diff = compute_diff(&["a", "b", "c"], &["a", "x", "c"], &LinesDiffComputerOptions::default());
//! assert_eq!(diff.changes.len(), 1);
//! assert_eq!(diff.changes[0].original.start_line, 2);
//! ```

pub mod algorithms;
pub mod commands;
pub mod common;
pub mod computer;
pub mod error;
pub mod geometry;
pub mod mapping;
pub mod moves;
pub mod sequences;
pub mod text;

pub use computer::{
    DefaultLinesDiffComputer, LinesDiff, LinesDiffComputer, LinesDiffComputerOptions,
    MoveThresholds, MovedText, compute_diff,
};
pub use error::{DiffError, Result};
pub use mapping::{DetailedLineRangeMapping, LineRangeMapping, RangeMapping};
