//! Line diff computation
//!
//! This module ties the layers together into the public entry point:
//!
//! - `default_computer`: the line pass, the character refinement of every
//!   changed region and the optional move detection
//!
//! Results are plain data: a sorted list of [`DetailedLineRangeMapping`]s that
//! together turn the original document into the modified one, plus the moved
//! blocks found on top of them.

mod default_computer;

use crate::mapping::{DetailedLineRangeMapping, LineRangeMapping};
use derive_new::new;

pub use crate::moves::MoveThresholds;
pub use default_computer::DefaultLinesDiffComputer;

pub trait LinesDiffComputer {
    fn compute_diff<S: AsRef<str>>(
        &self,
        original_lines: &[S],
        modified_lines: &[S],
        options: &LinesDiffComputerOptions,
    ) -> LinesDiff;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct LinesDiffComputerOptions {
    /// Compare lines by their trimmed content only.
    pub ignore_trim_whitespace: bool,
    /// Budget shared by every phase; `0` disables the deadline.
    pub max_computation_time_ms: u64,
    pub compute_moves: bool,
    pub extend_to_subwords: bool,
}

impl Default for LinesDiffComputerOptions {
    fn default() -> Self {
        Self {
            ignore_trim_whitespace: false,
            max_computation_time_ms: 5000,
            compute_moves: false,
            extend_to_subwords: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LinesDiff {
    pub changes: Vec<DetailedLineRangeMapping>,
    /// Blocks that moved. They are reported in addition to `changes`, which
    /// stay complete on their own.
    pub moves: Vec<MovedText>,
    /// The budget ran out and the result may not be minimal.
    pub hit_timeout: bool,
}

impl LinesDiff {
    pub fn is_identical(&self) -> bool {
        self.changes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MovedText {
    pub line_range_mapping: LineRangeMapping,
    /// The edits made to the block while it moved, with line numbers of the
    /// whole documents.
    pub changes: Vec<DetailedLineRangeMapping>,
}

impl MovedText {
    pub fn flip(&self) -> Self {
        Self::new(
            self.line_range_mapping.flip(),
            self.changes.iter().map(DetailedLineRangeMapping::flip).collect(),
        )
    }
}

/// Diffs two documents with the default computer.
pub fn compute_diff<S: AsRef<str>>(
    original_lines: &[S],
    modified_lines: &[S],
    options: &LinesDiffComputerOptions,
) -> LinesDiff {
    DefaultLinesDiffComputer::default().compute_diff(original_lines, modified_lines, options)
}
