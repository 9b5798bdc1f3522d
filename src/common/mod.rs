//! Shared helpers
//!
//! - `lists`: monotone binary searches and adjacency grouping over sorted slices
//! - `strings`: character classification and char-offset string utilities

pub mod lists;
pub mod strings;
