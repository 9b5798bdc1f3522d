//! `linediff` command implementations
//!
//! - `input`: reading files into line arrays
//! - `diff`: printing a computed diff as hunks, with the changed characters
//!   highlighted and moved blocks listed after the hunks

pub mod diff;
pub mod input;
