#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::{FileWriteStr, PathChild};
use linediff::{LinesDiff, RangeMapping};
use rstest::fixture;
use std::path::{Path, PathBuf};

#[fixture]
pub fn workspace_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let file = dir.child(name);
    file.write_str(&lines.join("\n"))
        .expect("Failed to write file");
    file.path().to_path_buf()
}

pub fn run_linediff(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("linediff").expect("Failed to find linediff binary");
    cmd.current_dir(dir).args(args);
    cmd
}

/// Start and exclusive end lines of every change on both sides.
pub fn change_lines(diff: &LinesDiff) -> Vec<((usize, usize), (usize, usize))> {
    diff.changes
        .iter()
        .map(|c| {
            (
                (c.original.start_line, c.original.end_line_exclusive),
                (c.modified.start_line, c.modified.end_line_exclusive),
            )
        })
        .collect()
}

/// Replaces the changed line ranges of `original` by their modified lines.
pub fn apply_line_changes<S: AsRef<str>>(
    diff: &LinesDiff,
    original: &[S],
    modified: &[S],
) -> Vec<String> {
    let mut result: Vec<String> = original.iter().map(|l| l.as_ref().to_string()).collect();
    for change in diff.changes.iter().rev() {
        let replacement = change
            .modified
            .lines()
            .map(|line| modified[line - 1].as_ref().to_string());
        result.splice(
            change.original.start_line - 1..change.original.end_line_exclusive - 1,
            replacement,
        );
    }
    result
}

pub fn inner_changes(diff: &LinesDiff) -> Vec<RangeMapping> {
    diff.changes
        .iter()
        .flat_map(|c| c.inner_changes().iter().copied())
        .collect()
}
