use crate::common::strings::char_slice;
use crate::computer::{LinesDiff, MovedText};
use crate::geometry::{LineRange, Range};
use crate::mapping::DetailedLineRangeMapping;
use colored::{ColoredString, Colorize};
use std::io::Write;
use std::path::Path;

/// Writes a [`LinesDiff`] as hunks without context lines. Characters covered
/// by inner changes are shown reversed.
pub struct DiffPrinter<'d, S> {
    original: &'d [S],
    modified: &'d [S],
    writer: Box<dyn Write + 'd>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Original,
    Modified,
}

impl<'d, S: AsRef<str>> DiffPrinter<'d, S> {
    pub fn new(original: &'d [S], modified: &'d [S], writer: Box<dyn Write + 'd>) -> Self {
        Self {
            original,
            modified,
            writer,
        }
    }

    pub fn print(
        &mut self,
        original_path: &Path,
        modified_path: &Path,
        diff: &LinesDiff,
    ) -> anyhow::Result<()> {
        if diff.is_identical() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{}",
            format!("--- {}", original_path.display()).bold()
        )?;
        writeln!(
            self.writer,
            "{}",
            format!("+++ {}", modified_path.display()).bold()
        )?;

        for change in &diff.changes {
            self.print_hunk(change)?;
        }
        for moved in &diff.moves {
            self.print_move(moved)?;
        }

        Ok(())
    }

    fn print_hunk(&mut self, change: &DetailedLineRangeMapping) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{}",
            format!(
                "@@ -{} +{} @@",
                hunk_range(&change.original),
                hunk_range(&change.modified)
            )
            .cyan()
        )?;

        let (original, modified) = (self.original, self.modified);
        let original_ranges: Vec<Range> = change
            .inner_changes()
            .iter()
            .map(|m| m.original_range)
            .collect();
        let modified_ranges: Vec<Range> = change
            .inner_changes()
            .iter()
            .map(|m| m.modified_range)
            .collect();

        for line in change.original.lines() {
            let text = original[line - 1].as_ref();
            writeln!(
                self.writer,
                "{}",
                render_line(line, text, &original_ranges, Side::Original)
            )?;
        }
        for line in change.modified.lines() {
            let text = modified[line - 1].as_ref();
            writeln!(
                self.writer,
                "{}",
                render_line(line, text, &modified_ranges, Side::Modified)
            )?;
        }

        Ok(())
    }

    fn print_move(&mut self, moved: &MovedText) -> anyhow::Result<()> {
        let mapping = &moved.line_range_mapping;
        let summary = format!(
            "moved -{} +{}",
            hunk_range(&mapping.original),
            hunk_range(&mapping.modified)
        );
        let summary = match moved.changes.len() {
            0 => summary,
            1 => format!("{summary} with 1 edit"),
            n => format!("{summary} with {n} edits"),
        };

        writeln!(self.writer, "{}", summary.yellow())?;
        Ok(())
    }
}

fn hunk_range(range: &LineRange) -> String {
    format!("{},{}", range.start_line, range.len())
}

fn paint(text: &str, side: Side, changed: bool) -> ColoredString {
    let colored = match side {
        Side::Original => text.red(),
        Side::Modified => text.green(),
    };
    if changed { colored.reversed() } else { colored }
}

/// `line` prefixed with `-` or `+`, the parts covered by `changed` painted
/// differently.
fn render_line(line_number: usize, text: &str, changed: &[Range], side: Side) -> String {
    let line_end = text.chars().count() + 1;
    let marker = match side {
        Side::Original => "-",
        Side::Modified => "+",
    };

    let mut rendered = paint(marker, side, false).to_string();
    let mut column = 1;
    for range in changed {
        if range.start.line > line_number || range.end.line < line_number {
            continue;
        }
        let start = if range.start.line == line_number {
            range.start.column.min(line_end)
        } else {
            1
        };
        let end = if range.end.line == line_number {
            range.end.column.min(line_end)
        } else {
            line_end
        };

        let start = start.max(column);
        if start > column {
            rendered.push_str(&paint(char_slice(text, column - 1, start - 1), side, false).to_string());
        }
        if end > start {
            rendered.push_str(&paint(char_slice(text, start - 1, end - 1), side, true).to_string());
            column = end;
        } else {
            column = start;
        }
    }
    if column < line_end {
        rendered.push_str(&paint(char_slice(text, column - 1, line_end - 1), side, false).to_string());
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computer::{LinesDiffComputerOptions, compute_diff};
    use pretty_assertions::assert_eq;

    fn printed(original: &[&str], modified: &[&str], options: &LinesDiffComputerOptions) -> String {
        colored::control::set_override(false);
        let diff = compute_diff(original, modified, options);
        let mut buffer: Vec<u8> = Vec::new();
        DiffPrinter::new(original, modified, Box::new(&mut buffer))
            .print(Path::new("a.txt"), Path::new("b.txt"), &diff)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn identical_files_print_nothing() {
        assert_eq!(
            printed(&["a", "b"], &["a", "b"], &LinesDiffComputerOptions::default()),
            ""
        );
    }

    #[test]
    fn changed_line_prints_one_hunk() {
        assert_eq!(
            printed(&["a", "b", "c"], &["a", "x", "c"], &LinesDiffComputerOptions::default()),
            "--- a.txt\n+++ b.txt\n@@ -2,1 +2,1 @@\n-b\n+x\n"
        );
    }

    #[test]
    fn moves_are_listed_after_the_hunks() {
        let options = LinesDiffComputerOptions {
            compute_moves: true,
            ..Default::default()
        };
        let output = printed(&["a", "b", "c", "d"], &["d", "a", "b", "c"], &options);
        assert!(output.ends_with("moved -4,1 +1,1\n"));
    }

    #[test]
    fn partially_changed_line_keeps_its_text() {
        colored::control::set_override(false);
        let changed = [Range::from_coords(1, 5, 1, 8)];
        assert_eq!(
            render_line(1, "let foo = 1;", &changed, Side::Original),
            "-let foo = 1;"
        );
    }
}
