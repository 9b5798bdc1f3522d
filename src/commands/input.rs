use anyhow::Context;
use std::path::Path;

const LINE_BREAK_REGEX: &str = r"\r\n|\r|\n";

/// Splits `content` at every `\r\n`, `\r` or `\n`. Text after the last line
/// break forms the last line, so `"a\n"` has the two lines `"a"` and `""`.
pub fn split_lines(content: &str) -> anyhow::Result<Vec<&str>> {
    Ok(regex::Regex::new(LINE_BREAK_REGEX)?.split(content).collect())
}

pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(split_lines(&content)?
        .into_iter()
        .map(str::to_string)
        .collect())
}
