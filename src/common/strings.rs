//! Character-level string helpers. Offsets and lengths count `char`s.

pub const SPACE: u32 = ' ' as u32;
pub const TAB: u32 = '\t' as u32;
pub const LINE_FEED: u32 = '\n' as u32;
pub const CARRIAGE_RETURN: u32 = '\r' as u32;
pub const COMMA: u32 = ',' as u32;
pub const SEMICOLON: u32 = ';' as u32;

pub fn is_space(code: u32) -> bool {
    code == SPACE || code == TAB
}

pub fn is_word_char(code: u32) -> bool {
    char::from_u32(code).is_some_and(|c| c.is_ascii_alphanumeric())
}

pub fn is_upper_case(code: u32) -> bool {
    char::from_u32(code).is_some_and(|c| c.is_ascii_uppercase())
}

pub fn char_len(source: &str) -> usize {
    source.chars().count()
}

pub fn common_prefix_length(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

pub fn common_suffix_length(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

pub fn first_non_whitespace_index(source: &str) -> Option<usize> {
    source.chars().position(|c| !is_space(c as u32))
}

pub fn last_non_whitespace_index(source: &str) -> Option<usize> {
    let chars: Vec<char> = source.chars().collect();
    chars.iter().rposition(|c| !is_space(*c as u32))
}

/// Number of leading spaces and tabs.
pub fn indentation(source: &str) -> usize {
    first_non_whitespace_index(source).unwrap_or_else(|| char_len(source))
}

/// Number of characters that are not whitespace of any kind.
pub fn count_non_whitespace(source: &str) -> usize {
    source.chars().filter(|c| !c.is_whitespace()).count()
}

/// Char-offset substring, clamped to the string's bounds.
pub fn char_slice(source: &str, start: usize, end: usize) -> &str {
    let byte_at = |char_idx: usize| {
        source
            .char_indices()
            .nth(char_idx)
            .map_or(source.len(), |(byte, _)| byte)
    };
    let start_byte = byte_at(start);
    let end_byte = byte_at(end.max(start));
    &source[start_byte..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("abcdef", "abcxyz", 3, 0)]
    #[case("foo.rs", "bar.rs", 0, 3)]
    #[case("same", "same", 4, 4)]
    #[case("", "x", 0, 0)]
    fn prefix_and_suffix(
        #[case] a: &str,
        #[case] b: &str,
        #[case] prefix: usize,
        #[case] suffix: usize,
    ) {
        assert_eq!(common_prefix_length(a, b), prefix);
        assert_eq!(common_suffix_length(a, b), suffix);
    }

    #[test]
    fn whitespace_scans() {
        assert_eq!(first_non_whitespace_index("  \tx y "), Some(3));
        assert_eq!(last_non_whitespace_index("  \tx y "), Some(5));
        assert_eq!(first_non_whitespace_index(" \t "), None);
        assert_eq!(indentation("    fn"), 4);
        assert_eq!(indentation("   "), 3);
        assert_eq!(count_non_whitespace(" a\tb \n c"), 3);
    }

    #[test]
    fn char_slice_respects_multibyte_chars() {
        assert_eq!(char_slice("añb€c", 1, 4), "ñb€");
        assert_eq!(char_slice("abc", 2, 10), "c");
        assert_eq!(char_slice("abc", 5, 7), "");
    }

    #[test]
    fn char_classes() {
        assert!(is_word_char('a' as u32));
        assert!(is_word_char('7' as u32));
        assert!(!is_word_char('_' as u32));
        assert!(is_upper_case('Q' as u32));
        assert!(is_space(TAB));
        assert!(!is_space(LINE_FEED));
    }
}
