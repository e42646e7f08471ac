//! Pattern keys.

/// Key under which a compiled matcher is cached: the pattern text with
/// surrounding whitespace removed. Interior text is significant to the
/// regex engine and is kept as is.
pub fn cache_key(pattern: &str) -> String {
    pattern.trim().to_string()
}

/// Key used to detect duplicate patterns across sources.
///
/// Whitespace is dropped and a backslash escaping ASCII punctuation is
/// removed, so `log\.info\(` and `log.info (` collapse to the same key.
/// Escapes of letters and digits (`\d`, `\s`, `\b`) are classes, not
/// literals, and are kept.
pub fn dedup_key(pattern: &str) -> String {
    let mut key = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == '\\' {
            match chars.peek() {
                Some(next) if next.is_ascii_punctuation() => {
                    continue;
                }
                _ => {}
            }
        }
        key.push(c);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_trims_only() {
        assert_eq!(cache_key("  a b  "), "a b");
    }

    #[test]
    fn dedup_key_ignores_whitespace_and_punctuation_escapes() {
        assert_eq!(dedup_key(r"log\.info\("), dedup_key("log.info ("));
        assert_eq!(dedup_key(r"\\"), r"\");
        assert_ne!(dedup_key(r"\d+"), dedup_key("d+"));
    }
}
