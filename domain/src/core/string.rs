//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters, ending with `...`
/// when anything was cut. Counts characters, not bytes.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Collapse a multi-line text into a single line (for progress output)
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
