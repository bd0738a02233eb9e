//! Approval detection for reviewer responses.
//!
//! The reviewer signals acceptance with the phrase "SHIP IT!". Because the
//! phrase also shows up inside ordinary critique ("good, but not ready to
//! ship it yet"), only two placements count as approval:
//!
//! | Placement | Example | Approved |
//! |-----------|---------|----------|
//! | Leading statement | `SHIP IT! Great work.` | yes |
//! | Own line | `Solid.\nShip it!` | yes |
//! | Trailing aside | `This is excellent, ship it!` | no |
//! | Substring | `Free shipping is a weak hook` | no |

use std::sync::LazyLock;

use regex::Regex;

/// The approval phrase, case-insensitive.
pub const APPROVAL_PHRASE: &str = "ship it";

/// A line consisting only of "ship" + whitespace + "it" + optional `!`/`.`.
static OWN_LINE_APPROVAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ship\s+it[!.]*$").expect("approval pattern is valid"));

/// Decide whether a reviewer response approves the slogan.
///
/// Pure function: the same text always yields the same answer.
///
/// # Examples
///
/// ```
/// use slogan_domain::review::approval::is_approved;
///
/// assert!(is_approved("SHIP IT! Great work."));
/// assert!(is_approved("Clear and memorable.\nship   it"));
/// assert!(!is_approved("This is excellent, ship it!"));
/// assert!(!is_approved("Mention free shipping."));
/// ```
pub fn is_approved(reviewer_response: &str) -> bool {
    let normalized = reviewer_response.trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }

    if starts_with_phrase(&normalized) {
        return true;
    }

    normalized
        .lines()
        .map(str::trim)
        .any(|line| OWN_LINE_APPROVAL.is_match(line))
}

/// Leading "ship it", optionally followed by punctuation or more words.
///
/// The character after the phrase must not continue a word, so
/// "ship items" is not a leading approval.
fn starts_with_phrase(normalized: &str) -> bool {
    match normalized.strip_prefix(APPROVAL_PHRASE) {
        Some(rest) => !rest.starts_with(|c: char| c.is_alphanumeric()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_rejected() {
        assert!(!is_approved(""));
        assert!(!is_approved("   "));
        assert!(!is_approved("\n\t\n"));
    }

    #[test]
    fn test_leading_approval() {
        assert!(is_approved("SHIP IT!"));
        assert!(is_approved("SHIP IT! Great work."));
        assert!(is_approved("  ship it. This one is memorable."));
        assert!(is_approved("Ship it"));
    }

    #[test]
    fn test_own_line_approval() {
        assert!(is_approved("Clear, catchy, on brand.\nSHIP IT!"));
        assert!(is_approved("Strong emotional hook.\n   ship it...   \n"));
        assert!(is_approved("Looks good\r\nShip It!"));
    }

    #[test]
    fn test_own_line_extra_internal_whitespace() {
        assert!(is_approved("ship   it"));
        assert!(is_approved("Verdict:\nship \t it!!"));
    }

    #[test]
    fn test_trailing_mention_is_not_approval() {
        assert!(!is_approved("This is excellent, ship it!"));
        assert!(!is_approved("Try making it more catchy. Otherwise SHIP IT!"));
        assert!(!is_approved("This is good but could be better... SHIP IT!"));
    }

    #[test]
    fn test_substrings_are_not_approval() {
        assert!(!is_approved("Shipping is free, mention that."));
        assert!(!is_approved("ship this item faster"));
        assert!(!is_approved("ship items in bulk"));
        assert!(!is_approved("Don't ship it yet, the rhythm is off."));
    }

    #[test]
    fn test_own_line_with_extra_words_is_not_approval() {
        assert!(!is_approved("Needs work.\nship it soon maybe"));
        assert!(!is_approved("Needs work.\nplease ship it"));
    }

    #[test]
    fn test_detection_is_stable() {
        for text in ["SHIP IT!", "Needs more emotional appeal", "fine\nship it."] {
            assert_eq!(is_approved(text), is_approved(text));
        }
    }
}
