//! Line classification: numbering markers and paragraph boundaries.
//!
//! All predicates work on trimmed text, so callers may pass raw lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Two or more dot-separated integers followed by whitespace, at line start.
static NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)+)\s").expect("valid numbering regex"));

/// A dotted number anywhere in the line (`see 3.2.1`).
static EMBEDDED_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\.\d+(?:\.\d+)*\b").expect("valid reference regex"));

/// Check whether a line starts with a section number such as `4.3.2 `.
///
/// A bare integer (`7 Results`) is not a numbering marker.
pub fn is_numbering(line: &str) -> bool {
    NUMBERING.is_match(line.trim())
}

/// Extract the leading section number of a numbering line.
pub fn numbering_token(line: &str) -> Option<&str> {
    NUMBERING
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First character is neither a digit nor whitespace.
static PARAGRAPH_OPENER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\d\s]").expect("valid opener regex"));

/// Check whether a line carries a dotted number without being a numbering line.
///
/// Such lines are in-text references and always continue the current paragraph.
pub fn is_embedded_reference(line: &str) -> bool {
    let line = line.trim();
    EMBEDDED_REFERENCE.is_match(line) && !is_numbering(line)
}

/// Check whether `line` opens a new paragraph given the line before it.
pub fn is_paragraph_start(line: &str, prev_line: &str) -> bool {
    let line = line.trim();
    if is_numbering(line) {
        return true;
    }

    prev_line.trim().is_empty() && PARAGRAPH_OPENER.is_match(line)
}

/// Check whether `line` closes the current paragraph given the line after it.
pub fn is_paragraph_end(line: &str, next_line: &str) -> bool {
    let line = line.trim();
    if !line.ends_with('.') {
        return false;
    }

    let next_line = next_line.trim();
    match next_line.chars().next() {
        None => true,
        Some(first) => first.is_uppercase() || is_numbering(next_line),
    }
}

/// Heading depth of a numbering token: 0 if empty, else the segment count.
pub fn count_number_depth(token: &str) -> usize {
    if token.is_empty() {
        0
    } else {
        token.split('.').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numbering() {
        assert!(is_numbering("1.1 Introduction"));
        assert!(is_numbering("  4.3.2 Scope  "));
        assert!(is_numbering("10.2\tTabbed"));
        assert!(!is_numbering("7 Results"));
        assert!(!is_numbering("1.1"));
        assert!(!is_numbering("1.1Introduction"));
        assert!(!is_numbering("See 3.2 for details"));
        assert!(!is_numbering(""));
    }

    #[test]
    fn test_numbering_token() {
        assert_eq!(numbering_token("4.3.2 Scope"), Some("4.3.2"));
        assert_eq!(numbering_token("  1.1\tIntro"), Some("1.1"));
        assert_eq!(numbering_token("Scope"), None);
    }

    #[test]
    fn test_depth_matches_numbering_groups() {
        for line in ["1.1 A", "4.3.2 B", "1.2.3.4.5 C"] {
            let token = numbering_token(line).unwrap();
            assert_eq!(count_number_depth(token), token.split('.').count());
        }
        assert_eq!(count_number_depth("4.3.2"), 3);
        assert_eq!(count_number_depth("7"), 1);
        assert_eq!(count_number_depth(""), 0);
    }

    #[test]
    fn test_embedded_reference() {
        assert!(is_embedded_reference("as described in 3.2.1 above"));
        assert!(is_embedded_reference("version 2.0"));
        assert!(!is_embedded_reference("2.1 Overview"));
        assert!(!is_embedded_reference("Plain text line"));
        assert!(!is_embedded_reference("Chapter 7"));
    }

    #[test]
    fn test_paragraph_start() {
        assert!(is_paragraph_start("2.1 Overview", "previous text"));
        assert!(is_paragraph_start("Fresh start", ""));
        assert!(is_paragraph_start("Fresh start", "   "));
        assert!(!is_paragraph_start("Continuation", "previous text"));
        assert!(!is_paragraph_start("42 items", ""));
        assert!(!is_paragraph_start("", ""));
    }

    #[test]
    fn test_paragraph_end_positive() {
        assert!(is_paragraph_end("The end.", ""));
        assert!(is_paragraph_end("The end.  ", "   "));
        assert!(is_paragraph_end("The end.", "Another sentence"));
        assert!(is_paragraph_end("The end.", "3.1 Next section"));
        assert!(is_paragraph_end("The end.", "Éclair"));
    }

    #[test]
    fn test_paragraph_end_negative() {
        assert!(!is_paragraph_end("No period", ""));
        assert!(!is_paragraph_end("The end.", "lowercase continues"));
        assert!(!is_paragraph_end("The end.", "7 items"));
        assert!(!is_paragraph_end("The end.", "(aside)"));
        assert!(!is_paragraph_end("Ends with colon:", "Next"));
    }
}
