//! Collapse the raw lines of a paragraph candidate into clean paragraphs.

use super::classify::is_paragraph_end;

/// Split raw lines into paragraphs.
///
/// Empty lines are dropped; a paragraph closes whenever a line ends a
/// sentence and the following input line opens a new one. Each paragraph is
/// a single line with whitespace collapsed to single spaces.
pub fn paragraphs<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut result = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        pending.push(line);

        let next_line = lines.get(i + 1).map(|l| l.as_ref()).unwrap_or("");
        if is_paragraph_end(line, next_line) {
            result.push(join_words(&pending));
            pending.clear();
        }
    }

    if !pending.is_empty() {
        result.push(join_words(&pending));
    }

    result
}

/// Reassemble raw lines into one text block, paragraphs separated by a blank line.
pub fn reassemble<S: AsRef<str>>(lines: &[S]) -> String {
    paragraphs(lines).join("\n\n")
}

fn join_words(lines: &[&str]) -> String {
    lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
