//! Heading depth, anchors, and the shared paragraph emission rule.

use crate::model::{Block, NumberingToken};

use super::reassemble::reassemble;

/// Build the anchor tag for a numbered heading, e.g. `{#id1-2.3}`.
pub fn anchor(doc_id: &str, token: &NumberingToken) -> String {
    format!("{{#{}-{}}}", doc_id, token)
}

/// Turn a finished paragraph into a block.
///
/// With an active numbering token the paragraph becomes a
/// [`Block::NumberedHeading`]: the rest of the first line is the heading
/// title and the remaining lines form the body. Without one it becomes a
/// [`Block::PlainParagraph`]. Returns `None` when nothing is left after
/// cleaning.
pub fn resolve_block<S: AsRef<str>>(
    doc_id: &str,
    numbering: Option<&NumberingToken>,
    lines: &[S],
    page: u32,
) -> Option<Block> {
    match numbering {
        Some(token) => {
            let (title, rest) = split_heading_line(token, lines);
            let body = reassemble(rest);
            if title.is_empty() && body.is_empty() {
                return None;
            }
            Some(Block::NumberedHeading {
                token: token.clone(),
                anchor: anchor(doc_id, token),
                title,
                body,
                page,
            })
        }
        None => {
            let body = reassemble(lines);
            if body.is_empty() {
                return None;
            }
            Some(Block::PlainParagraph { body, page })
        }
    }
}

/// Separate the heading line (the one carrying `token`) from the body lines.
fn split_heading_line<'a, S: AsRef<str>>(
    token: &NumberingToken,
    lines: &'a [S],
) -> (String, &'a [S]) {
    let Some(first) = lines.first() else {
        return (String::new(), lines);
    };

    match first.as_ref().trim().strip_prefix(token.as_str()) {
        Some(title) => (
            title.split_whitespace().collect::<Vec<_>>().join(" "),
            &lines[1..],
        ),
        None => (String::new(), lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_keeps_dots() {
        let token = NumberingToken::new("4.3.2");
        assert_eq!(anchor("id7", &token), "{#id7-4.3.2}");
    }

    #[test]
    fn test_numbered_heading_block() {
        let token = NumberingToken::new("1.1");
        let lines = ["1.1 Introduction", "This is the body."];
        let block = resolve_block("id1", Some(&token), &lines, 1).unwrap();

        assert_eq!(
            block,
            Block::NumberedHeading {
                token: token.clone(),
                anchor: "{#id1-1.1}".to_string(),
                title: "Introduction".to_string(),
                body: "This is the body.".to_string(),
                page: 1,
            }
        );
        assert_eq!(block.heading_level(), Some(2));
    }

    #[test]
    fn test_heading_without_body() {
        let token = NumberingToken::new("2.4.1");
        let block = resolve_block("id2", Some(&token), &["2.4.1  Limits"], 5).unwrap();
        match block {
            Block::NumberedHeading { title, body, .. } => {
                assert_eq!(title, "Limits");
                assert!(body.is_empty());
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_plain_paragraph_block() {
        let block = resolve_block("id1", None, &["Some text", "continues."], 3).unwrap();
        assert_eq!(
            block,
            Block::PlainParagraph {
                body: "Some text continues.".to_string(),
                page: 3,
            }
        );
    }

    #[test]
    fn test_empty_paragraph_not_emitted() {
        assert!(resolve_block("id1", None, &["", "   "], 1).is_none());
        let empty: [&str; 0] = [];
        assert!(resolve_block("id1", Some(&NumberingToken::new("1.2")), &empty, 1).is_none());
    }
}
