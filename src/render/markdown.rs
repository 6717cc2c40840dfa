//! Markdown rendering of block sequences.

use crate::model::Block;

/// First line of every converted document.
pub const PAGE_NUMBER_NOTE: &str =
    "> **Note:** Page numbers refer to the PDF sequence and may differ from printed page numbers.";

/// Render one document's blocks as a standalone Markdown file.
///
/// The file starts with `# <file name>`, followed by the blocks.
pub fn to_markdown(file_name: &str, blocks: &[Block]) -> String {
    let mut output = format!("# {}\n\n", file_name);
    output.push_str(&MarkdownRenderer::new().render_blocks(blocks));
    output
}

/// Format a page marker line.
pub fn page_marker(page: u32) -> String {
    format!("[Page: {}]", page)
}

/// Renders blocks to Markdown text.
///
/// Every block renders to text ending in a newline; blocks are joined with
/// one more newline, so consecutive blocks are separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    heading_shift: usize,
}

impl MarkdownRenderer {
    /// Create a renderer that keeps heading levels as they are.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that pushes every heading `shift` levels deeper.
    pub fn with_heading_shift(shift: usize) -> Self {
        Self {
            heading_shift: shift,
        }
    }

    /// Render a sequence of blocks.
    pub fn render_blocks(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a single block.
    pub fn render_block(&self, block: &Block) -> String {
        let mut output = String::new();
        match block {
            Block::Warning => {
                output.push_str(PAGE_NUMBER_NOTE);
                output.push('\n');
            }
            Block::TocHeading { level, title, page } => {
                output.push_str(&self.heading_prefix(*level as usize));
                output.push(' ');
                output.push_str(title);
                output.push('\n');
                self.push_page_marker(&mut output, *page);
            }
            Block::NumberedHeading {
                token,
                anchor,
                title,
                body,
                page,
            } => {
                output.push_str(&self.heading_prefix(token.depth()));
                output.push(' ');
                output.push_str(token.as_str());
                if !title.is_empty() {
                    output.push(' ');
                    output.push_str(title);
                }
                output.push(' ');
                output.push_str(anchor);
                output.push('\n');
                if !body.is_empty() {
                    output.push_str(body);
                    output.push('\n');
                }
                self.push_page_marker(&mut output, *page);
            }
            Block::PlainParagraph { body, page } => {
                output.push_str(body);
                output.push('\n');
                self.push_page_marker(&mut output, *page);
            }
            Block::Table { rows, page } => {
                for row in rows {
                    output.push_str(row);
                    output.push('\n');
                }
                self.push_page_marker(&mut output, *page);
            }
        }
        output
    }

    fn heading_prefix(&self, level: usize) -> String {
        "#".repeat(level + self.heading_shift)
    }

    fn push_page_marker(&self, output: &mut String, page: u32) {
        output.push_str(&page_marker(page));
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumberingToken;

    fn heading(token: &str, title: &str, body: &str) -> Block {
        Block::NumberedHeading {
            token: NumberingToken::new(token),
            anchor: format!("{{#id1-{}}}", token),
            title: title.to_string(),
            body: body.to_string(),
            page: 2,
        }
    }

    #[test]
    fn test_render_numbered_heading() {
        let block = heading("1.1", "Introduction", "This is the body.");
        assert_eq!(
            MarkdownRenderer::new().render_block(&block),
            "## 1.1 Introduction {#id1-1.1}\nThis is the body.\n[Page: 2]\n"
        );
    }

    #[test]
    fn test_render_heading_without_body() {
        let block = heading("3.2.1", "Limits", "");
        assert_eq!(
            MarkdownRenderer::new().render_block(&block),
            "### 3.2.1 Limits {#id1-3.2.1}\n[Page: 2]\n"
        );
    }

    #[test]
    fn test_heading_shift() {
        let block = heading("3.2.1", "Limits", "Text.");
        let shifted = MarkdownRenderer::with_heading_shift(1).render_block(&block);
        assert!(shifted.starts_with("#### 3.2.1 Limits"));
        assert!(shifted.contains("\nText.\n"));

        let toc = Block::TocHeading {
            level: 1,
            title: "Intro".to_string(),
            page: 1,
        };
        assert_eq!(
            MarkdownRenderer::with_heading_shift(1).render_block(&toc),
            "## Intro\n[Page: 1]\n"
        );
    }

    #[test]
    fn test_shift_leaves_paragraphs_alone() {
        let block = Block::PlainParagraph {
            body: "#hashtag stays".to_string(),
            page: 4,
        };
        assert_eq!(
            MarkdownRenderer::with_heading_shift(1).render_block(&block),
            "#hashtag stays\n[Page: 4]\n"
        );
    }

    #[test]
    fn test_render_table_block() {
        let block = Block::Table {
            rows: vec!["| A |".to_string(), "| - |".to_string(), "| 1 |".to_string()],
            page: 1,
        };
        assert_eq!(
            MarkdownRenderer::new().render_block(&block),
            "| A |\n| - |\n| 1 |\n[Page: 1]\n"
        );
    }

    #[test]
    fn test_document_file() {
        let blocks = vec![
            Block::Warning,
            Block::PlainParagraph {
                body: "Hello.".to_string(),
                page: 1,
            },
        ];
        let md = to_markdown("report.pdf", &blocks);
        assert_eq!(
            md,
            format!("# report.pdf\n\n{}\n\nHello.\n[Page: 1]\n", PAGE_NUMBER_NOTE)
        );
    }
}
