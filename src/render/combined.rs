//! The combined corpus file: front matter, document index, and every
//! document's blocks with headings one level deeper.

use crate::error::Result;
use crate::model::{ConvertedDocument, CorpusManifest};

use super::markdown::MarkdownRenderer;

/// Marker line opening a document's section body.
pub const SECTION_START: &str = "--- Start ---";
/// Marker line closing a document's section body.
pub const SECTION_END: &str = "--- End ---";

/// Render the combined Markdown file for all documents, in order.
pub fn to_combined_markdown(documents: &[ConvertedDocument]) -> Result<String> {
    let mut manifest = CorpusManifest::new();
    for doc in documents {
        manifest.add_document(doc.meta.clone());
    }

    let mut lines = vec![
        manifest.to_yaml_frontmatter()?,
        "# Documents Combined:".to_string(),
        String::new(),
    ];
    for (i, doc) in documents.iter().enumerate() {
        lines.push(doc.meta.index_line(i + 1));
    }
    lines.push(String::new());

    let renderer = MarkdownRenderer::with_heading_shift(1);
    for (i, doc) in documents.iter().enumerate() {
        lines.push(format!("## {}. {}: {}", i + 1, doc.meta.id, doc.meta.title));
        lines.push(SECTION_START.to_string());
        lines.extend(doc.blocks.iter().map(|block| renderer.render_block(block)));
        lines.push(SECTION_END.to_string());
    }

    Ok(lines.join("\n"))
}
