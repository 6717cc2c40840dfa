//! The page walker: the stateful driver that turns extracted pages into an
//! ordered block sequence for one document.
//!
//! Per page the walker
//!
//! 1. renders the page's tables and appends them immediately,
//! 2. skips the page if it has no text,
//! 3. claims at most one pending TOC entry whose start page has been reached,
//! 4. walks the lines, opening and closing paragraphs as the classifier
//!    dictates and flushing each finished paragraph through
//!    [`resolve_block`],
//! 5. flushes whatever is left at the end of the page,
//! 6. advances its page marker to the page just walked, and
//! 7. records the claimed TOC heading.
//!
//! Page markers lag: blocks emitted while walking page `n` carry the number
//! of the last page that finished walking (1 before any page has finished).
//! TOC headings carry the page they were claimed on and are kept in a
//! separate newest-first list placed right after the warning block.

use crate::error::Result;
use crate::model::{Block, NumberingToken, RawPage, TocEntry};
use crate::parser::PdfSource;
use crate::render::format_table;

use super::classify::{
    is_embedded_reference, is_paragraph_end, is_paragraph_start, numbering_token,
};
use super::heading::resolve_block;

/// Accumulates blocks for one document, page by page.
#[derive(Debug)]
pub struct PageWalker {
    doc_id: String,
    toc: Vec<TocEntry>,
    toc_index: usize,
    current_paragraph: Vec<String>,
    current_numbering: Option<NumberingToken>,
    current_page: u32,
    toc_headings: Vec<Block>,
    body: Vec<Block>,
}

impl PageWalker {
    /// Create a walker for the document `doc_id` with its TOC entries.
    pub fn new(doc_id: impl Into<String>, toc: Vec<TocEntry>) -> Self {
        Self {
            doc_id: doc_id.into(),
            toc,
            toc_index: 0,
            current_paragraph: Vec::new(),
            current_numbering: None,
            current_page: 1,
            toc_headings: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Page number currently attached to emitted blocks.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Number of TOC entries consumed so far.
    pub fn toc_consumed(&self) -> usize {
        self.toc_index
    }

    /// Walk one page.
    pub fn walk_page(&mut self, page: &RawPage) {
        for table in &page.tables {
            if let Some(rows) = format_table(table) {
                self.body.push(Block::Table {
                    rows,
                    page: self.current_page,
                });
            }
        }

        let Some(text) = page.walkable_text() else {
            log::debug!("{}: page {} has no text, skipping", self.doc_id, page.number);
            return;
        };

        let toc_section = self.claim_toc_entry(page.number);

        let lines: Vec<&str> = text.split('\n').collect();
        let mut prev_line = "";

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            let next_line = lines.get(i + 1).copied().unwrap_or("");

            if is_embedded_reference(line) {
                self.current_paragraph.push(line.to_string());
                continue;
            }

            if is_paragraph_start(line, prev_line) {
                self.flush_paragraph();
                self.current_numbering = numbering_token(line).map(NumberingToken::new);
            }
            self.current_paragraph.push(line.to_string());

            if is_paragraph_end(line, next_line) {
                self.flush_paragraph();
                self.current_numbering = None;
            }

            prev_line = line;
        }

        self.flush_paragraph();
        self.current_numbering = None;

        self.current_page = page.number;

        if let Some(entry) = toc_section {
            log::debug!(
                "{}: TOC entry '{}' placed at page {}",
                self.doc_id,
                entry.title,
                self.current_page
            );
            self.toc_headings.push(Block::TocHeading {
                level: entry.level,
                title: entry.title,
                page: self.current_page,
            });
        }
    }

    /// Finish the document and return its blocks in output order.
    pub fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();

        let mut blocks = Vec::with_capacity(1 + self.toc_headings.len() + self.body.len());
        blocks.push(Block::Warning);
        blocks.extend(self.toc_headings.into_iter().rev());
        blocks.extend(self.body);
        blocks
    }

    /// Take the next TOC entry if this page has reached its start page.
    fn claim_toc_entry(&mut self, page: u32) -> Option<TocEntry> {
        let entry = self.toc.get(self.toc_index)?;
        if page < entry.page {
            return None;
        }
        self.toc_index += 1;
        Some(entry.clone())
    }

    fn flush_paragraph(&mut self) {
        if self.current_paragraph.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.current_paragraph);
        if let Some(block) = resolve_block(
            &self.doc_id,
            self.current_numbering.as_ref(),
            &lines,
            self.current_page,
        ) {
            self.body.push(block);
        }
    }
}

/// Assemble blocks from pages that are already extracted.
pub fn assemble_pages<I>(doc_id: &str, pages: I, toc: Vec<TocEntry>) -> Vec<Block>
where
    I: IntoIterator<Item = RawPage>,
{
    let mut walker = PageWalker::new(doc_id, toc);
    for page in pages {
        walker.walk_page(&page);
    }
    walker.finish()
}

/// Assemble blocks for one document by pulling pages from `source`.
///
/// A failing TOC lookup degrades to an empty TOC. Any page or table
/// extraction failure aborts the whole document.
pub fn assemble_document(source: &dyn PdfSource, doc_id: &str) -> Result<Vec<Block>> {
    let toc = source.toc().unwrap_or_else(|e| {
        log::debug!("{}: no TOC available ({})", doc_id, e);
        Vec::new()
    });
    let page_count = source.page_count()?;
    log::debug!(
        "{}: walking {} pages with {} TOC entries",
        doc_id,
        page_count,
        toc.len()
    );

    let mut walker = PageWalker::new(doc_id, toc);
    for number in 1..=page_count {
        let tables = source.page_tables(number)?;
        let text = source.page_text(number)?;
        walker.walk_page(&RawPage {
            number,
            text,
            tables,
        });
    }

    Ok(walker.finish())
}
