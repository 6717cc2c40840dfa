//! The extraction seam: everything the assembler needs from a PDF.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{RawPage, RawTable, TocEntry};

/// Read access to one opened document.
///
/// Page numbers are 1-indexed. A page that yields no text returns
/// `Ok(None)` rather than an error.
pub trait PdfSource {
    /// Number of pages in the document.
    fn page_count(&self) -> Result<u32>;

    /// Layout-preserving text of a page, lines separated by `\n`.
    fn page_text(&self, page: u32) -> Result<Option<String>>;

    /// Tables found on a page.
    fn page_tables(&self, page: u32) -> Result<Vec<RawTable>>;

    /// Outline entries, ordered by page.
    fn toc(&self) -> Result<Vec<TocEntry>>;
}

/// Opens documents by path.
pub trait SourceOpener {
    /// Open the document at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource>>;
}

impl<F> SourceOpener for F
where
    F: Fn(&Path) -> Result<Box<dyn PdfSource>>,
{
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource>> {
        self(path)
    }
}

/// A document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: BTreeMap<u32, RawPage>,
    page_count: u32,
    toc: Vec<TocEntry>,
    failing_page: Option<u32>,
    failing_toc: bool,
}

impl MemorySource {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from pages; the page count follows the highest
    /// page number.
    pub fn from_pages(pages: impl IntoIterator<Item = RawPage>) -> Self {
        let mut source = Self::new();
        for page in pages {
            source = source.with_page(page);
        }
        source
    }

    /// Add a page and return self.
    pub fn with_page(mut self, page: RawPage) -> Self {
        self.page_count = self.page_count.max(page.number);
        self.pages.insert(page.number, page);
        self
    }

    /// Add a TOC entry and return self.
    pub fn with_toc_entry(mut self, entry: TocEntry) -> Self {
        self.toc.push(entry);
        self
    }

    /// Make every extraction on `page` fail.
    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Make the outline lookup fail.
    pub fn failing_toc(mut self) -> Self {
        self.failing_toc = true;
        self
    }

    fn check_page(&self, page: u32) -> Result<()> {
        if page == 0 || page > self.page_count {
            return Err(Error::PageOutOfRange(page, self.page_count));
        }
        if self.failing_page == Some(page) {
            return Err(Error::TextExtract(format!("Page {}: unreadable", page)));
        }
        Ok(())
    }
}

impl PdfSource for MemorySource {
    fn page_count(&self) -> Result<u32> {
        Ok(self.page_count)
    }

    fn page_text(&self, page: u32) -> Result<Option<String>> {
        self.check_page(page)?;
        Ok(self.pages.get(&page).and_then(|p| p.text.clone()))
    }

    fn page_tables(&self, page: u32) -> Result<Vec<RawTable>> {
        self.check_page(page)?;
        Ok(self
            .pages
            .get(&page)
            .map(|p| p.tables.clone())
            .unwrap_or_default())
    }

    fn toc(&self) -> Result<Vec<TocEntry>> {
        if self.failing_toc {
            return Err(Error::PdfParse("outline unreadable".to_string()));
        }
        let mut toc = self.toc.clone();
        toc.sort_by_key(|e| e.page);
        Ok(toc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_pages() {
        let source = MemorySource::from_pages([RawPage::new(1, "one"), RawPage::new(3, "three")]);

        assert_eq!(source.page_count().unwrap(), 3);
        assert_eq!(source.page_text(1).unwrap().as_deref(), Some("one"));
        assert_eq!(source.page_text(2).unwrap(), None);
        assert!(source.page_tables(2).unwrap().is_empty());
        assert!(matches!(
            source.page_text(4),
            Err(Error::PageOutOfRange(4, 3))
        ));
    }

    #[test]
    fn test_memory_source_failing_page() {
        let source = MemorySource::from_pages([RawPage::new(1, "a"), RawPage::new(2, "b")])
            .failing_on(2);

        assert!(source.page_text(1).is_ok());
        assert!(source.page_text(2).is_err());
        assert!(source.page_tables(2).is_err());
    }

    #[test]
    fn test_toc_sorted_by_page() {
        let source = MemorySource::new()
            .with_toc_entry(TocEntry::new(1, "Later", 5))
            .with_toc_entry(TocEntry::new(1, "Earlier", 2));

        let toc = source.toc().unwrap();
        assert_eq!(toc[0].title, "Earlier");
        assert_eq!(toc[1].title, "Later");
    }

    #[test]
    fn test_failing_toc() {
        let source = MemorySource::from_pages([RawPage::new(1, "a")])
            .with_toc_entry(TocEntry::new(1, "A", 1))
            .failing_toc();

        assert!(matches!(source.toc(), Err(Error::PdfParse(_))));
        assert!(source.page_text(1).is_ok());
    }

    #[test]
    fn test_closure_opener() {
        let opener = |_: &Path| -> Result<Box<dyn PdfSource>> {
            Ok(Box::new(MemorySource::from_pages([RawPage::blank(1)])))
        };

        let source = opener.open(Path::new("x.pdf")).unwrap();
        assert_eq!(source.page_count().unwrap(), 1);
    }
}
