//! PDF access through lopdf.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::detect::{pdf_version_from_bytes, pdf_version_from_path};
use crate::error::{Error, Result};
use crate::model::{RawTable, TocEntry};

use super::layout::page_layout_text;
use super::options::ExtractOptions;
use super::source::{PdfSource, SourceOpener};
use super::table_detector::TableDetector;

/// A PDF document loaded with lopdf.
///
/// The text of the most recently extracted page is kept, so asking for a
/// page's tables and then its text decodes the content stream once.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    options: ExtractOptions,
    last_page: RefCell<Option<(u32, Option<String>)>>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        pdf_version_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, options))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ExtractOptions::default())
    }

    /// Load a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<Self> {
        pdf_version_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, options))
    }

    fn from_document(doc: LopdfDocument, options: ExtractOptions) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text extraction will likely fail");
        }
        let pages = doc.get_pages();
        Self {
            doc,
            pages,
            options,
            last_page: RefCell::new(None),
        }
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        self.pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }

    /// Layout text of a page, NFC-normalized; `None` only when the page
    /// shows no text at all.
    fn extract_page(&self, page: u32) -> Result<Option<String>> {
        if let Some((cached, text)) = self.last_page.borrow().as_ref() {
            if *cached == page {
                return Ok(text.clone());
            }
        }

        let page_id = self.page_id(page)?;
        let text = page_layout_text(&self.doc, page_id)
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))?;
        let text = if text.is_empty() {
            None
        } else {
            Some(text.nfc().collect::<String>())
        };

        *self.last_page.borrow_mut() = Some((page, text.clone()));
        Ok(text)
    }

    /// Follow a reference, or return the object itself.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).and_then(|o| o.as_dict().ok())
    }

    /// Walk an outline level and its children, depth first.
    fn collect_outline_items(
        &self,
        first: &Object,
        level: u32,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<TocEntry>,
    ) {
        let mut cursor = first.as_reference().ok();

        while let Some(item_ref) = cursor {
            // Malformed outlines can loop back on themselves
            if !visited.insert(item_ref) {
                log::warn!("Outline cycle at object {:?}", item_ref);
                break;
            }
            let Ok(item) = self.doc.get_dictionary(item_ref) else {
                break;
            };

            let title = get_string_from_dict(item, b"Title").unwrap_or_default();
            match self.outline_destination(item) {
                Some(page) => entries.push(TocEntry::new(level, title, page)),
                None => log::warn!("Dropping outline entry without page: {:?}", title),
            }

            if let Ok(child) = item.get(b"First") {
                self.collect_outline_items(child, level + 1, visited, entries);
            }

            cursor = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Get destination page from an outline item.
    fn outline_destination(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.resolve_destination(dest);
        }

        let action = item.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
        action
            .get(b"D")
            .ok()
            .and_then(|dest| self.resolve_destination(dest))
    }

    /// Resolve an explicit destination array to a page number.
    fn resolve_destination(&self, dest: &Object) -> Option<u32> {
        let array = self.resolve(dest)?.as_array().ok()?;
        let page_ref = array.first()?.as_reference().ok()?;

        self.pages
            .iter()
            .find(|(_, id)| **id == page_ref)
            .map(|(num, _)| *num)
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn page_text(&self, page: u32) -> Result<Option<String>> {
        self.extract_page(page)
    }

    fn page_tables(&self, page: u32) -> Result<Vec<RawTable>> {
        if !self.options.detect_tables {
            self.page_id(page)?;
            return Ok(Vec::new());
        }

        let Some(text) = self.extract_page(page)? else {
            return Ok(Vec::new());
        };
        let detector = TableDetector::with_config(self.options.table_config.clone());
        let tables = detector.detect_tables(&text);
        log::debug!("Page {}: {} table(s) detected", page, tables.len());
        Ok(tables)
    }

    fn toc(&self) -> Result<Vec<TocEntry>> {
        let mut entries = Vec::new();

        let catalog = self.doc.catalog()?;
        let Some(outlines) = catalog.get(b"Outlines").ok().and_then(|o| self.resolve_dict(o))
        else {
            return Ok(entries);
        };

        if let Ok(first) = outlines.get(b"First") {
            let mut visited = HashSet::new();
            self.collect_outline_items(first, 1, &mut visited, &mut entries);
        }

        entries.sort_by_key(|e| e.page);
        Ok(entries)
    }
}

/// Opens files as [`LopdfSource`].
#[derive(Debug, Clone, Default)]
pub struct LopdfOpener {
    options: ExtractOptions,
}

impl LopdfOpener {
    /// Create an opener with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an opener with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }
}

impl SourceOpener for LopdfOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfSource>> {
        let source = LopdfSource::open_with_options(path, self.options.clone())?;
        Ok(Box::new(source))
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
pub(super) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
