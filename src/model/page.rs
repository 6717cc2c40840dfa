//! Page-level extraction results and table-of-contents entries.

use super::RawTable;
use serde::{Deserialize, Serialize};

/// Everything the extraction backend produced for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Layout-preserving text, lines separated by `\n`; `None` when the
    /// page yielded no text
    pub text: Option<String>,

    /// Tables found on the page
    pub tables: Vec<RawTable>,
}

impl RawPage {
    /// Create a page with text and no tables.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: Some(text.into()),
            tables: Vec::new(),
        }
    }

    /// Create a page that produced no text.
    pub fn blank(number: u32) -> Self {
        Self {
            number,
            text: None,
            tables: Vec::new(),
        }
    }

    /// Attach a table and return self.
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Text to walk, or `None` if the page should be skipped.
    pub fn walkable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// A table-of-contents (outline) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Entry title
    pub title: String,

    /// Page the entry points to (1-indexed)
    pub page: u32,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkable_text() {
        assert_eq!(RawPage::new(1, "abc").walkable_text(), Some("abc"));
        assert_eq!(RawPage::new(1, "").walkable_text(), None);
        assert_eq!(RawPage::blank(2).walkable_text(), None);
        // Whitespace-only text is still walked
        assert_eq!(RawPage::new(3, " \n").walkable_text(), Some(" \n"));
    }

    #[test]
    fn test_with_table() {
        let page = RawPage::blank(4).with_table(RawTable::from_strings([["A"]]));
        assert_eq!(page.tables.len(), 1);
    }
}
