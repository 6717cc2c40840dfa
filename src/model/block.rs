//! Output blocks produced by the document assembler.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::assemble::count_number_depth;

/// A section numbering token such as `4.3.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberingToken(String);

impl NumberingToken {
    /// Wrap a token string. The string is stored as given.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token text, dots included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Heading depth: the number of dot-separated segments.
    pub fn depth(&self) -> usize {
        count_number_depth(&self.0)
    }
}

impl fmt::Display for NumberingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of emitted Markdown.
///
/// A document's blocks are kept in output order: the warning first, then
/// TOC headings (newest first), then body content in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Note explaining that page markers follow the PDF page sequence
    Warning,

    /// A heading taken from the document outline
    TocHeading {
        /// Outline level (1 = top)
        level: u32,
        /// Outline title
        title: String,
        /// Page being processed when the entry was matched
        page: u32,
    },

    /// A heading detected from a section number at the start of a paragraph
    NumberedHeading {
        /// Section number
        token: NumberingToken,
        /// Anchor tag, e.g. `{#id1-2.3}`
        anchor: String,
        /// Text following the number on the heading line
        title: String,
        /// Reassembled paragraph text after the heading line
        body: String,
        /// Page marker
        page: u32,
    },

    /// A paragraph without numbering
    PlainParagraph {
        /// Reassembled paragraph text
        body: String,
        /// Page marker
        page: u32,
    },

    /// A table rendered as pipe-delimited Markdown rows
    Table {
        /// Header, separator and body rows
        rows: Vec<String>,
        /// Page marker
        page: u32,
    },
}

impl Block {
    /// Page marker carried by the block, if any.
    pub fn page(&self) -> Option<u32> {
        match self {
            Block::Warning => None,
            Block::TocHeading { page, .. }
            | Block::NumberedHeading { page, .. }
            | Block::PlainParagraph { page, .. }
            | Block::Table { page, .. } => Some(*page),
        }
    }

    /// Heading level, for heading blocks.
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            Block::TocHeading { level, .. } => Some(*level as usize),
            Block::NumberedHeading { token, .. } => Some(token.depth()),
            _ => None,
        }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table { .. })
    }
}
