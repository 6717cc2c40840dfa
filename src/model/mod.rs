//! Data model shared by extraction, assembly and rendering.
//!
//! Extraction backends produce [`RawPage`]s, [`RawTable`]s and
//! [`TocEntry`]s; the assembler turns them into [`Block`]s; the corpus
//! converter wraps blocks in [`ConvertedDocument`]s.

mod block;
mod document;
mod page;
mod table;

pub use block::{Block, NumberingToken};
pub use document::{ConvertedDocument, CorpusManifest, DocumentMeta};
pub use page::{RawPage, TocEntry};
pub use table::RawTable;
