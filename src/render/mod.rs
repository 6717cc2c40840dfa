//! Rendering module: tables, Markdown files, the combined corpus file, JSON.

mod combined;
mod json;
mod markdown;
mod table;

pub use combined::{to_combined_markdown, SECTION_END, SECTION_START};
pub use json::{to_json, JsonFormat};
pub use markdown::{page_marker, to_markdown, MarkdownRenderer, PAGE_NUMBER_NOTE};
pub use table::{clean_cell, format_table};
