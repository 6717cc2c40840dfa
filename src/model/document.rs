//! Per-document conversion results and the corpus manifest.

use super::Block;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Identity of one input document within a corpus run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Synthesized id (`id1`, `id2`, ...)
    pub id: String,

    /// Source file name
    pub title: String,

    /// Page count (0 when the document could not be opened)
    pub pages: u32,
}

impl DocumentMeta {
    /// Create metadata for the `index`-th document (1-based).
    pub fn new(index: usize, title: impl Into<String>, pages: u32) -> Self {
        Self {
            id: format!("id{}", index),
            title: title.into(),
            pages,
        }
    }

    /// Line used in the combined file's document index.
    pub fn index_line(&self, index: usize) -> String {
        format!("- {}. {}: {} [{} Pages]", index, self.id, self.title, self.pages)
    }
}

/// The outcome of converting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedDocument {
    /// Document identity
    pub meta: DocumentMeta,

    /// Emitted blocks; empty when conversion failed
    pub blocks: Vec<Block>,

    /// Failure message when extraction aborted
    pub failure: Option<String>,
}

impl ConvertedDocument {
    /// Create a successful result.
    pub fn new(meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        Self {
            meta,
            blocks,
            failure: None,
        }
    }

    /// Create a failed result with no content.
    pub fn failed(meta: DocumentMeta, failure: impl Into<String>) -> Self {
        Self {
            meta,
            blocks: Vec::new(),
            failure: Some(failure.into()),
        }
    }

    /// Check if conversion failed.
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Document list written as YAML front matter of the combined file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusManifest {
    /// Every input document, in processing order
    pub documents: Vec<DocumentMeta>,
}

impl CorpusManifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    pub fn add_document(&mut self, meta: DocumentMeta) {
        self.documents.push(meta);
    }

    /// Convert the manifest to a YAML front matter block (`---` fenced).
    pub fn to_yaml_frontmatter(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}\n---", yaml.trim_end()))
    }
}
