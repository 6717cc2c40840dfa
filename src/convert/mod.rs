//! Corpus conversion: turns every PDF in a directory into a Markdown file
//! and writes the combined corpus file.
//!
//! # Example
//!
//! ```no_run
//! use pdfmark::convert::{ConvertOptions, CorpusConverter};
//!
//! fn main() -> pdfmark::Result<()> {
//!     let options = ConvertOptions::for_dir("reports");
//!     let summary = CorpusConverter::new(options).convert()?;
//!     println!("{}", summary.combined_file.display());
//!     Ok(())
//! }
//! ```

mod scan;

pub use scan::scan_pdfs;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::assemble::assemble_document;
use crate::error::{Error, Result};
use crate::model::{ConvertedDocument, DocumentMeta};
use crate::parser::{ExtractOptions, LopdfOpener, SourceOpener};
use crate::render::{to_combined_markdown, to_json, to_markdown, JsonFormat};

/// Directory created under the input directory when no output is given.
pub const DEFAULT_OUTPUT_DIR: &str = "markdown_output";

/// Default name of the combined corpus file.
pub const DEFAULT_COMBINED_FILE: &str = "combined_output.md";

/// Options for corpus conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory scanned for PDFs
    pub input_dir: PathBuf,

    /// Output directory; `<input_dir>/markdown_output` when unset
    pub output_dir: Option<PathBuf>,

    /// File name of the combined file inside the output directory
    pub combined_file_name: String,

    /// Also write `<stem>.json` with each document's blocks
    pub write_json: bool,

    /// Extraction options handed to the PDF backend
    pub extract: ExtractOptions,
}

impl ConvertOptions {
    /// Create new conversion options for the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create conversion options for `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the combined file name.
    pub fn with_combined_name(mut self, name: impl Into<String>) -> Self {
        self.combined_file_name = name.into();
        self
    }

    /// Enable or disable JSON output.
    pub fn with_json(mut self, write: bool) -> Self {
        self.write_json = write;
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// The effective output directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join(DEFAULT_OUTPUT_DIR))
    }

    /// The effective combined file path.
    pub fn combined_path(&self) -> PathBuf {
        self.resolved_output_dir().join(&self.combined_file_name)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: None,
            combined_file_name: DEFAULT_COMBINED_FILE.to_string(),
            write_json: false,
            extract: ExtractOptions::default(),
        }
    }
}

/// Progress notifications emitted during a corpus run.
#[derive(Debug)]
pub enum ConvertEvent<'a> {
    /// Input files were found and their metadata recorded
    Scanned {
        /// Number of documents
        count: usize,
    },
    /// A document is about to be assembled
    Processing {
        /// 1-based position
        index: usize,
        /// Source file name
        name: &'a str,
    },
    /// A document was converted and written
    Converted {
        /// Source file name
        name: &'a str,
        /// Written Markdown file
        output: &'a Path,
    },
    /// A document failed; it keeps an empty combined section
    Failed {
        /// Source file name
        name: &'a str,
        /// Failure message
        error: &'a str,
    },
}

/// Outcome of a corpus run.
#[derive(Debug, Clone)]
pub struct CorpusSummary {
    /// Every document in processing order
    pub documents: Vec<ConvertedDocument>,

    /// Directory holding the per-document files
    pub output_dir: PathBuf,

    /// Path of the combined file
    pub combined_file: PathBuf,
}

impl CorpusSummary {
    /// Number of documents converted successfully.
    pub fn converted_count(&self) -> usize {
        self.documents.iter().filter(|d| !d.is_failed()).count()
    }

    /// Number of documents that failed.
    pub fn failed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_failed()).count()
    }
}

/// Converts every PDF in a directory.
pub struct CorpusConverter<O = LopdfOpener> {
    opener: O,
    options: ConvertOptions,
}

impl CorpusConverter<LopdfOpener> {
    /// Create a converter backed by lopdf.
    pub fn new(options: ConvertOptions) -> Self {
        let opener = LopdfOpener::with_options(options.extract.clone());
        Self { opener, options }
    }
}

impl<O: SourceOpener> CorpusConverter<O> {
    /// Create a converter with a custom document opener.
    pub fn with_opener(opener: O, options: ConvertOptions) -> Self {
        Self { opener, options }
    }

    /// Get the conversion options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run the conversion.
    pub fn convert(&self) -> Result<CorpusSummary> {
        self.convert_with(|_| {})
    }

    /// Run the conversion, reporting progress to `on_event`.
    ///
    /// Fails with [`Error::NoInput`] before touching the output directory
    /// when the input directory holds no PDFs. Per-document failures are
    /// logged and recorded; only I/O errors on the output abort the run.
    pub fn convert_with<F>(&self, mut on_event: F) -> Result<CorpusSummary>
    where
        F: FnMut(ConvertEvent<'_>),
    {
        let files = scan_pdfs(&self.options.input_dir)?;
        if files.is_empty() {
            return Err(Error::NoInput(self.options.input_dir.clone()));
        }

        let output_dir = self.options.resolved_output_dir();
        fs::create_dir_all(&output_dir)?;

        // Metadata for every document comes first: the combined index is
        // known before any document is assembled.
        let metas: Vec<DocumentMeta> = files
            .iter()
            .enumerate()
            .map(|(i, path)| DocumentMeta::new(i + 1, file_name(path), self.page_count(path)))
            .collect();
        on_event(ConvertEvent::Scanned { count: metas.len() });

        let mut documents = Vec::with_capacity(files.len());
        let mut used_stems = HashSet::new();
        for (i, (path, meta)) in files.iter().zip(metas).enumerate() {
            on_event(ConvertEvent::Processing {
                index: i + 1,
                name: &meta.title,
            });
            log::info!("Processing: {}", meta.title);

            let doc = match convert_document(&self.opener, path, meta.clone()) {
                Ok(doc) => doc,
                Err(e) => {
                    log::error!("Error processing {}: {}", meta.title, e);
                    let doc = ConvertedDocument::failed(meta, e.to_string());
                    on_event(ConvertEvent::Failed {
                        name: &doc.meta.title,
                        error: doc.failure.as_deref().unwrap_or_default(),
                    });
                    documents.push(doc);
                    continue;
                }
            };

            let output = self.write_document(path, &doc, &output_dir, &mut used_stems)?;
            on_event(ConvertEvent::Converted {
                name: &doc.meta.title,
                output: &output,
            });
            documents.push(doc);
        }

        let combined_file = output_dir.join(&self.options.combined_file_name);
        fs::write(&combined_file, to_combined_markdown(&documents)?)?;
        log::info!("Combined file: {}", combined_file.display());

        Ok(CorpusSummary {
            documents,
            output_dir,
            combined_file,
        })
    }

    /// Page count from a separate open; 0 when the document cannot be read.
    fn page_count(&self, path: &Path) -> u32 {
        self.opener
            .open(path)
            .and_then(|source| source.page_count())
            .unwrap_or_else(|e| {
                log::warn!("Cannot count pages of {}: {}", path.display(), e);
                0
            })
    }

    /// Write `<stem>.md` (and `<stem>.json`). A stem already written in this
    /// run, as with `a.pdf` next to `a.PDF`, gets the document id appended.
    fn write_document(
        &self,
        path: &Path,
        doc: &ConvertedDocument,
        output_dir: &Path,
        used_stems: &mut HashSet<String>,
    ) -> Result<PathBuf> {
        let mut stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| doc.meta.id.clone());
        if !used_stems.insert(stem.clone()) {
            let unique = format!("{}-{}", stem, doc.meta.id);
            log::warn!(
                "{} shares the output name {}.md; writing {}.md",
                doc.meta.title,
                stem,
                unique
            );
            used_stems.insert(unique.clone());
            stem = unique;
        }

        let markdown_path = output_dir.join(format!("{}.md", stem));
        fs::write(&markdown_path, to_markdown(&doc.meta.title, &doc.blocks))?;

        if self.options.write_json {
            let json_path = output_dir.join(format!("{}.json", stem));
            fs::write(&json_path, to_json(doc, JsonFormat::Pretty)?)?;
        }

        Ok(markdown_path)
    }
}

/// Open and assemble a single document.
///
/// Unlike a corpus run, extraction errors are returned to the caller.
pub fn convert_document<O>(opener: &O, path: &Path, meta: DocumentMeta) -> Result<ConvertedDocument>
where
    O: SourceOpener + ?Sized,
{
    let source = opener.open(path)?;
    let blocks = assemble_document(source.as_ref(), &meta.id)?;
    Ok(ConvertedDocument::new(meta, blocks))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::for_dir("docs")
            .with_combined_name("all.md")
            .with_json(true)
            .with_extract_options(ExtractOptions::new().text_only());

        assert_eq!(options.input_dir, PathBuf::from("docs"));
        assert_eq!(
            options.resolved_output_dir(),
            PathBuf::from("docs").join("markdown_output")
        );
        assert_eq!(
            options.combined_path(),
            PathBuf::from("docs").join("markdown_output").join("all.md")
        );
        assert!(options.write_json);
        assert!(!options.extract.detect_tables);
    }

    #[test]
    fn test_explicit_output_dir() {
        let options = ConvertOptions::new().with_output_dir("/tmp/out");
        assert_eq!(options.resolved_output_dir(), PathBuf::from("/tmp/out"));
        assert_eq!(options.combined_file_name, "combined_output.md");
    }

    #[test]
    fn test_same_stem_written_once_each() {
        use crate::model::RawPage;
        use crate::parser::{MemorySource, PdfSource};

        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "a.PDF"] {
            fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        let opener = |path: &Path| -> Result<Box<dyn PdfSource>> {
            let text = format!("From {}.", file_name(path));
            Ok(Box::new(MemorySource::from_pages([RawPage::new(1, text)])))
        };

        let summary = CorpusConverter::with_opener(opener, ConvertOptions::for_dir(dir.path()))
            .convert()
            .unwrap();
        assert_eq!(summary.converted_count(), 2);

        // "a.PDF" sorts before "a.pdf"
        let first = fs::read_to_string(summary.output_dir.join("a.md")).unwrap();
        let second = fs::read_to_string(summary.output_dir.join("a-id2.md")).unwrap();
        assert!(first.contains("From a.PDF."));
        assert!(second.contains("From a.pdf."));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/a/b/report.pdf")), "report.pdf");
    }
}
