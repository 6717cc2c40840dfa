//! # pdfmark
//!
//! Convert collections of PDF documents into structured, page-annotated
//! Markdown.
//!
//! Every document becomes a Markdown file whose blocks carry the PDF page
//! they came from; numbered sections (`1.2.3 Title`) turn into headings
//! with stable anchors, outline entries become headings, tables become pipe
//! tables. A combined file gathers all documents behind a YAML front matter
//! index.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfmark::convert_directory;
//!
//! fn main() -> pdfmark::Result<()> {
//!     let summary = convert_directory("reports")?;
//!     println!("{} documents -> {}", summary.documents.len(), summary.combined_file.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Numbered sections**: depth-aware headings with `{#id-1.2}` anchors
//! - **Outline headings**: the PDF outline is merged into each document
//! - **Tables**: pipe tables with synthesized headers
//! - **Page provenance**: every block ends with `[Page: n]`
//! - **Corpus view**: one combined file with YAML front matter

pub mod assemble;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use assemble::{assemble_document, assemble_pages, PageWalker};
pub use convert::{
    ConvertEvent, ConvertOptions, CorpusConverter, CorpusSummary, DEFAULT_COMBINED_FILE,
    DEFAULT_OUTPUT_DIR,
};
pub use detect::{has_pdf_extension, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use model::{
    Block, ConvertedDocument, CorpusManifest, DocumentMeta, NumberingToken, RawPage, RawTable,
    TocEntry,
};
pub use parser::{
    ExtractOptions, LopdfOpener, LopdfSource, MemorySource, PdfSource, SourceOpener,
    TableDetectorConfig,
};
pub use render::{JsonFormat, MarkdownRenderer};

use std::path::{Path, PathBuf};

/// Convert every PDF in `dir` with default options.
///
/// Output goes to `<dir>/markdown_output`.
///
/// # Example
///
/// ```no_run
/// let summary = pdfmark::convert_directory(".").unwrap();
/// assert!(summary.combined_file.ends_with("combined_output.md"));
/// ```
pub fn convert_directory<P: AsRef<Path>>(dir: P) -> Result<CorpusSummary> {
    Pdfmark::new().convert_dir(dir)
}

/// Convert a single PDF file to Markdown.
///
/// # Example
///
/// ```no_run
/// let markdown = pdfmark::to_markdown("document.pdf").unwrap();
/// println!("{}", markdown);
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = Pdfmark::new().convert_file(path)?;
    Ok(render::to_markdown(&doc.meta.title, &doc.blocks))
}

/// Convert a single PDF file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = Pdfmark::new().convert_file(path)?;
    render::to_json(&doc, format)
}

/// Read the outline of a PDF file as TOC entries.
pub fn read_toc<P: AsRef<Path>>(path: P) -> Result<Vec<TocEntry>> {
    LopdfSource::open(path)?.toc()
}

/// Builder-style API for conversions.
///
/// # Example
///
/// ```no_run
/// use pdfmark::Pdfmark;
///
/// let summary = Pdfmark::new()
///     .text_only()
///     .with_output_dir("out")
///     .with_json()
///     .convert_dir("reports")?;
/// # Ok::<(), pdfmark::Error>(())
/// ```
pub struct Pdfmark {
    extract_options: ExtractOptions,
    output_dir: Option<PathBuf>,
    combined_file_name: String,
    write_json: bool,
}

impl Pdfmark {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            extract_options: ExtractOptions::default(),
            output_dir: None,
            combined_file_name: DEFAULT_COMBINED_FILE.to_string(),
            write_json: false,
        }
    }

    /// Skip table detection.
    pub fn text_only(mut self) -> Self {
        self.extract_options = self.extract_options.text_only();
        self
    }

    /// Set table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.extract_options = self.extract_options.with_table_config(config);
        self
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

    /// Also write a JSON file per document.
    pub fn with_json(mut self) -> Self {
        self.write_json = true;
        self
    }

    /// Conversion options for `dir` built from this configuration.
    pub fn options_for<P: AsRef<Path>>(&self, dir: P) -> ConvertOptions {
        let mut options = ConvertOptions::for_dir(dir.as_ref())
            .with_combined_name(self.combined_file_name.clone())
            .with_json(self.write_json)
            .with_extract_options(self.extract_options.clone());
        if let Some(ref out) = self.output_dir {
            options = options.with_output_dir(out.clone());
        }
        options
    }

    /// Convert every PDF in `dir`.
    pub fn convert_dir<P: AsRef<Path>>(self, dir: P) -> Result<CorpusSummary> {
        CorpusConverter::new(self.options_for(dir)).convert()
    }

    /// Convert one PDF file; the document gets id `id1`.
    pub fn convert_file<P: AsRef<Path>>(self, path: P) -> Result<ConvertedDocument> {
        let path = path.as_ref();
        let opener = LopdfOpener::with_options(self.extract_options);
        let source = opener.open(path)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = DocumentMeta::new(1, name, source.page_count()?);
        let blocks = assemble_document(source.as_ref(), &meta.id)?;
        Ok(ConvertedDocument::new(meta, blocks))
    }
}

impl Default for Pdfmark {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};

    /// Write a one-page PDF that shows `text` and has a single outline entry.
    fn write_pdf(path: &Path, text: &str) {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let outlines_id = doc.new_object_id();
        let item_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Greeting"),
            "Parent" => outlines_id,
            "Dest" => vec![page_id.into(), "Fit".into()],
        });
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => item_id,
                "Last" => item_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "Outlines" => outlines_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_builder_defaults() {
        let builder = Pdfmark::default();
        let options = builder.options_for("docs");

        assert_eq!(options.combined_file_name, "combined_output.md");
        assert!(!options.write_json);
        assert!(options.extract.detect_tables);
        assert_eq!(
            options.resolved_output_dir(),
            PathBuf::from("docs").join("markdown_output")
        );
    }

    #[test]
    fn test_builder_chained() {
        let options = Pdfmark::new()
            .text_only()
            .with_output_dir("out")
            .with_combined_name("all.md")
            .with_json()
            .options_for("docs");

        assert!(!options.extract.detect_tables);
        assert!(options.write_json);
        assert_eq!(options.combined_path(), PathBuf::from("out").join("all.md"));
    }

    #[test]
    fn test_convert_file_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"<!DOCTYPE html>").unwrap();

        assert!(matches!(
            Pdfmark::new().convert_file(&path),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_convert_directory_without_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        assert!(matches!(
            convert_directory(dir.path()),
            Err(Error::NoInput(_))
        ));
        assert!(!dir.path().join("markdown_output").exists());
    }

    #[test]
    fn test_read_toc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        write_pdf(&path, "Hello.");

        assert_eq!(read_toc(&path).unwrap(), vec![TocEntry::new(1, "Greeting", 1)]);
    }

    #[test]
    fn test_single_file_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.pdf");
        write_pdf(&path, "Hello.");

        let json = to_json(&path, JsonFormat::Compact).unwrap();
        let doc: ConvertedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.meta, DocumentMeta::new(1, "hello.pdf", 1));
        assert_eq!(
            doc.blocks,
            vec![
                Block::Warning,
                Block::TocHeading {
                    level: 1,
                    title: "Greeting".to_string(),
                    page: 1,
                },
                Block::PlainParagraph {
                    body: "Hello.".to_string(),
                    page: 1,
                },
            ]
        );

        let markdown = to_markdown(&path).unwrap();
        assert!(markdown.contains("# Greeting"));
        assert!(markdown.contains("Hello."));
    }

    #[test]
    fn test_unreadable_pdf_gets_empty_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"garbage, not a PDF").unwrap();

        let summary = convert_directory(dir.path()).unwrap();
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.documents[0].meta.pages, 0);
        assert!(!summary.output_dir.join("broken.md").exists());

        let combined = std::fs::read_to_string(&summary.combined_file).unwrap();
        assert!(combined.contains("- 1. id1: broken.pdf [0 Pages]"));
        assert!(combined.contains("## 1. id1: broken.pdf\n--- Start ---\n--- End ---"));
    }
}
