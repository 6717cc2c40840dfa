//! PDF extraction: the source seam, the lopdf backend and text table detection.

mod layout;
mod lopdf_source;
mod options;
mod source;
mod table_detector;

pub use lopdf_source::{LopdfOpener, LopdfSource};
pub use options::ExtractOptions;
pub use source::{MemorySource, PdfSource, SourceOpener};
pub use table_detector::{DetectedTable, TableDetector, TableDetectorConfig, TextCell, TextRow};
