//! Extraction options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for extracting content from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to derive tables from page text
    pub detect_tables: bool,

    /// Table detector tuning
    pub table_config: TableDetectorConfig,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Extract text only.
    pub fn text_only(mut self) -> Self {
        self.detect_tables = false;
        self
    }

    /// Set the table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            detect_tables: true,
            table_config: TableDetectorConfig::default(),
        }
    }
}
