//! Table detection on layout-preserving page text.
//!
//! A text-line take on the Stream-mode approach: without ruling lines, a
//! table shows up as consecutive lines whose cells (runs of text separated
//! by wide gaps) start at the same character columns.

use crate::model::RawTable;

/// A run of text within a line, with the character column it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCell {
    /// Cell text, inner whitespace collapsed
    pub text: String,
    /// Character offset of the first character
    pub column: usize,
}

/// A line split into cells.
#[derive(Debug, Clone)]
pub struct TextRow {
    /// Index of the line within the page text
    pub line: usize,
    /// Cells in reading order
    pub cells: Vec<TextCell>,
}

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// First line of the region
    pub first_line: usize,
    /// Last line of the region (inclusive)
    pub last_line: usize,
    /// Column start offsets
    pub columns: Vec<usize>,
    /// Rows in the region
    pub rows: Vec<TextRow>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely spaced-out prose)
    pub max_columns: usize,
    /// Spaces needed between two cells
    pub min_column_gap: usize,
    /// Minimum share of a row's cells that must sit on column edges (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Offset difference still counted as the same column
    pub alignment_tolerance: usize,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            min_column_gap: 2,
            min_alignment_ratio: 0.5,
            alignment_tolerance: 1,
        }
    }
}

/// Detects tables in page text.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables and convert them to raw grids.
    pub fn detect_tables(&self, text: &str) -> Vec<RawTable> {
        self.detect(text)
            .iter()
            .map(|detected| self.to_raw_table(detected))
            .collect()
    }

    /// Detect table regions in the given page text.
    pub fn detect(&self, text: &str) -> Vec<DetectedTable> {
        let rows: Vec<TextRow> = text
            .split('\n')
            .enumerate()
            .map(|(line, content)| TextRow {
                line,
                cells: self.split_cells(content),
            })
            .collect();

        let multi_cell_rows: Vec<&TextRow> = rows
            .iter()
            .filter(|r| r.cells.len() >= self.config.min_columns)
            .collect();
        if multi_cell_rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&multi_cell_rows);
        log::debug!("TableDetector: column edges {:?}", columns);
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start, end) in self.find_table_regions(&rows, &columns) {
            let region: Vec<TextRow> = rows[start..=end].to_vec();
            let region_refs: Vec<&TextRow> = region.iter().collect();
            let region_columns = self.detect_columns(&region_refs);

            if region_columns.len() < self.config.min_columns
                || region_columns.len() > self.config.max_columns
            {
                log::debug!(
                    "TableDetector: skipping lines {}..={} with {} columns",
                    start,
                    end,
                    region_columns.len()
                );
                continue;
            }
            if is_list_pattern(&region) {
                log::debug!("TableDetector: skipping lines {}..={} (list)", start, end);
                continue;
            }

            tables.push(DetectedTable {
                first_line: region[0].line,
                last_line: region[region.len() - 1].line,
                columns: region_columns,
                rows: region,
            });
        }

        tables
    }

    /// Convert a detected table into a raw grid; empty cells become `None`.
    pub fn to_raw_table(&self, detected: &DetectedTable) -> RawTable {
        let mut table = RawTable::new();

        for row in &detected.rows {
            let mut contents: Vec<Vec<&str>> = vec![Vec::new(); detected.columns.len()];
            for cell in &row.cells {
                let idx = self.find_column(cell.column, &detected.columns);
                contents[idx].push(cell.text.as_str());
            }
            table.add_row(
                contents
                    .into_iter()
                    .map(|parts| {
                        if parts.is_empty() {
                            None
                        } else {
                            Some(parts.join(" "))
                        }
                    })
                    .collect(),
            );
        }

        table
    }

    /// Split a line into cells separated by at least `min_column_gap` spaces.
    fn split_cells(&self, line: &str) -> Vec<TextCell> {
        let mut cells = Vec::new();
        let mut current = String::new();
        let mut start = 0;
        let mut gap = 0;

        for (col, ch) in line.chars().enumerate() {
            if ch == '\t' {
                gap += self.config.min_column_gap;
                continue;
            }
            if ch.is_whitespace() {
                gap += 1;
                continue;
            }

            if !current.is_empty() && gap >= self.config.min_column_gap {
                cells.push(TextCell {
                    text: std::mem::take(&mut current),
                    column: start,
                });
            }
            if current.is_empty() {
                start = col;
            } else if gap > 0 {
                current.push(' ');
            }
            gap = 0;
            current.push(ch);
        }

        if !current.is_empty() {
            cells.push(TextCell {
                text: current,
                column: start,
            });
        }

        cells
    }

    /// Find column edges shared by enough rows.
    ///
    /// Cell start offsets are clustered (neighbours within the tolerance join
    /// one cluster); a cluster becomes a column edge when enough rows have a
    /// cell starting in it.
    fn detect_columns(&self, rows: &[&TextRow]) -> Vec<usize> {
        let mut offsets: Vec<usize> = rows
            .iter()
            .flat_map(|r| r.cells.iter().map(|c| c.column))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        let mut clusters: Vec<(usize, usize)> = Vec::new();
        for offset in offsets {
            match clusters.last_mut() {
                Some((_, hi)) if offset - *hi <= self.config.alignment_tolerance => *hi = offset,
                _ => clusters.push((offset, offset)),
            }
        }

        let min_occurrences =
            ((rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        clusters
            .into_iter()
            .filter(|(lo, hi)| {
                let hits = rows
                    .iter()
                    .filter(|r| r.cells.iter().any(|c| c.column >= *lo && c.column <= *hi))
                    .count();
                hits >= min_occurrences
            })
            .map(|(lo, _)| lo)
            .collect()
    }

    /// Find runs of consecutive lines that line up with the columns.
    fn find_table_regions(&self, rows: &[TextRow], columns: &[usize]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.cells.len() >= self.config.min_columns
                && self.alignment_score(row, columns) >= self.config.min_alignment_ratio;

            match (aligned, current_start) {
                (true, None) => current_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                    current_start = None;
                }
                _ => {}
            }
        }

        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Share of the row's cells that start on a column edge.
    fn alignment_score(&self, row: &TextRow, columns: &[usize]) -> f32 {
        if row.cells.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let aligned = row
            .cells
            .iter()
            .filter(|cell| {
                columns
                    .iter()
                    .any(|col| cell.column.abs_diff(*col) <= self.config.alignment_tolerance)
            })
            .count();
        aligned as f32 / row.cells.len() as f32
    }

    /// Index of the last column starting at or before the cell.
    fn find_column(&self, offset: usize, columns: &[usize]) -> usize {
        columns
            .iter()
            .rposition(|col| *col <= offset + self.config.alignment_tolerance)
            .unwrap_or(0)
    }
}

/// Check whether every row opens with a bullet or number marker.
fn is_list_pattern(rows: &[TextRow]) -> bool {
    !rows.is_empty()
        && rows
            .iter()
            .all(|r| r.cells.first().map_or(false, |c| is_list_marker(&c.text)))
}

fn is_list_marker(text: &str) -> bool {
    const BULLETS: [&str; 6] = ["•", "-", "*", "◦", "▪", "–"];
    if BULLETS.contains(&text) {
        return true;
    }
    let trimmed = text.trim_end_matches(['.', ')']);
    trimmed.len() < text.len()
        && (1..=3).contains(&trimmed.len())
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
}
