//! Raw table grids to pipe-delimited Markdown rows.

use crate::model::RawTable;

/// Render a table as Markdown rows: header, separator, then body rows.
///
/// Returns `None` for tables that are empty or whose first row has no
/// cells. A header row made only of null/blank cells is replaced by
/// `Column 1..N`. Body rows shorter than the header are padded with empty
/// cells; longer rows are kept whole.
pub fn format_table(table: &RawTable) -> Option<Vec<String>> {
    let first = table.header()?;
    if first.is_empty() {
        return None;
    }

    let header: Vec<String> = if first.iter().all(is_blank) {
        (1..=first.len()).map(|i| format!("Column {}", i)).collect()
    } else {
        first.iter().map(|cell| clean_cell(cell.as_deref())).collect()
    };

    let separator: Vec<String> = header
        .iter()
        .map(|h| "-".repeat(h.chars().count().max(1)))
        .collect();

    let mut rows = Vec::with_capacity(table.row_count() + 1);
    rows.push(format_row(&header));
    rows.push(format_row(&separator));

    for raw in table.body() {
        let mut cells: Vec<String> = raw.iter().map(|cell| clean_cell(cell.as_deref())).collect();
        if cells.len() < header.len() {
            cells.resize(header.len(), String::new());
        }
        rows.push(format_row(&cells));
    }

    Some(rows)
}

/// Normalize one cell: null becomes empty, newlines become spaces, pipes are escaped.
pub fn clean_cell(cell: Option<&str>) -> String {
    match cell {
        Some(text) => text.replace('\n', " ").replace('|', "\\|").trim().to_string(),
        None => String::new(),
    }
}

fn is_blank(cell: &Option<String>) -> bool {
    cell.as_deref().map_or(true, |c| c.trim().is_empty())
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
