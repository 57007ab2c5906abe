//! CSV ingestion.
//!
//! Legacy spreadsheet exports rarely start at the header: title rows,
//! export timestamps and blank padding come first. The reader scans the
//! first few rows for the most header-like one, then reads everything
//! below it as data, column-major.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use carelift_model::{SourceColumn, SourceKind, SourceTable};

/// Rows probed when locating the header.
const HEADER_PROBE: usize = 5;

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

#[derive(Debug, Default, Clone, Copy)]
struct RowShape {
    total: usize,
    non_empty: usize,
    numeric: usize,
    alpha: usize,
    identifier: usize,
}

impl RowShape {
    fn ratio(self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }

    fn looks_like_data(self) -> bool {
        self.ratio(self.numeric) >= 0.2 || self.ratio(self.total - self.non_empty) >= 0.2
    }

    /// Machine-style header: mostly identifier-shaped cells, no numbers.
    fn looks_like_machine_header(self) -> bool {
        self.ratio(self.identifier) >= 0.6 && self.ratio(self.numeric) <= 0.1
    }

    fn looks_like_header(self) -> bool {
        self.ratio(self.non_empty) >= 0.8
            && self.ratio(self.alpha) >= 0.5
            && self.ratio(self.numeric) <= 0.1
    }
}

fn is_identifier_cell(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn row_shape(row: &[String]) -> RowShape {
    let mut shape = RowShape {
        total: row.len(),
        ..RowShape::default()
    };
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        shape.non_empty += 1;
        if trimmed.parse::<f64>().is_ok() {
            shape.numeric += 1;
        }
        if trimmed.chars().any(|ch| ch.is_ascii_alphabetic()) {
            shape.alpha += 1;
        }
        if is_identifier_cell(trimmed) {
            shape.identifier += 1;
        }
    }
    shape
}

/// Index of the most header-like row before data starts.
///
/// Identifier-style rows (`mrn`, `first_name`, ...) are preferred over
/// merely wordy rows so that title banners and name-bearing data rows do
/// not win. Data can never precede a header, so row 0 is exempt from the
/// data check.
fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let probe = rows.len().min(HEADER_PROBE);
    let shapes: Vec<RowShape> = rows.iter().take(probe).map(|row| row_shape(row)).collect();
    let data_start = shapes
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, shape)| shape.looks_like_data())
        .map(|(idx, _)| idx)
        .unwrap_or(probe);

    let mut candidate = 0;
    let mut saw_identifier_row = false;
    for (idx, shape) in shapes.iter().enumerate().take(data_start) {
        if shape.looks_like_machine_header() {
            candidate = idx;
            saw_identifier_row = true;
        } else if !saw_identifier_row && shape.looks_like_header() {
            candidate = idx;
        }
    }
    candidate
}

/// Read a CSV export into a column-major [`SourceTable`].
///
/// Blank rows are dropped, a UTF-8 BOM on the first header is stripped,
/// and short records are padded with empty cells so every column carries
/// one value per data row.
pub fn read_csv_source(path: &Path) -> Result<SourceTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(SourceTable::new(SourceKind::Csv, Vec::new()));
    }

    let header_index = detect_header_row(&raw_rows);
    let headers = raw_rows[header_index].clone();
    tracing::debug!(
        path = %path.display(),
        header_index,
        columns = headers.len(),
        rows = raw_rows.len() - header_index - 1,
        "csv source read"
    );

    Ok(from_rows(headers, &raw_rows[header_index + 1..]))
}

/// Assemble a source table from a header row and row-major data.
pub fn from_rows(headers: Vec<String>, rows: &[Vec<String>]) -> SourceTable {
    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let values = rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect();
            SourceColumn::new(name, values)
        })
        .collect();
    SourceTable::new(SourceKind::Csv, columns)
}
