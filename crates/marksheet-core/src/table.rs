//! Raw sheet tables.
//!
//! Sources hand us plain string matrices with the header row still attached.
//! [`Table::from_raw`] is the single place that header is split off; every
//! other operation in this crate only ever sees data rows.

use serde::{Deserialize, Serialize};

/// One spreadsheet row: cells in column order. Trailing empty cells are
/// frequently omitted by sheet backends, so rows may be ragged.
pub type Row = Vec<String>;

/// Column positions in an assignment row.
pub mod assignment_col {
    pub const ENROLLMENT: usize = 0;
    pub const NAME: usize = 1;
    pub const PHONE: usize = 3;
    pub const ASSIGNMENT: usize = 4;
    pub const MARKS: usize = 5;
    /// Number of cells a complete assignment row carries.
    pub const WIDTH: usize = 6;
}

/// Column positions in a credential row.
pub mod credential_col {
    pub const ENROLLMENT: usize = 0;
    pub const ACCESS_CODE: usize = 1;
    pub const WIDTH: usize = 2;
}

/// A header row plus the data rows beneath it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    header: Row,
    rows: Vec<Row>,
}

impl Table {
    /// Split a raw matrix into header and data rows.
    ///
    /// An empty matrix yields an empty header and no data.
    pub fn from_raw(mut raw: Vec<Row>) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        let rows = raw.split_off(1);
        let header = raw.pop().unwrap_or_default();
        Self { header, rows }
    }

    /// Build a table from an explicit header and data rows.
    pub fn new(header: Row, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, header excluded.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell `idx` of `row`, if present.
pub fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

/// Cell `idx` of `row`, trimmed; absent cells read as `""`.
pub fn trimmed_cell(row: &[String], idx: usize) -> &str {
    cell(row, idx).map(str::trim).unwrap_or("")
}

/// Append the marks column to the assignment columns, row by row.
///
/// The sheet keeps marks in a column that is not adjacent to the rest of the
/// assignment data, so the two ranges are fetched separately. Row `i` of the
/// result is `assignments[i]` cut to the assignment columns, followed by the
/// first cell of `marks[i]`. When `marks` is shorter, or its row is empty,
/// nothing is appended and the resulting row simply lacks a marks cell.
///
/// Columns inside the assignment range are padded to the marks position so
/// that a blank phone or assignment cell cannot shift the marks cell left.
pub fn merge_marks_column(assignments: Vec<Row>, marks: &[Row]) -> Vec<Row> {
    assignments
        .into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            row.truncate(assignment_col::MARKS);
            if let Some(mark) = marks.get(i).and_then(|r| r.first()) {
                row.resize(assignment_col::MARKS, String::new());
                row.push(mark.clone());
            }
            row
        })
        .collect()
}
