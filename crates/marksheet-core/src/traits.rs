//! The spreadsheet source seam.
//!
//! `SheetSource` is implemented by the `marksheet-sheets` crate. Everything
//! the lookup core needs from a source is a raw string matrix per range.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SourceError;
use crate::table::{merge_marks_column, Row, Table};

// ---------------------------------------------------------------------------
// Sheet source trait
// ---------------------------------------------------------------------------

/// A backend that can return the cells of a spreadsheet range.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human-readable source name (e.g. "google").
    fn name(&self) -> &str;

    /// Fetch the rows of `range` (A1 notation, e.g. `"Sheet1!A1:E500"`),
    /// header included. A range with no values yields an empty matrix.
    async fn fetch_range(&self, range: &str) -> anyhow::Result<Vec<Row>>;
}

/// Where the three tables live in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Enrollment, name, (unused), phone and assignment columns.
    #[serde(default = "default_assignments_range")]
    pub assignments: String,
    /// The marks column, row-aligned with `assignments`.
    #[serde(default = "default_marks_range")]
    pub marks: String,
    /// Enrollment id and access code columns.
    #[serde(default = "default_credentials_range")]
    pub credentials: String,
}

fn default_assignments_range() -> String {
    "Sheet1!A1:E500".to_string()
}

fn default_marks_range() -> String {
    "Sheet1!H1:H500".to_string()
}

fn default_credentials_range() -> String {
    "Credentials!A1:B500".to_string()
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            assignments: default_assignments_range(),
            marks: default_marks_range(),
            credentials: default_credentials_range(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table loading
// ---------------------------------------------------------------------------

/// Both tables, header rows already split off.
#[derive(Debug, Clone, Default)]
pub struct SheetTables {
    pub assignments: Table,
    pub credentials: Table,
}

/// Fetch every range of `layout` concurrently and assemble the tables.
///
/// Fails with [`SourceError::NoData`] when the assignment range is empty.
pub async fn fetch_tables(
    source: &dyn SheetSource,
    layout: &SheetLayout,
) -> anyhow::Result<SheetTables> {
    let (assignment_rows, marks_rows, credential_rows) = futures::try_join!(
        source.fetch_range(&layout.assignments),
        source.fetch_range(&layout.marks),
        source.fetch_range(&layout.credentials),
    )?;

    if assignment_rows.is_empty() {
        return Err(SourceError::NoData.into());
    }

    debug!(
        source = source.name(),
        assignment_rows = assignment_rows.len(),
        marks_rows = marks_rows.len(),
        credential_rows = credential_rows.len(),
        "fetched sheet ranges"
    );

    Ok(SheetTables {
        assignments: Table::from_raw(merge_marks_column(assignment_rows, &marks_rows)),
        credentials: Table::from_raw(credential_rows),
    })
}
