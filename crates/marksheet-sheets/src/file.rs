//! Local snapshot source.
//!
//! A snapshot is a JSON object mapping A1 ranges to cell matrices, e.g.
//! `{"Sheet1!A1:E500": [["Enroll", ...], ...]}`. Handy for offline use and
//! for pinning a copy of the sheet in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use marksheet_core::table::Row;
use marksheet_core::traits::SheetSource;
use marksheet_core::SourceError;

use crate::cell_text;

/// Serves ranges from a JSON snapshot file read once at construction.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    ranges: HashMap<String, Vec<Row>>,
}

impl FileSource {
    /// Load a snapshot from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
        let ranges = parse_snapshot(&content)
            .with_context(|| format!("failed to parse snapshot: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            ranges,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse snapshot JSON. Cells may be strings, numbers, booleans or null.
pub fn parse_snapshot(content: &str) -> Result<HashMap<String, Vec<Row>>> {
    let raw: HashMap<String, Vec<Vec<serde_json::Value>>> =
        serde_json::from_str(content).map_err(|e| SourceError::Malformed(e.to_string()))?;
    Ok(raw
        .into_iter()
        .map(|(range, rows)| {
            let rows = rows
                .into_iter()
                .map(|r| r.into_iter().map(cell_text).collect())
                .collect();
            (range, rows)
        })
        .collect())
}

#[async_trait]
impl SheetSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_range(&self, range: &str) -> Result<Vec<Row>> {
        self.ranges
            .get(range)
            .cloned()
            .ok_or_else(|| SourceError::RangeNotFound(range.to_string()).into())
    }
}
