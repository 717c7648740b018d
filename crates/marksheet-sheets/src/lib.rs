//! marksheet-sheets — spreadsheet sources.
//!
//! Implements the `SheetSource` trait for the Google Sheets values API, local
//! JSON snapshots, and an in-memory mock, plus the configuration layer that
//! picks one of them.

pub mod config;
pub mod file;
pub mod google;
pub mod mock;

pub use config::{
    create_configured_source, create_source, load_config, MarksheetConfig, SourceConfig,
};
pub use marksheet_core::SourceError;

/// Text of one cell as returned by a JSON backend. Formatted values arrive
/// as strings, but unformatted renders and hand-written snapshots may carry
/// numbers, booleans or nulls.
pub(crate) fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
