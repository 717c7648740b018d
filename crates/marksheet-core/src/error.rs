//! Error types.
//!
//! `QueryError` is the only failure the lookup core can produce on its own;
//! it travels inside [`LookupOutcome`](crate::lookup::LookupOutcome) as a
//! plain value. `SourceError` covers the transport layer that feeds the core
//! and is shared by every sheet source.

use thiserror::Error;

/// A lookup query that cannot be authenticated because a field is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The enrollment id is empty after trimming.
    #[error("enrollment id is required")]
    EmptyEnrollmentId,

    /// The access code is empty after trimming.
    #[error("access code is required")]
    EmptyAccessCode,
}

/// Errors that can occur while fetching raw tables from a spreadsheet source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The assignment range came back without any rows.
    #[error("no data found in sheet")]
    NoData,

    /// The requested range does not exist in the source.
    #[error("range not found: {0}")]
    RangeNotFound(String),

    /// The spreadsheet id is unknown to the backend.
    #[error("spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// The backend rejected our credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// The backend returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The payload could not be decoded into a string matrix.
    #[error("malformed sheet data: {0}")]
    Malformed(String),
}
