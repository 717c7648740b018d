//! marksheet-core — Credential matching and best-attempt aggregation.
//!
//! This crate turns two raw spreadsheet tables (assignment submissions and
//! credentials) plus an enrollment id / access code pair into either an
//! authentication failure or a per-student summary of best marks.

pub mod aggregate;
pub mod auth;
pub mod error;
pub mod lookup;
pub mod marks;
pub mod model;
pub mod report;
pub mod table;
pub mod traits;
pub mod validate;

pub use error::{QueryError, SourceError};
pub use lookup::{lookup, LookupOutcome, LookupStatus};
pub use model::{AssignmentScore, AuthQuery, StudentSummary};
pub use table::{Row, Table};
