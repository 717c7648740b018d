//! Credential matching.

use serde::{Deserialize, Serialize};

use crate::model::AuthQuery;
use crate::table::{credential_col, trimmed_cell, Table};

/// Result of checking a query against the credential table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthOutcome {
    Authenticated,
    EnrollmentNotFound,
    AccessDenied,
}

/// Authenticate `query` against the credential rows of `credentials`.
///
/// The first row whose trimmed enrollment cell equals the query's enrollment
/// id decides the outcome; later rows for the same id are never consulted.
/// A row without an access code cell can never authenticate, since the
/// query's code is non-empty.
pub fn authenticate(credentials: &Table, query: &AuthQuery) -> AuthOutcome {
    let Some(row) = credentials
        .rows()
        .iter()
        .find(|row| trimmed_cell(row, credential_col::ENROLLMENT) == query.enrollment_id())
    else {
        return AuthOutcome::EnrollmentNotFound;
    };

    if trimmed_cell(row, credential_col::ACCESS_CODE) == query.access_code() {
        AuthOutcome::Authenticated
    } else {
        AuthOutcome::AccessDenied
    }
}
