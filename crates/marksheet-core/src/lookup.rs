//! The lookup pipeline: validate the query, authenticate, aggregate.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::auth::{authenticate, AuthOutcome};
use crate::error::QueryError;
use crate::model::{AuthQuery, StudentSummary};
use crate::table::Table;

/// Every way a lookup can end.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A field was blank; nothing was checked.
    InvalidQuery(QueryError),
    /// No credential row carries the enrollment id.
    EnrollmentNotFound,
    /// The enrollment id exists but the access code does not match.
    AccessDenied,
    /// Authenticated, but the student has no assignment rows.
    NoRecords,
    Success(StudentSummary),
}

/// Status code for a [`LookupOutcome`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupStatus {
    InvalidQuery,
    EnrollmentNotFound,
    AccessDenied,
    NoRecords,
    Success,
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LookupStatus::InvalidQuery => "INVALID_QUERY",
            LookupStatus::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            LookupStatus::AccessDenied => "ACCESS_DENIED",
            LookupStatus::NoRecords => "NO_RECORDS",
            LookupStatus::Success => "SUCCESS",
        };
        f.write_str(s)
    }
}

impl LookupOutcome {
    pub fn status(&self) -> LookupStatus {
        match self {
            LookupOutcome::InvalidQuery(_) => LookupStatus::InvalidQuery,
            LookupOutcome::EnrollmentNotFound => LookupStatus::EnrollmentNotFound,
            LookupOutcome::AccessDenied => LookupStatus::AccessDenied,
            LookupOutcome::NoRecords => LookupStatus::NoRecords,
            LookupOutcome::Success(_) => LookupStatus::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    pub fn summary(&self) -> Option<&StudentSummary> {
        match self {
            LookupOutcome::Success(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable explanation for non-success outcomes.
    pub fn message(&self) -> Option<String> {
        match self {
            LookupOutcome::InvalidQuery(e) => Some(e.to_string()),
            LookupOutcome::EnrollmentNotFound => Some("enrollment id not found".into()),
            LookupOutcome::AccessDenied => Some("access code does not match".into()),
            LookupOutcome::NoRecords => Some("no assignment records for this enrollment".into()),
            LookupOutcome::Success(_) => None,
        }
    }
}

/// Run a complete lookup against already materialized tables.
pub fn lookup(
    assignments: &Table,
    credentials: &Table,
    enrollment_id: &str,
    access_code: &str,
) -> LookupOutcome {
    let query = match AuthQuery::new(enrollment_id, access_code) {
        Ok(q) => q,
        Err(e) => {
            debug!(error = %e, "rejected lookup query");
            return LookupOutcome::InvalidQuery(e);
        }
    };

    let outcome = match authenticate(credentials, &query) {
        AuthOutcome::EnrollmentNotFound => LookupOutcome::EnrollmentNotFound,
        AuthOutcome::AccessDenied => LookupOutcome::AccessDenied,
        AuthOutcome::Authenticated => match aggregate(assignments, query.enrollment_id()) {
            Some(summary) => LookupOutcome::Success(summary),
            None => LookupOutcome::NoRecords,
        },
    };

    info!(
        enrollment = query.enrollment_id(),
        status = %outcome.status(),
        "lookup finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn credentials() -> Table {
        Table::from_raw(vec![
            row(&["Enroll", "Code"]),
            row(&["E1", "code1"]),
            row(&["E2", "code2"]),
        ])
    }

    fn assignments() -> Table {
        Table::from_raw(vec![
            row(&["Enroll", "Name", "-", "Phone", "Assignment", "Marks"]),
            row(&["E1", "Alice", "-", "555-1234", "1", "70"]),
            row(&["E1", "Alice", "-", "555-1234", "1", "85"]),
            row(&["E1", "Alice", "-", "555-1234", "2", ""]),
        ])
    }

    #[test]
    fn successful_lookup() {
        let outcome = lookup(&assignments(), &credentials(), "E1", "code1");
        assert_eq!(outcome.status(), LookupStatus::Success);
        let s = outcome.summary().unwrap();
        assert_eq!(s.name, "Alice");
        assert_eq!(s.phone, "555-1234");
        assert_eq!(s.total_marks, 85.0);
        assert_eq!(s.average_display(), "85.00");
        assert_eq!(s.attempted_count, 2);
        assert!(outcome.message().is_none());
    }

    #[test]
    fn wrong_code() {
        let outcome = lookup(&assignments(), &credentials(), "E1", "wrong");
        assert_eq!(outcome, LookupOutcome::AccessDenied);
    }

    #[test]
    fn unknown_enrollment() {
        let outcome = lookup(&assignments(), &credentials(), "E9", "code1");
        assert_eq!(outcome, LookupOutcome::EnrollmentNotFound);
    }

    #[test]
    fn authenticated_without_rows() {
        let outcome = lookup(&assignments(), &credentials(), "E2", "code2");
        assert_eq!(outcome, LookupOutcome::NoRecords);

        let outcome = lookup(&Table::default(), &credentials(), "E1", "code1");
        assert_eq!(outcome, LookupOutcome::NoRecords);
    }

    #[test]
    fn blank_fields_short_circuit() {
        let empty = Table::default();
        assert_eq!(
            lookup(&empty, &empty, " ", "code1"),
            LookupOutcome::InvalidQuery(QueryError::EmptyEnrollmentId)
        );
        assert_eq!(
            lookup(&assignments(), &credentials(), "E1", ""),
            LookupOutcome::InvalidQuery(QueryError::EmptyAccessCode)
        );
    }

    #[test]
    fn denied_lookup_never_aggregates() {
        // E1 has rows, but a wrong code must not reveal them.
        let outcome = lookup(&assignments(), &credentials(), "E1", "code2");
        assert!(outcome.summary().is_none());
        assert!(!outcome.is_success());
    }

    #[test]
    fn status_strings() {
        assert_eq!(LookupStatus::NoRecords.to_string(), "NO_RECORDS");
        assert_eq!(
            serde_json::to_string(&LookupStatus::EnrollmentNotFound).unwrap(),
            "\"ENROLLMENT_NOT_FOUND\""
        );
    }
}
