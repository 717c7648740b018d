//! Core data model types for marksheet.
//!
//! These are the values the lookup core produces and consumes: the caller's
//! query, per-assignment best scores, and the summary built from them.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Name reported when the first matching row has no name cell.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Phone reported when the first matching row has no phone cell.
pub const UNKNOWN_PHONE: &str = "N/A";

/// An enrollment id / access code pair, trimmed and known to be non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthQuery {
    enrollment_id: String,
    access_code: String,
}

impl AuthQuery {
    /// Trim both fields and reject blanks.
    ///
    /// The enrollment id is checked first, so a query with both fields blank
    /// reports `EmptyEnrollmentId`.
    pub fn new(enrollment_id: &str, access_code: &str) -> Result<Self, QueryError> {
        let enrollment_id = enrollment_id.trim();
        let access_code = access_code.trim();
        if enrollment_id.is_empty() {
            return Err(QueryError::EmptyEnrollmentId);
        }
        if access_code.is_empty() {
            return Err(QueryError::EmptyAccessCode);
        }
        Ok(Self {
            enrollment_id: enrollment_id.to_string(),
            access_code: access_code.to_string(),
        })
    }

    pub fn enrollment_id(&self) -> &str {
        &self.enrollment_id
    }

    pub fn access_code(&self) -> &str {
        &self.access_code
    }
}

impl std::fmt::Debug for AuthQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthQuery")
            .field("enrollment_id", &self.enrollment_id)
            .field("access_code", &"***")
            .finish()
    }
}

/// The best recorded mark for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentScore {
    /// Assignment identifier as written in the sheet.
    #[serde(rename = "assignment")]
    pub assignment_id: String,
    /// Best mark, or `None` if no attempt has been graded yet.
    pub marks: Option<f64>,
}

/// Everything we report about one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub name: String,
    pub phone: String,
    /// Best attempt per assignment, ordered by assignment id.
    pub assignments: Vec<AssignmentScore>,
    /// Sum of graded best marks.
    pub total_marks: f64,
    /// Mean of graded best marks, rounded to two decimals.
    #[serde(with = "two_decimals")]
    pub average_marks: f64,
    /// Distinct assignments attempted, graded or not.
    #[serde(rename = "attempted")]
    pub attempted_count: usize,
}

impl StudentSummary {
    /// Number of assignments with a graded best mark.
    pub fn graded_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.marks.is_some()).count()
    }

    /// The average as a fixed two-decimal string, e.g. `"85.00"`.
    pub fn average_display(&self) -> String {
        format!("{:.2}", self.average_marks)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Serializes an `f64` as a two-decimal string and reads it back.
mod two_decimals {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:.2}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(serde::de::Error::custom)
    }
}
