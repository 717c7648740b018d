//! Lookup report envelope with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lookup::{LookupOutcome, LookupStatus};
use crate::model::StudentSummary;

/// The result of one lookup, ready to hand to a presentation layer.
///
/// The access code is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub generated_at: DateTime<Utc>,
    /// Enrollment id as submitted, trimmed.
    pub enrollment_id: String,
    pub status: LookupStatus,
    /// Explanation for non-success statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<StudentSummary>,
}

impl LookupReport {
    pub fn new(enrollment_id: &str, outcome: &LookupOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            enrollment_id: enrollment_id.trim().to_string(),
            status: outcome.status(),
            message: outcome.message(),
            summary: outcome.summary().cloned(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize report")
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::model::AssignmentScore;

    fn summary() -> StudentSummary {
        StudentSummary {
            name: "Alice".into(),
            phone: "555-1234".into(),
            assignments: vec![AssignmentScore {
                assignment_id: "1".into(),
                marks: Some(85.0),
            }],
            total_marks: 85.0,
            average_marks: 85.0,
            attempted_count: 1,
        }
    }

    #[test]
    fn success_report_carries_summary() {
        let report = LookupReport::new(" E1 ", &LookupOutcome::Success(summary()));
        assert_eq!(report.enrollment_id, "E1");
        assert_eq!(report.status, LookupStatus::Success);
        assert!(report.message.is_none());

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["enrollmentId"], "E1");
        assert_eq!(json["summary"]["averageMarks"], "85.00");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn failure_report_has_message_only() {
        let report = LookupReport::new("E1", &LookupOutcome::AccessDenied);
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["status"], "ACCESS_DENIED");
        assert!(json["message"].as_str().unwrap().contains("access code"));
        assert!(json.get("summary").is_none());

        let outcome = LookupOutcome::InvalidQuery(QueryError::EmptyEnrollmentId);
        let report = LookupReport::new("", &outcome);
        assert_eq!(report.status, LookupStatus::InvalidQuery);
        assert_eq!(report.message.as_deref(), Some("enrollment id is required"));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("e1.json");
        let report = LookupReport::new("E1", &LookupOutcome::Success(summary()));
        report.save_json(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: LookupReport = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.summary, report.summary);
    }
}
