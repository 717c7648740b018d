//! Best-attempt aggregation of assignment rows.
//!
//! Students may submit an assignment several times; each submission is its
//! own row. The summary keeps the best graded mark per assignment and rolls
//! the graded ones up into a total and an average.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::marks::parse_marks;
use crate::model::{round2, AssignmentScore, StudentSummary, UNKNOWN_NAME, UNKNOWN_PHONE};
use crate::table::{assignment_col, cell, trimmed_cell, Row, Table};

/// Best mark seen so far for one assignment id.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Best {
    /// Index of the first row that mentioned this assignment.
    first_seen: usize,
    marks: Option<f64>,
}

/// Combine two attempts: the higher graded mark wins and an ungraded attempt
/// never replaces a graded one.
pub fn best_of(current: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (current, next) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, next) => next,
    }
}

/// Aggregate the rows belonging to `enrollment_id`.
///
/// Returns `None` when no row in `assignments` carries that enrollment id.
pub fn aggregate(assignments: &Table, enrollment_id: &str) -> Option<StudentSummary> {
    let enrollment_id = enrollment_id.trim();
    let matches: Vec<&Row> = assignments
        .rows()
        .iter()
        .filter(|row| trimmed_cell(row, assignment_col::ENROLLMENT) == enrollment_id)
        .collect();

    let first = matches.first()?;
    tracing::debug!(
        enrollment = enrollment_id,
        rows = matches.len(),
        "collected assignment rows"
    );

    let best = best_attempts(&matches);
    let assignments = ordered_scores(best);

    let graded: Vec<f64> = assignments.iter().filter_map(|a| a.marks).collect();
    let total_marks: f64 = graded.iter().sum();
    let average_marks = if graded.is_empty() {
        0.0
    } else {
        round2(total_marks / graded.len() as f64)
    };

    Some(StudentSummary {
        name: identity_cell(first, assignment_col::NAME, UNKNOWN_NAME),
        phone: identity_cell(first, assignment_col::PHONE, UNKNOWN_PHONE),
        attempted_count: assignments.len(),
        assignments,
        total_marks,
        average_marks,
    })
}

/// Fold matching rows into the best attempt per assignment id.
fn best_attempts<'a>(rows: &[&'a Row]) -> HashMap<&'a str, Best> {
    rows.iter()
        .enumerate()
        .fold(HashMap::<&'a str, Best>::new(), |mut acc, (idx, &row)| {
            let id = cell(row, assignment_col::ASSIGNMENT).unwrap_or("");
            let marks = parse_marks(cell(row, assignment_col::MARKS));
            acc.entry(id)
                .and_modify(|best: &mut Best| best.marks = best_of(best.marks, marks))
                .or_insert(Best {
                    first_seen: idx,
                    marks,
                });
            acc
        })
}

/// Numeric ids ascending, then non-numeric ids; first-seen order breaks ties.
fn ordered_scores(best: HashMap<&str, Best>) -> Vec<AssignmentScore> {
    let mut entries: Vec<(&str, Best)> = best.into_iter().collect();
    entries.sort_by(|(a_id, a), (b_id, b)| {
        compare_ids(a_id, b_id).then(a.first_seen.cmp(&b.first_seen))
    });
    entries
        .into_iter()
        .map(|(id, best)| AssignmentScore {
            assignment_id: id.to_string(),
            marks: best.marks,
        })
        .collect()
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (numeric_id(a), numeric_id(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numeric_id(id: &str) -> Option<f64> {
    id.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn identity_cell(row: &Row, idx: usize, fallback: &str) -> String {
    match trimmed_cell(row, idx) {
        "" => fallback.to_string(),
        value => value.to_string(),
    }
}
