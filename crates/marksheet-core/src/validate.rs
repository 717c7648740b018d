//! Sheet sanity checks.
//!
//! Lookups tolerate messy data, but a grader should still hear about rows
//! that can never match or marks that silently read as ungraded.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::marks::parse_marks;
use crate::table::{assignment_col, cell, credential_col, trimmed_cell, Table};

/// Which table a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Assignments,
    Credentials,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Assignments => write!(f, "assignments"),
            TableKind::Credentials => write!(f, "credentials"),
        }
    }
}

/// A warning from table validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub table: TableKind,
    /// 1-based sheet row (the header is row 1), if the warning is row-specific.
    pub row: Option<usize>,
    pub message: String,
}

fn sheet_row(data_idx: usize) -> Option<usize> {
    Some(data_idx + 2)
}

/// Validate both tables for common issues.
pub fn validate_tables(assignments: &Table, credentials: &Table) -> Vec<ValidationWarning> {
    let mut warnings = validate_credentials(credentials);
    warnings.extend(validate_assignments(assignments, credentials));
    warnings
}

/// Check the credential table: blank cells and duplicate enrollment ids.
pub fn validate_credentials(credentials: &Table) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if credentials.header().is_empty() {
        warnings.push(ValidationWarning {
            table: TableKind::Credentials,
            row: None,
            message: "table is empty (no header row)".into(),
        });
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (idx, row) in credentials.rows().iter().enumerate() {
        let enrollment = trimmed_cell(row, credential_col::ENROLLMENT);
        if enrollment.is_empty() {
            warnings.push(ValidationWarning {
                table: TableKind::Credentials,
                row: sheet_row(idx),
                message: "enrollment id is empty".into(),
            });
            continue;
        }
        if trimmed_cell(row, credential_col::ACCESS_CODE).is_empty() {
            warnings.push(ValidationWarning {
                table: TableKind::Credentials,
                row: sheet_row(idx),
                message: format!(
                    "access code for {enrollment} is empty; this student can never log in"
                ),
            });
        }
        if let Some(&first) = first_seen.get(enrollment) {
            warnings.push(ValidationWarning {
                table: TableKind::Credentials,
                row: sheet_row(idx),
                message: format!(
                    "duplicate enrollment id {enrollment} (first seen on row {}); \
                     only the first row is used",
                    first + 2
                ),
            });
        } else {
            first_seen.insert(enrollment, idx);
        }
    }

    warnings
}

/// Check the assignment table against the credential table.
pub fn validate_assignments(assignments: &Table, credentials: &Table) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if assignments.header().is_empty() {
        warnings.push(ValidationWarning {
            table: TableKind::Assignments,
            row: None,
            message: "table is empty (no header row)".into(),
        });
    }

    let known: HashSet<&str> = credentials
        .rows()
        .iter()
        .map(|r| trimmed_cell(r, credential_col::ENROLLMENT))
        .collect();
    let mut orphans_reported: HashSet<&str> = HashSet::new();

    for (idx, row) in assignments.rows().iter().enumerate() {
        let enrollment = trimmed_cell(row, assignment_col::ENROLLMENT);
        if enrollment.is_empty() {
            warnings.push(ValidationWarning {
                table: TableKind::Assignments,
                row: sheet_row(idx),
                message: "enrollment id is empty".into(),
            });
            continue;
        }

        if trimmed_cell(row, assignment_col::ASSIGNMENT).is_empty() {
            warnings.push(ValidationWarning {
                table: TableKind::Assignments,
                row: sheet_row(idx),
                message: "assignment id is empty".into(),
            });
        }

        match cell(row, assignment_col::MARKS) {
            None => warnings.push(ValidationWarning {
                table: TableKind::Assignments,
                row: sheet_row(idx),
                message: format!(
                    "short row ({} of {} cells); treated as ungraded",
                    row.len(),
                    assignment_col::WIDTH
                ),
            }),
            Some(raw) if !raw.trim().is_empty() && parse_marks(Some(raw)).is_none() => {
                warnings.push(ValidationWarning {
                    table: TableKind::Assignments,
                    row: sheet_row(idx),
                    message: format!(
                        "marks {:?} are not numeric; treated as ungraded",
                        raw.trim()
                    ),
                })
            }
            Some(_) => {}
        }

        if !known.contains(enrollment) && orphans_reported.insert(enrollment) {
            warnings.push(ValidationWarning {
                table: TableKind::Assignments,
                row: sheet_row(idx),
                message: format!("enrollment id {enrollment} has no credential row"),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn creds(rows: &[&[&str]]) -> Table {
        Table::new(row(&["Enroll", "Code"]), rows.iter().map(|r| row(r)).collect())
    }

    fn assignments(rows: &[&[&str]]) -> Table {
        Table::new(
            row(&["Enroll", "Name", "-", "Phone", "Assignment", "Marks"]),
            rows.iter().map(|r| row(r)).collect(),
        )
    }

    #[test]
    fn clean_tables_have_no_warnings() {
        let c = creds(&[&["E1", "code1"], &["E2", "code2"]]);
        let a = assignments(&[
            &["E1", "Alice", "-", "555", "1", "70"],
            &["E2", "Bob", "-", "556", "1", ""],
        ]);
        assert!(validate_tables(&a, &c).is_empty());
    }

    #[test]
    fn duplicate_credentials() {
        let c = creds(&[&["E1", "a"], &["E2", "b"], &[" E1 ", "c"]]);
        let warnings = validate_credentials(&c);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].row, Some(4));
        assert!(warnings[0].message.contains("first seen on row 2"));
    }

    #[test]
    fn blank_credential_cells() {
        let c = creds(&[&["", "a"], &["E2"]]);
        let warnings = validate_credentials(&c);
        assert!(warnings.iter().any(|w| w.message == "enrollment id is empty"));
        assert!(warnings.iter().any(|w| w.message.contains("can never log in")));
    }

    #[test]
    fn missing_header() {
        let warnings = validate_tables(&Table::default(), &Table::default());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.row.is_none()));
    }

    #[test]
    fn non_numeric_marks_and_orphans() {
        let c = creds(&[&["E1", "a"]]);
        let a = assignments(&[
            &["E1", "Alice", "-", "555", "1", "pending"],
            &["E7", "Zed", "-", "555", "1", "10"],
            &["E7", "Zed", "-", "555", "2", "10"],
            &["E1", "Alice", "-", "555"],
        ]);
        let warnings = validate_assignments(&a, &c);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("\"pending\"") && w.row == Some(2)));
        let orphans = warnings
            .iter()
            .filter(|w| w.message.contains("no credential row"))
            .count();
        assert_eq!(orphans, 1, "each orphan id is reported once");
        assert!(warnings
            .iter()
            .any(|w| w.message == "assignment id is empty" && w.row == Some(5)));
    }

    #[test]
    fn row_without_marks_cell_is_short() {
        let c = creds(&[&["E1", "c"]]);
        let a = Table::new(row(&["H"]), vec![row(&["E1", "A", "-", "555", "1"])]);
        let warnings = validate_tables(&a, &c);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].table, TableKind::Assignments);
        assert_eq!(warnings[0].row, Some(2));
        assert!(warnings[0].message.starts_with("short row (5 of 6 cells)"));
    }
}
