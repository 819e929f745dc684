//! Student roster (identity store).
//!
//! The roster is the canonical list of known students, keyed by enrollment
//! number. It is loaded once at startup from a JSON file and is read-only
//! from the scan engine's perspective.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single student record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    /// Opaque stable identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Unique natural key, stored trimmed and uppercased.
    #[schema(example = "EN2023001")]
    pub enrollment_number: String,

    /// Student name.
    #[schema(example = "Priya Sharma")]
    pub name: String,

    /// Department the student belongs to.
    #[schema(example = "Computer Science")]
    pub department: String,

    /// Current semester (1-8).
    #[schema(example = 5, minimum = 1, maximum = 8)]
    pub semester: u8,
}

/// Normalize a raw scanned identifier to the roster's key convention.
///
/// Enrollment numbers are stored trimmed and uppercased, so lookups apply
/// the same transformation to whatever the barcode reader produced.
#[must_use]
pub fn normalize_enrollment_number(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Read-only index of students by enrollment number.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: HashMap<String, Student>,
}

impl Roster {
    /// Load the roster from a JSON file containing an array of students.
    ///
    /// Enrollment numbers are normalized on load; a duplicate key keeps the
    /// last record seen, matching the uniqueness invariant of the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RosterNotFound`] if the file does not exist and
    /// [`Error::RosterParseError`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::RosterNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let students: Vec<Student> = serde_json::from_str(&content)
            .map_err(|e| Error::RosterParseError(e.to_string()))?;
        Ok(Self::from_students(students))
    }

    /// Build a roster from an in-memory list of students.
    #[must_use]
    pub fn from_students(students: Vec<Student>) -> Self {
        let students = students
            .into_iter()
            .map(|mut s| {
                s.enrollment_number = normalize_enrollment_number(&s.enrollment_number);
                (s.enrollment_number.clone(), s)
            })
            .collect();
        Self { students }
    }

    /// Look up a student by normalized enrollment number.
    #[must_use]
    pub fn find_by_enrollment_number(&self, normalized: &str) -> Option<&Student> {
        self.students.get(normalized)
    }

    /// Number of students in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_student(enrollment: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            enrollment_number: enrollment.to_string(),
            name: "Priya Sharma".to_string(),
            department: "Computer Science".to_string(),
            semester: 5,
        }
    }

    #[test]
    fn test_normalize_enrollment_number() {
        assert_eq!(normalize_enrollment_number("  en2023001 "), "EN2023001");
        assert_eq!(normalize_enrollment_number("EN2023001"), "EN2023001");
    }

    #[test]
    fn test_lookup_is_case_insensitive_via_normalization() {
        let roster = Roster::from_students(vec![sample_student("en2023001")]);
        let key = normalize_enrollment_number("En2023001");
        assert!(roster.find_by_enrollment_number(&key).is_some());
        assert!(roster.find_by_enrollment_number("ZZZ999").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Roster::load(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(matches!(err, Error::RosterNotFound(_)));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let students = vec![sample_student("en2023001"), sample_student("EN2023002")];
        write!(file, "{}", serde_json::to_string(&students).unwrap()).unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.find_by_enrollment_number("EN2023001").is_some());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Roster::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::RosterParseError(_)));
    }
}
