//! Course model.
//!
//! A course is the unit of demand: each one needs one or two weekly
//! sessions depending on whether its title implies a practical component.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::SessionType;

/// Titles matching this pattern need a Theory and a Lab session.
///
/// Unanchored substring match, so "Syllabus Design" also counts.
static LAB_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)lab|practical|programming|database|web development|software engineering")
        .expect("lab-like pattern is valid")
});

const SINGLE: [SessionType; 1] = [SessionType::Theory];
const PAIRED: [SessionType; 2] = [SessionType::Theory, SessionType::Lab];

/// A course to be timetabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Course title (drives expertise matching and the lab-like rule).
    pub title: String,
    /// Short course code (e.g. "CS301").
    #[serde(default)]
    pub code: String,
    /// Semester the course belongs to (1-based). `None` = unknown.
    #[serde(default)]
    pub semester: Option<u8>,
}

impl Course {
    /// Creates a course with the given id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            code: String::new(),
            semester: None,
        }
    }

    /// Sets the course code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Whether the title implies a practical/lab component.
    pub fn is_lab_like(&self) -> bool {
        LAB_LIKE.is_match(&self.title)
    }

    /// Weekly sessions required: 2 for lab-like courses, else 1.
    pub fn sessions_needed(&self) -> usize {
        self.session_types().len()
    }

    /// Session types to place, in placement order (Theory first).
    pub fn session_types(&self) -> &'static [SessionType] {
        if self.is_lab_like() {
            &PAIRED
        } else {
            &SINGLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_builder() {
        let c = Course::new("C1", "Operating Systems")
            .with_code("CS310")
            .with_semester(5);
        assert_eq!(c.id, "C1");
        assert_eq!(c.code, "CS310");
        assert_eq!(c.semester, Some(5));
    }

    #[test]
    fn test_lab_like_titles() {
        for title in [
            "Database Systems",
            "Advanced PROGRAMMING",
            "Physics Lab",
            "Web Development Basics",
            "Intro to Software Engineering",
            "Practical Electronics",
        ] {
            let c = Course::new("x", title);
            assert!(c.is_lab_like(), "{title}");
            assert_eq!(c.sessions_needed(), 2);
            assert_eq!(c.session_types(), &[SessionType::Theory, SessionType::Lab]);
        }
    }

    #[test]
    fn test_theory_only_titles() {
        let c = Course::new("x", "Discrete Mathematics");
        assert!(!c.is_lab_like());
        assert_eq!(c.sessions_needed(), 1);
        assert_eq!(c.session_types(), &[SessionType::Theory]);
    }

    #[test]
    fn test_lab_match_is_substring() {
        // "Syllabus" contains "lab"
        assert!(Course::new("x", "Syllabus Design").is_lab_like());
    }

    #[test]
    fn test_course_deserialize_defaults() {
        let c: Course = serde_json::from_str(r#"{"id":"C1","title":"Algebra"}"#).unwrap();
        assert_eq!(c.code, "");
        assert_eq!(c.semester, None);
    }
}
