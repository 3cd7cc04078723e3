//! Faculty candidate selection for a course.
//!
//! The default [`ExpertiseMatcher`] is deliberately loose: plain substring
//! containment in either direction, case-insensitive, no tokenizing. An
//! empty tag is contained in every title and therefore matches everything.
//!
//! # Usage
//!
//! ```
//! use u_timetable::matching::{ExpertiseMatcher, FacultyMatcher};
//! use u_timetable::models::{Course, Faculty};
//!
//! let roster = vec![
//!     Faculty::new("F1").with_expertise("Database"),
//!     Faculty::new("F2").with_expertise("Poetry"),
//! ];
//! let pool = ExpertiseMatcher.candidate_pool(&Course::new("C1", "Database Systems"), &roster);
//! assert_eq!(pool.len(), 1);
//! assert_eq!(pool[0].id, "F1");
//! ```

use std::fmt::Debug;

use crate::models::{Course, Faculty};

/// Selects the faculty members considered for a course.
///
/// # Contract
/// Must be total: for a non-empty roster the pool is non-empty.
pub trait FacultyMatcher: Send + Sync + Debug {
    /// Matcher name for logging.
    fn name(&self) -> &'static str;

    /// Candidate faculty for `course`, in preference order.
    fn candidate_pool<'a>(&self, course: &Course, roster: &'a [Faculty]) -> Vec<&'a Faculty>;
}

/// Bidirectional case-insensitive substring match on expertise tags.
///
/// Falls back to the whole roster when nothing matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertiseMatcher;

impl ExpertiseMatcher {
    /// Whether any of the faculty's tags overlaps the course title.
    pub fn matches(course: &Course, faculty: &Faculty) -> bool {
        let title = course.title.to_lowercase();
        faculty.expertise.iter().any(|tag| {
            let tag = tag.to_lowercase();
            title.contains(&tag) || tag.contains(&title)
        })
    }
}

impl FacultyMatcher for ExpertiseMatcher {
    fn name(&self) -> &'static str {
        "expertise-substring"
    }

    fn candidate_pool<'a>(&self, course: &Course, roster: &'a [Faculty]) -> Vec<&'a Faculty> {
        let matched: Vec<&Faculty> = roster
            .iter()
            .filter(|f| Self::matches(course, f))
            .collect();
        if matched.is_empty() {
            roster.iter().collect()
        } else {
            matched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roster() -> Vec<Faculty> {
        vec![
            Faculty::new("F1").with_expertise("Programming"),
            Faculty::new("F2").with_expertise("database"),
            Faculty::new("F3").with_expertise("Web Development"),
            Faculty::new("F4").with_expertise("Advanced Database Systems Design"),
        ]
    }

    fn ids(pool: &[&Faculty]) -> Vec<String> {
        pool.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_title_contains_tag() {
        let roster = roster();
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "DATABASE Systems"), &roster);
        // F4's tag in turn contains the lowercased title
        assert_eq!(ids(&pool), vec!["F2", "F4"]);
    }

    #[test]
    fn test_tag_contains_title() {
        // "Advanced Database Systems Design" contains "database systems"
        let roster = roster();
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "Database Systems"), &roster);
        assert_eq!(ids(&pool), vec!["F2", "F4"]);
    }

    #[test]
    fn test_title_contains_short_tag_only() {
        let roster = roster();
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "Intro to Programming"), &roster);
        assert_eq!(ids(&pool), vec!["F1"]);
    }

    #[test]
    fn test_roster_order_preserved() {
        let roster = vec![
            Faculty::new("Z").with_expertise("web"),
            Faculty::new("A").with_expertise("development"),
        ];
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "Web Development"), &roster);
        assert_eq!(ids(&pool), vec!["Z", "A"]);
    }

    #[test]
    fn test_no_match_falls_back_to_roster() {
        let roster = roster();
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "Medieval History"), &roster);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_empty_tag_matches_everything() {
        let roster = vec![Faculty::new("F1"), Faculty::new("F2").with_expertise("")];
        let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", "Anything"), &roster);
        assert_eq!(ids(&pool), vec!["F2"]);
    }

    #[test]
    fn test_empty_roster() {
        assert!(ExpertiseMatcher
            .candidate_pool(&Course::new("C", "Anything"), &[])
            .is_empty());
    }

    proptest! {
        #[test]
        fn pool_is_never_empty_for_non_empty_roster(
            title in "[A-Za-z ]{0,24}",
            tags in prop::collection::vec(prop::collection::vec("[A-Za-z ]{0,12}", 0..3), 1..6),
        ) {
            let roster: Vec<Faculty> = tags
                .into_iter()
                .enumerate()
                .map(|(i, tags)| {
                    tags.into_iter()
                        .fold(Faculty::new(format!("F{i}")), |f, t| f.with_expertise(t))
                })
                .collect();
            let pool = ExpertiseMatcher.candidate_pool(&Course::new("C", title), &roster);
            prop_assert!(!pool.is_empty());
            prop_assert!(pool.len() <= roster.len());
        }
    }
}
