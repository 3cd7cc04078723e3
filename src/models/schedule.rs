//! Schedule version (solution) model.
//!
//! A schedule version is one persisted timetable: an ordered list of
//! sessions plus versioning metadata. Versions are replaced wholesale by
//! the next generation run; they are never patched per session.
//!
//! # Audit
//! [`ScheduleVersion::violations`] re-derives double-bookings from the
//! session list. Sessions placed by the structured search never produce
//! violations against each other; fallback and padding sessions may.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Calendar, Day, Session, TimeSlot};

/// A persisted timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleVersion {
    /// Store-assigned identifier (0 until persisted).
    pub id: u64,
    /// Version label, e.g. "randomized_v1718000000000".
    pub label: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owning student/consumer. `None` = institution-wide schedule.
    pub owner: Option<String>,
    /// Sessions in generation order.
    pub sessions: Vec<Session>,
}

/// A detected conflict in a schedule version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (faculty or room).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A faculty member teaches two sessions in the same cell.
    FacultyDoubleBooked,
    /// A room hosts two sessions in the same cell.
    RoomDoubleBooked,
    /// A session sits in the reserved (lunch) slot.
    ReservedSlot,
}

impl Violation {
    fn faculty_double_booked(faculty_id: &str, day: Day, slot: TimeSlot, count: usize) -> Self {
        Self {
            violation_type: ViolationType::FacultyDoubleBooked,
            entity_id: faculty_id.to_string(),
            message: format!("faculty '{faculty_id}' has {count} sessions at {day} {slot}"),
            severity: 90,
        }
    }

    fn room_double_booked(room_id: &str, day: Day, slot: TimeSlot, count: usize) -> Self {
        Self {
            violation_type: ViolationType::RoomDoubleBooked,
            entity_id: room_id.to_string(),
            message: format!("room '{room_id}' has {count} sessions at {day} {slot}"),
            severity: 90,
        }
    }

    fn reserved_slot(session: &Session) -> Self {
        Self {
            violation_type: ViolationType::ReservedSlot,
            entity_id: session.course_id.clone(),
            message: format!(
                "'{}' scheduled in reserved slot {} {}",
                session.course, session.day, session.time
            ),
            severity: 50,
        }
    }
}

impl ScheduleVersion {
    /// Creates an unpersisted institution-wide version stamped now.
    pub fn new(label: impl Into<String>, sessions: Vec<Session>) -> Self {
        Self {
            id: 0,
            label: label.into(),
            created_at: Utc::now(),
            owner: None,
            sessions,
        }
    }

    /// Scopes the version to one owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Whether the version has no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Whether this is the institution-wide schedule (no owner).
    pub fn is_institution_wide(&self) -> bool {
        self.owner.is_none()
    }

    /// Sessions taught by a faculty member.
    pub fn sessions_for_faculty(&self, faculty_id: &str) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.faculty_id == faculty_id)
            .collect()
    }

    /// Detects double-bookings and reserved-slot use.
    ///
    /// Output is sorted by entity then message so repeated calls agree.
    pub fn violations(&self, calendar: &Calendar) -> Vec<Violation> {
        let mut faculty_cells: HashMap<(&str, Day, TimeSlot), usize> = HashMap::new();
        let mut room_cells: HashMap<(&str, Day, TimeSlot), usize> = HashMap::new();
        let mut violations = Vec::new();

        for s in &self.sessions {
            *faculty_cells
                .entry((s.faculty_id.as_str(), s.day, s.time))
                .or_insert(0) += 1;
            *room_cells.entry((s.room_id.as_str(), s.day, s.time)).or_insert(0) += 1;
            if calendar.is_reserved(&s.time) {
                violations.push(Violation::reserved_slot(s));
            }
        }

        violations.extend(
            faculty_cells
                .into_iter()
                .filter(|(_, n)| *n > 1)
                .map(|((id, day, slot), n)| Violation::faculty_double_booked(id, day, slot, n)),
        );
        violations.extend(
            room_cells
                .into_iter()
                .filter(|(_, n)| *n > 1)
                .map(|((id, day, slot), n)| Violation::room_double_booked(id, day, slot, n)),
        );

        violations.sort_by(|a, b| {
            a.entity_id
                .cmp(&b.entity_id)
                .then_with(|| a.message.cmp(&b.message))
        });
        violations
    }

    /// Whether the version has no violations.
    pub fn is_conflict_free(&self, calendar: &Calendar) -> bool {
        self.violations(calendar).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Course, Faculty, Placement, Room, SessionType};

    fn session(course: &str, faculty: &str, room: &str, day: Day, hour: u16) -> Session {
        Session::new(
            &Course::new(course, course),
            SessionType::Theory,
            &Faculty::new(faculty),
            &Room::new(room),
            Cell::new(day, TimeSlot::hour(hour)),
            1,
        )
    }

    fn sample_version() -> ScheduleVersion {
        ScheduleVersion::new(
            "v1",
            vec![
                session("C1", "F1", "R1", Day::Mon, 9),
                session("C2", "F2", "R2", Day::Mon, 9),
                session("C3", "F1", "R1", Day::Tue, 10),
            ],
        )
    }

    #[test]
    fn test_queries() {
        let v = sample_version();
        assert_eq!(v.session_count(), 3);
        assert!(v.is_institution_wide());
        assert_eq!(v.sessions_for_faculty("F1").len(), 2);
        assert!(v.sessions_for_faculty("F9").is_empty());
    }

    #[test]
    fn test_with_owner() {
        let v = ScheduleVersion::new("student_S1", Vec::new()).with_owner("S1");
        assert_eq!(v.owner.as_deref(), Some("S1"));
        assert!(!v.is_institution_wide());
        assert!(v.is_empty());
    }

    #[test]
    fn test_conflict_free() {
        let v = sample_version();
        assert!(v.is_conflict_free(&Calendar::standard_week()));
    }

    #[test]
    fn test_double_bookings_detected() {
        let mut v = sample_version();
        v.sessions.push(
            session("C4", "F1", "R2", Day::Mon, 9).with_placement(Placement::Fallback),
        );
        let violations = v.violations(&Calendar::standard_week());
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].violation_type, ViolationType::FacultyDoubleBooked);
        assert_eq!(violations[0].entity_id, "F1");
        assert_eq!(violations[1].violation_type, ViolationType::RoomDoubleBooked);
        assert_eq!(violations[1].entity_id, "R2");
    }

    #[test]
    fn test_reserved_slot_detected() {
        let v = ScheduleVersion::new("v", vec![session("C1", "F1", "R1", Day::Wed, 12)]);
        let violations = v.violations(&Calendar::standard_week());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::ReservedSlot);
    }

    #[test]
    fn test_version_serde_round_trip() {
        let v = sample_version().with_owner("S7");
        let json = serde_json::to_string(&v).unwrap();
        let back: ScheduleVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
