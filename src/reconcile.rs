//! Availability change reconciliation.
//!
//! Compares a faculty member's new availability with the sessions already
//! assigned to them in a committed schedule and reports the sessions whose
//! slot is now explicitly marked unavailable. Nothing is repaired or rescheduled.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Availability, ScheduleVersion, Session};

/// Which schedule a report was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReconcileStatus {
    /// Checked against a committed version.
    Checked { version_id: u64, label: String },
    /// No committed schedule exists yet.
    NoSchedule,
}

/// Sessions that conflict with an availability update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictReport {
    /// Faculty whose availability changed.
    pub faculty_id: String,
    /// Version the report refers to.
    pub status: ReconcileStatus,
    /// Sessions of this faculty found in the version.
    pub checked_sessions: usize,
    /// Offending sessions, in schedule order.
    pub conflicts: Vec<Session>,
}

impl ConflictReport {
    fn empty(faculty_id: &str, status: ReconcileStatus) -> Self {
        Self {
            faculty_id: faculty_id.to_string(),
            status,
            checked_sessions: 0,
            conflicts: Vec::new(),
        }
    }

    /// Number of conflicting sessions.
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Stateless reconciler. Same inputs always give the same report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReconciler;

impl SyncReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Lists the faculty's sessions in `version` that `availability` rules out.
    pub fn reconcile(
        &self,
        faculty_id: &str,
        availability: &Availability,
        version: Option<&ScheduleVersion>,
    ) -> ConflictReport {
        let Some(version) = version else {
            info!(faculty = faculty_id, "no committed schedule, nothing to reconcile");
            return ConflictReport::empty(faculty_id, ReconcileStatus::NoSchedule);
        };

        let mine = version.sessions_for_faculty(faculty_id);
        let conflicts: Vec<Session> = mine
            .iter()
            .filter(|s| availability.is_explicitly_unavailable(s.day, &s.time))
            .map(|s| (*s).clone())
            .collect();

        if conflicts.is_empty() {
            info!(
                faculty = faculty_id,
                version = version.id,
                checked = mine.len(),
                "availability consistent with schedule"
            );
        } else {
            warn!(
                faculty = faculty_id,
                version = version.id,
                conflicts = conflicts.len(),
                "assigned sessions now fall outside availability"
            );
        }

        ConflictReport {
            faculty_id: faculty_id.to_string(),
            status: ReconcileStatus::Checked {
                version_id: version.id,
                label: version.label.clone(),
            },
            checked_sessions: mine.len(),
            conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Course, Day, Faculty, Room, SessionType, TimeSlot};

    fn session(faculty: &str, day: Day, hour: u16) -> Session {
        Session::new(
            &Course::new("C1", "Compilers"),
            SessionType::Theory,
            &Faculty::new(faculty),
            &Room::new("R1"),
            Cell::new(day, TimeSlot::hour(hour)),
            5,
        )
    }

    fn version() -> ScheduleVersion {
        let mut v = ScheduleVersion::new(
            "global_v1",
            vec![
                session("A", Day::Mon, 9),
                session("A", Day::Mon, 10),
                session("B", Day::Mon, 9),
            ],
        );
        v.id = 7;
        v
    }

    #[test]
    fn test_monday_morning_conflict() {
        let availability = Availability::new().with_flag(Day::Mon, TimeSlot::hour(9), false);
        let report = SyncReconciler::new().reconcile("A", &availability, Some(&version()));

        assert_eq!(report.conflict_count(), 1);
        assert_eq!(report.checked_sessions, 2);
        assert_eq!(report.conflicts[0].faculty_id, "A");
        assert_eq!(report.conflicts[0].cell(), Cell::new(Day::Mon, TimeSlot::hour(9)));
        assert_eq!(
            report.status,
            ReconcileStatus::Checked {
                version_id: 7,
                label: "global_v1".into()
            }
        );
    }

    #[test]
    fn test_true_flags_and_missing_days_never_conflict() {
        let availability = Availability::new()
            .with_flag(Day::Mon, TimeSlot::hour(9), true)
            .with_flag(Day::Tue, TimeSlot::hour(9), false);
        let report = SyncReconciler::new().reconcile("A", &availability, Some(&version()));
        assert!(!report.has_conflicts());
    }

    #[test]
    fn test_slot_list_never_conflicts() {
        let availability = Availability::new().with_slots(Day::Mon, vec![TimeSlot::hour(10)]);
        let report = SyncReconciler::new().reconcile("A", &availability, Some(&version()));
        assert_eq!(report.checked_sessions, 2);
        assert_eq!(report.conflict_count(), 0);
    }

    #[test]
    fn test_deterministic() {
        let availability = Availability::new()
            .with_flag(Day::Mon, TimeSlot::hour(9), false)
            .with_flag(Day::Mon, TimeSlot::hour(10), false);
        let v = version();
        let r = SyncReconciler::new();
        let first = r.reconcile("A", &availability, Some(&v));
        for _ in 0..5 {
            assert_eq!(r.reconcile("A", &availability, Some(&v)), first);
        }
        assert_eq!(first.conflict_count(), 2);
    }

    #[test]
    fn test_no_schedule() {
        let availability = Availability::new().with_flag(Day::Mon, TimeSlot::hour(9), false);
        let report = SyncReconciler::new().reconcile("A", &availability, None);
        assert_eq!(report.status, ReconcileStatus::NoSchedule);
        assert_eq!(report.conflict_count(), 0);
        assert_eq!(report.checked_sessions, 0);
    }
}
