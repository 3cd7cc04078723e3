//! Randomized slot-first generation.
//!
//! # Algorithm
//!
//! 1. Shuffle every teaching cell of the week, the faculty roster and the
//!    room roster once.
//! 2. Walk the shuffled cells until `min(2 * courses, cells)` sessions exist.
//!    For each cell pick a random course, build its candidate pool over the
//!    shuffled roster, and take the first faculty member who is available,
//!    free, and under the workload cap. Then take the first free room.
//!    A cell with no eligible faculty or room is skipped.
//! 3. Lab-like courses get a random Theory/Lab label; shuffle the output.
//!
//! Every placement is conflict-checked, so the result never double-books.
//! The target is an upper bound: with tight caps or availability the run
//! can return fewer sessions.

use rand::prelude::*;
use tracing::{debug, info};

use super::context::{OccupancyKind, RunContext};
use super::engine::AssignmentEngine;
use crate::availability::AvailabilityResolver;
use crate::error::Result;
use crate::models::{Course, Faculty, Room, Session, SessionType};

impl<R: Rng> AssignmentEngine<R> {
    /// Randomized generation with a per-faculty workload cap.
    ///
    /// The effective cap of a faculty member is the lower of
    /// `config.max_sessions_per_faculty` and their own weekly cap.
    ///
    /// # Errors
    /// [`Error::MissingData`](crate::Error::MissingData) if any roster is empty.
    pub fn assign_naive(
        &mut self,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<Vec<Session>> {
        self.prepare(courses, faculty, rooms)?;

        let resolver = AvailabilityResolver::new(&self.config.calendar);
        let mut cells = self.config.calendar.cells();
        cells.shuffle(&mut self.search_rng);
        let mut shuffled_faculty = faculty.to_vec();
        shuffled_faculty.shuffle(&mut self.search_rng);
        let mut shuffled_rooms: Vec<&Room> = rooms.iter().collect();
        shuffled_rooms.shuffle(&mut self.search_rng);

        let target = (courses.len() * 2).min(cells.len());
        let run_cap = self.config.max_sessions_per_faculty;
        let mut ctx = RunContext::new();
        let mut skipped = 0usize;

        for cell in cells {
            if ctx.session_count() >= target {
                break;
            }
            let Some(course) = courses.choose(&mut self.search_rng) else {
                break;
            };

            let pool = self.matcher.candidate_pool(course, &shuffled_faculty);
            let chosen = pool.into_iter().find(|f| {
                resolver.is_available(f, cell)
                    && ctx.tracker.is_cell_free(OccupancyKind::Faculty, &f.id, cell)
                    && ctx.workload(&f.id) < run_cap.min(f.max_weekly_sessions)
            });
            let Some(chosen) = chosen else {
                skipped += 1;
                continue;
            };
            let room = shuffled_rooms
                .iter()
                .copied()
                .find(|r| ctx.tracker.is_cell_free(OccupancyKind::Room, &r.id, cell));
            let Some(room) = room else {
                skipped += 1;
                continue;
            };

            let session_type = if course.is_lab_like() && self.cosmetic_rng.random_bool(0.5) {
                SessionType::Lab
            } else {
                SessionType::Theory
            };
            let semester = self.semester_for(course);
            debug!(
                course = %course.id,
                faculty = %chosen.id,
                room = %room.id,
                day = %cell.day,
                time = %cell.slot,
                "random placement"
            );
            ctx.commit(Session::new(course, session_type, chosen, room, cell, semester))?;
        }

        info!(
            placed = ctx.session_count(),
            target,
            skipped,
            "randomized generation finished"
        );

        let mut sessions = ctx.into_sessions();
        sessions.shuffle(&mut self.cosmetic_rng);
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SchedulerConfig;
    use crate::models::{Availability, Calendar, Day, Faculty, Room, ScheduleVersion, TimeSlot};
    use crate::models::{Course, SessionType};
    use crate::scheduler::AssignmentEngine;

    #[test]
    fn test_workload_cap_respected() {
        let courses = vec![
            Course::new("C1", "Algebra"),
            Course::new("C2", "Physics"),
            Course::new("C3", "Chemistry"),
        ];
        let faculty = vec![Faculty::new("A")];
        let rooms = vec![Room::new("R1")];

        for seed in 0..20 {
            let sessions = AssignmentEngine::seeded(SchedulerConfig::default(), seed)
                .assign_naive(&courses, &faculty, &rooms)
                .unwrap();
            assert_eq!(sessions.len(), 6);
            assert!(sessions.iter().all(|s| s.faculty_id == "A"));
        }
    }

    #[test]
    fn test_faculty_own_cap_lowers_limit() {
        let courses = vec![Course::new("C1", "Algebra"), Course::new("C2", "Physics")];
        let faculty = vec![Faculty::new("A").with_max_weekly_sessions(2)];
        let sessions = AssignmentEngine::seeded(SchedulerConfig::default(), 3)
            .assign_naive(&courses, &faculty, &[Room::new("R1")])
            .unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_target_bounded_by_cells() {
        let calendar = Calendar::new()
            .with_day(Day::Mon)
            .with_slot(TimeSlot::hour(9))
            .with_slot(TimeSlot::hour(10));
        let config = SchedulerConfig::default()
            .with_calendar(calendar.clone())
            .with_max_sessions_per_faculty(10);
        let courses: Vec<Course> = (0..5).map(|i| Course::new(format!("C{i}"), "Art")).collect();
        let faculty = vec![Faculty::new("A"), Faculty::new("B")];
        let rooms = vec![Room::new("R1"), Room::new("R2")];

        let sessions = AssignmentEngine::seeded(config, 1)
            .assign_naive(&courses, &faculty, &rooms)
            .unwrap();
        // One session per cell: the walk visits each cell once
        assert_eq!(sessions.len(), 2);
        assert!(ScheduleVersion::new("t", sessions).is_conflict_free(&calendar));
    }

    #[test]
    fn test_respects_availability() {
        let courses = vec![Course::new("C1", "Algebra"), Course::new("C2", "Physics")];
        let faculty = vec![Faculty::new("A").with_availability(
            Availability::new()
                .with_slots(Day::Mon, vec![])
                .with_flag(Day::Tue, TimeSlot::hour(9), false),
        )];
        for seed in 0..10 {
            let sessions = AssignmentEngine::seeded(SchedulerConfig::default(), seed)
                .assign_naive(&courses, &faculty, &[Room::new("R1")])
                .unwrap();
            assert!(sessions.iter().all(|s| s.day != Day::Mon));
            assert!(!sessions
                .iter()
                .any(|s| s.day == Day::Tue && s.time == TimeSlot::hour(9)));
        }
    }

    #[test]
    fn test_lab_labels_and_no_lunch() {
        let courses = vec![Course::new("C1", "Programming Fundamentals")];
        let sessions = AssignmentEngine::seeded(SchedulerConfig::default(), 5)
            .assign_naive(&courses, &[Faculty::new("A")], &[Room::new("R1")])
            .unwrap();
        assert_eq!(sessions.len(), 2);
        for s in &sessions {
            assert_ne!(s.time, TimeSlot::hour(12));
            assert_ne!(s.session_type, SessionType::Extra);
            assert_eq!(s.course, format!("Programming Fundamentals ({})", s.session_type));
        }
    }
}
