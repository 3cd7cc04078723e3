//! Timetable service facade.
//!
//! Wires rosters, the assignment engine and the schedule store into the
//! operations callers actually invoke: generate, read, edit and reconcile.
//!
//! # Concurrency
//! Generation runs are serialized behind one mutex. Each run draws a fresh
//! seed from the service's seed generator and builds its own engine, so
//! no per-run state is ever shared. The last persisted version wins.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_timetable::config::SchedulerConfig;
//! use u_timetable::models::{Course, Faculty, Room};
//! use u_timetable::service::TimetableService;
//! use u_timetable::store::InMemoryStore;
//!
//! let store = Arc::new(
//!     InMemoryStore::new()
//!         .with_courses(vec![Course::new("C1", "Operating Systems")])
//!         .with_faculty(vec![Faculty::new("F1")])
//!         .with_rooms(vec![Room::new("R1")]),
//! );
//! let service = TimetableService::new(SchedulerConfig::default(), store.clone(), store)
//!     .unwrap()
//!     .with_seed(1);
//!
//! let version = service.generate_institution(None).unwrap();
//! assert_eq!(version.session_count(), 1);
//! assert!(version.label.starts_with("global_v"));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::matching::{ExpertiseMatcher, FacultyMatcher};
use crate::models::{Availability, Course, Faculty, Room, ScheduleVersion, Session};
use crate::reconcile::{ConflictReport, SyncReconciler};
use crate::scheduler::{AssignmentEngine, ScheduleKpi};
use crate::store::{Roster, ScheduleStore};
use crate::validation;

/// Rosters loaded for one run.
struct Rosters {
    courses: Vec<Course>,
    faculty: Vec<Faculty>,
    rooms: Vec<Room>,
}

/// High-level timetabling operations over pluggable collaborators.
#[derive(Debug)]
pub struct TimetableService {
    config: SchedulerConfig,
    roster: Arc<dyn Roster>,
    store: Arc<dyn ScheduleStore>,
    matcher: Arc<dyn FacultyMatcher>,
    reconciler: SyncReconciler,
    seeds: Mutex<ChaCha8Rng>,
}

impl TimetableService {
    /// Creates a service after validating the configuration.
    pub fn new(
        config: SchedulerConfig,
        roster: Arc<dyn Roster>,
        store: Arc<dyn ScheduleStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            roster,
            store,
            matcher: Arc::new(ExpertiseMatcher),
            reconciler: SyncReconciler::new(),
            seeds: Mutex::new(ChaCha8Rng::from_rng(&mut rand::rng())),
        })
    }

    /// Makes every subsequent run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    /// Replaces the faculty matcher.
    pub fn with_matcher<M: FacultyMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Structured generation of the institution-wide schedule.
    ///
    /// `course_ids` restricts the run to those courses; `None` means all.
    pub fn generate_institution(&self, course_ids: Option<&[String]>) -> Result<ScheduleVersion> {
        let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
        let rosters = self.load_rosters(course_ids)?;
        let sessions = self
            .engine(&mut seeds)
            .assign(&rosters.courses, &rosters.faculty, &rosters.rooms)?;

        let label = format!("global_v{}", Utc::now().timestamp_millis());
        let version = self.store.create_version(&label, sessions, None)?;
        self.report(&version);
        Ok(version)
    }

    /// Randomized generation over all courses with the workload cap.
    pub fn generate_randomized(&self) -> Result<ScheduleVersion> {
        let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
        let rosters = self.load_rosters(None)?;
        let sessions = self
            .engine(&mut seeds)
            .assign_naive(&rosters.courses, &rosters.faculty, &rosters.rooms)?;

        let label = format!("randomized_v{}", Utc::now().timestamp_millis());
        let version = self.store.create_version(&label, sessions, None)?;
        self.report(&version);
        Ok(version)
    }

    /// Per-student generation.
    ///
    /// Cells taken in the latest non-empty institution-wide schedule are
    /// avoided, every working day is padded to the configured minimum, and
    /// the result replaces the student's previous version.
    pub fn generate_for_student(
        &self,
        student_id: &str,
        course_ids: &[String],
    ) -> Result<ScheduleVersion> {
        let mut seeds = self.seeds.lock().unwrap_or_else(PoisonError::into_inner);
        let rosters = self.load_rosters(Some(course_ids))?;
        let committed: Vec<Session> = self
            .store
            .latest_version(true)?
            .map(|v| v.sessions)
            .unwrap_or_default();
        info!(
            student = student_id,
            committed = committed.len(),
            "generating student timetable"
        );

        let sessions = self.engine(&mut seeds).assign_for_student(
            &rosters.courses,
            &rosters.faculty,
            &rosters.rooms,
            &committed,
        )?;

        let label = format!("student_{student_id}_{}", Utc::now().timestamp_millis());
        let version = self.store.upsert_version(student_id, &label, sessions)?;
        self.report(&version);
        Ok(version)
    }

    /// Latest institution-wide schedule, preferring a non-empty one.
    pub fn latest(&self) -> Result<Option<ScheduleVersion>> {
        match self.store.latest_version(true)? {
            Some(version) => Ok(Some(version)),
            None => Ok(self.store.latest_version(false)?),
        }
    }

    /// The student's own schedule, if generated.
    pub fn student_schedule(&self, student_id: &str) -> Result<Option<ScheduleVersion>> {
        Ok(self.store.version_for_owner(student_id)?)
    }

    /// Manual edit path: replaces the sessions of the latest version.
    pub fn update_latest(&self, sessions: Vec<Session>) -> Result<ScheduleVersion> {
        let version = self.store.overwrite_latest_sessions(sessions)?;
        let violations = version.violations(&self.config.calendar);
        if !violations.is_empty() {
            warn!(
                version = version.id,
                violations = violations.len(),
                "edited schedule has conflicts"
            );
        }
        Ok(version)
    }

    /// Persists a faculty availability change and reports the sessions it
    /// invalidates in the newest institution-wide version, empty or not.
    pub fn sync_availability(
        &self,
        faculty_id: &str,
        availability: Availability,
    ) -> Result<ConflictReport> {
        let updated = self
            .roster
            .update_faculty_availability(faculty_id, availability)?;
        let latest = self.store.latest_version(false)?;
        Ok(self
            .reconciler
            .reconcile(&updated.id, &updated.availability, latest.as_ref()))
    }

    fn engine(&self, seeds: &mut ChaCha8Rng) -> AssignmentEngine {
        AssignmentEngine::seeded(self.config.clone(), seeds.random::<u64>())
            .with_shared_matcher(Arc::clone(&self.matcher))
    }

    fn load_rosters(&self, course_ids: Option<&[String]>) -> Result<Rosters> {
        let rosters = Rosters {
            courses: self.roster.list_courses(course_ids)?,
            faculty: self.roster.list_faculty()?,
            rooms: self.roster.list_rooms()?,
        };
        info!(
            courses = rosters.courses.len(),
            faculty = rosters.faculty.len(),
            rooms = rosters.rooms.len(),
            "rosters loaded"
        );

        if let Err(errors) = validation::validate_rosters(
            &rosters.courses,
            &rosters.faculty,
            &rosters.rooms,
            &self.config.calendar,
        ) {
            for e in &errors {
                warn!(kind = ?e.kind, "{}", e.message);
            }
        }
        Ok(rosters)
    }

    fn report(&self, version: &ScheduleVersion) {
        let kpi = ScheduleKpi::calculate(version, &self.config.calendar);
        info!(
            version = version.id,
            label = %version.label,
            sessions = kpi.session_count,
            fallback = kpi.fallback_count,
            padding = kpi.padding_count,
            min_day = kpi.min_day_load,
            max_day = kpi.max_day_load,
            "schedule version persisted"
        );
        if kpi.faculty_double_bookings + kpi.room_double_bookings > 0 {
            warn!(
                version = version.id,
                faculty = kpi.faculty_double_bookings,
                rooms = kpi.room_double_bookings,
                "schedule contains double-bookings"
            );
        }
    }
}
