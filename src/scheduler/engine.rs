//! Course-by-course greedy assignment engine.
//!
//! # Algorithm
//!
//! 1. For each course, derive the sessions it needs (Theory, then Lab for
//!    lab-like titles) and its candidate faculty pool.
//! 2. For each session, rank working days by load placed so far in this
//!    run (least loaded first, ties in canonical order).
//! 3. Scan day → faculty (pool order) → slot (availability order, reserved
//!    slot skipped). The first cell where the faculty is free and some room
//!    (roster order) is free wins; both keys are claimed.
//! 4. If the scan is exhausted, apply the placement policy: best-effort
//!    places at a random day/faculty/slot/room without checking occupancy;
//!    strict fails the run.
//! 5. Per-student runs then pad every working day up to the configured
//!    minimum in a separate pass.
//!
//! # Complexity
//! O(c * s * d * f * t * r) worst case, where c=courses, s=sessions per
//! course (≤ 2), d=days, f=pool size, t=slots per day, r=rooms.
//!
//! # Randomness
//! Two generators are injected. `search` drives outcomes (fallback picks,
//! padding picks, randomized search order); `cosmetic` only affects labels,
//! semester fill-in and output order. Seeding both makes a run reproducible.

use std::sync::Arc;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::context::{OccupancyKind, RunContext};
use crate::availability::AvailabilityResolver;
use crate::config::{PlacementPolicy, SchedulerConfig};
use crate::error::{Error, Result, RosterKind};
use crate::matching::{ExpertiseMatcher, FacultyMatcher};
use crate::models::{Calendar, Cell, Course, Day, Faculty, Placement, Room, Session, SessionType};
use crate::validation::{ValidationError, ValidationErrorKind};

/// A chosen faculty/room/cell triple.
#[derive(Debug, Clone, Copy)]
struct Slotting<'a> {
    faculty: &'a Faculty,
    room: &'a Room,
    cell: Cell,
}

impl Slotting<'_> {
    fn session(&self, course: &Course, session_type: SessionType, semester: u8) -> Session {
        Session::new(course, session_type, self.faculty, self.room, self.cell, semester)
    }
}

/// Greedy timetable assignment engine.
///
/// # Example
///
/// ```
/// use u_timetable::config::SchedulerConfig;
/// use u_timetable::models::{Course, Faculty, Room};
/// use u_timetable::scheduler::AssignmentEngine;
///
/// let courses = vec![Course::new("C1", "Database Systems")];
/// let faculty = vec![Faculty::new("F1").with_expertise("Database")];
/// let rooms = vec![Room::new("R1")];
///
/// let mut engine = AssignmentEngine::seeded(SchedulerConfig::default(), 7);
/// let sessions = engine.assign(&courses, &faculty, &rooms).unwrap();
/// assert_eq!(sessions.len(), 2); // Theory + Lab
/// ```
#[derive(Debug)]
pub struct AssignmentEngine<R = ChaCha8Rng> {
    pub(crate) config: SchedulerConfig,
    pub(crate) matcher: Arc<dyn FacultyMatcher>,
    pub(crate) search_rng: R,
    pub(crate) cosmetic_rng: R,
}

impl AssignmentEngine<ChaCha8Rng> {
    /// Creates an engine seeded from the thread-local generator.
    pub fn new(config: SchedulerConfig) -> Self {
        let mut entropy = rand::rng();
        Self::with_rngs(
            config,
            ChaCha8Rng::from_rng(&mut entropy),
            ChaCha8Rng::from_rng(&mut entropy),
        )
    }

    /// Creates a reproducible engine.
    pub fn seeded(config: SchedulerConfig, seed: u64) -> Self {
        Self::with_rngs(
            config,
            ChaCha8Rng::seed_from_u64(seed),
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(0x9E37_79B9_7F4A_7C15)),
        )
    }
}

impl<R: Rng> AssignmentEngine<R> {
    /// Creates an engine with explicit generators.
    pub fn with_rngs(config: SchedulerConfig, search_rng: R, cosmetic_rng: R) -> Self {
        Self {
            config,
            matcher: Arc::new(ExpertiseMatcher),
            search_rng,
            cosmetic_rng,
        }
    }

    /// Replaces the faculty matcher.
    pub fn with_matcher<M: FacultyMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matcher = Arc::new(matcher);
        self
    }

    /// Replaces the faculty matcher with a shared instance.
    pub fn with_shared_matcher(mut self, matcher: Arc<dyn FacultyMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Places every session of every course. No padding.
    ///
    /// # Errors
    /// - [`Error::MissingData`] if any roster is empty.
    /// - [`Error::Unplaceable`] in strict mode when a session has no free cell.
    pub fn assign(
        &mut self,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<Vec<Session>> {
        self.prepare(courses, faculty, rooms)?;
        let mut ctx = RunContext::new();
        self.place_courses(&mut ctx, courses, faculty, rooms)?;
        Ok(ctx.into_sessions())
    }

    /// Per-student variant: avoids cells already taken by `committed`
    /// sessions, then pads each working day to the configured minimum.
    pub fn assign_for_student(
        &mut self,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
        committed: &[Session],
    ) -> Result<Vec<Session>> {
        self.prepare(courses, faculty, rooms)?;
        let mut ctx = RunContext::seeded(committed);
        self.place_courses(&mut ctx, courses, faculty, rooms)?;
        self.pad_days(&mut ctx, courses, faculty, rooms)?;
        Ok(ctx.into_sessions())
    }

    /// Checks configuration and rosters before a run.
    pub(crate) fn prepare(
        &self,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<()> {
        self.config.validate()?;
        let missing = [
            (RosterKind::Courses, courses.is_empty()),
            (RosterKind::Faculty, faculty.is_empty()),
            (RosterKind::Rooms, rooms.is_empty()),
        ]
        .into_iter()
        .find_map(|(kind, empty)| empty.then_some(kind));

        match missing {
            Some(roster) => Err(Error::MissingData {
                roster,
                courses: courses.len(),
                faculty: faculty.len(),
                rooms: rooms.len(),
            }),
            None => Ok(()),
        }
    }

    fn place_courses(
        &mut self,
        ctx: &mut RunContext,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<()> {
        let resolver = AvailabilityResolver::new(&self.config.calendar);
        info!(
            courses = courses.len(),
            faculty = faculty.len(),
            rooms = rooms.len(),
            matcher = self.matcher.name(),
            "placing course sessions"
        );

        for course in courses {
            let pool = self.matcher.candidate_pool(course, faculty);
            let semester = self.semester_for(course);

            for &session_type in course.session_types() {
                let found = search(&self.config.calendar, &resolver, ctx, &pool, rooms);
                let session = match found {
                    Some(slot) => {
                        debug!(
                            course = %course.id,
                            %session_type,
                            faculty = %slot.faculty.id,
                            room = %slot.room.id,
                            day = %slot.cell.day,
                            time = %slot.cell.slot,
                            "session placed"
                        );
                        slot.session(course, session_type, semester)
                    }
                    None if self.config.placement == PlacementPolicy::Strict => {
                        return Err(Error::Unplaceable {
                            course_id: course.id.clone(),
                            session_type,
                        });
                    }
                    None => {
                        let slot = self.random_slotting(faculty, rooms)?;
                        warn!(
                            course = %course.id,
                            %session_type,
                            faculty = %slot.faculty.id,
                            room = %slot.room.id,
                            day = %slot.cell.day,
                            time = %slot.cell.slot,
                            "no free cell, placing without conflict check"
                        );
                        slot.session(course, session_type, semester)
                            .with_placement(Placement::Fallback)
                    }
                };
                ctx.commit(session)?;
            }
        }
        Ok(())
    }

    /// Padding pass: tops up every working day below the minimum.
    ///
    /// Best-effort padding picks everything at random and skips occupancy.
    /// Strict padding only fills free cells and stops early on a full day.
    fn pad_days(
        &mut self,
        ctx: &mut RunContext,
        courses: &[Course],
        faculty: &[Faculty],
        rooms: &[Room],
    ) -> Result<()> {
        let min = self.config.min_sessions_per_day;
        let days = self.config.calendar.working_days.clone();
        let resolver = AvailabilityResolver::new(&self.config.calendar);
        let mut added = 0usize;

        for day in days {
            while ctx.day_load(day) < min {
                let course = pick(&mut self.search_rng, courses, || {
                    missing(RosterKind::Courses, courses, faculty, rooms)
                })?;
                let session = match self.config.placement {
                    PlacementPolicy::BestEffort => {
                        let f = pick(&mut self.search_rng, faculty, || {
                            missing(RosterKind::Faculty, courses, faculty, rooms)
                        })?;
                        let r = pick(&mut self.search_rng, rooms, || {
                            missing(RosterKind::Rooms, courses, faculty, rooms)
                        })?;
                        let slots = self.config.calendar.teaching_slots();
                        let slot = *pick(&mut self.search_rng, &slots, empty_calendar)?;
                        let semester = self.semester_for(course);
                        let cell = Cell::new(day, slot);
                        Session::new(course, SessionType::Extra, f, r, cell, semester)
                            .with_placement(Placement::Padding)
                    }
                    PlacementPolicy::Strict => {
                        let found = self.random_free_slotting(ctx, &resolver, day, faculty, rooms);
                        let Some(slot) = found else {
                            warn!(%day, load = ctx.day_load(day), min, "no free cell left for padding");
                            break;
                        };
                        let semester = self.semester_for(course);
                        slot.session(course, SessionType::Extra, semester)
                            .with_placement(Placement::CheckedPadding)
                    }
                };
                ctx.commit(session)?;
                added += 1;
            }
        }

        if added > 0 {
            info!(added, min_per_day = min, "padding pass added extra sessions");
        }
        Ok(())
    }

    /// Uniformly random day, faculty, teaching slot and room.
    fn random_slotting<'a>(
        &mut self,
        faculty: &'a [Faculty],
        rooms: &'a [Room],
    ) -> Result<Slotting<'a>> {
        let calendar = &self.config.calendar;
        let day = *pick(&mut self.search_rng, &calendar.working_days, empty_calendar)?;
        let f = pick(&mut self.search_rng, faculty, || {
            missing(RosterKind::Faculty, &[], faculty, rooms)
        })?;
        let slots = calendar.teaching_slots();
        let slot = *pick(&mut self.search_rng, &slots, empty_calendar)?;
        let room = pick(&mut self.search_rng, rooms, || {
            missing(RosterKind::Rooms, &[], faculty, rooms)
        })?;
        Ok(Slotting {
            faculty: f,
            room,
            cell: Cell::new(day, slot),
        })
    }

    /// Random conflict-free faculty/slot/room on `day`, if any exists.
    fn random_free_slotting<'a>(
        &mut self,
        ctx: &RunContext,
        resolver: &AvailabilityResolver,
        day: Day,
        faculty: &'a [Faculty],
        rooms: &'a [Room],
    ) -> Option<Slotting<'a>> {
        let mut pool: Vec<&Faculty> = faculty.iter().collect();
        pool.shuffle(&mut self.search_rng);
        let mut shuffled_rooms: Vec<&Room> = rooms.iter().collect();
        shuffled_rooms.shuffle(&mut self.search_rng);

        for f in pool {
            let mut slots = resolver.available_slots(f, day);
            slots.shuffle(&mut self.search_rng);
            for slot in slots {
                let cell = Cell::new(day, slot);
                if !self.config.calendar.is_teaching_slot(&slot)
                    || !ctx.tracker.is_cell_free(OccupancyKind::Faculty, &f.id, cell)
                {
                    continue;
                }
                if let Some(room) = shuffled_rooms
                    .iter()
                    .copied()
                    .find(|r| ctx.tracker.is_cell_free(OccupancyKind::Room, &r.id, cell))
                {
                    return Some(Slotting {
                        faculty: f,
                        room,
                        cell,
                    });
                }
            }
        }
        None
    }

    /// Course semester, or a random one in `1..=max_semester`.
    pub(crate) fn semester_for(&mut self, course: &Course) -> u8 {
        course
            .semester
            .unwrap_or_else(|| self.cosmetic_rng.random_range(1..=self.config.max_semester.max(1)))
    }
}

/// First-fit structured search for one session.
///
/// Returns `None` when every (day, faculty, slot, room) combination is
/// blocked.
fn search<'a>(
    calendar: &Calendar,
    resolver: &AvailabilityResolver,
    ctx: &RunContext,
    pool: &[&'a Faculty],
    rooms: &'a [Room],
) -> Option<Slotting<'a>> {
    for day in ctx.ranked_days(calendar) {
        for &faculty in pool {
            for slot in resolver.available_slots(faculty, day) {
                if calendar.is_reserved(&slot) {
                    continue;
                }
                let cell = Cell::new(day, slot);
                if !ctx.tracker.is_cell_free(OccupancyKind::Faculty, &faculty.id, cell) {
                    continue;
                }
                let room = rooms
                    .iter()
                    .find(|r| ctx.tracker.is_cell_free(OccupancyKind::Room, &r.id, cell));
                if let Some(room) = room {
                    return Some(Slotting { faculty, room, cell });
                }
            }
        }
    }
    None
}

/// Uniform pick from a slice.
fn pick<'a, T, G: Rng + ?Sized>(
    rng: &mut G,
    items: &'a [T],
    on_empty: impl FnOnce() -> Error,
) -> Result<&'a T> {
    items.choose(rng).ok_or_else(on_empty)
}

fn missing(roster: RosterKind, courses: &[Course], faculty: &[Faculty], rooms: &[Room]) -> Error {
    Error::MissingData {
        roster,
        courses: courses.len(),
        faculty: faculty.len(),
        rooms: rooms.len(),
    }
}

fn empty_calendar() -> Error {
    Error::Config(vec![ValidationError::new(
        ValidationErrorKind::EmptyCalendar,
        "calendar has no teaching slots",
    )])
}
