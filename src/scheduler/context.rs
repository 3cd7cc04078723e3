//! Per-run scheduling state.
//!
//! Everything a generation run mutates lives here: the occupancy sets, the
//! per-day load counters, the per-faculty workload, and the sessions placed
//! so far. A context is created at the start of one run and dropped at the
//! end; it is never shared between runs.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::OccupancyError;
use crate::models::{Calendar, Cell, Day, Session, TimeSlot};

/// Which occupancy set a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyKind {
    Faculty,
    Room,
}

impl fmt::Display for OccupancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OccupancyKind::Faculty => "faculty",
            OccupancyKind::Room => "room",
        })
    }
}

/// Uniqueness unit for double-booking checks: (identity, day, slot).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupancyKey {
    /// Faculty or room identifier.
    pub identity: String,
    pub day: Day,
    pub slot: TimeSlot,
}

impl OccupancyKey {
    pub fn new(identity: impl Into<String>, cell: Cell) -> Self {
        Self {
            identity: identity.into(),
            day: cell.day,
            slot: cell.slot,
        }
    }
}

impl fmt::Display for OccupancyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {}", self.identity, self.day, self.slot)
    }
}

/// Claimed cells for faculty and rooms, tracked independently.
#[derive(Debug, Clone, Default)]
pub struct OccupancyTracker {
    faculty: HashSet<OccupancyKey>,
    rooms: HashSet<OccupancyKey>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: OccupancyKind) -> &HashSet<OccupancyKey> {
        match kind {
            OccupancyKind::Faculty => &self.faculty,
            OccupancyKind::Room => &self.rooms,
        }
    }

    fn set_mut(&mut self, kind: OccupancyKind) -> &mut HashSet<OccupancyKey> {
        match kind {
            OccupancyKind::Faculty => &mut self.faculty,
            OccupancyKind::Room => &mut self.rooms,
        }
    }

    /// Whether nobody has claimed the key.
    pub fn is_free(&self, kind: OccupancyKind, key: &OccupancyKey) -> bool {
        !self.set(kind).contains(key)
    }

    /// Shorthand for `is_free` without building the key first.
    pub fn is_cell_free(&self, kind: OccupancyKind, identity: &str, cell: Cell) -> bool {
        self.is_free(kind, &OccupancyKey::new(identity, cell))
    }

    /// Claims a key.
    ///
    /// # Errors
    /// [`OccupancyError::AlreadyClaimed`] if the key is taken. Callers must
    /// check [`is_free`](Self::is_free) first; a double claim is a bug.
    pub fn claim(&mut self, kind: OccupancyKind, key: OccupancyKey) -> Result<(), OccupancyError> {
        if self.set(kind).contains(&key) {
            return Err(OccupancyError::AlreadyClaimed { kind, key });
        }
        self.set_mut(kind).insert(key);
        Ok(())
    }

    /// Marks a key as taken by a previously committed schedule.
    ///
    /// Unlike `claim`, repeated seeding is accepted: committed schedules
    /// may already contain unchecked double-bookings.
    pub fn seed(&mut self, kind: OccupancyKind, key: OccupancyKey) {
        self.set_mut(kind).insert(key);
    }

    /// Seeds both sets from committed sessions.
    pub fn seed_sessions<'a>(&mut self, sessions: impl IntoIterator<Item = &'a Session>) {
        for s in sessions {
            self.seed(OccupancyKind::Faculty, OccupancyKey::new(&s.faculty_id, s.cell()));
            self.seed(OccupancyKind::Room, OccupancyKey::new(&s.room_id, s.cell()));
        }
    }

    /// Number of claimed keys of a kind.
    pub fn claimed(&self, kind: OccupancyKind) -> usize {
        self.set(kind).len()
    }
}

/// Mutable state of one generation run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Occupied cells.
    pub tracker: OccupancyTracker,
    day_load: HashMap<Day, usize>,
    workload: HashMap<String, u32>,
    sessions: Vec<Session>,
}

impl RunContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context whose tracker already holds committed sessions.
    ///
    /// Seeded sessions block cells but do not count toward day load or
    /// workload, which only measure this run.
    pub fn seeded<'a>(committed: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut ctx = Self::new();
        ctx.tracker.seed_sessions(committed);
        ctx
    }

    /// Sessions placed on a day during this run.
    pub fn day_load(&self, day: Day) -> usize {
        self.day_load.get(&day).copied().unwrap_or(0)
    }

    /// Sessions assigned to a faculty member during this run.
    pub fn workload(&self, faculty_id: &str) -> u32 {
        self.workload.get(faculty_id).copied().unwrap_or(0)
    }

    /// Working days, least loaded first; ties in canonical week order.
    pub fn ranked_days(&self, calendar: &Calendar) -> Vec<Day> {
        let mut days = calendar.working_days.clone();
        days.sort_by_key(|&d| (self.day_load(d), d));
        days
    }

    /// Records a placed session.
    ///
    /// Conflict-checked placements claim their faculty and room keys;
    /// fallback and padding placements are recorded without claiming.
    pub fn commit(&mut self, session: Session) -> Result<(), OccupancyError> {
        if session.placement.is_checked() {
            let cell = session.cell();
            self.tracker
                .claim(OccupancyKind::Faculty, OccupancyKey::new(&session.faculty_id, cell))?;
            self.tracker
                .claim(OccupancyKind::Room, OccupancyKey::new(&session.room_id, cell))?;
        }
        *self.day_load.entry(session.day).or_insert(0) += 1;
        *self.workload.entry(session.faculty_id.clone()).or_insert(0) += 1;
        self.sessions.push(session);
        Ok(())
    }

    /// Number of sessions placed so far.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Sessions placed so far, in placement order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Consumes the context, returning the placed sessions.
    pub fn into_sessions(self) -> Vec<Session> {
        self.sessions
    }
}
