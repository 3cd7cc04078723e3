//! Timetable generation and KPI evaluation.
//!
//! # Engines
//!
//! [`AssignmentEngine`] offers three runs over the same per-run state:
//!
//! | Run | Order | Conflicts |
//! |-----|-------|-----------|
//! | `assign` | course-first, first-fit | checked; unchecked fallback on exhaustion |
//! | `assign_for_student` | as `assign`, seeded with committed sessions, then padding | padding unchecked |
//! | `assign_naive` | slot-first, random | checked; cells skipped instead of forced |
//!
//! All state a run mutates lives in a [`RunContext`] created for that run.
//!
//! # KPI
//!
//! [`ScheduleKpi`] summarizes day balance, placement quality and
//! double-bookings of a stored version.

mod context;
mod engine;
mod kpi;
mod naive;

pub use context::{OccupancyKey, OccupancyKind, OccupancyTracker, RunContext};
pub use engine::AssignmentEngine;
pub use kpi::ScheduleKpi;
