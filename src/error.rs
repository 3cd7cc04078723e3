//! Error types for timetable generation and reconciliation.
//!
//! All failures are values: generation never panics on bad input, and
//! persistence failures are surfaced exactly as the store reported them.

use std::fmt;

use thiserror::Error;

use crate::models::SessionType;
use crate::scheduler::{OccupancyKey, OccupancyKind};
use crate::validation::ValidationError;

/// Which input roster a missing-data error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKind {
    Courses,
    Faculty,
    Rooms,
}

impl fmt::Display for RosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RosterKind::Courses => "course",
            RosterKind::Faculty => "faculty",
            RosterKind::Rooms => "room",
        })
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A roster required for generation is empty. Nothing was produced.
    #[error(
        "missing data: {roster} roster is empty (courses: {courses}, faculty: {faculty}, rooms: {rooms})"
    )]
    MissingData {
        roster: RosterKind,
        courses: usize,
        faculty: usize,
        rooms: usize,
    },

    /// Strict placement found no conflict-free cell for a session.
    #[error("no conflict-free placement for course '{course_id}' ({session_type} session)")]
    Unplaceable {
        course_id: String,
        session_type: SessionType,
    },

    /// Occupancy bookkeeping was misused (engine invariant broken).
    #[error("occupancy error: {0}")]
    Occupancy(#[from] OccupancyError),

    /// The schedule store or roster collaborator failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration is unusable.
    #[error("invalid configuration: {}", summarize(.0))]
    Config(Vec<ValidationError>),

    /// Configuration could not be decoded.
    #[error("configuration decode error: {0}")]
    ConfigDecode(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures reported by [`ScheduleStore`](crate::store::ScheduleStore) and
/// [`Roster`](crate::store::Roster) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend-specific failure, passed through unchanged.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Misuse of the per-run occupancy tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    /// The key was claimed twice within one run.
    #[error("{kind} cell already claimed: {key}")]
    AlreadyClaimed {
        kind: OccupancyKind,
        key: OccupancyKey,
    },
}

/// Wire-format parse failures for days and slots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown day '{0}'")]
    Day(String),

    #[error("invalid time slot '{0}', expected HH:MM-HH:MM")]
    Slot(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
