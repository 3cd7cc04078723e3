//! Input validation for timetabling problems.
//!
//! Checks structural integrity of the configuration and rosters before
//! generation. Detects:
//! - Empty or duplicated calendar days and slots
//! - Overlapping teaching slots
//! - Unusable limits
//! - Duplicate roster IDs
//! - Availability entries naming slots the calendar does not have
//! - Faculty with a zero weekly cap
//!
//! Calendar and limit problems are fatal. Roster findings are advisory:
//! generation still runs, and the service logs them.

use crate::config::SchedulerConfig;
use crate::models::{Calendar, Course, DayAvailability, Faculty, Room};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The calendar has no working days or no teaching slots.
    EmptyCalendar,
    /// A day or slot is listed twice.
    DuplicateEntry,
    /// Two teaching slots overlap in time.
    OverlappingSlots,
    /// A numeric limit is out of range.
    InvalidLimit,
    /// Two roster entries share the same ID.
    DuplicateId,
    /// An availability entry names a slot outside the calendar.
    UnknownSlot,
    /// A faculty member can never be assigned.
    ZeroCapacity,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the calendar grid.
///
/// Checks:
/// 1. At least one working day
/// 2. At least one teaching slot (after removing the reserved slot)
/// 3. No duplicate days or slots
/// 4. No overlapping teaching slots
pub fn validate_calendar(calendar: &Calendar) -> ValidationResult {
    let mut errors = Vec::new();

    if calendar.working_days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCalendar,
            "calendar has no working days",
        ));
    }

    let teaching = calendar.teaching_slots();
    if teaching.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCalendar,
            "calendar has no teaching slots",
        ));
    }

    let mut days = HashSet::new();
    for day in &calendar.working_days {
        if !days.insert(day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEntry,
                format!("working day listed twice: {day}"),
            ));
        }
    }

    let mut slots = HashSet::new();
    for slot in &calendar.time_slots {
        if !slots.insert(slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEntry,
                format!("time slot listed twice: {slot}"),
            ));
        }
    }

    for (i, a) in teaching.iter().enumerate() {
        for b in teaching.iter().skip(i + 1) {
            if a != b && a.overlaps(b) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingSlots,
                    format!("teaching slots overlap: {a} and {b}"),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates the full scheduler configuration.
pub fn validate_config(config: &SchedulerConfig) -> ValidationResult {
    let mut errors = match validate_calendar(&config.calendar) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if config.max_semester == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidLimit,
            "max_semester must be at least 1",
        ));
    }
    if config.max_sessions_per_faculty == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidLimit,
            "max_sessions_per_faculty must be at least 1",
        ));
    }

    finish(errors)
}

/// Validates rosters against the calendar.
///
/// Checks:
/// 1. No duplicate course, faculty, or room IDs
/// 2. Availability entries only name teaching slots or the reserved slot
/// 3. Every faculty member has a non-zero weekly cap
pub fn validate_rosters(
    courses: &[Course],
    faculty: &[Faculty],
    rooms: &[Room],
    calendar: &Calendar,
) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique("course", courses.iter().map(|c| c.id.as_str()), &mut errors);
    check_unique("faculty", faculty.iter().map(|f| f.id.as_str()), &mut errors);
    check_unique("room", rooms.iter().map(|r| r.id.as_str()), &mut errors);

    for f in faculty {
        if f.max_weekly_sessions == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("faculty '{}' has a weekly cap of 0", f.id),
            ));
        }

        for (day, entry) in f.availability.iter() {
            let named: Vec<_> = match entry {
                DayAvailability::Slots(slots) => slots.iter().collect(),
                DayAvailability::Flags(flags) => flags.keys().collect(),
            };
            for slot in named {
                if !calendar.is_teaching_slot(slot) && !calendar.is_reserved(slot) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownSlot,
                        format!(
                            "faculty '{}' availability on {} names unknown slot {slot}",
                            f.id,
                            day.full_name()
                        ),
                    ));
                }
            }
        }
    }

    finish(errors)
}

fn check_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}
