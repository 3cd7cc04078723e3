//! Faculty availability resolution.
//!
//! Turns a faculty member's availability map into the ordered list of slots
//! they may teach on a given day.
//!
//! | Day entry | Result |
//! |-----------|--------|
//! | none | every canonical teaching slot |
//! | `Slots(list)` | the list verbatim, order preserved |
//! | `Flags(map)` | canonical slots not flagged `false` |
//!
//! A raw slot list may name slots outside the calendar, including the
//! reserved one. The resolver passes them through; callers filter.

use crate::models::{Calendar, Cell, Day, DayAvailability, Faculty, TimeSlot};

/// Resolves per-day teachable slots against one calendar.
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    canonical: Vec<TimeSlot>,
}

impl AvailabilityResolver {
    /// Creates a resolver using the calendar's teaching slots as canonical order.
    pub fn new(calendar: &Calendar) -> Self {
        Self {
            canonical: calendar.teaching_slots(),
        }
    }

    /// Canonical slot ordering.
    pub fn canonical_slots(&self) -> &[TimeSlot] {
        &self.canonical
    }

    /// Slots the faculty member may teach on `day`, in priority order.
    pub fn available_slots(&self, faculty: &Faculty, day: Day) -> Vec<TimeSlot> {
        match faculty.availability.for_day(day) {
            None => self.canonical.clone(),
            Some(DayAvailability::Slots(slots)) => slots.clone(),
            Some(DayAvailability::Flags(flags)) => self
                .canonical
                .iter()
                .filter(|slot| flags.get(slot) != Some(&false))
                .copied()
                .collect(),
        }
    }

    /// Whether the faculty member may teach at `cell`.
    pub fn is_available(&self, faculty: &Faculty, cell: Cell) -> bool {
        match faculty.availability.for_day(cell.day) {
            None => self.canonical.contains(&cell.slot),
            Some(DayAvailability::Slots(slots)) => slots.contains(&cell.slot),
            Some(DayAvailability::Flags(flags)) => {
                self.canonical.contains(&cell.slot) && flags.get(&cell.slot) != Some(&false)
            }
        }
    }
}
