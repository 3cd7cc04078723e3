//! Weekly calendar grid: days, time slots, and teaching cells.
//!
//! The calendar is a fixed grid of working days × teaching slots. One slot
//! (lunch by default) is reserved and never offered for teaching.
//!
//! # Wire Format
//! Days serialize as their abbreviation (`"Mon"`) and accept the full name
//! in any case (`"Monday"`, `"monday"`). Slots serialize as `"HH:MM-HH:MM"`.
//!
//! # Precedence
//! The reserved slot overrides the slot list: a slot is teachable iff
//! - it appears in `time_slots`, AND
//! - it is NOT the `reserved_slot`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// All days in canonical order.
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Abbreviated code used in session records ("Mon").
    pub fn abbrev(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }

    /// Full day name used in availability maps ("Monday").
    pub fn full_name(self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
            Day::Sat => "Saturday",
            Day::Sun => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

impl FromStr for Day {
    type Err = ParseError;

    /// Parses either the abbreviation or the full name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Day::ALL
            .into_iter()
            .find(|d| {
                d.abbrev().eq_ignore_ascii_case(needle) || d.full_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ParseError::Day(s.to_string()))
    }
}

impl TryFrom<String> for Day {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.abbrev().to_string()
    }
}

/// A time slot [start, end) within a day, in minutes since midnight.
///
/// Ordered by start, then end, so a sorted set of slots follows the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    /// Slot start (minutes since midnight, inclusive).
    pub start_min: u16,
    /// Slot end (minutes since midnight, exclusive).
    pub end_min: u16,
}

impl TimeSlot {
    /// Creates a slot from hour/minute pairs.
    pub fn new(start_hour: u16, start_minute: u16, end_hour: u16, end_minute: u16) -> Self {
        Self {
            start_min: start_hour * 60 + start_minute,
            end_min: end_hour * 60 + end_minute,
        }
    }

    /// Creates a whole-hour slot, e.g. `hour(9)` = 09:00-10:00.
    pub fn hour(start_hour: u16) -> Self {
        Self::new(start_hour, 0, start_hour + 1, 0)
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_min(&self) -> u16 {
        self.end_min.saturating_sub(self.start_min)
    }

    /// Whether two slots overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}

impl FromStr for TimeSlot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Slot(s.to_string());
        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start_min = parse_clock(start).ok_or_else(invalid)?;
        let end_min = parse_clock(end).ok_or_else(invalid)?;
        if end_min <= start_min {
            return Err(invalid());
        }
        Ok(Self { start_min, end_min })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// Parses "HH:MM" into minutes since midnight.
fn parse_clock(s: &str) -> Option<u16> {
    let (h, m) = s.trim().split_once(':')?;
    let hour: u16 = h.parse().ok()?;
    let minute: u16 = m.parse().ok()?;
    if hour > 24 || minute > 59 || (hour == 24 && minute > 0) {
        return None;
    }
    Some(hour * 60 + minute)
}

/// One (day, slot) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub day: Day,
    pub slot: TimeSlot,
}

impl Cell {
    pub fn new(day: Day, slot: TimeSlot) -> Self {
        Self { day, slot }
    }
}

/// Weekly teaching calendar.
///
/// Pure configuration: the working days, the canonical slot ordering, and
/// the reserved (non-teaching) slot. Missing fields deserialize from
/// [`Calendar::standard_week`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    /// Days on which sessions may be placed, in canonical order.
    pub working_days: Vec<Day>,
    /// Canonical slot ordering for one day.
    pub time_slots: Vec<TimeSlot>,
    /// Slot never offered for teaching (lunch). `None` = nothing reserved.
    pub reserved_slot: Option<TimeSlot>,
}

impl Calendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self {
            working_days: Vec::new(),
            time_slots: Vec::new(),
            reserved_slot: None,
        }
    }

    /// Mon–Fri, six one-hour slots from 09:00 to 16:00, lunch 12:00-13:00 reserved.
    pub fn standard_week() -> Self {
        Self {
            working_days: vec![Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri],
            time_slots: [9, 10, 11, 13, 14, 15].into_iter().map(TimeSlot::hour).collect(),
            reserved_slot: Some(TimeSlot::hour(12)),
        }
    }

    /// Adds a working day (ignored if already present).
    pub fn with_day(mut self, day: Day) -> Self {
        if !self.working_days.contains(&day) {
            self.working_days.push(day);
        }
        self
    }

    /// Extends the week to include Saturday.
    pub fn with_saturday(self) -> Self {
        self.with_day(Day::Sat)
    }

    /// Appends a slot to the canonical ordering.
    pub fn with_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slots.push(slot);
        self
    }

    /// Sets the reserved slot.
    pub fn with_reserved(mut self, slot: TimeSlot) -> Self {
        self.reserved_slot = Some(slot);
        self
    }

    /// Whether the slot is the reserved non-teaching slot.
    #[inline]
    pub fn is_reserved(&self, slot: &TimeSlot) -> bool {
        self.reserved_slot.as_ref() == Some(slot)
    }

    /// Canonical teaching slots (reserved slot filtered out).
    pub fn teaching_slots(&self) -> Vec<TimeSlot> {
        self.time_slots
            .iter()
            .filter(|s| !self.is_reserved(s))
            .copied()
            .collect()
    }

    /// Whether the slot is a valid teaching slot of this calendar.
    pub fn is_teaching_slot(&self, slot: &TimeSlot) -> bool {
        !self.is_reserved(slot) && self.time_slots.contains(slot)
    }

    /// All teaching cells, day-major.
    pub fn cells(&self) -> Vec<Cell> {
        let slots = self.teaching_slots();
        self.working_days
            .iter()
            .flat_map(|&day| slots.iter().map(move |&slot| Cell::new(day, slot)))
            .collect()
    }

    /// Number of teaching cells in the week.
    pub fn cell_count(&self) -> usize {
        self.working_days.len() * self.teaching_slots().len()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::standard_week()
    }
}
