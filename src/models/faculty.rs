//! Faculty model and availability preferences.
//!
//! Faculty are the teaching resources. Each carries expertise tags used for
//! course matching, a weekly session cap, and a per-day availability map.
//!
//! # Availability
//! A day entry is either an explicit list of permitted slots (order acts as
//! a soft priority) or a map of per-slot overrides where only `false`
//! blocks a slot. A missing day entry means fully available.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Day, TimeSlot};

/// Availability for one day.
///
/// Untagged on the wire: a JSON array is `Slots`, a JSON object is `Flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayAvailability {
    /// Only these slots, in this order.
    Slots(Vec<TimeSlot>),
    /// Per-slot overrides; slots absent or `true` are available.
    Flags(BTreeMap<TimeSlot, bool>),
}

/// Weekly availability map keyed by day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<Day, DayAvailability>);

impl Availability {
    /// Creates an empty map (fully available every day).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts a day to an explicit slot list.
    pub fn with_slots(mut self, day: Day, slots: Vec<TimeSlot>) -> Self {
        self.0.insert(day, DayAvailability::Slots(slots));
        self
    }

    /// Sets a per-slot override for a day.
    ///
    /// Replaces an existing slot list for that day with a flag map.
    pub fn with_flag(mut self, day: Day, slot: TimeSlot, available: bool) -> Self {
        match self.0.get_mut(&day) {
            Some(DayAvailability::Flags(flags)) => {
                flags.insert(slot, available);
            }
            _ => {
                self.0
                    .insert(day, DayAvailability::Flags(BTreeMap::from([(slot, available)])));
            }
        }
        self
    }

    /// Replaces the entry for a day.
    pub fn set_day(&mut self, day: Day, availability: DayAvailability) {
        self.0.insert(day, availability);
    }

    /// Entry for a day, if one exists.
    pub fn for_day(&self, day: Day) -> Option<&DayAvailability> {
        self.0.get(&day)
    }

    /// Whether no day carries an entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over day entries in canonical day order.
    pub fn iter(&self) -> impl Iterator<Item = (&Day, &DayAvailability)> {
        self.0.iter()
    }

    /// Whether the slot is explicitly marked unavailable on that day.
    ///
    /// Only a flag map entry set to `false` counts. A slot list narrows
    /// where new sessions go but marks nothing unavailable.
    pub fn is_explicitly_unavailable(&self, day: Day, slot: &TimeSlot) -> bool {
        match self.for_day(day) {
            Some(DayAvailability::Flags(flags)) => flags.get(slot) == Some(&false),
            Some(DayAvailability::Slots(_)) | None => false,
        }
    }
}

/// A faculty member who can be assigned to sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Expertise tags (matched loosely against course titles).
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Maximum sessions per week.
    #[serde(default = "default_max_weekly_sessions")]
    pub max_weekly_sessions: u32,
    /// Per-day availability.
    #[serde(default)]
    pub availability: Availability,
}

fn default_max_weekly_sessions() -> u32 {
    20
}

impl Faculty {
    /// Creates a fully available faculty member.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            department: String::new(),
            expertise: Vec::new(),
            max_weekly_sessions: default_max_weekly_sessions(),
            availability: Availability::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Adds an expertise tag.
    pub fn with_expertise(mut self, tag: impl Into<String>) -> Self {
        self.expertise.push(tag.into());
        self
    }

    /// Sets the weekly session cap.
    pub fn with_max_weekly_sessions(mut self, cap: u32) -> Self {
        self.max_weekly_sessions = cap;
        self
    }

    /// Sets the availability map.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Name shown on sessions: name, else department, else "faculty".
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.department.is_empty() {
            &self.department
        } else {
            "faculty"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_builder() {
        let f = Faculty::new("F1")
            .with_name("Dr. Chen")
            .with_department("Computer Science")
            .with_expertise("Database")
            .with_expertise("Web Development")
            .with_max_weekly_sessions(6);
        assert_eq!(f.id, "F1");
        assert_eq!(f.expertise.len(), 2);
        assert_eq!(f.max_weekly_sessions, 6);
        assert!(f.availability.is_empty());
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(Faculty::new("F1").with_name("Ada").display_name(), "Ada");
        assert_eq!(Faculty::new("F1").with_department("Maths").display_name(), "Maths");
        assert_eq!(Faculty::new("F1").display_name(), "faculty");
    }

    #[test]
    fn test_flags_block_only_false() {
        let av = Availability::new()
            .with_flag(Day::Mon, TimeSlot::hour(9), false)
            .with_flag(Day::Mon, TimeSlot::hour(10), true);
        assert!(av.is_explicitly_unavailable(Day::Mon, &TimeSlot::hour(9)));
        assert!(!av.is_explicitly_unavailable(Day::Mon, &TimeSlot::hour(10)));
        assert!(!av.is_explicitly_unavailable(Day::Mon, &TimeSlot::hour(11)));
        assert!(!av.is_explicitly_unavailable(Day::Tue, &TimeSlot::hour(9)));
    }

    #[test]
    fn test_slot_list_marks_nothing_unavailable() {
        let av = Availability::new().with_slots(Day::Wed, vec![TimeSlot::hour(14)]);
        assert!(!av.is_explicitly_unavailable(Day::Wed, &TimeSlot::hour(14)));
        assert!(!av.is_explicitly_unavailable(Day::Wed, &TimeSlot::hour(9)));
    }

    #[test]
    fn test_with_flag_replaces_slot_list() {
        let av = Availability::new()
            .with_slots(Day::Mon, vec![TimeSlot::hour(9)])
            .with_flag(Day::Mon, TimeSlot::hour(9), false);
        assert!(matches!(av.for_day(Day::Mon), Some(DayAvailability::Flags(_))));
    }

    #[test]
    fn test_availability_wire_format() {
        let json = r#"{
            "Monday": {"09:00-10:00": false, "10:00-11:00": true},
            "tue": ["14:00-15:00", "09:00-10:00"]
        }"#;
        let av: Availability = serde_json::from_str(json).unwrap();
        match av.for_day(Day::Tue) {
            Some(DayAvailability::Slots(slots)) => {
                assert_eq!(slots, &vec![TimeSlot::hour(14), TimeSlot::hour(9)]);
            }
            other => panic!("expected slot list, got {other:?}"),
        }
        assert!(av.is_explicitly_unavailable(Day::Mon, &TimeSlot::hour(9)));
    }

    #[test]
    fn test_faculty_deserialize_defaults() {
        let f: Faculty = serde_json::from_str(r#"{"id":"F9","name":"Grace"}"#).unwrap();
        assert_eq!(f.max_weekly_sessions, 20);
        assert!(f.expertise.is_empty());
        assert!(f.availability.is_empty());
    }
}
