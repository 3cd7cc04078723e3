//! Scheduler configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration describing the standard Mon–Fri week.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Calendar;
use crate::validation;

/// What to do when the conflict-checked search finds no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// Place randomly without checking occupancy. Always produces a session.
    #[default]
    BestEffort,
    /// Fail with [`Error::Unplaceable`]; padding only uses free cells.
    Strict,
}

/// Top-level scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Working days, slot ordering and reserved slot.
    pub calendar: Calendar,
    /// Per-student padding target for every working day.
    pub min_sessions_per_day: usize,
    /// Run-wide session cap per faculty in randomized generation.
    /// The effective cap is the lower of this and the faculty's own cap.
    pub max_sessions_per_faculty: u32,
    /// Upper bound for the random semester assigned to courses without one.
    pub max_semester: u8,
    /// Behavior when the structured search is exhausted.
    pub placement: PlacementPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            calendar: Calendar::standard_week(),
            min_sessions_per_day: 4,
            max_sessions_per_faculty: 6,
            max_semester: 8,
            placement: PlacementPolicy::BestEffort,
        }
    }
}

impl SchedulerConfig {
    /// Decodes and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the calendar and limits.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self).map_err(Error::Config)
    }

    /// Sets the calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the per-day padding target.
    pub fn with_min_sessions_per_day(mut self, min: usize) -> Self {
        self.min_sessions_per_day = min;
        self
    }

    /// Sets the randomized-generation workload cap.
    pub fn with_max_sessions_per_faculty(mut self, cap: u32) -> Self {
        self.max_sessions_per_faculty = cap;
        self
    }

    /// Sets the placement policy.
    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    /// Shorthand for [`PlacementPolicy::Strict`].
    pub fn strict(self) -> Self {
        self.with_placement(PlacementPolicy::Strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, TimeSlot};

    #[test]
    fn test_defaults() {
        let c = SchedulerConfig::default();
        assert_eq!(c.min_sessions_per_day, 4);
        assert_eq!(c.max_sessions_per_faculty, 6);
        assert_eq!(c.max_semester, 8);
        assert_eq!(c.placement, PlacementPolicy::BestEffort);
        assert_eq!(c.calendar.working_days.len(), 5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_empty_json() {
        let c = SchedulerConfig::from_json("{}").unwrap();
        assert_eq!(c, SchedulerConfig::default());
    }

    #[test]
    fn test_from_partial_json() {
        let c = SchedulerConfig::from_json(
            r#"{
                "calendar": {"working_days": ["Mon", "Tue", "Wed", "Thu", "Fri", "Saturday"]},
                "min_sessions_per_day": 2,
                "placement": "Strict"
            }"#,
        )
        .unwrap();
        assert_eq!(c.calendar.working_days.last(), Some(&Day::Sat));
        assert_eq!(c.calendar.reserved_slot, Some(TimeSlot::hour(12)));
        assert_eq!(c.calendar.teaching_slots().len(), 6);
        assert_eq!(c.min_sessions_per_day, 2);
        assert_eq!(c.placement, PlacementPolicy::Strict);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let err = SchedulerConfig::from_json(r#"{"calendar": {"working_days": []}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("no working days"));

        let err = SchedulerConfig::from_json(r#"{"max_semester": "eight"}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigDecode(_)));
    }

    #[test]
    fn test_builders() {
        let c = SchedulerConfig::default()
            .with_calendar(Calendar::standard_week().with_saturday())
            .with_min_sessions_per_day(3)
            .with_max_sessions_per_faculty(10)
            .strict();
        assert_eq!(c.calendar.working_days.len(), 6);
        assert_eq!(c.min_sessions_per_day, 3);
        assert_eq!(c.max_sessions_per_faculty, 10);
        assert_eq!(c.placement, PlacementPolicy::Strict);
    }
}
