//! Schedule quality metrics (KPIs).
//!
//! Computes timetable indicators from a schedule version and the calendar
//! it was generated against.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Sessions by day | Count per working day (zero days included) |
//! | Day spread | max(day load) - min(day load) |
//! | Fallback rate | Unchecked placements / all sessions |
//! | Double-bookings | Faculty/room cells holding more than one session |
//! | Room utilization | Distinct occupied cells / teaching cells, per room |

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::models::{Calendar, Cell, Day, Placement, ScheduleVersion, ViolationType};

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleKpi {
    /// Total sessions.
    pub session_count: usize,
    /// Sessions per working day, in calendar order.
    pub sessions_by_day: BTreeMap<Day, usize>,
    /// Sessions per faculty ID.
    pub sessions_by_faculty: HashMap<String, usize>,
    /// Conflict-checked placements.
    pub structured_count: usize,
    /// Random placements after an exhausted search.
    pub fallback_count: usize,
    /// Padding-pass placements, checked or not.
    pub padding_count: usize,
    /// Placements that skipped the occupancy check.
    pub unchecked_count: usize,
    /// Double-booked faculty cells.
    pub faculty_double_bookings: usize,
    /// Double-booked room cells.
    pub room_double_bookings: usize,
    /// Lightest working day load.
    pub min_day_load: usize,
    /// Heaviest working day load.
    pub max_day_load: usize,
    /// Per-room utilization (0.0..1.0).
    pub utilization_by_room: HashMap<String, f64>,
    /// Mean room utilization over rooms that appear in the schedule.
    pub avg_room_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs for a schedule version.
    pub fn calculate(version: &ScheduleVersion, calendar: &Calendar) -> Self {
        let mut sessions_by_day: BTreeMap<Day, usize> =
            calendar.working_days.iter().map(|&d| (d, 0)).collect();
        let mut sessions_by_faculty: HashMap<String, usize> = HashMap::new();
        let mut room_cells: HashMap<&str, HashSet<Cell>> = HashMap::new();
        let (mut structured, mut fallback, mut padding, mut unchecked) = (0, 0, 0, 0);

        for s in &version.sessions {
            *sessions_by_day.entry(s.day).or_insert(0) += 1;
            *sessions_by_faculty.entry(s.faculty_id.clone()).or_insert(0) += 1;
            room_cells.entry(&s.room_id).or_default().insert(s.cell());
            match s.placement {
                Placement::Structured => structured += 1,
                Placement::Fallback => fallback += 1,
                Placement::Padding | Placement::CheckedPadding => padding += 1,
            }
            if !s.placement.is_checked() {
                unchecked += 1;
            }
        }

        let violations = version.violations(calendar);
        let count_of = |t: ViolationType| violations.iter().filter(|v| v.violation_type == t).count();

        let loads = calendar
            .working_days
            .iter()
            .map(|d| sessions_by_day.get(d).copied().unwrap_or(0));
        let min_day_load = loads.clone().min().unwrap_or(0);
        let max_day_load = loads.max().unwrap_or(0);

        let cell_count = calendar.cell_count();
        let utilization_by_room: HashMap<String, f64> = room_cells
            .into_iter()
            .map(|(room, cells)| {
                let u = if cell_count == 0 {
                    0.0
                } else {
                    (cells.len() as f64 / cell_count as f64).min(1.0)
                };
                (room.to_string(), u)
            })
            .collect();
        let avg_room_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        Self {
            session_count: version.sessions.len(),
            sessions_by_day,
            sessions_by_faculty,
            structured_count: structured,
            fallback_count: fallback,
            padding_count: padding,
            unchecked_count: unchecked,
            faculty_double_bookings: count_of(ViolationType::FacultyDoubleBooked),
            room_double_bookings: count_of(ViolationType::RoomDoubleBooked),
            min_day_load,
            max_day_load,
            utilization_by_room,
            avg_room_utilization,
        }
    }

    /// Difference between the heaviest and lightest working day.
    pub fn day_spread(&self) -> usize {
        self.max_day_load - self.min_day_load
    }

    /// Fraction of sessions placed without a conflict check (0.0..1.0).
    pub fn fallback_rate(&self) -> f64 {
        if self.session_count == 0 {
            0.0
        } else {
            self.unchecked_count as f64 / self.session_count as f64
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_fallback_rate: f64, min_day_load: usize) -> bool {
        self.fallback_rate() <= max_fallback_rate && self.min_day_load >= min_day_load
    }
}
