//! Session (assignment) model.
//!
//! A session is one placed occurrence of a course: course × faculty × room
//! at one calendar cell. Display fields (names, labels) are denormalized so
//! a stored schedule can be rendered without the rosters.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Cell, Course, Day, Faculty, Room, TimeSlot};

/// Kind of session within a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// Lecture session (every course has one).
    Theory,
    /// Practical session of a lab-like course.
    Lab,
    /// Filler added by the padding pass.
    Extra,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionType::Theory => "Theory",
            SessionType::Lab => "Lab",
            SessionType::Extra => "Extra",
        })
    }
}

impl SessionType {
    /// Course label shown to consumers.
    ///
    /// Lab-like courses are annotated with the session type; padding
    /// sessions are always annotated "(Extra)".
    pub fn label_for(self, course: &Course) -> String {
        match self {
            SessionType::Extra => format!("{} (Extra)", course.title),
            _ if course.is_lab_like() => format!("{} ({})", course.title, self),
            _ => course.title.clone(),
        }
    }
}

/// How a session was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Placement {
    /// Found by the conflict-checked search; occupancy was claimed.
    #[default]
    Structured,
    /// Random placement after the search was exhausted. Not conflict-checked.
    Fallback,
    /// Random filler from the padding pass. Not conflict-checked.
    Padding,
    /// Filler from the strict padding pass, placed in a free cell.
    CheckedPadding,
}

impl Placement {
    /// Whether occupancy was checked and claimed for this placement.
    pub fn is_checked(self) -> bool {
        matches!(self, Placement::Structured | Placement::CheckedPadding)
    }

    /// Whether the padding pass added this session.
    pub fn is_padding(self) -> bool {
        matches!(self, Placement::Padding | Placement::CheckedPadding)
    }
}

/// A placed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Course identifier.
    pub course_id: String,
    /// Display label, e.g. "Database Systems (Lab)".
    pub course: String,
    /// Course code.
    pub course_code: String,
    /// Theory, Lab or Extra.
    pub session_type: SessionType,
    /// Faculty identifier.
    pub faculty_id: String,
    /// Faculty display name.
    pub faculty: String,
    /// Room identifier.
    pub room_id: String,
    /// Room display name.
    pub room: String,
    /// Day (abbreviated on the wire).
    pub day: Day,
    /// Time slot ("HH:MM-HH:MM" on the wire).
    pub time: TimeSlot,
    /// Semester number.
    pub semester: u8,
    /// Batch label, "Sem{semester}".
    pub batch_id: String,
    /// Whether the placement was conflict-checked.
    #[serde(default)]
    pub placement: Placement,
}

impl Session {
    /// Creates a session from roster records.
    pub fn new(
        course: &Course,
        session_type: SessionType,
        faculty: &Faculty,
        room: &Room,
        cell: Cell,
        semester: u8,
    ) -> Self {
        Self {
            course_id: course.id.clone(),
            course: session_type.label_for(course),
            course_code: course.code.clone(),
            session_type,
            faculty_id: faculty.id.clone(),
            faculty: faculty.display_name().to_string(),
            room_id: room.id.clone(),
            room: room.name.clone(),
            day: cell.day,
            time: cell.slot,
            semester,
            batch_id: format!("Sem{semester}"),
            placement: Placement::Structured,
        }
    }

    /// Sets the placement tag.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// The calendar cell this session occupies.
    #[inline]
    pub fn cell(&self) -> Cell {
        Cell::new(self.day, self.time)
    }
}
