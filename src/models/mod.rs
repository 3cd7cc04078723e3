//! Timetabling domain models.
//!
//! Provides the core data types for weekly timetables: the calendar grid,
//! the rosters the scheduler reads, and the sessions and versions it
//! produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling | Example |
//! |-------------|--------------------|---------|
//! | Course | Task | "Database Systems" |
//! | Session | Assignment | Theory, Tue 10:00-11:00 |
//! | Faculty | Human resource | Dr. Chen |
//! | Room | Primary resource | Hall A |
//! | ScheduleVersion | Schedule | randomized_v1718000000000 |

mod calendar;
mod course;
mod faculty;
mod room;
mod schedule;
mod session;

pub use calendar::{Calendar, Cell, Day, TimeSlot};
pub use course::Course;
pub use faculty::{Availability, DayAvailability, Faculty};
pub use room::Room;
pub use schedule::{ScheduleVersion, Violation, ViolationType};
pub use session::{Placement, Session, SessionType};
