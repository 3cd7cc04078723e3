//! Weekly timetable generation for academic institutions.
//!
//! Places course sessions into a weekly grid of (day, time-slot) cells,
//! assigning each a faculty member and a room without double-booking
//! either, and reconciles later faculty availability changes against the
//! committed schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Calendar`, `Course`, `Faculty`, `Room`,
//!   `Session`, `ScheduleVersion`
//! - **`config`**: `SchedulerConfig` (calendar, padding minimum, workload cap,
//!   placement policy), loadable from JSON
//! - **`availability`**: Per-day teachable slots for a faculty member
//! - **`matching`**: Expertise-based candidate pools
//! - **`scheduler`**: Structured, per-student and randomized engines; KPIs
//! - **`reconcile`**: Conflict reports after availability changes
//! - **`store`**: Roster and schedule persistence contracts, in-memory backend
//! - **`service`**: `TimetableService` facade tying the above together
//! - **`validation`**: Configuration and roster integrity checks
//!
//! # Guarantees
//!
//! Sessions placed by the conflict-checked search never share a faculty or
//! room cell with each other. Fallback and padding placements are tagged
//! so callers can audit them; `PlacementPolicy::Strict` disables them.
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.

pub mod availability;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod reconcile;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
