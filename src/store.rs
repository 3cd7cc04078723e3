//! Roster and schedule persistence contracts.
//!
//! The scheduler never talks to a database directly. Rosters are read
//! through [`Roster`] and schedule versions are written through
//! [`ScheduleStore`]; any backend implementing both can be plugged into
//! [`TimetableService`](crate::service::TimetableService).
//!
//! [`InMemoryStore`] implements both traits and is what tests use.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::StoreError;
use crate::models::{Availability, Course, Faculty, Room, ScheduleVersion, Session};

/// Read access to courses, faculty and rooms.
pub trait Roster: Send + Sync + std::fmt::Debug {
    /// Courses, optionally restricted to the given IDs (roster order kept).
    fn list_courses(&self, ids: Option<&[String]>) -> Result<Vec<Course>, StoreError>;

    fn list_faculty(&self) -> Result<Vec<Faculty>, StoreError>;

    fn list_rooms(&self) -> Result<Vec<Room>, StoreError>;

    /// Replaces one faculty member's availability and returns the updated record.
    fn update_faculty_availability(
        &self,
        faculty_id: &str,
        availability: Availability,
    ) -> Result<Faculty, StoreError>;
}

/// Schedule version persistence.
pub trait ScheduleStore: Send + Sync + std::fmt::Debug {
    /// Persists a new version.
    fn create_version(
        &self,
        label: &str,
        sessions: Vec<Session>,
        owner: Option<&str>,
    ) -> Result<ScheduleVersion, StoreError>;

    /// Replaces the owner's version, creating it if needed.
    fn upsert_version(
        &self,
        owner: &str,
        label: &str,
        sessions: Vec<Session>,
    ) -> Result<ScheduleVersion, StoreError>;

    /// Most recent institution-wide version, optionally skipping empty ones.
    fn latest_version(
        &self,
        require_non_empty: bool,
    ) -> Result<Option<ScheduleVersion>, StoreError>;

    /// Replaces the sessions of the most recent institution-wide version.
    fn overwrite_latest_sessions(
        &self,
        sessions: Vec<Session>,
    ) -> Result<ScheduleVersion, StoreError>;

    /// The version owned by a student, if any.
    fn version_for_owner(&self, owner: &str) -> Result<Option<ScheduleVersion>, StoreError>;
}

/// Thread-safe in-memory backend.
#[derive(Debug)]
pub struct InMemoryStore {
    courses: RwLock<Vec<Course>>,
    faculty: RwLock<Vec<Faculty>>,
    rooms: RwLock<Vec<Room>>,
    versions: RwLock<Vec<ScheduleVersion>>,
    next_id: AtomicU64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            courses: RwLock::new(Vec::new()),
            faculty: RwLock::new(Vec::new()),
            rooms: RwLock::new(Vec::new()),
            versions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(self, courses: Vec<Course>) -> Self {
        *self.courses.write().unwrap_or_else(PoisonError::into_inner) = courses;
        self
    }

    pub fn with_faculty(self, faculty: Vec<Faculty>) -> Self {
        *self.faculty.write().unwrap_or_else(PoisonError::into_inner) = faculty;
        self
    }

    pub fn with_rooms(self, rooms: Vec<Room>) -> Self {
        *self.rooms.write().unwrap_or_else(PoisonError::into_inner) = rooms;
        self
    }

    /// Stores a prebuilt version as-is, assigning an ID if it has none.
    pub fn insert_version(&self, mut version: ScheduleVersion) -> ScheduleVersion {
        if version.id == 0 {
            version.id = self.next_id();
        }
        self.versions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(version.clone());
        version
    }

    /// Number of stored versions.
    pub fn version_count(&self) -> usize {
        self.versions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Index of the newest institution-wide version (ties broken by ID).
fn latest_index(versions: &[ScheduleVersion], require_non_empty: bool) -> Option<usize> {
    versions
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_institution_wide() && (!require_non_empty || !v.is_empty()))
        .max_by_key(|(_, v)| (v.created_at, v.id))
        .map(|(i, _)| i)
}

impl Roster for InMemoryStore {
    fn list_courses(&self, ids: Option<&[String]>) -> Result<Vec<Course>, StoreError> {
        let courses = self.courses.read().unwrap_or_else(PoisonError::into_inner);
        Ok(match ids {
            None => courses.clone(),
            Some(ids) => courses
                .iter()
                .filter(|c| ids.contains(&c.id))
                .cloned()
                .collect(),
        })
    }

    fn list_faculty(&self) -> Result<Vec<Faculty>, StoreError> {
        Ok(self.faculty.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn list_rooms(&self) -> Result<Vec<Room>, StoreError> {
        Ok(self.rooms.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn update_faculty_availability(
        &self,
        faculty_id: &str,
        availability: Availability,
    ) -> Result<Faculty, StoreError> {
        let mut faculty = self.faculty.write().unwrap_or_else(PoisonError::into_inner);
        let record = faculty
            .iter_mut()
            .find(|f| f.id == faculty_id)
            .ok_or_else(|| StoreError::NotFound(format!("faculty '{faculty_id}'")))?;
        record.availability = availability;
        Ok(record.clone())
    }
}

impl ScheduleStore for InMemoryStore {
    fn create_version(
        &self,
        label: &str,
        sessions: Vec<Session>,
        owner: Option<&str>,
    ) -> Result<ScheduleVersion, StoreError> {
        let mut version = ScheduleVersion::new(label, sessions);
        version.owner = owner.map(str::to_string);
        Ok(self.insert_version(version))
    }

    fn upsert_version(
        &self,
        owner: &str,
        label: &str,
        sessions: Vec<Session>,
    ) -> Result<ScheduleVersion, StoreError> {
        let mut versions = self.versions.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = versions
            .iter_mut()
            .find(|v| v.owner.as_deref() == Some(owner))
        {
            existing.label = label.to_string();
            existing.sessions = sessions;
            return Ok(existing.clone());
        }

        let version = ScheduleVersion {
            id: self.next_id(),
            ..ScheduleVersion::new(label, sessions).with_owner(owner)
        };
        versions.push(version.clone());
        Ok(version)
    }

    fn latest_version(
        &self,
        require_non_empty: bool,
    ) -> Result<Option<ScheduleVersion>, StoreError> {
        let versions = self.versions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(latest_index(&versions, require_non_empty).map(|i| versions[i].clone()))
    }

    fn overwrite_latest_sessions(
        &self,
        sessions: Vec<Session>,
    ) -> Result<ScheduleVersion, StoreError> {
        let mut versions = self.versions.write().unwrap_or_else(PoisonError::into_inner);
        let i = latest_index(&versions, false)
            .ok_or_else(|| StoreError::NotFound("institution-wide schedule".into()))?;
        versions[i].sessions = sessions;
        Ok(versions[i].clone())
    }

    fn version_for_owner(&self, owner: &str) -> Result<Option<ScheduleVersion>, StoreError> {
        let versions = self.versions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(versions
            .iter()
            .find(|v| v.owner.as_deref() == Some(owner))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Day, SessionType, TimeSlot};
    use chrono::Duration;

    fn session(hour: u16) -> Session {
        Session::new(
            &Course::new("C1", "Algebra"),
            SessionType::Theory,
            &Faculty::new("F1"),
            &Room::new("R1"),
            Cell::new(Day::Mon, TimeSlot::hour(hour)),
            1,
        )
    }

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_courses(vec![
                Course::new("C1", "Algebra"),
                Course::new("C2", "Physics"),
                Course::new("C3", "Chemistry"),
            ])
            .with_faculty(vec![Faculty::new("F1"), Faculty::new("F2")])
            .with_rooms(vec![Room::new("R1")])
    }

    #[test]
    fn test_list_courses_filter_keeps_roster_order() {
        let s = store();
        assert_eq!(s.list_courses(None).unwrap().len(), 3);
        let ids = vec!["C3".to_string(), "C1".to_string(), "C9".to_string()];
        let picked: Vec<String> = s
            .list_courses(Some(&ids))
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(picked, vec!["C1", "C3"]);
    }

    #[test]
    fn test_update_faculty_availability() {
        let s = store();
        let availability = Availability::new().with_flag(Day::Mon, TimeSlot::hour(9), false);
        let updated = s
            .update_faculty_availability("F2", availability.clone())
            .unwrap();
        assert_eq!(updated.availability, availability);
        assert_eq!(s.list_faculty().unwrap()[1].availability, availability);

        let err = s
            .update_faculty_availability("F9", Availability::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_latest_version_prefers_newest_institution_wide() {
        let s = store();
        assert!(s.latest_version(false).unwrap().is_none());

        let old = s.create_version("global_v1", vec![session(9)], None).unwrap();
        let new = s.create_version("global_v2", vec![], None).unwrap();
        s.upsert_version("student-1", "student_student-1_1", vec![session(10)])
            .unwrap();

        assert_eq!(s.latest_version(false).unwrap().unwrap().id, new.id);
        assert_eq!(s.latest_version(true).unwrap().unwrap().id, old.id);
    }

    #[test]
    fn test_latest_version_orders_by_created_at() {
        let s = InMemoryStore::new();
        let mut future = ScheduleVersion::new("later", vec![session(9)]);
        future.created_at += Duration::hours(1);
        let future = s.insert_version(future);
        s.create_version("now", vec![session(10)], None).unwrap();
        assert_eq!(s.latest_version(true).unwrap().unwrap().id, future.id);
    }

    #[test]
    fn test_upsert_replaces_owner_version() {
        let s = store();
        let first = s.upsert_version("st", "a", vec![session(9)]).unwrap();
        let second = s.upsert_version("st", "b", vec![session(10), session(11)]).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.label, "b");
        assert_eq!(s.version_count(), 1);
        assert_eq!(s.version_for_owner("st").unwrap().unwrap().session_count(), 2);
        assert!(s.version_for_owner("other").unwrap().is_none());
        assert!(s.latest_version(false).unwrap().is_none());
    }

    #[test]
    fn test_overwrite_latest_sessions() {
        let s = store();
        assert!(matches!(
            s.overwrite_latest_sessions(vec![]),
            Err(StoreError::NotFound(_))
        ));

        let v = s.create_version("global_v1", vec![session(9)], None).unwrap();
        let edited = s
            .overwrite_latest_sessions(vec![session(13), session(14)])
            .unwrap();
        assert_eq!(edited.id, v.id);
        assert_eq!(edited.session_count(), 2);
        assert_eq!(s.latest_version(true).unwrap().unwrap().sessions[0].time, TimeSlot::hour(13));
    }
}
