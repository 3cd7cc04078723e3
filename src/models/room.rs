//! Room model.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Seats. Informational only; the scheduler does not read it.
    #[serde(default)]
    pub capacity: u32,
}

impl Room {
    /// Creates a room whose name equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R1").with_name("Lecture Hall A").with_capacity(120);
        assert_eq!(r.id, "R1");
        assert_eq!(r.name, "Lecture Hall A");
        assert_eq!(r.capacity, 120);
        assert_eq!(Room::new("B-204").name, "B-204");
    }
}
