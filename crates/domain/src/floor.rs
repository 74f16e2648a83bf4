//! Floor — one level of the house.

use crate::error::ValidationError;
use crate::room::Room;

/// A floor, identified by its level within the house.
#[derive(Debug)]
pub struct Floor {
    pub level: i64,
    rooms: Vec<Room>,
}

impl Floor {
    #[must_use]
    pub fn new(level: i64) -> Self {
        Self {
            level,
            rooms: Vec::new(),
        }
    }

    /// Append a room to this floor.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RoomFloorMismatch`] if the room points to
    /// another floor.
    pub fn add_room(&mut self, room: Room) -> Result<(), ValidationError> {
        if room.floor != self.level {
            return Err(ValidationError::RoomFloorMismatch {
                room: room.id,
                declared: room.floor,
                actual: self.level,
            });
        }
        self.rooms.push(room);
        Ok(())
    }

    /// Rooms in the order they were added.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room at a positional index, `None` when out of range.
    #[must_use]
    pub fn room_at(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    /// Sum of the sizes of all rooms on this floor.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.rooms.iter().map(|r| r.room_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::RoomId;

    #[test]
    fn should_sum_room_sizes() {
        let mut floor = Floor::new(1);
        floor.add_room(Room::new(RoomId::new(1), 1, None, 10.0).unwrap()).unwrap();
        floor.add_room(Room::new(RoomId::new(2), 1, None, 2.5).unwrap()).unwrap();
        assert!((floor.area() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_return_none_for_out_of_range_index() {
        let mut floor = Floor::new(0);
        floor.add_room(Room::new(RoomId::new(1), 0, None, 10.0).unwrap()).unwrap();
        assert!(floor.room_at(0).is_some());
        assert!(floor.room_at(1).is_none());
    }

    #[test]
    fn should_reject_room_from_other_floor() {
        let mut floor = Floor::new(0);
        let err = floor
            .add_room(Room::new(RoomId::new(3), 2, None, 10.0).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::RoomFloorMismatch {
                declared: 2,
                actual: 0,
                ..
            }
        ));
    }
}
