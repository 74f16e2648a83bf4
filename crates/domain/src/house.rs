//! `SmartHouse` — the root aggregate of the topology.
//!
//! The house owns its floors (ordered by level), the floors own their rooms
//! and the rooms own their devices. Devices that are registered but not yet
//! installed anywhere are owned by the house directly.
//!
//! Back-references are plain identifiers: a room knows its floor level and a
//! device knows its room id. [`SmartHouse::floor_of`] and
//! [`SmartHouse::room_of`] resolve them through indexes built once by
//! [`SmartHouseBuilder::build`]. The structure never changes after that, so
//! navigation needs no locking.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::device::{Actuator, Device};
use crate::error::ValidationError;
use crate::floor::Floor;
use crate::id::{DeviceId, RoomId};
use crate::room::Room;

#[derive(Debug, Clone, Copy)]
enum DeviceSlot {
    Installed {
        floor: usize,
        room: usize,
        device: usize,
    },
    Unassigned(usize),
}

/// The fully linked house graph.
#[derive(Debug)]
pub struct SmartHouse {
    floors: Vec<Floor>,
    unassigned: Vec<Device>,
    rooms_by_id: HashMap<RoomId, (usize, usize)>,
    devices_by_id: HashMap<DeviceId, DeviceSlot>,
}

impl SmartHouse {
    /// Create a builder for constructing a [`SmartHouse`].
    #[must_use]
    pub fn builder() -> SmartHouseBuilder {
        SmartHouseBuilder::default()
    }

    /// Floors ordered by level.
    #[must_use]
    pub fn get_floors(&self) -> &[Floor] {
        &self.floors
    }

    /// Floor with the given level.
    #[must_use]
    pub fn get_floor(&self, level: i64) -> Option<&Floor> {
        self.floors
            .binary_search_by_key(&level, |f| f.level)
            .ok()
            .map(|idx| &self.floors[idx])
    }

    /// All rooms, floor by floor.
    #[must_use]
    pub fn get_rooms(&self) -> Vec<&Room> {
        self.floors.iter().flat_map(Floor::rooms).collect()
    }

    #[must_use]
    pub fn get_room_by_id(&self, id: RoomId) -> Option<&Room> {
        self.rooms_by_id
            .get(&id)
            .map(|&(floor, room)| &self.floors[floor].rooms()[room])
    }

    /// All devices: installed ones floor by floor and room by room, then the
    /// unassigned ones.
    #[must_use]
    pub fn get_devices(&self) -> Vec<&Device> {
        self.floors
            .iter()
            .flat_map(Floor::rooms)
            .flat_map(Room::devices)
            .chain(&self.unassigned)
            .collect()
    }

    /// Devices registered without a room.
    #[must_use]
    pub fn unassigned_devices(&self) -> &[Device] {
        &self.unassigned
    }

    /// Exact-match lookup over every device in the house.
    #[must_use]
    pub fn get_device_by_id(&self, id: &str) -> Option<&Device> {
        let slot = self.devices_by_id.get(id)?;
        Some(match *slot {
            DeviceSlot::Installed {
                floor,
                room,
                device,
            } => &self.floors[floor].rooms()[room].devices()[device],
            DeviceSlot::Unassigned(idx) => &self.unassigned[idx],
        })
    }

    /// Every actuator in the house together with its device id.
    pub fn actuators(&self) -> impl Iterator<Item = (&DeviceId, &Actuator)> {
        self.get_devices()
            .into_iter()
            .filter_map(|d| d.actuator.as_ref().map(|a| (&d.id, a)))
    }

    /// Total area: the sum of every room size on every floor.
    #[must_use]
    pub fn get_area(&self) -> f64 {
        self.floors.iter().map(Floor::area).sum()
    }

    /// Room the device is installed in.
    #[must_use]
    pub fn room_of(&self, device: &Device) -> Option<&Room> {
        device.room.and_then(|id| self.get_room_by_id(id))
    }

    /// Floor the room belongs to.
    #[must_use]
    pub fn floor_of(&self, room: &Room) -> Option<&Floor> {
        self.get_floor(room.floor)
    }
}

/// Collects floors and unassigned devices, then checks identity invariants.
#[derive(Debug, Default)]
pub struct SmartHouseBuilder {
    floors: Vec<Floor>,
    unassigned: Vec<Device>,
}

impl SmartHouseBuilder {
    #[must_use]
    pub fn floor(mut self, floor: Floor) -> Self {
        self.floors.push(floor);
        self
    }

    #[must_use]
    pub fn unassigned_device(mut self, device: Device) -> Self {
        self.unassigned.push(device);
        self
    }

    /// Order floors by level, index rooms and devices, and return the house.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a floor level, room id or device id
    /// occurs twice, or when an unassigned device points at a room.
    pub fn build(mut self) -> Result<SmartHouse, ValidationError> {
        self.floors.sort_by_key(|f| f.level);
        if let Some(pair) = self.floors.windows(2).find(|w| w[0].level == w[1].level) {
            return Err(ValidationError::DuplicateFloor(pair[0].level));
        }

        let mut rooms_by_id = HashMap::new();
        let mut devices_by_id = HashMap::new();

        for (floor_idx, floor) in self.floors.iter().enumerate() {
            for (room_idx, room) in floor.rooms().iter().enumerate() {
                if rooms_by_id.insert(room.id, (floor_idx, room_idx)).is_some() {
                    return Err(ValidationError::DuplicateRoom(room.id));
                }
                for (device_idx, device) in room.devices().iter().enumerate() {
                    let slot = DeviceSlot::Installed {
                        floor: floor_idx,
                        room: room_idx,
                        device: device_idx,
                    };
                    index_device(&mut devices_by_id, &device.id, slot)?;
                }
            }
        }

        for (idx, device) in self.unassigned.iter().enumerate() {
            if device.room.is_some() {
                return Err(ValidationError::DeviceRoomMismatch {
                    device: device.id.clone(),
                    declared: device.room,
                    actual: None,
                });
            }
            index_device(&mut devices_by_id, &device.id, DeviceSlot::Unassigned(idx))?;
        }

        Ok(SmartHouse {
            floors: self.floors,
            unassigned: self.unassigned,
            rooms_by_id,
            devices_by_id,
        })
    }
}

fn index_device(
    index: &mut HashMap<DeviceId, DeviceSlot>,
    id: &DeviceId,
    slot: DeviceSlot,
) -> Result<(), ValidationError> {
    match index.entry(id.clone()) {
        Entry::Occupied(_) => Err(ValidationError::DuplicateDevice(id.clone())),
        Entry::Vacant(entry) => {
            entry.insert(slot);
            Ok(())
        }
    }
}
