//! Room — an area on a floor that holds devices.

use crate::device::Device;
use crate::error::{SmartHouseError, ValidationError};
use crate::id::{DeviceId, RoomId};

/// A room on a floor.
///
/// `floor` is a back-reference (the level of the owning floor), not an
/// owning link.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub floor: i64,
    pub room_name: Option<String>,
    pub room_size: f64,
    devices: Vec<Device>,
}

impl Room {
    /// Create an empty room.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::Validation`] if `room_size` is negative or
    /// not finite.
    pub fn new(
        id: RoomId,
        floor: i64,
        room_name: Option<String>,
        room_size: f64,
    ) -> Result<Self, SmartHouseError> {
        if !room_size.is_finite() || room_size < 0.0 {
            return Err(ValidationError::InvalidRoomSize(room_size).into());
        }
        Ok(Self {
            id,
            floor,
            room_name,
            room_size,
            devices: Vec::new(),
        })
    }

    /// Install a device in this room.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DeviceRoomMismatch`] if the device points
    /// to another room.
    pub fn add_device(&mut self, device: Device) -> Result<(), ValidationError> {
        if device.room != Some(self.id) {
            return Err(ValidationError::DeviceRoomMismatch {
                device: device.id,
                declared: device.room,
                actual: Some(self.id),
            });
        }
        self.devices.push(device);
        Ok(())
    }

    /// Devices in installation order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    #[must_use]
    pub fn device_ids(&self) -> Vec<&DeviceId> {
        self.devices.iter().map(|d| &d.id).collect()
    }
}
