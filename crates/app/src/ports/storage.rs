//! Storage port — the narrow read/write contract over the relational store.
//!
//! Records are flat rows with foreign keys; turning them into a linked graph
//! is the repository's job. Every call is expected to either fully apply or
//! fully fail. There is no transaction spanning several calls.

use std::future::Future;

use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::{DeviceId, RoomId};
use smarthouse_domain::measurement::Measurement;

/// A stored floor.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorRecord {
    pub level: i64,
}

/// A stored room with its floor foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRecord {
    pub id: RoomId,
    pub floor: i64,
    pub name: Option<String>,
    pub size: f64,
}

/// A stored device with its room foreign key and kind discriminator.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub room: Option<RoomId>,
    /// Capability discriminator (`plain`, `sensor`, `actuator`,
    /// `actuator_sensor`).
    pub kind: String,
    pub model_name: String,
    pub supplier: String,
    pub device_type: String,
    pub unit: Option<String>,
    pub state: Option<f64>,
}

/// Read/write access to the relational store.
pub trait StorageAdapter {
    /// All floors.
    fn fetch_floors(
        &self,
    ) -> impl Future<Output = Result<Vec<FloorRecord>, SmartHouseError>> + Send;

    /// Rooms on the floor with the given level, in storage order.
    fn fetch_rooms(
        &self,
        floor_level: i64,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send;

    /// Rooms whose floor foreign key matches no stored floor.
    fn fetch_orphan_rooms(
        &self,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send;

    /// Devices installed in the given room, in storage order.
    fn fetch_devices(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send;

    /// Devices that are not installed in any room reachable from a floor.
    ///
    /// This includes devices whose room foreign key dangles, so the caller
    /// can detect the broken reference.
    fn fetch_unassigned_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send;

    /// Most recent measurement of a device, by timestamp.
    fn fetch_latest_measurement(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send;

    /// Store an actuator state (`None` = off).
    ///
    /// Resolves to `false` when no device with that id exists.
    fn write_actuator_state(
        &self,
        device_id: &DeviceId,
        state: Option<f64>,
    ) -> impl Future<Output = Result<bool, SmartHouseError>> + Send;
}

impl<T: StorageAdapter + Send + Sync> StorageAdapter for std::sync::Arc<T> {
    fn fetch_floors(
        &self,
    ) -> impl Future<Output = Result<Vec<FloorRecord>, SmartHouseError>> + Send {
        (**self).fetch_floors()
    }

    fn fetch_rooms(
        &self,
        floor_level: i64,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send {
        (**self).fetch_rooms(floor_level)
    }

    fn fetch_orphan_rooms(
        &self,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send {
        (**self).fetch_orphan_rooms()
    }

    fn fetch_devices(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send {
        (**self).fetch_devices(room_id)
    }

    fn fetch_unassigned_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send {
        (**self).fetch_unassigned_devices()
    }

    fn fetch_latest_measurement(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
        (**self).fetch_latest_measurement(device_id)
    }

    fn write_actuator_state(
        &self,
        device_id: &DeviceId,
        state: Option<f64>,
    ) -> impl Future<Output = Result<bool, SmartHouseError>> + Send {
        (**self).write_actuator_state(device_id, state)
    }
}
