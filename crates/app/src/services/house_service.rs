//! House service — read-only projections over the loaded house.
//!
//! Lookup misses become empty results here; nothing in this service fails.

use std::sync::Arc;

use serde::Serialize;

use smarthouse_domain::device::{Device, DeviceKind};
use smarthouse_domain::house::SmartHouse;
use smarthouse_domain::id::DeviceId;
use smarthouse_domain::room::Room;

/// Placeholder shown for rooms without a name.
pub const UNNAMED_ROOM: &str = "Unnamed Room";

/// Overall shape of the house.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseSummary {
    pub no_rooms: usize,
    pub no_floors: usize,
    pub registered_devices: usize,
    pub area: f64,
}

/// A room with its device count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub name: Option<String>,
    pub size: f64,
    pub devices: usize,
}

/// A room with the ids of its devices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDetail {
    pub name: Option<String>,
    pub size: f64,
    pub devices: Vec<DeviceId>,
}

/// One row of the device listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub id: DeviceId,
    pub model: String,
    pub supplier: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub room: Option<String>,
}

/// Everything known about a single device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDetail {
    pub id: DeviceId,
    pub model: String,
    pub supplier: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub kind: DeviceKind,
    pub room: Option<String>,
    pub floor: Option<i64>,
    pub unit: Option<String>,
    pub state: Option<f64>,
    pub active: Option<bool>,
}

/// Read-only queries over the shared house graph.
pub struct HouseService {
    house: Arc<SmartHouse>,
}

impl HouseService {
    /// Create a new service over the loaded house.
    pub fn new(house: Arc<SmartHouse>) -> Self {
        Self { house }
    }

    #[must_use]
    pub fn house(&self) -> &SmartHouse {
        &self.house
    }

    #[must_use]
    pub fn summary(&self) -> HouseSummary {
        HouseSummary {
            no_rooms: self.house.get_rooms().len(),
            no_floors: self.house.get_floors().len(),
            registered_devices: self.house.get_devices().len(),
            area: self.house.get_area(),
        }
    }

    /// Floor levels, lowest first.
    #[must_use]
    pub fn floor_levels(&self) -> Vec<i64> {
        self.house.get_floors().iter().map(|f| f.level).collect()
    }

    /// Names of the rooms on a floor; empty when the floor does not exist.
    #[must_use]
    pub fn room_names(&self, level: i64) -> Vec<String> {
        self.rooms_on(level)
            .iter()
            .map(|room| {
                room.room_name
                    .clone()
                    .unwrap_or_else(|| UNNAMED_ROOM.to_owned())
            })
            .collect()
    }

    /// Size and device count of the rooms on a floor; empty when the floor
    /// does not exist.
    #[must_use]
    pub fn room_summaries(&self, level: i64) -> Vec<RoomSummary> {
        self.rooms_on(level)
            .iter()
            .map(|room| RoomSummary {
                name: room.room_name.clone(),
                size: room.room_size,
                devices: room.devices().len(),
            })
            .collect()
    }

    /// The room at a positional index on a floor.
    ///
    /// `None` when the floor does not exist or the index is out of range.
    #[must_use]
    pub fn room_at(&self, level: i64, index: usize) -> Option<RoomDetail> {
        let room = self.house.get_floor(level)?.room_at(index)?;
        Some(RoomDetail {
            name: room.room_name.clone(),
            size: room.room_size,
            devices: room.devices().iter().map(|d| d.id.clone()).collect(),
        })
    }

    #[must_use]
    pub fn devices(&self) -> Vec<DeviceSummary> {
        self.house
            .get_devices()
            .into_iter()
            .map(|device| DeviceSummary {
                id: device.id.clone(),
                model: device.model_name.clone(),
                supplier: device.supplier.clone(),
                device_type: device.device_type.clone(),
                room: self.room_name_of(device),
            })
            .collect()
    }

    /// Detail view of one device, `None` for unknown ids.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<DeviceDetail> {
        let device = self.house.get_device_by_id(id)?;
        let room = self.house.room_of(device);
        Some(DeviceDetail {
            id: device.id.clone(),
            model: device.model_name.clone(),
            supplier: device.supplier.clone(),
            device_type: device.device_type.clone(),
            kind: device.kind(),
            room: room.and_then(|r| r.room_name.clone()),
            floor: room.map(|r| r.floor),
            unit: device.sensor.as_ref().and_then(|s| s.unit.clone()),
            state: device.actuator.as_ref().and_then(|a| a.state()),
            active: device.actuator.as_ref().map(|a| a.is_active()),
        })
    }

    fn rooms_on(&self, level: i64) -> &[Room] {
        self.house.get_floor(level).map_or(&[][..], |floor| floor.rooms())
    }

    fn room_name_of(&self, device: &Device) -> Option<String> {
        self.house
            .room_of(device)
            .and_then(|room| room.room_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthouse_domain::device::{Actuator, Sensor};
    use smarthouse_domain::floor::Floor;
    use smarthouse_domain::id::RoomId;

    /// Floor 0: Kitchen (12.5) with actuator `A1`, an unnamed storage room
    /// (3.0) with sensor `T1`. Floor 1: empty Attic (20.0). Loose `U1`.
    fn make_service() -> HouseService {
        let mut kitchen = Room::new(RoomId::new(1), 0, Some("Kitchen".to_string()), 12.5).unwrap();
        kitchen
            .add_device(
                Device::builder()
                    .id("A1")
                    .model_name("Hue White")
                    .supplier("Philips")
                    .device_type("Light bulb")
                    .room(RoomId::new(1))
                    .actuator(Actuator::new(Some(0.3)))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let mut storage = Room::new(RoomId::new(2), 0, None, 3.0).unwrap();
        storage
            .add_device(
                Device::builder()
                    .id("T1")
                    .room(RoomId::new(2))
                    .sensor(Sensor {
                        unit: Some("°C".to_string()),
                    })
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let attic = Room::new(RoomId::new(3), 1, Some("Attic".to_string()), 20.0).unwrap();

        let mut ground = Floor::new(0);
        ground.add_room(kitchen).unwrap();
        ground.add_room(storage).unwrap();
        let mut first = Floor::new(1);
        first.add_room(attic).unwrap();

        let house = SmartHouse::builder()
            .floor(ground)
            .floor(first)
            .unassigned_device(Device::builder().id("U1").build().unwrap())
            .build()
            .unwrap();
        HouseService::new(Arc::new(house))
    }

    #[test]
    fn should_summarize_house() {
        let svc = make_service();
        let summary = svc.summary();
        assert_eq!(summary.no_rooms, 3);
        assert_eq!(summary.no_floors, 2);
        assert_eq!(summary.registered_devices, 3);
        assert!((summary.area - 35.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_list_floor_levels_in_order() {
        assert_eq!(make_service().floor_levels(), vec![0, 1]);
    }

    #[test]
    fn should_name_unnamed_rooms() {
        let svc = make_service();
        assert_eq!(svc.room_names(0), vec!["Kitchen", UNNAMED_ROOM]);
    }

    #[test]
    fn should_return_empty_lists_for_missing_floor() {
        let svc = make_service();
        assert!(svc.room_names(7).is_empty());
        assert!(svc.room_summaries(-1).is_empty());
    }

    #[test]
    fn should_count_devices_per_room() {
        let svc = make_service();
        let summaries = svc.room_summaries(0);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name.as_deref(), Some("Kitchen"));
        assert_eq!(summaries[0].devices, 1);
        assert_eq!(summaries[1].name, None);
    }

    #[test]
    fn should_return_room_by_position() {
        let svc = make_service();
        let kitchen = svc.room_at(0, 0).unwrap();
        assert_eq!(kitchen.devices, vec![DeviceId::from("A1")]);
        assert!(svc.room_at(0, 2).is_none());
        assert!(svc.room_at(5, 0).is_none());
    }

    #[test]
    fn should_project_devices_with_room_names() {
        let svc = make_service();
        let devices = svc.devices();
        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].id.as_str(), "A1");
        assert_eq!(devices[0].room.as_deref(), Some("Kitchen"));
        assert_eq!(devices[1].room, None);
        assert_eq!(devices[2].id.as_str(), "U1");
        assert_eq!(devices[2].room, None);

        let json = serde_json::to_value(&devices[0]).unwrap();
        assert_eq!(json["type"], "Light bulb");
        assert_eq!(json["model"], "Hue White");
    }

    #[test]
    fn should_describe_single_device() {
        let svc = make_service();
        let a1 = svc.device("A1").unwrap();
        assert_eq!(a1.kind, DeviceKind::Actuator);
        assert_eq!(a1.floor, Some(0));
        assert_eq!(a1.state, Some(0.3));
        assert_eq!(a1.active, Some(true));

        let t1 = svc.device("T1").unwrap();
        assert_eq!(t1.unit.as_deref(), Some("°C"));
        assert_eq!(t1.active, None);

        assert!(svc.device("nope").is_none());
    }
}
