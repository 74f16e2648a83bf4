//! In-memory storage fake shared by the unit tests of this crate.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use smarthouse_domain::error::SmartHouseError;
use smarthouse_domain::id::{DeviceId, RoomId};
use smarthouse_domain::measurement::Measurement;

use crate::ports::{DeviceRecord, FloorRecord, RoomRecord, StorageAdapter};

/// Error the fake returns when told to fail.
#[derive(Debug, thiserror::Error)]
#[error("injected failure")]
pub(crate) struct InjectedFailure;

#[derive(Default)]
pub(crate) struct InMemoryStorage {
    floors: Mutex<Vec<FloorRecord>>,
    /// Rooms keyed by the floor level they are listed under.
    rooms: Mutex<Vec<(i64, RoomRecord)>>,
    devices: Mutex<Vec<DeviceRecord>>,
    measurements: Mutex<Vec<Measurement>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub stall: AtomicBool,
    pub writes: AtomicUsize,
}

impl InMemoryStorage {
    pub fn add_floor(&self, level: i64) {
        self.floors.lock().unwrap().push(FloorRecord { level });
    }

    pub fn add_room(&self, id: i64, floor: i64, name: Option<&str>, size: f64) {
        self.add_room_under(floor, id, floor, name, size);
    }

    /// List a room under `listed_under` while its record says `floor`.
    pub fn add_room_under(
        &self,
        listed_under: i64,
        id: i64,
        floor: i64,
        name: Option<&str>,
        size: f64,
    ) {
        self.rooms.lock().unwrap().push((
            listed_under,
            RoomRecord {
                id: RoomId::new(id),
                floor,
                name: name.map(str::to_owned),
                size,
            },
        ));
    }

    pub fn add_device(&self, id: &str, room: Option<i64>, kind: &str, state: Option<f64>) {
        self.devices.lock().unwrap().push(DeviceRecord {
            id: DeviceId::from(id),
            room: room.map(RoomId::new),
            kind: kind.to_owned(),
            model_name: format!("{id} model"),
            supplier: "ACME".to_owned(),
            device_type: "Generic".to_owned(),
            unit: None,
            state,
        });
    }

    pub fn remove_device(&self, id: &str) {
        self.devices.lock().unwrap().retain(|d| d.id.as_str() != id);
    }

    pub fn add_measurement(&self, measurement: Measurement) {
        self.measurements.lock().unwrap().push(measurement);
    }

    pub fn stored_state(&self, id: &str) -> Option<f64> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id.as_str() == id)
            .and_then(|d| d.state)
    }

    async fn gate(&self, flag: &AtomicBool) -> Result<(), SmartHouseError> {
        if self.stall.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if flag.load(Ordering::SeqCst) {
            return Err(SmartHouseError::Storage(Box::new(InjectedFailure)));
        }
        Ok(())
    }
}

impl StorageAdapter for InMemoryStorage {
    fn fetch_floors(
        &self,
    ) -> impl Future<Output = Result<Vec<FloorRecord>, SmartHouseError>> + Send {
        async {
            self.gate(&self.fail_reads).await?;
            Ok(self.floors.lock().unwrap().clone())
        }
    }

    fn fetch_rooms(
        &self,
        floor_level: i64,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send {
        async move {
            self.gate(&self.fail_reads).await?;
            let rooms = self.rooms.lock().unwrap();
            Ok(rooms
                .iter()
                .filter(|(listed, _)| *listed == floor_level)
                .map(|(_, room)| room.clone())
                .collect())
        }
    }

    fn fetch_orphan_rooms(
        &self,
    ) -> impl Future<Output = Result<Vec<RoomRecord>, SmartHouseError>> + Send {
        async {
            self.gate(&self.fail_reads).await?;
            let floors = self.floors.lock().unwrap().clone();
            let rooms = self.rooms.lock().unwrap();
            Ok(rooms
                .iter()
                .filter(|(_, room)| !floors.iter().any(|f| f.level == room.floor))
                .map(|(_, room)| room.clone())
                .collect())
        }
    }

    fn fetch_devices(
        &self,
        room_id: RoomId,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send {
        async move {
            self.gate(&self.fail_reads).await?;
            let devices = self.devices.lock().unwrap();
            Ok(devices
                .iter()
                .filter(|d| d.room == Some(room_id))
                .cloned()
                .collect())
        }
    }

    fn fetch_unassigned_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, SmartHouseError>> + Send {
        async {
            self.gate(&self.fail_reads).await?;
            let floors = self.floors.lock().unwrap().clone();
            let reachable: Vec<RoomId> = self
                .rooms
                .lock()
                .unwrap()
                .iter()
                .filter(|(listed, _)| floors.iter().any(|f| f.level == *listed))
                .map(|(_, room)| room.id)
                .collect();
            let devices = self.devices.lock().unwrap();
            Ok(devices
                .iter()
                .filter(|d| d.room.is_none_or(|room| !reachable.contains(&room)))
                .cloned()
                .collect())
        }
    }

    fn fetch_latest_measurement(
        &self,
        device_id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Measurement>, SmartHouseError>> + Send {
        async move {
            self.gate(&self.fail_reads).await?;
            let measurements = self.measurements.lock().unwrap();
            Ok(measurements
                .iter()
                .filter(|m| &m.device_id == device_id)
                .max_by_key(|m| m.timestamp)
                .cloned())
        }
    }

    fn write_actuator_state(
        &self,
        device_id: &DeviceId,
        state: Option<f64>,
    ) -> impl Future<Output = Result<bool, SmartHouseError>> + Send {
        async move {
            self.gate(&self.fail_writes).await?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut devices = self.devices.lock().unwrap();
            let Some(device) = devices.iter_mut().find(|d| &d.id == device_id) else {
                return Ok(false);
            };
            device.state = state;
            Ok(true)
        }
    }
}
