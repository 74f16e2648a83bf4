//! Repository — deep load of the house graph and write-back of mutations.
//!
//! This is the only component that talks to the [`StorageAdapter`]. Every
//! storage call is bounded by a timeout; an expired call surfaces as a
//! storage error and is never retried here.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use smarthouse_domain::device::{Device, DeviceKind};
use smarthouse_domain::error::{
    NotFoundError, RepositoryError, SmartHouseError, StorageTimeout, ValidationError,
};
use smarthouse_domain::floor::Floor;
use smarthouse_domain::house::SmartHouse;
use smarthouse_domain::measurement::Measurement;
use smarthouse_domain::room::Room;

use crate::ports::{DeviceRecord, StorageAdapter};

/// Time budget for a single storage call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Loads the [`SmartHouse`] and persists changes made to it.
pub struct SmartHouseRepository<S> {
    storage: S,
    timeout: Duration,
}

impl<S: StorageAdapter + Sync> SmartHouseRepository<S> {
    /// Create a repository over the given storage adapter.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call storage timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Borrow the underlying storage adapter.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the whole topology and assemble a fully linked house.
    ///
    /// Floors are read first, then the rooms of each floor, then the devices
    /// of each room, then the devices without a room. Rooms pointing at a
    /// floor that does not exist abort the load before any room is read.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::Repository`] if any read fails or times
    /// out, or if the stored data is not referentially consistent. Nothing
    /// is returned in that case.
    #[tracing::instrument(skip(self))]
    pub async fn load_deep(&self) -> Result<SmartHouse, SmartHouseError> {
        let floor_records = self.read("floors", self.storage.fetch_floors()).await?;
        let orphans = self
            .read("orphan rooms", self.storage.fetch_orphan_rooms())
            .await?;
        if let Some(orphan) = orphans.into_iter().next() {
            return Err(RepositoryError::MissingFloor {
                room: orphan.id,
                floor: orphan.floor,
            }
            .into());
        }

        let mut builder = SmartHouse::builder();
        let mut loaded_rooms = HashSet::new();
        let mut device_count = 0usize;

        for floor_record in floor_records {
            let mut floor = Floor::new(floor_record.level);
            let room_records = self
                .read("rooms", self.storage.fetch_rooms(floor.level))
                .await?;

            for room_record in room_records {
                if room_record.floor != floor.level {
                    return Err(RepositoryError::FloorMismatch {
                        room: room_record.id,
                        expected: floor.level,
                        found: room_record.floor,
                    }
                    .into());
                }
                let mut room = Room::new(
                    room_record.id,
                    room_record.floor,
                    room_record.name,
                    room_record.size,
                )
                .map_err(into_repository_error)?;

                let device_records = self
                    .read("devices", self.storage.fetch_devices(room.id))
                    .await?;
                for record in device_records {
                    room.add_device(device_from_record(record)?)
                        .map_err(RepositoryError::from)?;
                    device_count += 1;
                }

                loaded_rooms.insert(room.id);
                floor.add_room(room).map_err(RepositoryError::from)?;
            }
            builder = builder.floor(floor);
        }

        let unassigned = self
            .read("unassigned devices", self.storage.fetch_unassigned_devices())
            .await?;
        for record in unassigned {
            if let Some(room) = record.room
                && !loaded_rooms.contains(&room)
            {
                return Err(RepositoryError::MissingRoom {
                    device: record.id,
                    room,
                }
                .into());
            }
            builder = builder.unassigned_device(device_from_record(record)?);
            device_count += 1;
        }

        let house = builder.build().map_err(RepositoryError::from)?;
        tracing::info!(
            floors = house.get_floors().len(),
            rooms = loaded_rooms.len(),
            devices = device_count,
            "house loaded"
        );
        Ok(house)
    }

    /// Persist the device's current in-memory actuator state.
    ///
    /// Writing the same state twice leaves the store unchanged.
    ///
    /// # Errors
    ///
    /// - [`SmartHouseError::InvalidOperation`] if the device cannot actuate
    /// - [`SmartHouseError::Validation`] if the state is NaN or infinite,
    ///   which the store cannot represent
    /// - [`SmartHouseError::NotFound`] if the device is gone from storage
    /// - [`SmartHouseError::StorageWrite`] if the write fails or times out
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id))]
    pub async fn update_actuator_state(&self, device: &Device) -> Result<(), SmartHouseError> {
        let state = device.actuator()?.state();
        if let Some(value) = state
            && !value.is_finite()
        {
            return Err(ValidationError::NonFiniteState(value).into());
        }
        let updated = self
            .call(
                "write_actuator_state",
                self.storage.write_actuator_state(&device.id, state),
            )
            .await
            .map_err(SmartHouseError::into_write_error)?;

        if !updated {
            return Err(NotFoundError {
                entity: "Device",
                id: device.id.to_string(),
            }
            .into());
        }
        tracing::debug!(?state, "actuator state persisted");
        Ok(())
    }

    /// Most recent measurement recorded for a sensor, if any.
    ///
    /// # Errors
    ///
    /// - [`SmartHouseError::InvalidOperation`] if the device cannot sense
    /// - [`SmartHouseError::Storage`] if the read fails or times out
    pub async fn get_latest_reading(
        &self,
        device: &Device,
    ) -> Result<Option<Measurement>, SmartHouseError> {
        device.sensor()?;
        self.call(
            "fetch_latest_measurement",
            self.storage.fetch_latest_measurement(&device.id),
        )
        .await
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T, SmartHouseError>>,
    ) -> Result<T, SmartHouseError> {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| {
                SmartHouseError::Storage(Box::new(StorageTimeout {
                    operation,
                    after: self.timeout,
                }))
            })?
    }

    async fn read<T>(
        &self,
        stage: &'static str,
        future: impl Future<Output = Result<T, SmartHouseError>>,
    ) -> Result<T, RepositoryError> {
        match tokio::time::timeout(self.timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(SmartHouseError::Storage(source))) => {
                Err(RepositoryError::Read { stage, source })
            }
            Ok(Err(other)) => Err(RepositoryError::Read {
                stage,
                source: Box::new(other),
            }),
            Err(_) => Err(RepositoryError::Timeout {
                stage,
                after: self.timeout,
            }),
        }
    }
}

fn device_from_record(record: DeviceRecord) -> Result<Device, RepositoryError> {
    let kind: DeviceKind = record.kind.parse()?;
    let mut builder = Device::builder()
        .id(record.id)
        .model_name(record.model_name)
        .supplier(record.supplier)
        .device_type(record.device_type)
        .kind(kind, record.unit, record.state);
    if let Some(room) = record.room {
        builder = builder.room(room);
    }
    builder.build().map_err(into_repository_error)
}

fn into_repository_error(err: SmartHouseError) -> RepositoryError {
    match err {
        SmartHouseError::Validation(err) => RepositoryError::Invalid(err),
        other => RepositoryError::Read {
            stage: "records",
            source: Box::new(other),
        },
    }
}
