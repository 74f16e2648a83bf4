//! Device service — actuator control and sensor readings.
//!
//! Every state change follows the same sequence under the device's lock:
//! change the in-memory state, write it through the repository, and put the
//! previous state back unless the write succeeded. The restore also runs when
//! the request future is dropped mid-write, so memory and store agree
//! whenever the lock is free.

use std::sync::Arc;

use smarthouse_domain::device::{Actuator, Device};
use smarthouse_domain::error::{NotFoundError, SmartHouseError, ValidationError};
use smarthouse_domain::house::SmartHouse;
use smarthouse_domain::measurement::Measurement;

use crate::locks::DeviceLocks;
use crate::ports::StorageAdapter;
use crate::repository::SmartHouseRepository;

/// Application service for device control.
pub struct DeviceService<S> {
    house: Arc<SmartHouse>,
    repo: Arc<SmartHouseRepository<S>>,
    locks: DeviceLocks,
}

impl<S: StorageAdapter + Send + Sync> DeviceService<S> {
    /// Create a new service over the loaded house and its repository.
    pub fn new(house: Arc<SmartHouse>, repo: Arc<SmartHouseRepository<S>>) -> Self {
        let locks = DeviceLocks::for_house(&house);
        Self { house, repo, locks }
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::NotFound`] when no device with `id` exists.
    pub fn get_device(&self, id: &str) -> Result<&Device, SmartHouseError> {
        self.house.get_device_by_id(id).ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_owned(),
            }
            .into()
        })
    }

    /// Switch an actuator on with the given value and persist it.
    ///
    /// Returns the new state.
    ///
    /// # Errors
    ///
    /// - [`SmartHouseError::NotFound`] when the device does not exist
    /// - [`SmartHouseError::InvalidOperation`] when it is not an actuator
    /// - the repository error when the write fails; the in-memory state is
    ///   restored first
    /// - [`SmartHouseError::Validation`] when `value` is NaN or infinite
    #[tracing::instrument(skip(self))]
    pub async fn set_actuator_state(&self, id: &str, value: f64) -> Result<f64, SmartHouseError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteState(value).into());
        }
        let new_state = self
            .apply(id, |actuator| {
                actuator.turn_on(value);
            })
            .await?;
        Ok(new_state.unwrap_or(value))
    }

    /// Switch an actuator off and persist it.
    ///
    /// # Errors
    ///
    /// Same as [`set_actuator_state`](Self::set_actuator_state).
    #[tracing::instrument(skip(self))]
    pub async fn turn_off(&self, id: &str) -> Result<(), SmartHouseError> {
        self.apply(id, Actuator::turn_off).await?;
        Ok(())
    }

    /// Most recent measurement of a sensor, `None` when it has none.
    ///
    /// # Errors
    ///
    /// - [`SmartHouseError::NotFound`] when the device does not exist
    /// - [`SmartHouseError::InvalidOperation`] when it is not a sensor
    /// - [`SmartHouseError::Storage`] when the read fails
    pub async fn latest_measurement(
        &self,
        id: &str,
    ) -> Result<Option<Measurement>, SmartHouseError> {
        let device = self.get_device(id)?;
        self.repo.get_latest_reading(device).await
    }

    async fn apply(
        &self,
        id: &str,
        change: impl FnOnce(&Actuator),
    ) -> Result<Option<f64>, SmartHouseError> {
        let device = self.get_device(id)?;
        let actuator = device.actuator()?;

        let _guard = self.locks.lock(id).await;
        let restore = Restore::new(actuator);
        change(actuator);

        if let Err(err) = self.repo.update_actuator_state(device).await {
            tracing::warn!(
                device_id = %device.id,
                error = %err,
                "actuator write failed, in-memory state restored"
            );
            return Err(err);
        }
        restore.disarm();
        Ok(actuator.state())
    }
}

/// Puts an actuator back to the state it had when the guard was created,
/// unless [`disarm`](Self::disarm) is called first.
struct Restore<'a> {
    actuator: &'a Actuator,
    previous: Option<f64>,
    armed: bool,
}

impl<'a> Restore<'a> {
    fn new(actuator: &'a Actuator) -> Self {
        Self {
            actuator,
            previous: actuator.state(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.actuator.set_state(self.previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStorage;
    use chrono::TimeZone;
    use smarthouse_domain::id::DeviceId;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    async fn make_service() -> (Arc<InMemoryStorage>, DeviceService<Arc<InMemoryStorage>>) {
        let storage = InMemoryStorage::default();
        storage.add_floor(0);
        storage.add_floor(1);
        storage.add_room(1, 0, Some("Kitchen"), 12.5);
        storage.add_room(2, 1, Some("Office"), 9.0);
        storage.add_device("A1", Some(1), "actuator", None);
        storage.add_device("A2", Some(2), "actuator", Some(1.0));
        storage.add_device("T1", Some(1), "sensor", None);
        storage.add_device("P1", Some(2), "plain", None);
        let storage = Arc::new(storage);

        let repo = SmartHouseRepository::new(Arc::clone(&storage))
            .with_timeout(Duration::from_millis(50));
        let house = Arc::new(repo.load_deep().await.unwrap());
        (storage, DeviceService::new(house, Arc::new(repo)))
    }

    fn state_of(svc: &DeviceService<Arc<InMemoryStorage>>, id: &str) -> Option<f64> {
        svc.get_device(id).unwrap().actuator().unwrap().state()
    }

    #[tokio::test]
    async fn should_write_through_when_turning_on() {
        let (storage, svc) = make_service().await;

        let state = svc.set_actuator_state("A1", 0.7).await.unwrap();

        assert!((state - 0.7).abs() < f64::EPSILON);
        assert_eq!(state_of(&svc, "A1"), Some(0.7));
        assert_eq!(storage.stored_state("A1"), Some(0.7));
    }

    #[tokio::test]
    async fn should_write_through_when_turning_off() {
        let (storage, svc) = make_service().await;

        svc.turn_off("A2").await.unwrap();

        assert_eq!(state_of(&svc, "A2"), None);
        assert_eq!(storage.stored_state("A2"), None);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let (storage, svc) = make_service().await;
        let result = svc.set_actuator_state("nope", 1.0).await;
        assert!(matches!(result, Err(SmartHouseError::NotFound(_))));
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_reject_non_actuators() {
        let (storage, svc) = make_service().await;

        for id in ["T1", "P1"] {
            let result = svc.set_actuator_state(id, 1.0).await;
            assert!(matches!(result, Err(SmartHouseError::InvalidOperation(_))));
        }
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_restore_memory_when_write_fails() {
        let (storage, svc) = make_service().await;
        storage.fail_writes.store(true, Ordering::SeqCst);

        let result = svc.set_actuator_state("A2", 5.0).await;

        assert!(matches!(result, Err(SmartHouseError::StorageWrite(_))));
        assert_eq!(state_of(&svc, "A2"), Some(1.0));
        assert_eq!(storage.stored_state("A2"), Some(1.0));
    }

    #[tokio::test]
    async fn should_restore_memory_when_device_vanished_from_storage() {
        let (storage, svc) = make_service().await;
        storage.remove_device("A1");

        let result = svc.set_actuator_state("A1", 2.0).await;

        assert!(matches!(result, Err(SmartHouseError::NotFound(_))));
        assert_eq!(state_of(&svc, "A1"), None);
    }

    #[tokio::test]
    async fn should_restore_memory_when_write_is_cancelled() {
        let (storage, svc) = make_service().await;
        storage.stall.store(true, Ordering::SeqCst);

        let result =
            tokio::time::timeout(Duration::from_millis(20), svc.set_actuator_state("A2", 9.0))
                .await;

        assert!(result.is_err());
        assert_eq!(state_of(&svc, "A2"), Some(1.0));
        assert_eq!(storage.stored_state("A2"), Some(1.0));

        storage.stall.store(false, Ordering::SeqCst);
        svc.set_actuator_state("A2", 4.0).await.unwrap();
        assert_eq!(state_of(&svc, "A2"), Some(4.0));
    }

    #[tokio::test]
    async fn should_reject_non_finite_state_without_touching_memory() {
        let (storage, svc) = make_service().await;

        for value in [f64::NAN, f64::INFINITY] {
            let result = svc.set_actuator_state("A2", value).await;
            assert!(matches!(
                result,
                Err(SmartHouseError::Validation(ValidationError::NonFiniteState(_)))
            ));
        }
        assert_eq!(state_of(&svc, "A2"), Some(1.0));
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_keep_memory_and_store_aligned_under_concurrent_writes() {
        let (storage, svc) = make_service().await;
        let svc = Arc::new(svc);

        let mut handles = Vec::new();
        for i in 0..20 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.set_actuator_state("A1", f64::from(i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(state_of(&svc, "A1"), storage.stored_state("A1"));
        assert_eq!(storage.writes.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn should_return_latest_measurement_for_sensor() {
        let (storage, svc) = make_service().await;
        assert!(svc.latest_measurement("T1").await.unwrap().is_none());

        let reading = Measurement::new(
            DeviceId::from("T1"),
            20.5,
            chrono::Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            Some("°C".to_string()),
        );
        storage.add_measurement(reading.clone());

        assert_eq!(svc.latest_measurement("T1").await.unwrap(), Some(reading));
    }

    #[tokio::test]
    async fn should_reject_measurement_for_non_sensor() {
        let (_storage, svc) = make_service().await;
        let result = svc.latest_measurement("A1").await;
        assert!(matches!(result, Err(SmartHouseError::InvalidOperation(_))));
        let result = svc.latest_measurement("missing").await;
        assert!(matches!(result, Err(SmartHouseError::NotFound(_))));
    }
}
