//! Per-device write serialization.
//!
//! The house graph is immutable in shape after the deep load, so the set of
//! actuators is known up front and the lock table never changes. Mutations
//! on one device queue behind each other; mutations on different devices
//! run in parallel.

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use smarthouse_domain::house::SmartHouse;
use smarthouse_domain::id::DeviceId;

/// One async mutex per actuator, keyed by device id.
#[derive(Debug, Default)]
pub struct DeviceLocks {
    locks: HashMap<DeviceId, Mutex<()>>,
}

impl DeviceLocks {
    /// Build the lock table for every actuator in `house`.
    #[must_use]
    pub fn for_house(house: &SmartHouse) -> Self {
        Self {
            locks: house
                .actuators()
                .map(|(id, _)| (id.clone(), Mutex::new(())))
                .collect(),
        }
    }

    /// Wait for exclusive access to a device.
    ///
    /// Returns `None` for ids that have no lock (non-actuators, unknown ids).
    pub async fn lock(&self, id: &str) -> Option<MutexGuard<'_, ()>> {
        match self.locks.get(id) {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
