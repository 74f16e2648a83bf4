//! Shared application state for axum handlers.

use std::sync::Arc;

use smarthouse_app::ports::StorageAdapter;
use smarthouse_app::services::device_service::DeviceService;
use smarthouse_app::services::house_service::HouseService;

/// Application state shared across all axum handlers.
///
/// Generic over the storage adapter to avoid dynamic dispatch. `Clone` is
/// implemented manually so the adapter itself does not need to be `Clone`;
/// only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Read-only projections over the house.
    pub house_service: Arc<HouseService>,
    /// Actuator control and sensor readings.
    pub device_service: Arc<DeviceService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            house_service: Arc::clone(&self.house_service),
            device_service: Arc::clone(&self.device_service),
        }
    }
}

impl<S> AppState<S>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(house_service: HouseService, device_service: DeviceService<S>) -> Self {
        Self {
            house_service: Arc::new(house_service),
            device_service: Arc::new(device_service),
        }
    }
}
