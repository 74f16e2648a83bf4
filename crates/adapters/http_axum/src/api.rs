//! JSON API handler modules and the `/smarthouse` sub-router.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod floors;
pub mod house;

use axum::Router;
use axum::routing::{get, post};

use smarthouse_app::ports::StorageAdapter;

use crate::state::AppState;

/// Build the `/smarthouse` sub-router.
///
/// The bare `/smarthouse` summary is registered by the top-level router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Router::new()
        // Floors and rooms
        .route("/floor", get(floors::list::<S>))
        .route("/floor/{fid}", get(floors::room_names::<S>))
        .route("/floor/{fid}/room", get(floors::rooms::<S>))
        .route("/floor/{fid}/room/{rid}", get(floors::room::<S>))
        // Devices
        .route("/devices", get(devices::list::<S>))
        .route("/device/{device_id}", get(devices::get::<S>))
        .route(
            "/device/{device_id}/state",
            post(devices::set_state::<S>).delete(devices::turn_off::<S>),
        )
        .route(
            "/device/{device_id}/measurement",
            get(devices::measurement::<S>),
        )
}
