//! JSON handlers for devices: listing, detail, actuator state and the latest
//! sensor measurement.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use smarthouse_app::ports::StorageAdapter;
use smarthouse_app::services::house_service::{DeviceDetail, DeviceSummary};
use smarthouse_domain::error::{NotFoundError, SmartHouseError};
use smarthouse_domain::measurement::Measurement;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the set-state endpoint.
#[derive(Deserialize)]
pub struct SetStateQuery {
    pub new_state: f64,
}

/// Body returned after an actuator state change.
#[derive(Serialize)]
pub struct StateUpdated {
    pub status: &'static str,
    pub new_state: Option<f64>,
}

impl StateUpdated {
    fn new(new_state: Option<f64>) -> Self {
        Self {
            status: "updated",
            new_state,
        }
    }
}

#[derive(Serialize)]
struct NoData {
    message: &'static str,
}

/// Possible responses from the measurement endpoint.
pub enum MeasurementResponse {
    Ok(Json<Measurement>),
    NoData,
}

impl IntoResponse for MeasurementResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::NoData => Json(NoData {
                message: "No data found",
            })
            .into_response(),
        }
    }
}

/// `GET /smarthouse/devices`
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<DeviceSummary>>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Json(state.house_service.devices())
}

/// `GET /smarthouse/device/{device_id}`
pub async fn get<S>(
    State(state): State<AppState<S>>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceDetail>, ApiError>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    let detail = state.house_service.device(&device_id).ok_or_else(|| {
        SmartHouseError::from(NotFoundError {
            entity: "Device",
            id: device_id,
        })
    })?;
    Ok(Json(detail))
}

/// `POST /smarthouse/device/{device_id}/state?new_state=`
pub async fn set_state<S>(
    State(state): State<AppState<S>>,
    Path(device_id): Path<String>,
    Query(query): Query<SetStateQuery>,
) -> Result<Json<StateUpdated>, ApiError>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    let new_state = state
        .device_service
        .set_actuator_state(&device_id, query.new_state)
        .await?;
    Ok(Json(StateUpdated::new(Some(new_state))))
}

/// `DELETE /smarthouse/device/{device_id}/state`
pub async fn turn_off<S>(
    State(state): State<AppState<S>>,
    Path(device_id): Path<String>,
) -> Result<Json<StateUpdated>, ApiError>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    state.device_service.turn_off(&device_id).await?;
    Ok(Json(StateUpdated::new(None)))
}

/// `GET /smarthouse/device/{device_id}/measurement`
pub async fn measurement<S>(
    State(state): State<AppState<S>>,
    Path(device_id): Path<String>,
) -> Result<MeasurementResponse, ApiError>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    let latest = state.device_service.latest_measurement(&device_id).await?;
    Ok(latest.map_or(MeasurementResponse::NoData, |m| {
        MeasurementResponse::Ok(Json(m))
    }))
}
