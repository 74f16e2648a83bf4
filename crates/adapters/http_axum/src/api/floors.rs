//! Floor and room projections. Lookups that miss answer with empty JSON
//! rather than an error.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use smarthouse_app::ports::StorageAdapter;
use smarthouse_app::services::house_service::{RoomDetail, RoomSummary};

use crate::state::AppState;

/// Possible responses from the single-room endpoint.
pub enum RoomResponse {
    Ok(Json<RoomDetail>),
    /// Floor missing or index out of range: `{}`.
    Empty,
}

impl IntoResponse for RoomResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
            Self::Empty => Json(serde_json::Map::new()).into_response(),
        }
    }
}

/// `GET /smarthouse/floor`
pub async fn list<S>(State(state): State<AppState<S>>) -> Json<Vec<i64>>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Json(state.house_service.floor_levels())
}

/// `GET /smarthouse/floor/{fid}`
pub async fn room_names<S>(
    State(state): State<AppState<S>>,
    Path(fid): Path<i64>,
) -> Json<Vec<String>>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Json(state.house_service.room_names(fid))
}

/// `GET /smarthouse/floor/{fid}/room`
pub async fn rooms<S>(
    State(state): State<AppState<S>>,
    Path(fid): Path<i64>,
) -> Json<Vec<RoomSummary>>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Json(state.house_service.room_summaries(fid))
}

/// `GET /smarthouse/floor/{fid}/room/{rid}`
///
/// `rid` is the position of the room on its floor. Negative positions are
/// treated as out of range.
pub async fn room<S>(
    State(state): State<AppState<S>>,
    Path((fid, rid)): Path<(i64, i64)>,
) -> RoomResponse
where
    S: StorageAdapter + Send + Sync + 'static,
{
    usize::try_from(rid)
        .ok()
        .and_then(|index| state.house_service.room_at(fid, index))
        .map_or(RoomResponse::Empty, |room| RoomResponse::Ok(Json(room)))
}
