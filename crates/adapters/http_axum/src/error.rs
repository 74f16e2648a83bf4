//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthouse_domain::error::SmartHouseError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SmartHouseError`] to an HTTP response with appropriate status code.
pub struct ApiError(SmartHouseError);

impl From<SmartHouseError> for ApiError {
    fn from(err: SmartHouseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SmartHouseError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SmartHouseError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SmartHouseError::InvalidOperation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            SmartHouseError::Repository(_)
            | SmartHouseError::StorageWrite(_)
            | SmartHouseError::Storage(_) => {
                tracing::error!(error = ?self.0, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthouse_domain::error::{Capability, InvalidOperationError, NotFoundError};

    #[test]
    fn should_map_errors_to_status_codes() {
        let cases = [
            (
                SmartHouseError::from(NotFoundError {
                    entity: "Device",
                    id: "x".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                SmartHouseError::from(InvalidOperationError {
                    device: "T1".into(),
                    required: Capability::Actuator,
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                SmartHouseError::StorageWrite("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }
}
