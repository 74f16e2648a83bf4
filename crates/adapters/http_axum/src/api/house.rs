//! Landing, greeting and house summary handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use smarthouse_app::ports::StorageAdapter;
use smarthouse_app::services::house_service::HouseSummary;

use crate::state::AppState;

/// Page the landing route sends browsers to.
pub const INDEX_PAGE: &str = "/static/index.html";

/// Query parameters for the greeting endpoint.
#[derive(Deserialize)]
pub struct HelloQuery {
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct Hello {
    pub hello: String,
}

/// `GET /`
pub async fn root() -> Response {
    Redirect::temporary(INDEX_PAGE).into_response()
}

/// `GET /hello?name=`
pub async fn hello(Query(query): Query<HelloQuery>) -> Json<Hello> {
    Json(Hello {
        hello: query.name.unwrap_or_else(|| "world".to_string()),
    })
}

/// `GET /smarthouse`
pub async fn summary<S>(State(state): State<AppState<S>>) -> Json<HouseSummary>
where
    S: StorageAdapter + Send + Sync + 'static,
{
    Json(state.house_service.summary())
}
