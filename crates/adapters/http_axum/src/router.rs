//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use smarthouse_app::ports::StorageAdapter;

use crate::api;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/smarthouse` and, when `static_dir` points at
/// an existing directory, serves it under `/static`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<S>(state: AppState<S>, static_dir: Option<&Path>) -> Router
where
    S: StorageAdapter + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/", get(api::house::root))
        .route("/health", get(health_check))
        .route("/hello", get(api::house::hello))
        .route("/smarthouse", get(api::house::summary::<S>))
        .nest("/smarthouse", api::routes());

    match static_dir {
        Some(dir) if dir.is_dir() => {
            router = router.nest_service("/static", ServeDir::new(dir));
        }
        Some(dir) => {
            tracing::warn!(
                path = %dir.display(),
                "static directory not found, not serving /static"
            );
        }
        None => {}
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
