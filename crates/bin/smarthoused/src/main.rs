//! # smarthoused — smarthouse daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool, run migrations and optionally
//!   seed demo data
//! - Deep-load the house once; a load failure aborts startup
//! - Construct application services around the shared house
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use smarthouse_adapter_http_axum::router;
use smarthouse_adapter_http_axum::state::AppState;
use smarthouse_adapter_storage_sqlite_sqlx::{SqliteStorage, seed};
use smarthouse_app::repository::SmartHouseRepository;
use smarthouse_app::services::device_service::DeviceService;
use smarthouse_app::services::house_service::HouseService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database
    let db = smarthouse_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open the database")?;
    if config.database.seed_demo {
        seed::seed_demo(db.pool())
            .await
            .context("failed to seed demo data")?;
    }

    // House
    let repo = SmartHouseRepository::new(SqliteStorage::new(db.pool().clone()))
        .with_timeout(config.storage_timeout());
    let house = Arc::new(
        repo.load_deep()
            .await
            .context("failed to load the house from storage")?,
    );

    // Services
    let state = AppState::new(
        HouseService::new(Arc::clone(&house)),
        DeviceService::new(house, Arc::new(repo)),
    );

    // HTTP
    let app = router::build(state, Some(config.web.static_dir.as_path()));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "smarthoused listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("smarthoused stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
