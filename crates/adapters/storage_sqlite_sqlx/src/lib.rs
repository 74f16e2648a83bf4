//! # smarthouse-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`StorageAdapter`](smarthouse_app::ports::StorageAdapter)
//!   port defined in `smarthouse-app`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between port records and database rows
//! - Optionally seed an empty database with a small demo house
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for the port trait) and `smarthouse-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod error;
pub mod pool;
pub mod seed;
pub mod storage;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use storage::SqliteStorage;
