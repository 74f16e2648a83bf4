//! # smarthouse-app
//!
//! Application layer: the storage **port**, the deep-load **repository** and
//! the use-case **services**.
//!
//! ## Responsibilities
//! - Define the [`StorageAdapter`](ports::StorageAdapter) port that storage
//!   adapters implement
//! - Build the [`SmartHouse`](smarthouse_domain::house::SmartHouse) graph in
//!   one deep load and write actuator state back
//!   ([`SmartHouseRepository`](repository::SmartHouseRepository))
//! - Serialize mutations per device ([`DeviceLocks`](locks::DeviceLocks))
//! - Expose read-only projections and device control as services
//!
//! ## Dependency rule
//! Depends on `smarthouse-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod locks;
pub mod ports;
pub mod repository;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
