//! # smarthouse-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/smarthouse` (floors, rooms, devices,
//!   actuator state, latest measurements)
//! - Serve the static web front-end under `/static` when a directory is
//!   configured
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `smarthouse-app` (for the storage port and services) and
//! `smarthouse-domain` (for domain types used in response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
