//! Application services — use-case implementations.
//!
//! Services receive the loaded house and the repository through their
//! constructors, keeping this layer decoupled from concrete adapters.

pub mod device_service;
pub mod house_service;
