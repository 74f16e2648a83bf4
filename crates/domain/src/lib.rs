//! # smarthouse-domain
//!
//! Pure domain model for the smarthouse topology and telemetry service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **topology**: a [`SmartHouse`](house::SmartHouse) owns
//!   [`Floor`](floor::Floor)s, floors own [`Room`](room::Room)s, rooms own
//!   [`Device`](device::Device)s
//! - Define device **capabilities** (sensing, actuation) as optional facets
//! - Define **measurements** (immutable sensor readings)
//! - Enforce identity and referential invariants while the graph is assembled
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! Storage access is expressed as a port trait in the `app` crate.

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod floor;
pub mod house;
pub mod measurement;
pub mod room;
