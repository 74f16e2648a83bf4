//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`SmartHouseError`] via `#[from]` (or an explicit `From` impl for adapter
//! errors that this crate cannot name).

use std::time::Duration;

use crate::id::{DeviceId, RoomId};

/// Boxed error coming from a storage adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every smarthouse operation.
#[derive(Debug, thiserror::Error)]
pub enum SmartHouseError {
    /// Domain invariant violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// Requested item does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Operation not supported by the target device.
    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperationError),

    /// The deep load could not assemble a complete house.
    #[error("failed to load the house from storage")]
    Repository(#[from] RepositoryError),

    /// A mutation could not be written back to storage. The in-memory
    /// state may be ahead of the store until the caller retries.
    #[error("failed to write to storage")]
    StorageWrite(#[source] BoxError),

    /// A storage read failed outside of the deep load.
    #[error("storage error")]
    Storage(#[source] BoxError),
}

impl SmartHouseError {
    /// Wrap an arbitrary storage failure as a [`StorageWrite`](Self::StorageWrite).
    ///
    /// Read errors that already went through [`SmartHouseError::Storage`]
    /// are unwrapped first so the source chain stays one level deep.
    #[must_use]
    pub fn into_write_error(self) -> Self {
        match self {
            Self::Storage(source) | Self::StorageWrite(source) => Self::StorageWrite(source),
            other => Self::StorageWrite(Box::new(other)),
        }
    }
}

/// Invariant violations detected while assembling or mutating the model.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("floor level {0} is registered more than once")]
    DuplicateFloor(i64),

    #[error("room {0} is registered more than once")]
    DuplicateRoom(RoomId),

    #[error("device {0} is registered more than once")]
    DuplicateDevice(DeviceId),

    #[error("room {room} points to floor {declared} but was added to floor {actual}")]
    RoomFloorMismatch {
        room: RoomId,
        declared: i64,
        actual: i64,
    },

    #[error("device {device} points to room {declared:?} but was added to room {actual:?}")]
    DeviceRoomMismatch {
        device: DeviceId,
        declared: Option<RoomId>,
        actual: Option<RoomId>,
    },

    #[error("device id must not be empty")]
    EmptyDeviceId,

    #[error("room size must be a finite, non-negative number, got {0}")]
    InvalidRoomSize(f64),

    #[error("unknown device kind `{0}`")]
    UnknownDeviceKind(String),

    #[error("actuator state must be a finite number, got {0}")]
    NonFiniteState(f64),
}

/// A lookup that found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The capability a device would need for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Sensor,
    Actuator,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensor => f.write_str("sensor"),
            Self::Actuator => f.write_str("actuator"),
        }
    }
}

/// An operation was requested on a device lacking the required capability.
#[derive(Debug, thiserror::Error)]
#[error("device {device} has no {required} capability")]
pub struct InvalidOperationError {
    pub device: DeviceId,
    pub required: Capability,
}

/// Failures of the deep load. Any of these aborts the whole load.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("reading {stage} from storage failed")]
    Read {
        stage: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("reading {stage} from storage did not complete within {after:?}")]
    Timeout {
        stage: &'static str,
        after: Duration,
    },

    #[error("room {room} references floor {floor}, which does not exist")]
    MissingFloor { room: RoomId, floor: i64 },

    #[error("room {room} was fetched for floor {expected} but references floor {found}")]
    FloorMismatch {
        room: RoomId,
        expected: i64,
        found: i64,
    },

    #[error("device {device} references room {room}, which does not exist")]
    MissingRoom { device: DeviceId, room: RoomId },

    #[error("inconsistent topology")]
    Invalid(#[from] ValidationError),
}

/// A storage call exceeded its time budget.
#[derive(Debug, thiserror::Error)]
#[error("{operation} did not complete within {after:?}")]
pub struct StorageTimeout {
    pub operation: &'static str,
    pub after: Duration,
}
