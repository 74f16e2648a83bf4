//! Measurement — an immutable reading produced by a sensor.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::Timestamp;

/// A single sensor reading. Never modified after it has been recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub device_id: DeviceId,
    pub value: f64,
    pub timestamp: Timestamp,
    pub unit: Option<String>,
}

impl Measurement {
    /// Create a measurement taken at `timestamp`.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        value: f64,
        timestamp: Timestamp,
        unit: Option<String>,
    ) -> Self {
        Self {
            device_id,
            value,
            timestamp,
            unit,
        }
    }
}
