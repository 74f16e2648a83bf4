//! Device — a physical thing installed in the house.
//!
//! A device may sense, actuate, do both, or do neither. The capabilities are
//! optional facets on a single [`Device`] type rather than subtypes, so the
//! "can this device be switched?" question is answered by looking at
//! [`Device::actuator`] before dispatching.

use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{Capability, InvalidOperationError, SmartHouseError, ValidationError};
use crate::id::{DeviceId, RoomId};

/// Storage discriminator describing which facets a device carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Plain,
    Sensor,
    Actuator,
    ActuatorSensor,
}

impl DeviceKind {
    /// Canonical storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Sensor => "sensor",
            Self::Actuator => "actuator",
            Self::ActuatorSensor => "actuator_sensor",
        }
    }

    #[must_use]
    pub fn senses(self) -> bool {
        matches!(self, Self::Sensor | Self::ActuatorSensor)
    }

    #[must_use]
    pub fn actuates(self) -> bool {
        matches!(self, Self::Actuator | Self::ActuatorSensor)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "device" => Ok(Self::Plain),
            "sensor" => Ok(Self::Sensor),
            "actuator" => Ok(Self::Actuator),
            "actuator_sensor" => Ok(Self::ActuatorSensor),
            other => Err(ValidationError::UnknownDeviceKind(other.to_owned())),
        }
    }
}

/// Sensing capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sensor {
    /// Unit the sensor reports in, when declared.
    pub unit: Option<String>,
}

/// Actuation capability.
///
/// The state lives behind a lock so that the device can be switched while the
/// house graph is shared read-only between requests. `None` means off.
#[derive(Debug, Default)]
pub struct Actuator {
    state: RwLock<Option<f64>>,
}

impl Actuator {
    /// Create an actuator with a known initial state.
    #[must_use]
    pub fn new(state: Option<f64>) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Set the state and mark the actuator active. Any value is accepted.
    pub fn turn_on(&self, value: f64) -> f64 {
        self.set_state(Some(value));
        value
    }

    /// Clear the state.
    pub fn turn_off(&self) {
        self.set_state(None);
    }

    /// Current state, `None` while off.
    #[must_use]
    pub fn state(&self) -> Option<f64> {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state().is_some()
    }

    /// Overwrite the state without any on/off semantics.
    pub fn set_state(&self, state: Option<f64>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// A device registered in the house.
#[derive(Debug)]
pub struct Device {
    pub id: DeviceId,
    pub model_name: String,
    pub supplier: String,
    /// Category such as "Light bulb" or "Temperature sensor".
    pub device_type: String,
    /// Room the device is installed in; `None` while unassigned.
    pub room: Option<RoomId>,
    pub sensor: Option<Sensor>,
    pub actuator: Option<Actuator>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Facets carried by this device.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match (self.sensor.is_some(), self.actuator.is_some()) {
            (false, false) => DeviceKind::Plain,
            (true, false) => DeviceKind::Sensor,
            (false, true) => DeviceKind::Actuator,
            (true, true) => DeviceKind::ActuatorSensor,
        }
    }

    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    #[must_use]
    pub fn is_actuator(&self) -> bool {
        self.actuator.is_some()
    }

    /// Access the actuation facet.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOperationError`] when the device cannot actuate.
    pub fn actuator(&self) -> Result<&Actuator, InvalidOperationError> {
        self.actuator.as_ref().ok_or_else(|| InvalidOperationError {
            device: self.id.clone(),
            required: Capability::Actuator,
        })
    }

    /// Access the sensing facet.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOperationError`] when the device cannot sense.
    pub fn sensor(&self) -> Result<&Sensor, InvalidOperationError> {
        self.sensor.as_ref().ok_or_else(|| InvalidOperationError {
            device: self.id.clone(),
            required: Capability::Sensor,
        })
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::Validation`] when `id` is empty.
    pub fn validate(&self) -> Result<(), SmartHouseError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyDeviceId.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    model_name: Option<String>,
    supplier: Option<String>,
    device_type: Option<String>,
    room: Option<RoomId>,
    sensor: Option<Sensor>,
    actuator: Option<Actuator>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    #[must_use]
    pub fn sensor(mut self, sensor: Sensor) -> Self {
        self.sensor = Some(sensor);
        self
    }

    #[must_use]
    pub fn actuator(mut self, actuator: Actuator) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Attach the facets a storage discriminator asks for.
    ///
    /// `unit` goes to the sensor facet and `state` to the actuator facet;
    /// each is ignored when the kind lacks that facet.
    #[must_use]
    pub fn kind(mut self, kind: DeviceKind, unit: Option<String>, state: Option<f64>) -> Self {
        self.sensor = kind.senses().then_some(Sensor { unit });
        self.actuator = kind.actuates().then(|| Actuator::new(state));
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`SmartHouseError::Validation`] if `id` is missing or empty.
    pub fn build(self) -> Result<Device, SmartHouseError> {
        let device = Device {
            id: self.id.unwrap_or_else(|| DeviceId::from(String::new())),
            model_name: self.model_name.unwrap_or_default(),
            supplier: self.supplier.unwrap_or_default(),
            device_type: self.device_type.unwrap_or_default(),
            room: self.room,
            sensor: self.sensor,
            actuator: self.actuator,
        };
        device.validate()?;
        Ok(device)
    }
}
