//! Virtual device implementations.
//!
//! Every device is addressed by its entity reference (`switch.boiler`) and
//! keeps its state behind a mutex so the home can be shared between tasks.

mod climate;
mod light;
mod sensor;
mod switch;
mod text;
mod trigger;

pub use climate::VirtualClimate;
pub use light::VirtualLight;
pub use sensor::VirtualSensor;
pub use switch::VirtualSwitch;
pub use text::VirtualText;
pub use trigger::VirtualTrigger;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::VirtualError;

/// Wrapper enum for the concrete virtual device types.
pub enum VirtualDevice {
    Switch(VirtualSwitch),
    Light(VirtualLight),
    Climate(VirtualClimate),
    Trigger(VirtualTrigger),
    Sensor(VirtualSensor),
    Text(VirtualText),
}

impl VirtualDevice {
    #[must_use]
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Switch(d) => d.entity_id(),
            Self::Light(d) => d.entity_id(),
            Self::Climate(d) => d.entity_id(),
            Self::Trigger(d) => d.entity_id(),
            Self::Sensor(d) => d.entity_id(),
            Self::Text(d) => d.entity_id(),
        }
    }

    /// Current state as the host would report it.
    #[must_use]
    pub fn state(&self) -> String {
        match self {
            Self::Switch(d) => d.state(),
            Self::Light(d) => d.state(),
            Self::Climate(d) => d.state(),
            Self::Trigger(d) => d.state(),
            Self::Sensor(d) => d.state(),
            Self::Text(d) => d.state(),
        }
    }

    /// Handle a service call addressed to this device.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::UnsupportedService`] for verbs the device does
    /// not understand and [`VirtualError::InvalidParameter`] for bad params.
    pub fn handle_service(&self, service: &str, params: &Value) -> Result<(), VirtualError> {
        match self {
            Self::Switch(d) => d.handle_service(service),
            Self::Light(d) => d.handle_service(service, params),
            Self::Climate(d) => d.handle_service(service, params),
            Self::Trigger(d) => d.handle_service(service),
            Self::Sensor(d) => Err(VirtualError::unsupported(d.entity_id(), service)),
            Self::Text(d) => d.handle_service(service, params),
        }
    }
}

/// Shared state cell used by every device.
pub(crate) struct StateCell(Mutex<String>);

impl StateCell {
    pub(crate) fn new(state: &str) -> Self {
        Self(Mutex::new(state.to_string()))
    }

    pub(crate) fn get(&self) -> String {
        self.lock().clone()
    }

    pub(crate) fn set(&self, state: &str) {
        *self.lock() = state.to_string();
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
