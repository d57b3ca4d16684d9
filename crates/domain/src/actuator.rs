//! Actuator classes — how a desired on/off intent becomes a host command.
//!
//! The class of an actuator is decided by the namespace of its reference.
//! Each class carries its own mapping; namespaces we do not drive resolve to
//! [`ActuatorClass::Unsupported`], which never produces a command.

use crate::entity::namespace_of;
use crate::service::ServiceCall;

/// Mode set on climate actuators when the verdict is active.
pub const CLIMATE_ACTIVE_MODE: &str = "heat";

/// Closed set of actuator kinds the dispatcher knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorClass {
    /// `switch`, `input_boolean`: `turn_on` / `turn_off`.
    Binary,
    /// `light`: `turn_on` / `turn_off`.
    Light,
    /// `climate`: `set_hvac_mode` heat / off.
    Climate,
    /// `script`: one-shot `turn_on`, nothing on off.
    Script,
    /// `automation`: one-shot `trigger`, nothing on off.
    Automation,
    /// Anything else.
    Unsupported,
}

impl ActuatorClass {
    /// Resolve the class of an actuator reference.
    #[must_use]
    pub fn of(entity_ref: &str) -> Self {
        match namespace_of(entity_ref) {
            "switch" | "input_boolean" => Self::Binary,
            "light" => Self::Light,
            "climate" => Self::Climate,
            "script" => Self::Script,
            "automation" => Self::Automation,
            _ => Self::Unsupported,
        }
    }

    /// Command that brings `entity_ref` to the desired state, if any.
    #[must_use]
    pub fn command(self, entity_ref: &str, desired_on: bool) -> Option<ServiceCall> {
        let namespace = namespace_of(entity_ref);
        let on_off = if desired_on { "turn_on" } else { "turn_off" };
        match self {
            Self::Binary | Self::Light => {
                Some(ServiceCall::for_entity(namespace, on_off, entity_ref))
            }
            Self::Climate => {
                let mode = if desired_on { CLIMATE_ACTIVE_MODE } else { "off" };
                Some(
                    ServiceCall::for_entity(namespace, "set_hvac_mode", entity_ref)
                        .with_param("hvac_mode", mode),
                )
            }
            Self::Script => {
                desired_on.then(|| ServiceCall::for_entity(namespace, "turn_on", entity_ref))
            }
            Self::Automation => {
                desired_on.then(|| ServiceCall::for_entity(namespace, "trigger", entity_ref))
            }
            Self::Unsupported => None,
        }
    }
}

impl std::fmt::Display for ActuatorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Binary => "binary",
            Self::Light => "light",
            Self::Climate => "climate",
            Self::Script => "script",
            Self::Automation => "automation",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
