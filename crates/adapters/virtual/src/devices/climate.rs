//! Virtual climate — the state is the current HVAC mode.

use serde_json::Value;

use super::StateCell;
use crate::error::VirtualError;

/// Modes the virtual thermostat accepts.
pub const HVAC_MODES: [&str; 5] = ["off", "heat", "cool", "auto", "heat_cool"];

/// A simulated thermostat.
pub struct VirtualClimate {
    entity_id: String,
    mode: StateCell,
}

impl VirtualClimate {
    #[must_use]
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            mode: StateCell::new("off"),
        }
    }

    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.mode.get()
    }

    /// Handle `set_hvac_mode`, `turn_on` (heat) and `turn_off`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::InvalidParameter`] when `hvac_mode` is missing
    /// or unknown, [`VirtualError::UnsupportedService`] for other verbs.
    pub fn handle_service(&self, service: &str, params: &Value) -> Result<(), VirtualError> {
        match service {
            "set_hvac_mode" => {
                let mode = params
                    .get("hvac_mode")
                    .and_then(Value::as_str)
                    .filter(|mode| HVAC_MODES.contains(mode))
                    .ok_or_else(|| VirtualError::InvalidParameter {
                        entity: self.entity_id.clone(),
                        name: "hvac_mode",
                    })?;
                self.mode.set(mode);
            }
            "turn_on" => self.mode.set("heat"),
            "turn_off" => self.mode.set("off"),
            _ => return Err(VirtualError::unsupported(&self.entity_id, service)),
        }
        Ok(())
    }
}
