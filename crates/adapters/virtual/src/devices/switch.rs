//! Virtual switch — `switch.*` and `input_boolean.*`, responds to `turn_on`,
//! `turn_off`, `toggle`.

use super::StateCell;
use crate::error::VirtualError;

/// A simulated two-state switch.
pub struct VirtualSwitch {
    entity_id: String,
    state: StateCell,
}

impl VirtualSwitch {
    #[must_use]
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            state: StateCell::new("off"),
        }
    }

    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.state.get()
    }

    /// Handle a service call.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::UnsupportedService`] for unknown verbs.
    pub fn handle_service(&self, service: &str) -> Result<(), VirtualError> {
        match service {
            "turn_on" => self.state.set("on"),
            "turn_off" => self.state.set("off"),
            "toggle" => {
                let next = if self.state.get() == "on" { "off" } else { "on" };
                self.state.set(next);
            }
            _ => return Err(VirtualError::unsupported(&self.entity_id, service)),
        }
        Ok(())
    }
}
