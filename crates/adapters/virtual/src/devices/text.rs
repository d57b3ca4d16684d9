//! Virtual text helper — `input_text.*`, the storage helper the widget may
//! create for itself.

use serde_json::Value;

use super::StateCell;
use crate::error::VirtualError;

pub struct VirtualText {
    entity_id: String,
    value: StateCell,
}

impl VirtualText {
    #[must_use]
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            value: StateCell::new(""),
        }
    }

    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.value.get()
    }

    /// Handle `set_value`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::InvalidParameter`] when `value` is not a
    /// string, [`VirtualError::UnsupportedService`] for other verbs.
    pub fn handle_service(&self, service: &str, params: &Value) -> Result<(), VirtualError> {
        if service != "set_value" {
            return Err(VirtualError::unsupported(&self.entity_id, service));
        }
        let value = params.get("value").and_then(Value::as_str).ok_or_else(|| {
            VirtualError::InvalidParameter {
                entity: self.entity_id.clone(),
                name: "value",
            }
        })?;
        self.value.set(value);
        Ok(())
    }
}
