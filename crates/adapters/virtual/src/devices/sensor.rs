//! Virtual sensor — read-only from the engine's side; the simulation sets
//! its state directly.

use super::StateCell;

/// A simulated presence or binary sensor.
pub struct VirtualSensor {
    entity_id: String,
    state: StateCell,
}

impl VirtualSensor {
    #[must_use]
    pub fn new(entity_id: &str, state: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            state: StateCell::new(state),
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

    pub fn set_state(&self, state: &str) {
        self.state.set(state);
    }
}
