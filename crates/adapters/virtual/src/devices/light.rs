//! Virtual light — on/off plus an optional brightness.

use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

use super::StateCell;
use crate::error::VirtualError;

/// A simulated dimmable light.
pub struct VirtualLight {
    entity_id: String,
    state: StateCell,
    brightness: AtomicU8,
}

impl VirtualLight {
    #[must_use]
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            state: StateCell::new("off"),
            brightness: AtomicU8::new(u8::MAX),
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

    #[must_use]
    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::SeqCst)
    }

    /// Handle a service call; `turn_on` honours a `brightness` param.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::InvalidParameter`] when `brightness` is not a
    /// number in `0..=255`, [`VirtualError::UnsupportedService`] for unknown
    /// verbs.
    pub fn handle_service(&self, service: &str, params: &Value) -> Result<(), VirtualError> {
        match service {
            "turn_on" => {
                if let Some(raw) = params.get("brightness") {
                    let level = raw
                        .as_u64()
                        .and_then(|level| u8::try_from(level).ok())
                        .ok_or_else(|| VirtualError::InvalidParameter {
                            entity: self.entity_id.clone(),
                            name: "brightness",
                        })?;
                    self.brightness.store(level, Ordering::SeqCst);
                }
                self.state.set("on");
            }
            "turn_off" => self.state.set("off"),
            _ => return Err(VirtualError::unsupported(&self.entity_id, service)),
        }
        Ok(())
    }
}
