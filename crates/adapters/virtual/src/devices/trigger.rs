//! Virtual one-shot trigger — scripts (`turn_on`) and automations
//! (`trigger`). Each accepted call counts as one run.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::StateCell;
use crate::error::VirtualError;

/// A simulated script or automation.
pub struct VirtualTrigger {
    entity_id: String,
    verb: &'static str,
    state: StateCell,
    runs: AtomicUsize,
}

impl VirtualTrigger {
    /// A script, run with `script.turn_on`.
    #[must_use]
    pub fn script(entity_id: &str) -> Self {
        Self::new(entity_id, "turn_on", "off")
    }

    /// An automation, run with `automation.trigger`.
    #[must_use]
    pub fn automation(entity_id: &str) -> Self {
        Self::new(entity_id, "trigger", "on")
    }

    fn new(entity_id: &str, verb: &'static str, state: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            verb,
            state: StateCell::new(state),
            runs: AtomicUsize::new(0),
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

    /// How many times the trigger ran.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Handle a service call.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::UnsupportedService`] for anything but the run verb.
    pub fn handle_service(&self, service: &str) -> Result<(), VirtualError> {
        if service != self.verb {
            return Err(VirtualError::unsupported(&self.entity_id, service));
        }
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
