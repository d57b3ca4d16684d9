//! Persisted snapshot — the unit of durability.
//!
//! The whole schedule is stored as one JSON document:
//!
//! ```json
//! { "timeSlots": [ {"hour": 0, "minute": 0, "active": false}, … ], "timestamp": 1700000000000 }
//! ```
//!
//! There is no version field and no per-slot storage; every write replaces
//! the previous document at the same key.

use serde::{Deserialize, Serialize};

use crate::slot::SlotGrid;
use crate::time::Timestamp;

/// A full schedule at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(rename = "timeSlots")]
    pub time_slots: SlotGrid,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl PersistedSnapshot {
    /// Capture `grid` as of `at`.
    #[must_use]
    pub fn capture(grid: &SlotGrid, at: Timestamp) -> Self {
        Self {
            time_slots: grid.clone(),
            timestamp: at.timestamp_millis(),
        }
    }

    /// Serialize to the stored text form.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse the stored text form, enforcing the grid invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] when the text is not a valid snapshot.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
