//! In-process event bus backed by a tokio broadcast channel.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::services::persistence::Tier;

/// Why the slot grid changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOrigin {
    /// A user toggled a slot.
    User,
    /// A saved snapshot was loaded at configuration time.
    Load,
    /// The periodic pull found a different remote snapshot.
    Remote,
}

/// Something observers of the engine may want to re-render on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    GridChanged { origin: GridOrigin },
    StateLoaded { tier: Tier },
    Persisted { tier: Tier },
    VerdictChanged { active: bool },
}

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: EngineEvent) {
        // send only fails when nobody listens
        let _ = self.sender.send(event);
    }
}
