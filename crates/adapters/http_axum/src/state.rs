//! Shared application state for axum handlers.

use std::sync::Arc;

use timer24h_app::engine::TimerEngine;
use timer24h_app::ports::HostPorts;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the host type itself does not need to
/// be `Clone`; only the `Arc` is cloned.
pub struct AppState<H: HostPorts> {
    pub engine: Arc<TimerEngine<H>>,
}

impl<H: HostPorts> AppState<H> {
    pub fn new(engine: Arc<TimerEngine<H>>) -> Self {
        Self { engine }
    }
}

impl<H: HostPorts> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}
