//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod config;
#[allow(clippy::missing_errors_doc)]
pub mod slots;
pub mod sse;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use timer24h_app::ports::HostPorts;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H: HostPorts>() -> Router<AppState<H>> {
    Router::new()
        .route("/status", get(status::show::<H>))
        // Slots
        .route("/slots", get(slots::list::<H>))
        .route("/slots/{hour}/{minute}/toggle", post(slots::toggle::<H>))
        // Configuration
        .route("/config", get(config::show::<H>).put(config::update::<H>))
        // Events
        .route("/events/stream", get(sse::stream::<H>))
}
