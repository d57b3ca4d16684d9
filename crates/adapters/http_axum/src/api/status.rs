//! Engine status for the widget view.

use axum::Json;
use axum::extract::State;

use timer24h_app::engine::EngineStatus;
use timer24h_app::ports::HostPorts;
use timer24h_domain::time;

use crate::state::AppState;

/// `GET /api/status` — title, current slot, verdict, sync indicator and slots,
/// as of the host's local wall clock.
pub async fn show<H: HostPorts>(State(state): State<AppState<H>>) -> Json<EngineStatus> {
    Json(state.engine.status_at(time::local_time_of_day()))
}
